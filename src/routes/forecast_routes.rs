use axum::{routing::{get, post}, Router};
use utoipa::OpenApi;

use crate::api_docs::ForecastApiDoc;
use crate::controllers::{forecast_controller::forecast_material, health_controller::health};
use crate::routes::with_docs;
use crate::shared_state::ForecastState;

/// Router of the forecast service.
pub fn forecast_routes(state: ForecastState) -> Router {
    let api = Router::new()
        .route("/health",            get(health))
        .route("/forecast/material", post(forecast_material))
        .with_state(state);

    with_docs(api, ForecastApiDoc::openapi())
}
