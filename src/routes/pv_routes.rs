use axum::{routing::{get, post}, Router};
use utoipa::OpenApi;

use crate::api_docs::PvApiDoc;
use crate::controllers::{health_controller::health, simulation_controller::simulate};
use crate::routes::with_docs;
use crate::shared_state::PvState;

/// Router of the PV simulation service.
pub fn pv_routes(state: PvState) -> Router {
    let api = Router::new()
        .route("/health",   get(health))
        .route("/simulate", post(simulate))
        .with_state(state);

    with_docs(api, PvApiDoc::openapi())
}
