pub mod forecast_routes;
pub mod pv_routes;

use axum::{response::Html, routing::get, Json, Router};
use tower_http::trace::TraceLayer;
use utoipa::openapi::OpenApi as OpenApiDoc;
use utoipa_scalar::Scalar;

use crate::controllers::health_controller::not_found;

/// Adds `/openapi.json`, the Scalar UI, the JSON 404 fallback and request tracing.
pub(crate) fn with_docs(api: Router, doc: OpenApiDoc) -> Router {
    let html = Scalar::new(doc.clone()).to_html();

    api.route("/openapi.json", get(move || async move { Json(doc) }))
        .route("/scalar", get(move || async move { Html(html) }))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
}
