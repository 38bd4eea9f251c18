use axum::{extract::State, Json};

use crate::error::{ApiError, FieldError, ValidationErrorBody};
use crate::extract::ValidatedJson;
use crate::models::forecast::{ForecastRequest, ForecastResponse};
use crate::services::forecaster;
use crate::shared_state::ForecastState;

/// POST /forecast/material
/// Moving-average material usage forecast
///
/// Averages the trailing samples of `history` (in the order given, at most
/// the configured window) and projects that value flat for every day after
/// the latest history date. An empty history yields zeros starting tomorrow.
/// A horizon that would run past 9999-12-31 is rejected with 422.
#[utoipa::path(
    post,
    path = "/forecast/material",
    request_body = ForecastRequest,
    responses(
        (status = 200, description = "One forecast point per horizon day", body = ForecastResponse),
        (status = 422, description = "Malformed or invalid request body", body = ValidationErrorBody)
    )
)]
pub async fn forecast_material(
    State(state): State<ForecastState>,
    ValidatedJson(req): ValidatedJson<ForecastRequest>,
) -> Result<Json<ForecastResponse>, ApiError> {
    let forecast = forecaster::moving_average(&req.history, req.horizon_days, state.window, state.today())
        .map_err(|err| {
            ApiError::Validation(vec![FieldError {
                loc: vec!["body".into(), "horizonDays".into()],
                msg: format!("Value error, {err}"),
                kind: "value_error".into(),
            }])
        })?;

    tracing::debug!(
        material_id = %req.material_id,
        samples = req.history.len(),
        horizon_days = req.horizon_days,
        value = forecast.first().map(|p| p.quantity_forecast),
        "material forecast computed"
    );

    Ok(Json(ForecastResponse {
        material_id: req.material_id,
        horizon_days: req.horizon_days,
        forecast,
    }))
}
