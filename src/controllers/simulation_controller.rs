use axum::{extract::State, Json};

use crate::error::{ApiError, FieldError, ValidationErrorBody};
use crate::extract::ValidatedJson;
use crate::models::simulation::{SimulationRequest, SimulationResult};
use crate::services::pv_model::YieldModel;
use crate::shared_state::PvState;

/// POST /simulate
/// Estimate annual PV yield and simple financial return
///
/// Uses the yield model selected at startup. Site coordinates are accepted
/// but do not influence the current estimate. Inputs so large that the
/// estimate overflows are rejected with 422.
#[utoipa::path(
    post,
    path = "/simulate",
    request_body = SimulationRequest,
    responses(
        (status = 200, description = "Yield and financial estimate", body = SimulationResult),
        (status = 422, description = "Malformed, invalid or out-of-range request body", body = ValidationErrorBody)
    )
)]
pub async fn simulate(
    State(state): State<PvState>,
    ValidatedJson(req): ValidatedJson<SimulationRequest>,
) -> Result<Json<SimulationResult>, ApiError> {
    let result = state.model.simulate(&req);
    if !result.is_finite() {
        return Err(ApiError::Validation(vec![overflow_error(state.model.as_ref(), &req)]));
    }

    tracing::debug!(
        model = state.model.name(),
        system_size_kw = req.system_size_kw,
        tilt_deg = req.roof.tilt_deg,
        azimuth_deg = req.roof.azimuth_deg,
        annual_kwh = result.annual_kwh,
        payback_years = result.payback_years,
        "pv simulation computed"
    );

    Ok(Json(result))
}

/// Blames `lossesPct` when a loss within 0..=100 % gives a finite estimate,
/// `systemSizeKw` otherwise.
fn overflow_error(model: &dyn YieldModel, req: &SimulationRequest) -> FieldError {
    let bounded_losses = SimulationRequest { losses_pct: req.losses_pct.clamp(0.0, 100.0), ..*req };
    let field = if model.simulate(&bounded_losses).is_finite() { "lossesPct" } else { "systemSizeKw" };
    FieldError {
        loc: vec!["body".into(), field.into()],
        msg: "Value is too large: the estimate is not a finite number".into(),
        kind: "value_error".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PvConfig;
    use crate::error::LocSegment;
    use crate::models::simulation::{Roof, Site};

    #[tokio::test]
    async fn simulate_returns_twelve_months() {
        let state = PvState::new(&PvConfig::default());
        let req = SimulationRequest {
            site: Site { latitude: 41.9, longitude: 12.5 },
            roof: Roof { tilt_deg: 10.0, azimuth_deg: 90.0, shading_factor: 0.7 },
            system_size_kw: 3.0,
            losses_pct: 14.0,
        };
        let Json(result) = simulate(State(state), ValidatedJson(req)).await.unwrap();
        assert_eq!(result.monthly_kwh.len(), 12);
        assert!(result.annual_kwh > 0.0);
        assert!(result.payback_years > 0.0);
    }

    fn request(system_size_kw: f64, losses_pct: f64) -> SimulationRequest {
        SimulationRequest {
            site: Site { latitude: 0.0, longitude: 0.0 },
            roof: Roof { tilt_deg: 30.0, azimuth_deg: 180.0, shading_factor: 1.0 },
            system_size_kw,
            losses_pct,
        }
    }

    fn rejected_field(result: Result<Json<SimulationResult>, ApiError>) -> String {
        match result {
            Err(ApiError::Validation(detail)) => {
                assert_eq!(detail.len(), 1);
                assert_eq!(detail[0].kind, "value_error");
                match &detail[0].loc[..] {
                    [LocSegment::Key(body), LocSegment::Key(field)] if body == "body" => field.clone(),
                    loc => panic!("unexpected loc {loc:?}"),
                }
            }
            other => panic!("expected a validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn overflowing_size_is_rejected() {
        let state = PvState::new(&PvConfig::default());
        let result = simulate(State(state), ValidatedJson(request(1e307, 14.0))).await;
        assert_eq!(rejected_field(result), "systemSizeKw");
    }

    #[tokio::test]
    async fn overflowing_losses_are_rejected() {
        let state = PvState::new(&PvConfig::default());
        let result = simulate(State(state), ValidatedJson(request(5.0, -1e307))).await;
        assert_eq!(rejected_field(result), "lossesPct");
    }
}
