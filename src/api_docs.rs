use utoipa::OpenApi;

use crate::controllers::{forecast_controller, health_controller, simulation_controller};
use crate::error;
use crate::models::{forecast, simulation};

#[derive(OpenApi)]
#[openapi(
    paths(
        health_controller::health,
        forecast_controller::forecast_material
    ),
    components(
        schemas(
            health_controller::HealthStatus,
            forecast::HistoryPoint,
            forecast::ForecastRequest,
            forecast::ForecastPoint,
            forecast::ForecastResponse,
            error::FieldError,
            error::ValidationErrorBody
        )
    ),
    tags(
        (name = "forecast-service", description = "Material usage forecasting API")
    ),
    info(title = "Forecasting Service")
)]
pub struct ForecastApiDoc;

#[derive(OpenApi)]
#[openapi(
    paths(
        health_controller::health,
        simulation_controller::simulate
    ),
    components(
        schemas(
            health_controller::HealthStatus,
            simulation::Site,
            simulation::Roof,
            simulation::SimulationRequest,
            simulation::SimulationResult,
            error::FieldError,
            error::ValidationErrorBody
        )
    ),
    tags(
        (name = "pv-service", description = "PV Simulation API")
    ),
    info(title = "PV Simulation Service")
)]
pub struct PvApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_document_lists_its_own_endpoints() {
        let forecast = ForecastApiDoc::openapi();
        assert!(forecast.paths.paths.contains_key("/health"));
        assert!(forecast.paths.paths.contains_key("/forecast/material"));
        assert!(!forecast.paths.paths.contains_key("/simulate"));

        let pv = PvApiDoc::openapi();
        assert!(pv.paths.paths.contains_key("/simulate"));
        assert!(!pv.paths.paths.contains_key("/forecast/material"));
    }
}
