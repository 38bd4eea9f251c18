use pv_forecast_services::{forecast_routes, server, telemetry, Config, ForecastState, ServiceError};

#[tokio::main]
async fn main() -> Result<(), ServiceError> {
    // 1. Load configuration
    let config = Config::from_env()?;
    telemetry::init_tracing("forecast-service", &config.log_level);
    tracing::info!(window = config.forecast.window, "configuration loaded");

    // 2. Build state and router
    let state = ForecastState::new(&config.forecast);
    let app = forecast_routes(state);

    // 3. Serve
    server::serve("forecast-service", config.forecast.server.socket_addr(), app).await
}
