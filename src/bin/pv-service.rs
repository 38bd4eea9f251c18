use pv_forecast_services::{pv_routes, server, telemetry, Config, PvState, ServiceError};

#[tokio::main]
async fn main() -> Result<(), ServiceError> {
    // 1. Load configuration
    let config = Config::from_env()?;
    telemetry::init_tracing("pv-service", &config.log_level);

    // 2. Select the yield model and build the router
    let state = PvState::new(&config.pv);
    tracing::info!(model = state.model.name(), "configuration loaded");
    let app = pv_routes(state);

    // 3. Serve
    server::serve("pv-service", config.pv.server.socket_addr(), app).await
}
