pub mod forecast_controller;
pub mod health_controller;
pub mod simulation_controller;
