//! Two stateless estimation services: a moving-average material usage
//! forecaster and a heuristic PV yield simulator.

pub mod api_docs;
pub mod config;
pub mod controllers;
pub mod error;
pub mod extract;
pub mod models;
pub mod routes;
pub mod server;
pub mod services;
pub mod shared_state;
pub mod telemetry;

pub use config::Config;
pub use error::{ApiError, ServiceError};
pub use routes::{forecast_routes::forecast_routes, pv_routes::pv_routes};
pub use shared_state::{ForecastState, PvState};
