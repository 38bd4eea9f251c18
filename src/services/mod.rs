pub mod forecaster;
pub mod pv_model;
