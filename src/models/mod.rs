pub mod forecast;
pub mod simulation;
