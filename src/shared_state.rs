use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use crate::config::{ForecastConfig, PvConfig};
use crate::services::pv_model::{self, YieldModel};

/// Source of "today" for forecasts over an empty history.
pub type Clock = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

/// Read-only state of the forecast service; cloned into every request.
#[derive(Clone)]
pub struct ForecastState {
    pub window: usize,
    pub clock: Clock,
}

impl ForecastState {
    pub fn new(config: &ForecastConfig) -> Self {
        Self {
            window: config.window,
            clock: Arc::new(|| Utc::now().date_naive()),
        }
    }

    /// Replaces the wall clock, for deterministic tests.
    pub fn with_clock(mut self, clock: impl Fn() -> NaiveDate + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn today(&self) -> NaiveDate {
        (self.clock)()
    }
}

impl std::fmt::Debug for ForecastState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ForecastState").field("window", &self.window).finish_non_exhaustive()
    }
}

/// Read-only state of the PV service.
#[derive(Clone, Debug)]
pub struct PvState {
    pub model: Arc<dyn YieldModel>,
}

impl PvState {
    pub fn new(config: &PvConfig) -> Self {
        Self { model: pv_model::build_model(config) }
    }
}
