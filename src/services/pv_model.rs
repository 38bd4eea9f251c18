/// ============================================================
///  PV yield & financial estimation
///
///  Heuristic pipeline:
///   1. Orientation  – triangular tilt / azimuth penalties around
///                     the assumed optimum, clamped to [0.6, 1.1]
///   2. Shading      – user factor clamped to [0, 1]
///   3. Energy       – base kWh/kW/yr × size × factors × (1 − losses)
///   4. Monthly      – flat split over 12 months
///   5. Financials   – fixed €/kW cost and €/kWh price; payback
///                     and ROI guarded against zero denominators
/// ============================================================

use std::fmt::Debug;
use std::sync::Arc;

use crate::config::{HeuristicParams, ModelKind, PvConfig};
use crate::models::simulation::{SimulationRequest, SimulationResult};

const MONTHS: usize = 12;
const FACTOR_MIN: f64 = 0.6;
const FACTOR_MAX: f64 = 1.1;

/// Strategy seam for yield estimation; chosen once at startup.
pub trait YieldModel: Send + Sync + Debug {
    fn name(&self) -> &'static str;
    fn simulate(&self, req: &SimulationRequest) -> SimulationResult;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicModel {
    params: HeuristicParams,
}

impl HeuristicModel {
    pub fn new(params: HeuristicParams) -> Self {
        Self { params }
    }

    pub fn tilt_factor(&self, tilt_deg: f64) -> f64 {
        (1.0 - (tilt_deg - self.params.optimal_tilt_deg).abs() / 90.0).clamp(FACTOR_MIN, FACTOR_MAX)
    }

    pub fn azimuth_factor(&self, azimuth_deg: f64) -> f64 {
        (1.0 - (azimuth_deg - self.params.optimal_azimuth_deg).abs() / 180.0)
            .clamp(FACTOR_MIN, FACTOR_MAX)
    }

    pub fn annual_yield_kwh(&self, req: &SimulationRequest) -> f64 {
        let shading = req.roof.shading_factor.clamp(0.0, 1.0);
        self.params.base_yield_per_kw
            * req.system_size_kw
            * self.tilt_factor(req.roof.tilt_deg)
            * self.azimuth_factor(req.roof.azimuth_deg)
            * shading
            * (1.0 - req.losses_pct / 100.0)
    }
}

impl YieldModel for HeuristicModel {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    fn simulate(&self, req: &SimulationRequest) -> SimulationResult {
        let annual_kwh = self.annual_yield_kwh(req);
        let monthly_kwh = vec![annual_kwh / MONTHS as f64; MONTHS];

        let total_cost = self.params.cost_per_kw * req.system_size_kw;
        let yearly_savings = annual_kwh * self.params.energy_price_per_kwh;
        let payback_years = if yearly_savings > 0.0 { total_cost / yearly_savings } else { 0.0 };
        let roi_percent = if total_cost > 0.0 { yearly_savings / total_cost * 100.0 } else { 0.0 };

        SimulationResult { annual_kwh, monthly_kwh, payback_years, roi_percent }
    }
}

/// Placeholder for a location-aware irradiance model. No such model exists
/// yet, so estimates come from the heuristic.
#[derive(Debug, Clone, Copy)]
pub struct DetailedModel {
    fallback: HeuristicModel,
}

impl DetailedModel {
    pub fn new(params: HeuristicParams) -> Self {
        tracing::warn!("detailed PV model is not available; estimates use the heuristic formula");
        Self { fallback: HeuristicModel::new(params) }
    }
}

impl YieldModel for DetailedModel {
    fn name(&self) -> &'static str {
        "detailed"
    }

    fn simulate(&self, req: &SimulationRequest) -> SimulationResult {
        self.fallback.simulate(req)
    }
}

pub fn build_model(config: &PvConfig) -> Arc<dyn YieldModel> {
    match config.model {
        ModelKind::Heuristic => Arc::new(HeuristicModel::new(config.heuristic)),
        ModelKind::Detailed => Arc::new(DetailedModel::new(config.heuristic)),
    }
}
