use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

fn default_shading_factor() -> f64 { 1.0 }
fn default_losses_pct() -> f64 { 14.0 }

/// Site location. Accepted and validated for shape; not used by the
/// heuristic model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Site {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Roof {
    /// Panel tilt from horizontal (degrees)
    pub tilt_deg: f64,
    /// Panel azimuth, 180 = due south (degrees)
    pub azimuth_deg: f64,
    /// 1.0 = unshaded; clamped to [0, 1] by the model
    #[serde(default = "default_shading_factor")]
    #[schema(default = 1.0)]
    pub shading_factor: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SimulationRequest {
    pub site: Site,
    pub roof: Roof,
    pub system_size_kw: f64,
    /// System losses (wiring, inverter, soiling) in percent
    #[serde(default = "default_losses_pct")]
    #[schema(default = 14.0)]
    pub losses_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    pub annual_kwh: f64,
    /// Always 12 entries, January first
    pub monthly_kwh: Vec<f64>,
    pub payback_years: f64,
    pub roi_percent: f64,
}

impl SimulationResult {
    /// False when any figure overflowed, which JSON cannot represent.
    pub fn is_finite(&self) -> bool {
        [self.annual_kwh, self.payback_years, self.roi_percent]
            .iter()
            .chain(&self.monthly_kwh)
            .all(|v| v.is_finite())
    }
}
