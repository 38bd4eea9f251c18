use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ServiceError;

pub const CONFIG_ENV: &str = "SERVICE_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "config.json";

fn default_log_level() -> String { "info".to_string() }
fn default_host() -> IpAddr { IpAddr::V4(Ipv4Addr::UNSPECIFIED) }
fn default_forecast_port() -> u16 { 8002 }
fn default_pv_port() -> u16 { 8001 }
fn default_window() -> usize { 30 }
fn default_base_yield_per_kw() -> f64 { 1400.0 }
fn default_optimal_tilt_deg() -> f64 { 30.0 }
fn default_optimal_azimuth_deg() -> f64 { 180.0 }
fn default_cost_per_kw() -> f64 { 1200.0 }
fn default_energy_price_per_kwh() -> f64 { 0.25 }

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub forecast: ForecastConfig,
    #[serde(default)]
    pub pv: PvConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ForecastConfig {
    #[serde(default = "ForecastConfig::default_server")]
    pub server: ServerConfig,
    /// Maximum number of trailing history entries averaged.
    #[serde(default = "default_window")]
    pub window: usize,
}

impl ForecastConfig {
    fn default_server() -> ServerConfig {
        ServerConfig { host: default_host(), port: default_forecast_port() }
    }
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self { server: Self::default_server(), window: default_window() }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    #[default]
    Heuristic,
    Detailed,
}

impl std::str::FromStr for ModelKind {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "heuristic" => Ok(ModelKind::Heuristic),
            "detailed" => Ok(ModelKind::Detailed),
            other => Err(ServiceError::Config(format!("unknown pv model `{other}`"))),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct PvConfig {
    #[serde(default = "PvConfig::default_server")]
    pub server: ServerConfig,
    #[serde(default)]
    pub model: ModelKind,
    #[serde(default)]
    pub heuristic: HeuristicParams,
}

impl PvConfig {
    fn default_server() -> ServerConfig {
        ServerConfig { host: default_host(), port: default_pv_port() }
    }
}

impl Default for PvConfig {
    fn default() -> Self {
        Self {
            server: Self::default_server(),
            model: ModelKind::default(),
            heuristic: HeuristicParams::default(),
        }
    }
}

/// Tunable constants of the rule-of-thumb yield model.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct HeuristicParams {
    /// kWh produced per installed kW per year
    #[serde(default = "default_base_yield_per_kw")]
    pub base_yield_per_kw: f64,
    #[serde(default = "default_optimal_tilt_deg")]
    pub optimal_tilt_deg: f64,
    #[serde(default = "default_optimal_azimuth_deg")]
    pub optimal_azimuth_deg: f64,
    #[serde(default = "default_cost_per_kw")]
    pub cost_per_kw: f64,
    #[serde(default = "default_energy_price_per_kwh")]
    pub energy_price_per_kwh: f64,
}

impl Default for HeuristicParams {
    fn default() -> Self {
        Self {
            base_yield_per_kw: default_base_yield_per_kw(),
            optimal_tilt_deg: default_optimal_tilt_deg(),
            optimal_azimuth_deg: default_optimal_azimuth_deg(),
            cost_per_kw: default_cost_per_kw(),
            energy_price_per_kwh: default_energy_price_per_kwh(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            forecast: ForecastConfig::default(),
            pv: PvConfig::default(),
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ServiceError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ServiceError::ConfigRead {
            path: path.display().to_string(),
            source,
        })?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Resolves the config path from `--config <path>`, then `SERVICE_CONFIG`,
    /// then `config.json`. A missing default file falls back to built-in values.
    /// Environment overrides are applied last.
    pub fn from_env() -> Result<Self, ServiceError> {
        let explicit = config_path_arg(std::env::args().skip(1))
            .or_else(|| std::env::var(CONFIG_ENV).ok());

        let mut config = match explicit {
            Some(path) => Self::load(path)?,
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => Self::load(DEFAULT_CONFIG_PATH)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ServiceError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("FORECAST_PORT") {
            self.forecast.server.port = parse_port("FORECAST_PORT", &port)?;
        }
        if let Some(port) = lookup("PV_PORT") {
            self.pv.server.port = parse_port("PV_PORT", &port)?;
        }
        if let Some(model) = lookup("PV_MODEL") {
            self.pv.model = model.parse()?;
        }
        self.validate()
    }

    fn validate(&self) -> Result<(), ServiceError> {
        if self.forecast.window == 0 {
            return Err(ServiceError::Config("forecast.window must be at least 1".into()));
        }
        let p = &self.pv.heuristic;
        let all_finite = [
            p.base_yield_per_kw,
            p.optimal_tilt_deg,
            p.optimal_azimuth_deg,
            p.cost_per_kw,
            p.energy_price_per_kwh,
        ]
        .iter()
        .all(|v| v.is_finite());
        if !all_finite {
            return Err(ServiceError::Config("pv.heuristic values must be finite".into()));
        }
        Ok(())
    }
}

fn parse_port(key: &str, value: &str) -> Result<u16, ServiceError> {
    value
        .trim()
        .parse()
        .map_err(|_| ServiceError::Config(format!("{key} is not a valid port: `{value}`")))
}

fn config_path_arg<I: Iterator<Item = String>>(mut args: I) -> Option<String> {
    while let Some(arg) = args.next() {
        if arg == "--config" {
            return args.next();
        }
        if let Some(path) = arg.strip_prefix("--config=") {
            return Some(path.to_string());
        }
    }
    None
}
