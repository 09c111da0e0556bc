//! Configuration schema with strict validation.
//!
//! Loaded from a TOML file; unknown fields anywhere are a hard error
//! so operator typos surface at startup rather than as silently
//! ignored limits.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::cities::default_cities;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionMode {
    #[default]
    #[serde(rename = "dry-run")]
    DryRun,
    #[serde(rename = "live")]
    Live,
}

impl ExecutionMode {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::DryRun => "dry-run",
            Self::Live => "live",
        }
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExecutionAdapter {
    #[default]
    DryRun,
    Simmer,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionVenue {
    /// Virtual-balance venue on the brokerage bridge.
    #[default]
    Simmer,
    /// Real-money venue proxied by the bridge.
    Polymarket,
}

impl ExecutionVenue {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Simmer => "simmer",
            Self::Polymarket => "polymarket",
        }
    }
}

/// One tracked city with its weather-API grid coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CityConfig {
    pub name: String,
    pub slug: String,
    pub grid_id: String,
    pub grid_x: i32,
    pub grid_y: i32,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

/// Edge-model parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StrategyConfig {
    #[serde(default = "default_min_edge_threshold")]
    pub min_edge_threshold: f64,
    #[serde(default = "default_max_entry_price")]
    pub max_entry_price: f64,
    #[serde(default = "default_min_exit_price")]
    pub min_exit_price: f64,
    #[serde(default = "default_uncertainty_base_f")]
    pub uncertainty_base_f: f64,
    #[serde(default = "default_uncertainty_per_day_f")]
    pub uncertainty_per_day_f: f64,
    #[serde(default = "default_fee_estimate")]
    pub fee_estimate: f64,
    #[serde(default = "default_slippage_estimate")]
    pub slippage_estimate: f64,
}

fn default_min_edge_threshold() -> f64 {
    0.05
}

fn default_max_entry_price() -> f64 {
    0.15
}

fn default_min_exit_price() -> f64 {
    0.45
}

fn default_uncertainty_base_f() -> f64 {
    2.5
}

fn default_uncertainty_per_day_f() -> f64 {
    0.5
}

fn default_fee_estimate() -> f64 {
    0.02
}

fn default_slippage_estimate() -> f64 {
    0.01
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            min_edge_threshold: default_min_edge_threshold(),
            max_entry_price: default_max_entry_price(),
            min_exit_price: default_min_exit_price(),
            uncertainty_base_f: default_uncertainty_base_f(),
            uncertainty_per_day_f: default_uncertainty_per_day_f(),
            fee_estimate: default_fee_estimate(),
            slippage_estimate: default_slippage_estimate(),
        }
    }
}

/// Pre-trade risk limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RiskConfig {
    #[serde(default = "default_max_position_size_usd")]
    pub max_position_size_usd: f64,
    #[serde(default = "default_max_trades_per_run")]
    pub max_trades_per_run: u32,
    #[serde(default = "default_max_total_exposure_usd")]
    pub max_total_exposure_usd: f64,
    #[serde(default = "default_max_per_city_exposure_usd")]
    pub max_per_city_exposure_usd: f64,
    #[serde(default = "default_max_daily_loss_usd")]
    pub max_daily_loss_usd: f64,
    #[serde(default = "default_cooldown_minutes")]
    pub cooldown_minutes: u32,
    #[serde(default = "default_min_hours_to_resolution")]
    pub min_hours_to_resolution: f64,
    #[serde(default = "default_slippage_ceiling")]
    pub slippage_ceiling: f64,
}

fn default_max_position_size_usd() -> f64 {
    5.0
}

fn default_max_trades_per_run() -> u32 {
    3
}

fn default_max_total_exposure_usd() -> f64 {
    25.0
}

fn default_max_per_city_exposure_usd() -> f64 {
    10.0
}

fn default_max_daily_loss_usd() -> f64 {
    10.0
}

fn default_cooldown_minutes() -> u32 {
    30
}

fn default_min_hours_to_resolution() -> f64 {
    6.0
}

fn default_slippage_ceiling() -> f64 {
    0.05
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            max_position_size_usd: default_max_position_size_usd(),
            max_trades_per_run: default_max_trades_per_run(),
            max_total_exposure_usd: default_max_total_exposure_usd(),
            max_per_city_exposure_usd: default_max_per_city_exposure_usd(),
            max_daily_loss_usd: default_max_daily_loss_usd(),
            cooldown_minutes: default_cooldown_minutes(),
            min_hours_to_resolution: default_min_hours_to_resolution(),
            slippage_ceiling: default_slippage_ceiling(),
        }
    }
}

/// Execution routing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExecutionConfig {
    #[serde(default)]
    pub mode: ExecutionMode,
    #[serde(default)]
    pub adapter: ExecutionAdapter,
    #[serde(default)]
    pub venue: ExecutionVenue,
}

/// Operational cadence and freshness limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OpsConfig {
    #[serde(default = "default_scan_interval_minutes")]
    pub scan_interval_minutes: u32,
    #[serde(default = "default_forecast_max_age_minutes")]
    pub forecast_max_age_minutes: u32,
    #[serde(default = "default_market_data_max_age_minutes")]
    pub market_data_max_age_minutes: u32,
    #[serde(default = "default_lookahead_days")]
    pub lookahead_days: u32,
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,
}

fn default_scan_interval_minutes() -> u32 {
    60
}

fn default_forecast_max_age_minutes() -> u32 {
    360
}

fn default_market_data_max_age_minutes() -> u32 {
    30
}

fn default_lookahead_days() -> u32 {
    7
}

fn default_request_delay_ms() -> u64 {
    200
}

impl Default for OpsConfig {
    fn default() -> Self {
        Self {
            scan_interval_minutes: default_scan_interval_minutes(),
            forecast_max_age_minutes: default_forecast_max_age_minutes(),
            market_data_max_age_minutes: default_market_data_max_age_minutes(),
            lookahead_days: default_lookahead_days(),
            request_delay_ms: default_request_delay_ms(),
        }
    }
}

/// Main engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub strategy: StrategyConfig,
    #[serde(default)]
    pub risk: RiskConfig,
    #[serde(default)]
    pub execution: ExecutionConfig,
    #[serde(default)]
    pub ops: OpsConfig,
    #[serde(default)]
    pub cities: Vec<CityConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            strategy: StrategyConfig::default(),
            risk: RiskConfig::default(),
            execution: ExecutionConfig::default(),
            ops: OpsConfig::default(),
            cities: default_cities(),
        }
    }
}

impl Config {
    /// Load and validate a config from a TOML file.
    ///
    /// When the file names no cities, the built-in five-city default
    /// set is injected.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path.as_ref()).map_err(|e| {
            Error::Config(format!("cannot read {}: {e}", path.as_ref().display()))
        })?;
        Self::parse_toml(&raw)
    }

    /// Parse and validate TOML config content.
    pub fn parse_toml(raw: &str) -> Result<Self> {
        let mut config: Self =
            toml::from_str(raw).map_err(|e| Error::Config(e.to_string()))?;
        if config.cities.is_empty() {
            config.cities = default_cities();
        }
        config.validate()?;
        Ok(config)
    }

    /// Enforce the numeric ranges of every field.
    pub fn validate(&self) -> Result<()> {
        let s = &self.strategy;
        check_unit("strategy.min_edge_threshold", s.min_edge_threshold)?;
        check_unit("strategy.max_entry_price", s.max_entry_price)?;
        check_unit("strategy.min_exit_price", s.min_exit_price)?;
        check_positive("strategy.uncertainty_base_f", s.uncertainty_base_f)?;
        check_non_negative("strategy.uncertainty_per_day_f", s.uncertainty_per_day_f)?;
        check_unit("strategy.fee_estimate", s.fee_estimate)?;
        check_unit("strategy.slippage_estimate", s.slippage_estimate)?;

        let r = &self.risk;
        check_positive("risk.max_position_size_usd", r.max_position_size_usd)?;
        if r.max_trades_per_run < 1 {
            return Err(Error::Config(
                "risk.max_trades_per_run must be >= 1".to_string(),
            ));
        }
        check_positive("risk.max_total_exposure_usd", r.max_total_exposure_usd)?;
        check_positive(
            "risk.max_per_city_exposure_usd",
            r.max_per_city_exposure_usd,
        )?;
        check_positive("risk.max_daily_loss_usd", r.max_daily_loss_usd)?;
        check_non_negative("risk.min_hours_to_resolution", r.min_hours_to_resolution)?;
        check_unit("risk.slippage_ceiling", r.slippage_ceiling)?;

        let o = &self.ops;
        if o.scan_interval_minutes < 1 {
            return Err(Error::Config(
                "ops.scan_interval_minutes must be >= 1".to_string(),
            ));
        }
        if o.forecast_max_age_minutes < 1 {
            return Err(Error::Config(
                "ops.forecast_max_age_minutes must be >= 1".to_string(),
            ));
        }
        if o.market_data_max_age_minutes < 1 {
            return Err(Error::Config(
                "ops.market_data_max_age_minutes must be >= 1".to_string(),
            ));
        }
        if !(1..=14).contains(&o.lookahead_days) {
            return Err(Error::Config(
                "ops.lookahead_days must be in 1..=14".to_string(),
            ));
        }

        for city in &self.cities {
            if city.slug.is_empty() {
                return Err(Error::Config(format!(
                    "city {:?} has an empty slug",
                    city.name
                )));
            }
        }
        Ok(())
    }

    /// Cities with `enabled = true`.
    #[must_use]
    pub fn enabled_cities(&self) -> Vec<&CityConfig> {
        self.cities.iter().filter(|c| c.enabled).collect()
    }

    /// Initialize the global tracing subscriber.
    ///
    /// `RUST_LOG` overrides the default `info` filter.
    pub fn init_logging(&self) {
        use tracing_subscriber::EnvFilter;

        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .try_init();
    }
}

fn check_unit(field: &str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(Error::Config(format!("{field} must be in [0, 1], got {value}")))
    }
}

fn check_positive(field: &str, value: f64) -> Result<()> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(Error::Config(format!("{field} must be > 0, got {value}")))
    }
}

fn check_non_negative(field: &str, value: f64) -> Result<()> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(Error::Config(format!("{field} must be >= 0, got {value}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        config.validate().unwrap();
        assert_eq!(config.risk.max_trades_per_run, 3);
        assert_eq!(config.cities.len(), 5);
    }

    #[test]
    fn empty_toml_gets_default_cities() {
        let config = Config::parse_toml("").unwrap();
        assert_eq!(config.cities.len(), 5);
        assert!(config.cities.iter().any(|c| c.slug == "nyc"));
    }

    #[test]
    fn unknown_field_is_rejected() {
        let result = Config::parse_toml("[strategy]\nmin_edge = 0.1\n");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn unknown_section_is_rejected() {
        let result = Config::parse_toml("[telemetry]\nenabled = true\n");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn out_of_range_threshold_is_rejected() {
        let result = Config::parse_toml("[strategy]\nmin_edge_threshold = 1.5\n");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn lookahead_days_bounds() {
        assert!(Config::parse_toml("[ops]\nlookahead_days = 14\n").is_ok());
        assert!(Config::parse_toml("[ops]\nlookahead_days = 15\n").is_err());
        assert!(Config::parse_toml("[ops]\nlookahead_days = 0\n").is_err());
    }

    #[test]
    fn zero_trades_per_run_is_rejected() {
        let result = Config::parse_toml("[risk]\nmax_trades_per_run = 0\n");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn partial_sections_keep_defaults() {
        let config = Config::parse_toml("[risk]\nmax_position_size_usd = 2.5\n").unwrap();
        assert!((config.risk.max_position_size_usd - 2.5).abs() < f64::EPSILON);
        assert_eq!(config.risk.max_trades_per_run, 3);
        assert!((config.strategy.min_edge_threshold - 0.05).abs() < f64::EPSILON);
    }

    #[test]
    fn execution_mode_round_trips() {
        let config =
            Config::parse_toml("[execution]\nmode = \"live\"\nadapter = \"simmer\"\n").unwrap();
        assert_eq!(config.execution.mode, ExecutionMode::Live);
        assert_eq!(config.execution.adapter, ExecutionAdapter::Simmer);
    }
}
