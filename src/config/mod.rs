//! Engine configuration: strict TOML schema, validation, defaults,
//! and content-addressed snapshots.

mod cities;
mod settings;
mod snapshot;

pub use cities::default_cities;
pub use settings::{
    CityConfig, Config, ExecutionAdapter, ExecutionConfig, ExecutionMode, ExecutionVenue,
    OpsConfig, RiskConfig, StrategyConfig,
};
pub use snapshot::{config_hash, get_config_value, set_config_value};
