//! Handler for the `scan` command: one cycle, then exit.

use std::path::Path;

use clap::Args;

use crate::clients::{GammaClient, NwsClient};
use crate::config::{Config, ExecutionAdapter, ExecutionMode};
use crate::error::Result;
use crate::execution::build_adapter;
use crate::pipeline::ScanPipeline;
use crate::store::Store;

#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Enable live execution for this cycle
    #[arg(long)]
    pub live: bool,
}

pub async fn execute(config_path: &Path, db_path: &Path, args: &ScanArgs) -> Result<i32> {
    let mut config = load_config(config_path)?;
    config.init_logging();

    if args.live {
        config.execution.mode = ExecutionMode::Live;
        config.execution.adapter = ExecutionAdapter::Simmer;
    }
    if config.execution.mode == ExecutionMode::Live {
        eprintln!("WARNING: running in LIVE mode");
    }

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let store = Store::open(&db_path.to_string_lossy())?;
    let markets = GammaClient::new()?;
    let weather = NwsClient::new()?;
    let adapter = build_adapter(&config)?;

    let pipeline = ScanPipeline::new(&config, &store, &markets, &weather, adapter.as_ref());
    let summary = pipeline.run().await;
    Ok(if summary.is_success() { 0 } else { 1 })
}

/// Load the config file, falling back to pure defaults when the file
/// does not exist.
pub fn load_config(path: &Path) -> Result<Config> {
    if path.exists() {
        Config::load(path)
    } else {
        Ok(Config::default())
    }
}
