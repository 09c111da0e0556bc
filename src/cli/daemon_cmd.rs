//! Handler for the `daemon` command.

use std::path::Path;
use std::time::Duration;

use clap::Args;

use super::scan::load_config;
use crate::config::{ExecutionAdapter, ExecutionMode};
use crate::daemon::{daemon_status, stop_daemon, Supervisor};
use crate::error::Result;
use crate::store::Store;

#[derive(Args, Debug)]
pub struct DaemonArgs {
    /// Seconds between cycles (default: ops.scan_interval_minutes)
    #[arg(long)]
    pub interval: Option<u64>,

    /// Enable live execution
    #[arg(long)]
    pub live: bool,

    /// Stop a running daemon
    #[arg(long, conflicts_with_all = ["interval", "live", "status"])]
    pub stop: bool,

    /// Show daemon status
    #[arg(long, conflicts_with_all = ["interval", "live", "stop"])]
    pub status: bool,

    /// Directory for the PID and state files
    #[arg(long, default_value = "data")]
    pub data_dir: std::path::PathBuf,

    /// Directory for per-cycle logs
    #[arg(long, default_value = "logs")]
    pub log_dir: std::path::PathBuf,
}

pub async fn execute(config_path: &Path, db_path: &Path, args: &DaemonArgs) -> Result<i32> {
    if args.stop {
        return Ok(stop_daemon(&args.data_dir));
    }
    if args.status {
        return Ok(daemon_status(&args.data_dir));
    }

    let mut config = load_config(config_path)?;
    if args.live {
        config.execution.mode = ExecutionMode::Live;
        config.execution.adapter = ExecutionAdapter::Simmer;
    }

    let interval = Duration::from_secs(
        args.interval
            .unwrap_or(u64::from(config.ops.scan_interval_minutes) * 60),
    );

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let store = Store::open(&db_path.to_string_lossy())?;

    println!(
        "Scan daemon starting (pid {}, {}, every {}s)",
        std::process::id(),
        config.execution.mode,
        interval.as_secs()
    );
    println!("   Logs: {}/", args.log_dir.display());
    println!("   Stop: heatwave daemon --stop");

    let supervisor = Supervisor::new(
        config,
        store,
        interval,
        args.data_dir.clone(),
        args.log_dir.clone(),
    )?;
    supervisor.run().await?;
    Ok(0)
}
