//! Command-line interface definitions and dispatch.

mod config_cmd;
mod control;
mod daemon_cmd;
mod scan;
mod status;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::error::Result;

/// Heatwave - autonomous trading engine for daily high-temperature
/// prediction markets.
#[derive(Parser, Debug)]
#[command(name = "heatwave")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, global = true, default_value = "config.toml")]
    pub config: PathBuf,

    /// Path to the SQLite database
    #[arg(long, global = true, default_value = "data/heatwave.db")]
    pub db: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one scan cycle
    Scan(scan::ScanArgs),

    /// Run the scan loop as a daemon
    Daemon(daemon_cmd::DaemonArgs),

    /// Show control flags, open positions and exposure
    Status,

    /// Pause scanning
    Pause,

    /// Resume scanning
    Resume,

    /// Toggle the kill switch
    KillSwitch {
        /// on | off
        #[arg(value_parser = ["on", "off"])]
        state: String,
    },

    /// Config operations
    #[command(subcommand)]
    Config(config_cmd::ConfigCommand),
}

/// Dispatch a parsed CLI invocation. Returns the process exit code.
pub async fn execute(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::Scan(args) => scan::execute(&cli.config, &cli.db, &args).await,
        Commands::Daemon(args) => daemon_cmd::execute(&cli.config, &cli.db, &args).await,
        Commands::Status => status::execute(&cli.config, &cli.db),
        Commands::Pause => control::pause(&cli.db),
        Commands::Resume => control::resume(&cli.db),
        Commands::KillSwitch { state } => control::kill_switch(&cli.db, state == "on"),
        Commands::Config(command) => config_cmd::execute(&cli.config, &cli.db, &command),
    }
}
