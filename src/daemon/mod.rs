//! Interval supervisor.
//!
//! Owns the single-instance lock, the cycle loop with exponential
//! backoff on failure, signal-driven shutdown (finish the current
//! cycle, then exit), persistent stats, and per-cycle log scoping.

pub mod logs;
pub mod pidfile;
pub mod state;

use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::watch;
use tracing::{error, info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::clients::{GammaClient, NwsClient};
use crate::config::Config;
use crate::daemon::logs::{rotate_cycle_logs, CycleWriter, MAX_CYCLE_LOGS};
use crate::daemon::pidfile::{process_alive, read_pid, PidFile};
use crate::daemon::state::DaemonState;
use crate::error::{Error, Result};
use crate::execution::build_adapter;
use crate::pipeline::ScanPipeline;
use crate::store::Store;

pub const PID_FILE: &str = "heatwave.pid";
pub const STATE_FILE: &str = "daemon_state.json";

/// Cap on failure backoff.
const MAX_BACKOFF: Duration = Duration::from_secs(600);
/// Grace period after a second stop signal before hard exit.
const ESCALATION_GRACE: Duration = Duration::from_secs(60);

pub struct Supervisor {
    config: Config,
    store: Store,
    interval: Duration,
    data_dir: PathBuf,
    log_dir: PathBuf,
    cycle_writer: CycleWriter,
    shutdown: watch::Receiver<bool>,
}

impl Supervisor {
    /// Build a supervisor and install the global tracing subscriber
    /// (console layer plus the per-cycle file layer).
    pub fn new(
        config: Config,
        store: Store,
        interval: Duration,
        data_dir: impl Into<PathBuf>,
        log_dir: impl Into<PathBuf>,
    ) -> Result<Self> {
        let cycle_writer = CycleWriter::new();
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(false))
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(cycle_writer.clone()),
            )
            .try_init();

        let shutdown = install_signal_handler()?;
        Ok(Self {
            config,
            store,
            interval,
            data_dir: data_dir.into(),
            log_dir: log_dir.into(),
            cycle_writer,
            shutdown,
        })
    }

    /// Run the daemon loop until a stop signal arrives.
    pub async fn run(self) -> Result<()> {
        let _pid_lock = PidFile::acquire(self.data_dir.join(PID_FILE))?;

        let mode = self.config.execution.mode.to_string();
        let mut stats = DaemonState::new(self.interval.as_secs(), &mode);
        let state_path = self.data_dir.join(STATE_FILE);

        let markets = GammaClient::new()?;
        let weather = NwsClient::new()?;
        let adapter = build_adapter(&self.config)?;

        info!(
            mode = %mode,
            interval_secs = self.interval.as_secs(),
            pid = std::process::id(),
            "daemon started"
        );
        if mode == "live" {
            warn!("LIVE MODE - real money at stake");
        }

        while !*self.shutdown.borrow() {
            match self.cycle_writer.open_cycle(&self.log_dir) {
                Ok(path) => info!(log = %path.display(), "cycle log opened"),
                Err(e) => warn!(error = %e, "could not open cycle log"),
            }

            stats.total_scans += 1;
            info!(scan = stats.total_scans, "=== cycle starting ===");

            let pipeline = ScanPipeline::new(
                &self.config,
                &self.store,
                &markets,
                &weather,
                adapter.as_ref(),
            );
            let summary = pipeline.run().await;
            let success = summary.is_success();

            let wait = if success {
                stats.total_successes += 1;
                stats.consecutive_failures = 0;
                self.interval
            } else {
                stats.total_failures += 1;
                stats.consecutive_failures += 1;
                let backoff = backoff_delay(self.interval, stats.consecutive_failures);
                warn!(
                    consecutive = stats.consecutive_failures,
                    backoff_secs = backoff.as_secs(),
                    "cycle failed, backing off"
                );
                backoff
            };

            self.cycle_writer.close_cycle();
            if let Err(e) = rotate_cycle_logs(&self.log_dir, MAX_CYCLE_LOGS) {
                warn!(error = %e, "log rotation failed");
            }
            if let Err(e) = stats.write(&state_path) {
                warn!(error = %e, "could not persist daemon state");
            }

            if *self.shutdown.borrow() {
                break;
            }
            // Cancellable wait: a stop signal interrupts immediately.
            let mut shutdown = self.shutdown.clone();
            tokio::select! {
                () = tokio::time::sleep(wait) => {}
                _ = shutdown.changed() => {}
            }
        }

        let _ = stats.write(&state_path);
        info!(
            scans = stats.total_scans,
            ok = stats.total_successes,
            failed = stats.total_failures,
            "daemon stopped"
        );
        Ok(())
    }
}

/// `min(interval * 2^failures, MAX_BACKOFF)`.
fn backoff_delay(interval: Duration, consecutive_failures: u32) -> Duration {
    let factor = 1u64 << consecutive_failures.min(16);
    interval
        .saturating_mul(factor.min(u64::from(u32::MAX)) as u32)
        .min(MAX_BACKOFF)
}

/// First SIGINT/SIGTERM requests a graceful stop; a second one hard
/// exits after a grace period.
fn install_signal_handler() -> Result<watch::Receiver<bool>> {
    let (tx, rx) = watch::channel(false);
    let mut sigint =
        signal(SignalKind::interrupt()).map_err(|e| Error::Daemon(e.to_string()))?;
    let mut sigterm =
        signal(SignalKind::terminate()).map_err(|e| Error::Daemon(e.to_string()))?;

    tokio::spawn(async move {
        tokio::select! {
            _ = sigint.recv() => {}
            _ = sigterm.recv() => {}
        }
        info!("stop signal received, finishing current cycle");
        let _ = tx.send(true);

        tokio::select! {
            _ = sigint.recv() => {}
            _ = sigterm.recv() => {}
        }
        warn!(
            grace_secs = ESCALATION_GRACE.as_secs(),
            "second stop signal, escalating"
        );
        tokio::time::sleep(ESCALATION_GRACE).await;
        error!("grace period expired, terminating");
        std::process::exit(130);
    });

    Ok(rx)
}

/// Stop a running daemon via its PID file. Returns the process exit
/// code for the CLI.
pub fn stop_daemon(data_dir: &Path) -> i32 {
    let pid_path = data_dir.join(PID_FILE);
    let Some(pid) = read_pid(&pid_path) else {
        println!("No daemon running (no PID file found)");
        return 1;
    };

    if !process_alive(pid) {
        println!("Daemon not running (stale pid {pid}), cleaning up");
        let _ = std::fs::remove_file(&pid_path);
        let _ = std::fs::remove_file(data_dir.join(STATE_FILE));
        return 0;
    }

    println!("Stopping daemon (pid {pid})...");
    unsafe {
        libc::kill(pid, libc::SIGTERM);
    }

    for _ in 0..60 {
        std::thread::sleep(Duration::from_secs(1));
        if !process_alive(pid) {
            println!("Daemon stopped");
            let _ = std::fs::remove_file(&pid_path);
            return 0;
        }
    }

    println!("Daemon did not stop in 60s, sending SIGKILL");
    unsafe {
        libc::kill(pid, libc::SIGKILL);
    }
    let _ = std::fs::remove_file(&pid_path);
    0
}

/// Print daemon status from the state file. Returns the CLI exit code.
pub fn daemon_status(data_dir: &Path) -> i32 {
    let state_path = data_dir.join(STATE_FILE);
    let Ok(state) = DaemonState::load(&state_path) else {
        println!("No daemon state found");
        if let Some(pid) = read_pid(&data_dir.join(PID_FILE)) {
            if process_alive(pid) {
                println!("  (but PID file exists: {pid}, process running)");
            } else {
                println!("  (stale PID file found)");
            }
        }
        return 1;
    };

    let running = process_alive(state.pid as i32);
    println!(
        "Daemon {}",
        if running { "running" } else { "stopped" }
    );
    println!("  PID: {}", state.pid);
    println!("  Mode: {}", state.mode);
    println!("  Interval: {}s", state.interval_secs);
    println!("  Started: {}", state.started_at.to_rfc3339());
    println!("  Total scans: {}", state.total_scans);
    println!("  Successes: {}", state.total_successes);
    println!("  Failures: {}", state.total_failures);
    println!("  Consecutive failures: {}", state.consecutive_failures);
    println!("  Last update: {}", state.last_update.to_rfc3339());
    0
}
