//! Per-cycle log destinations.
//!
//! A second `tracing` fmt layer writes through a [`CycleWriter`];
//! the supervisor points it at a fresh `scan_<timestamp>.log` before
//! each cycle and closes it after, so every cycle has its own
//! append-only log file. Retention keeps the most recent N files.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use parking_lot::Mutex;
use tracing_subscriber::fmt::MakeWriter;

use crate::error::Result;

/// How many cycle logs to retain.
pub const MAX_CYCLE_LOGS: usize = 100;

/// Swappable log sink. Cloning shares the underlying slot.
#[derive(Clone, Default)]
pub struct CycleWriter {
    file: Arc<Mutex<Option<File>>>,
}

impl CycleWriter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a fresh cycle log in `dir` and route writes to it.
    pub fn open_cycle(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let stamp = Utc::now().format("%Y%m%dT%H%M%SZ");
        let path = dir.join(format!("scan_{stamp}.log"));
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        *self.file.lock() = Some(file);
        Ok(path)
    }

    /// Stop routing writes; subsequent output is discarded.
    pub fn close_cycle(&self) {
        *self.file.lock() = None;
    }
}

impl io::Write for CycleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut guard = self.file.lock();
        match guard.as_mut() {
            Some(file) => file.write(buf),
            None => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut guard = self.file.lock();
        match guard.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

impl<'a> MakeWriter<'a> for CycleWriter {
    type Writer = CycleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Delete all but the newest `keep` cycle logs in `dir`.
pub fn rotate_cycle_logs(dir: &Path, keep: usize) -> Result<()> {
    if !dir.exists() {
        return Ok(());
    }
    let mut logs: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("scan_") && n.ends_with(".log"))
        })
        .collect();
    logs.sort();

    if logs.len() > keep {
        let excess = logs.len() - keep;
        for old in &logs[..excess] {
            let _ = fs::remove_file(old);
        }
    }
    Ok(())
}
