//! Persistent daemon statistics for external observers.
//!
//! Written atomically (temp file + rename) after every cycle so a
//! reader never sees a torn update.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonState {
    pub pid: u32,
    pub started_at: DateTime<Utc>,
    pub interval_secs: u64,
    pub mode: String,
    pub total_scans: u64,
    pub total_successes: u64,
    pub total_failures: u64,
    pub consecutive_failures: u32,
    pub last_update: DateTime<Utc>,
}

impl DaemonState {
    #[must_use]
    pub fn new(interval_secs: u64, mode: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            pid: std::process::id(),
            started_at: now,
            interval_secs,
            mode: mode.into(),
            total_scans: 0,
            total_successes: 0,
            total_failures: 0,
            consecutive_failures: 0,
            last_update: now,
        }
    }

    /// Write the state atomically.
    pub fn write(&mut self, path: &Path) -> Result<()> {
        self.last_update = Utc::now();
        let json = serde_json::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let temp_path: PathBuf = path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path)?;
        if let Err(e) = file
            .write_all(json.as_bytes())
            .and_then(|()| file.sync_all())
        {
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }
        fs::rename(&temp_path, path)?;
        Ok(())
    }

    /// Load a previously written state file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("daemon_state.json");

        let mut state = DaemonState::new(120, "dry-run");
        state.total_scans = 7;
        state.total_successes = 6;
        state.total_failures = 1;
        state.write(&path).unwrap();

        let loaded = DaemonState::load(&path).unwrap();
        assert_eq!(loaded.total_scans, 7);
        assert_eq!(loaded.mode, "dry-run");
        assert_eq!(loaded.interval_secs, 120);
    }

    #[test]
    fn write_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("daemon_state.json");
        DaemonState::new(60, "live").write(&path).unwrap();

        assert!(path.exists());
        assert!(!path.with_extension("tmp").exists());
    }
}
