//! Single-instance PID file lock.
//!
//! On acquire: an existing file with a live PID refuses startup; a
//! stale file (dead PID) is removed. The lock removes its file when
//! dropped on clean exit.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::{Error, Result};

pub struct PidFile {
    path: PathBuf,
}

impl PidFile {
    /// Acquire the lock, writing our own PID.
    pub fn acquire(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if let Some(pid) = read_pid(&path) {
            if process_alive(pid) {
                return Err(Error::Daemon(format!(
                    "daemon already running (pid {pid}); stop it first"
                )));
            }
            warn!(pid, "removing stale PID file");
            let _ = fs::remove_file(&path);
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, std::process::id().to_string())?;
        info!(pid = std::process::id(), path = %path.display(), "PID file written");
        Ok(Self { path })
    }
}

impl Drop for PidFile {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

/// Read a PID from the file, if it parses.
#[must_use]
pub fn read_pid(path: &Path) -> Option<i32> {
    fs::read_to_string(path).ok()?.trim().parse().ok()
}

/// Signal-0 liveness probe. A PID we cannot signal for permission
/// reasons still counts as alive.
#[must_use]
pub fn process_alive(pid: i32) -> bool {
    if pid <= 0 {
        return false;
    }
    // SAFETY: kill with signal 0 performs no action beyond the
    // existence and permission checks.
    let rc = unsafe { libc::kill(pid, 0) };
    if rc == 0 {
        return true;
    }
    std::io::Error::last_os_error().raw_os_error() == Some(libc::EPERM)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquire_writes_and_drop_removes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("daemon.pid");

        {
            let _lock = PidFile::acquire(&path).unwrap();
            assert_eq!(read_pid(&path), Some(std::process::id() as i32));
        }
        assert!(!path.exists());
    }

    #[test]
    fn live_pid_refuses_second_acquire() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("daemon.pid");

        let _lock = PidFile::acquire(&path).unwrap();
        let second = PidFile::acquire(&path);
        assert!(matches!(second, Err(Error::Daemon(_))));
        // The refused acquire must not have clobbered the lock.
        assert!(path.exists());
    }

    #[test]
    fn stale_pid_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("daemon.pid");
        // PIDs near i32::MAX are far beyond pid_max on any Linux.
        fs::write(&path, i32::MAX.to_string()).unwrap();

        let _lock = PidFile::acquire(&path).unwrap();
        assert_eq!(read_pid(&path), Some(std::process::id() as i32));
    }

    #[test]
    fn corrupt_pid_file_is_treated_as_stale() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("daemon.pid");
        fs::write(&path, "not-a-pid").unwrap();

        let _lock = PidFile::acquire(&path).unwrap();
        assert_eq!(read_pid(&path), Some(std::process::id() as i32));
    }

    #[test]
    fn our_own_pid_reads_alive() {
        assert!(process_alive(std::process::id() as i32));
        assert!(!process_alive(-1));
    }
}
