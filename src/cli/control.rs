//! Handlers for the operator control commands.
//!
//! Every command flips its durable flag and writes an audit row in
//! one transaction.

use std::path::Path;

use crate::error::Result;
use crate::store::Store;

fn open_store(db_path: &Path) -> Result<Store> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Store::open(&db_path.to_string_lossy())
}

pub fn pause(db_path: &Path) -> Result<i32> {
    let store = open_store(db_path)?;
    store.set_flag_audited("paused", true, "pause")?;
    println!("System paused");
    Ok(0)
}

pub fn resume(db_path: &Path) -> Result<i32> {
    let store = open_store(db_path)?;
    store.set_flag_audited("paused", false, "resume")?;
    println!("System resumed");
    Ok(0)
}

pub fn kill_switch(db_path: &Path, on: bool) -> Result<i32> {
    let store = open_store(db_path)?;
    store.set_flag_audited("kill_switch", on, "kill-switch")?;
    println!("Kill switch: {}", if on { "on" } else { "off" });
    Ok(0)
}
