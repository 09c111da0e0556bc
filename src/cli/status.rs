//! Handler for the `status` command.

use std::path::Path;

use super::scan::load_config;
use crate::error::Result;
use crate::store::Store;

pub fn execute(config_path: &Path, db_path: &Path) -> Result<i32> {
    let config = load_config(config_path)?;
    config.init_logging();

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let store = Store::open(&db_path.to_string_lossy())?;

    let mode = store.mode()?;
    let paused = store.is_paused()?;
    let kill = store.is_kill_switch_active()?;
    let positions = store.open_positions()?;
    let exposure = store.total_open_exposure()?;

    println!("Mode: {mode} | Paused: {paused} | Kill switch: {kill}");
    println!(
        "Open positions: {} | Exposure: ${exposure:.2}",
        positions.len()
    );
    for p in &positions {
        println!(
            "  {} {}: ${:.2} @ {:.4} (now {:.4}, uPnL ${:+.2})",
            p.city_slug, p.bucket_label, p.size_usd, p.entry_price, p.current_price,
            p.unrealized_pnl,
        );
    }
    Ok(0)
}
