//! Config snapshot persistence, deduplicated by content hash.

use chrono::Utc;
use diesel::prelude::*;

use super::models::NewConfigSnapshotRow;
use super::schema::config_snapshots;
use super::Store;
use crate::config::{config_hash, Config};
use crate::error::Result;

impl Store {
    /// Snapshot a config if its hash is new; returns the hash either
    /// way.
    pub fn snapshot_config(&self, config: &Config) -> Result<String> {
        let hash = config_hash(config);
        let json = serde_json::to_string(config)?;
        let mut conn = self.conn()?;
        diesel::insert_into(config_snapshots::table)
            .values(NewConfigSnapshotRow {
                config_hash: hash.clone(),
                config_json: json,
                created_at: Utc::now().to_rfc3339(),
            })
            .on_conflict(config_snapshots::config_hash)
            .do_nothing()
            .execute(&mut conn)?;
        Ok(hash)
    }

    /// Number of stored snapshots.
    pub fn config_snapshot_count(&self) -> Result<i64> {
        let mut conn = self.conn()?;
        Ok(config_snapshots::table.count().get_result(&mut conn)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_twice_writes_once() {
        let store = Store::open_in_memory().unwrap();
        let config = Config::default();
        let h1 = store.snapshot_config(&config).unwrap();
        let h2 = store.snapshot_config(&config).unwrap();
        assert_eq!(h1, h2);
        assert_eq!(store.config_snapshot_count().unwrap(), 1);
    }

    #[test]
    fn changed_config_writes_a_new_row() {
        let store = Store::open_in_memory().unwrap();
        let config = Config::default();
        store.snapshot_config(&config).unwrap();

        let mut changed = config.clone();
        changed.risk.max_total_exposure_usd = 50.0;
        store.snapshot_config(&changed).unwrap();
        assert_eq!(store.config_snapshot_count().unwrap(), 2);
    }
}
