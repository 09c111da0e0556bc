//! Cycle (run) record persistence.

use chrono::Utc;
use diesel::prelude::*;

use super::models::{NewRunRow, RunRow};
use super::schema::runs;
use super::Store;
use crate::domain::summary::RunSummary;
use crate::error::Result;

impl Store {
    /// Record the start of a run.
    pub fn create_run(&self, run_id: &str, mode: &str, config_hash: &str) -> Result<()> {
        let mut conn = self.conn()?;
        diesel::insert_into(runs::table)
            .values(NewRunRow {
                run_id: run_id.to_string(),
                mode: mode.to_string(),
                config_hash: Some(config_hash.to_string()),
                started_at: Utc::now().to_rfc3339(),
                status: "running".to_string(),
            })
            .execute(&mut conn)?;
        Ok(())
    }

    /// Record run completion with its summary counters.
    pub fn complete_run(&self, run_id: &str, status: &str, summary: &RunSummary) -> Result<()> {
        let summary_json = serde_json::to_string(summary)?;
        let error_message = if summary.errors.is_empty() {
            None
        } else {
            Some(summary.errors.join("; "))
        };
        let mut conn = self.conn()?;
        diesel::update(runs::table.filter(runs::run_id.eq(run_id)))
            .set((
                runs::completed_at.eq(Utc::now().to_rfc3339()),
                runs::status.eq(status),
                runs::cities_scanned.eq(summary.cities_scanned as i32),
                runs::events_found.eq(summary.events_found as i32),
                runs::opportunities_found.eq(summary.opportunities_found as i32),
                runs::orders_attempted.eq(summary.orders_attempted as i32),
                runs::orders_succeeded.eq(summary.orders_succeeded as i32),
                runs::best_edge.eq(Some(summary.best_edge)),
                runs::summary_json.eq(Some(summary_json)),
                runs::error_message.eq(error_message),
            ))
            .execute(&mut conn)?;
        Ok(())
    }

    /// The most recent run, if any.
    pub fn latest_run(&self) -> Result<Option<RunRow>> {
        let mut conn = self.conn()?;
        Ok(runs::table
            .order(runs::id.desc())
            .select(RunRow::as_select())
            .first(&mut conn)
            .optional()?)
    }

    /// A run by id.
    pub fn run(&self, run_id: &str) -> Result<Option<RunRow>> {
        let mut conn = self.conn()?;
        Ok(runs::table
            .filter(runs::run_id.eq(run_id))
            .select(RunRow::as_select())
            .first(&mut conn)
            .optional()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_lifecycle() {
        let store = Store::open_in_memory().unwrap();
        store.create_run("r1", "dry-run", "abcd").unwrap();

        let running = store.run("r1").unwrap().unwrap();
        assert_eq!(running.status, "running");
        assert!(running.completed_at.is_none());

        let mut summary = RunSummary::new("r1", "dry-run");
        summary.events_found = 3;
        summary.opportunities_found = 1;
        store.complete_run("r1", "completed", &summary).unwrap();

        let done = store.latest_run().unwrap().unwrap();
        assert_eq!(done.status, "completed");
        assert_eq!(done.events_found, 3);
        assert!(done.completed_at.is_some());
        assert!(done.error_message.is_none());
    }

    #[test]
    fn failed_run_records_errors() {
        let store = Store::open_in_memory().unwrap();
        store.create_run("r1", "dry-run", "abcd").unwrap();

        let mut summary = RunSummary::new("r1", "dry-run");
        summary.errors.push("network down".to_string());
        store.complete_run("r1", "failed", &summary).unwrap();

        let done = store.run("r1").unwrap().unwrap();
        assert_eq!(done.status, "failed");
        assert_eq!(done.error_message.as_deref(), Some("network down"));
    }
}
