//! Risk check persistence.
//!
//! Every evaluated candidate gets its full check bundle written,
//! approved or not; the bundle commits atomically so an audit either
//! sees all ten rows or none.

use chrono::Utc;
use diesel::prelude::*;

use super::models::{NewRiskCheckRow, RiskCheckRow};
use super::schema::risk_checks;
use super::Store;
use crate::domain::risk::RiskCheckResult;
use crate::error::Result;

impl Store {
    /// Persist a candidate's complete check bundle.
    pub fn save_risk_checks(
        &self,
        run_id: &str,
        idempotency_key: &str,
        checks: &[RiskCheckResult],
    ) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        let mut conn = self.conn()?;
        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            for check in checks {
                diesel::insert_into(risk_checks::table)
                    .values(NewRiskCheckRow {
                        run_id: run_id.to_string(),
                        idempotency_key: idempotency_key.to_string(),
                        check_name: check.check_name.to_string(),
                        passed: check.passed,
                        block_reason: check.block_reason.map(|r| r.as_str().to_string()),
                        detail: check.detail.clone(),
                        created_at: now.clone(),
                    })
                    .execute(conn)?;
            }
            Ok(())
        })?;
        Ok(())
    }

    /// All persisted checks for a candidate, in insertion order.
    pub fn risk_checks_for(&self, idempotency_key: &str) -> Result<Vec<RiskCheckRow>> {
        let mut conn = self.conn()?;
        Ok(risk_checks::table
            .filter(risk_checks::idempotency_key.eq(idempotency_key))
            .order(risk_checks::id.asc())
            .select(RiskCheckRow::as_select())
            .load(&mut conn)?)
    }
}
