//! Edge result persistence (append-only).

use chrono::Utc;
use diesel::prelude::*;

use super::models::NewEdgeResultRow;
use super::schema::edge_results;
use super::Store;
use crate::domain::signal::EdgeResult;
use crate::error::Result;

impl Store {
    /// Append the edge results of one run in a single transaction.
    pub fn save_edge_results(&self, results: &[EdgeResult]) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        let mut conn = self.conn()?;
        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            for er in results {
                diesel::insert_into(edge_results::table)
                    .values(NewEdgeResultRow {
                        run_id: er.run_id.clone(),
                        event_id: er.event_id.clone(),
                        market_id: er.market_id.clone(),
                        city_slug: er.city_slug.clone(),
                        target_date: er.target_date.clone(),
                        bucket_label: er.bucket_label.clone(),
                        bucket_probability: er.bucket_probability,
                        market_price_yes: er.market_price_yes,
                        gross_edge: er.gross_edge,
                        fee_estimate: er.fee_estimate,
                        slippage_estimate: er.slippage_estimate,
                        net_edge: er.net_edge,
                        reason_code: er.reason_code.as_str().to_string(),
                        sigma_used: er.sigma_used,
                        created_at: now.clone(),
                    })
                    .execute(conn)?;
            }
            Ok(())
        })?;
        Ok(())
    }

    /// All edge rows for a run, best edge first.
    pub fn edge_results_for(&self, run_id: &str) -> Result<Vec<super::models::EdgeResultRow>> {
        use super::models::EdgeResultRow;
        let mut conn = self.conn()?;
        Ok(edge_results::table
            .filter(edge_results::run_id.eq(run_id))
            .order(edge_results::net_edge.desc())
            .select(EdgeResultRow::as_select())
            .load(&mut conn)?)
    }
}
