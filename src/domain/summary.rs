//! Run summary model.

use std::collections::BTreeMap;

use serde::Serialize;

/// Aggregated counters for one cycle. Serialized as the structured
/// run record and rendered as the human summary.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub run_id: String,
    pub mode: String,
    pub cities_scanned: usize,
    pub events_found: usize,
    pub buckets_analyzed: usize,
    pub opportunities_found: usize,
    pub blocked_count: usize,
    /// Block-reason label -> occurrences.
    pub block_reasons: BTreeMap<String, usize>,
    pub orders_attempted: usize,
    pub orders_succeeded: usize,
    pub orders_failed: usize,
    pub best_edge: f64,
    pub best_edge_label: String,
    pub total_exposure_usd: f64,
    pub daily_pnl_usd: f64,
    pub duration_seconds: f64,
    pub errors: Vec<String>,
}

impl RunSummary {
    #[must_use]
    pub fn new(run_id: impl Into<String>, mode: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            mode: mode.into(),
            ..Self::default()
        }
    }

    /// A cycle succeeded iff it raised no errors.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}
