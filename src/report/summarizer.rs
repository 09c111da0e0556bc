//! Aggregates pipeline outputs into a [`RunSummary`].

use crate::domain::execution::{OrderResult, OrderStatus};
use crate::domain::risk::RiskVerdict;
use crate::domain::signal::{EdgeResult, ReasonCode};
use crate::domain::summary::RunSummary;

pub struct RunSummarizer {
    summary: RunSummary,
}

impl RunSummarizer {
    #[must_use]
    pub fn new(run_id: impl Into<String>, mode: impl Into<String>) -> Self {
        Self {
            summary: RunSummary::new(run_id, mode),
        }
    }

    pub fn record_scan(&mut self, cities_scanned: usize, events_found: usize) {
        self.summary.cities_scanned = cities_scanned;
        self.summary.events_found = events_found;
    }

    pub fn record_edge_results(&mut self, results: &[EdgeResult]) {
        self.summary.buckets_analyzed = results.len();
        let opportunities: Vec<&EdgeResult> = results
            .iter()
            .filter(|r| r.reason_code == ReasonCode::Opportunity)
            .collect();
        self.summary.opportunities_found = opportunities.len();
        if let Some(best) = opportunities
            .iter()
            .max_by(|a, b| a.net_edge.total_cmp(&b.net_edge))
        {
            self.summary.best_edge = best.net_edge;
            self.summary.best_edge_label = format!(
                "{} {} ${:.3}",
                best.city_slug, best.bucket_label, best.market_price_yes
            );
        }
    }

    pub fn record_risk_verdict(&mut self, verdict: &RiskVerdict) {
        if verdict.approved {
            return;
        }
        self.summary.blocked_count += 1;
        for reason in verdict.block_reasons() {
            *self
                .summary
                .block_reasons
                .entry(reason.as_str().to_string())
                .or_insert(0) += 1;
        }
    }

    pub fn record_order_result(&mut self, result: &OrderResult) {
        self.summary.orders_attempted += 1;
        match result.status {
            OrderStatus::DryRun | OrderStatus::Filled => self.summary.orders_succeeded += 1,
            OrderStatus::Failed | OrderStatus::Rejected => self.summary.orders_failed += 1,
            _ => {}
        }
    }

    pub fn record_exposure(&mut self, total_exposure: f64, daily_pnl: f64) {
        self.summary.total_exposure_usd = total_exposure;
        self.summary.daily_pnl_usd = daily_pnl;
    }

    pub fn record_duration(&mut self, seconds: f64) {
        self.summary.duration_seconds = seconds;
    }

    pub fn record_error(&mut self, error: impl Into<String>) {
        self.summary.errors.push(error.into());
    }

    #[must_use]
    pub fn finalize(self) -> RunSummary {
        self.summary
    }
}
