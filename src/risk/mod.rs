//! Pre-trade risk engine.
//!
//! Runs a fixed list of ten checks in a fixed order and never
//! short-circuits: a candidate that trips the kill switch still gets
//! its slippage measured, so one audit pass shows every layered
//! violation. The verdict approves only when all ten pass.

pub mod checks;
pub mod tracker;

pub use tracker::StateTracker;

use chrono::{DateTime, Utc};

use crate::config::RiskConfig;
use crate::domain::risk::RiskVerdict;
use crate::domain::signal::Signal;
use crate::error::Result;

pub struct RiskEngine<'a> {
    config: &'a RiskConfig,
}

impl<'a> RiskEngine<'a> {
    #[must_use]
    pub fn new(config: &'a RiskConfig) -> Self {
        Self { config }
    }

    /// Evaluate all ten checks for a candidate.
    ///
    /// `market_end_date` is the vendor end-date string of the
    /// candidate's market; `best_bid`/`best_ask` come from the same
    /// snapshot the signal was computed from.
    pub fn evaluate(
        &self,
        signal: &Signal,
        market_end_date: &str,
        best_bid: f64,
        best_ask: f64,
        state: &mut StateTracker<'_>,
    ) -> Result<RiskVerdict> {
        let city = &signal.edge_result.city_slug;
        let checks = vec![
            checks::kill_switch(state.kill_switch_active()?),
            checks::paused(state.is_paused()?),
            checks::position_size(signal.proposed_size_usd, self.config.max_position_size_usd),
            checks::trades_per_run(state.trades_this_run, self.config.max_trades_per_run),
            checks::total_exposure(
                state.total_exposure()?,
                signal.proposed_size_usd,
                self.config.max_total_exposure_usd,
            ),
            checks::per_city_exposure(
                state.city_exposure(city)?,
                signal.proposed_size_usd,
                self.config.max_per_city_exposure_usd,
            ),
            checks::daily_loss(state.daily_loss()?, self.config.max_daily_loss_usd),
            checks::cooldown(
                state.minutes_since_last_trade(&signal.market_id)?,
                self.config.cooldown_minutes,
            ),
            checks::time_to_resolution(
                hours_to_resolution(market_end_date, Utc::now()),
                self.config.min_hours_to_resolution,
            ),
            checks::slippage(best_bid, best_ask, self.config.slippage_ceiling),
        ];

        let approved = checks.iter().all(|c| c.passed);
        Ok(RiskVerdict { approved, checks })
    }
}

/// Hours until a market's end date; unparseable dates count as zero
/// so they fail the time gate rather than slipping through.
fn hours_to_resolution(end_date: &str, now: DateTime<Utc>) -> f64 {
    let Ok(end) = DateTime::parse_from_rfc3339(end_date) else {
        return 0.0;
    };
    let seconds = (end.with_timezone(&Utc) - now).num_seconds();
    (seconds.max(0) as f64) / 3600.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::risk::BlockReason;
    use crate::domain::signal::{EdgeResult, ReasonCode};
    use crate::store::Store;
    use chrono::Duration;

    fn signal(size: f64) -> Signal {
        Signal {
            edge_result: EdgeResult {
                run_id: "run".to_string(),
                event_id: "ev".to_string(),
                market_id: "m1".to_string(),
                city_slug: "nyc".to_string(),
                target_date: "2026-02-11".to_string(),
                bucket_label: "36-37".to_string(),
                bucket_probability: 0.26,
                market_price_yes: 0.075,
                gross_edge: 0.185,
                fee_estimate: 0.02,
                slippage_estimate: 0.01,
                net_edge: 0.155,
                reason_code: ReasonCode::Opportunity,
                sigma_used: 2.5,
            },
            market_id: "m1".to_string(),
            clob_token_id_yes: "tok".to_string(),
            proposed_size_usd: size,
        }
    }

    fn far_end_date() -> String {
        (Utc::now() + Duration::hours(48)).to_rfc3339()
    }

    #[test]
    fn all_checks_run_and_approve() {
        let store = Store::open_in_memory().unwrap();
        let config = RiskConfig::default();
        let engine = RiskEngine::new(&config);
        let mut state = StateTracker::new(&store);
        state.hydrate().unwrap();

        let verdict = engine
            .evaluate(&signal(5.0), &far_end_date(), 0.07, 0.0701, &mut state)
            .unwrap();
        assert!(verdict.approved);
        assert_eq!(verdict.checks.len(), 10);
        assert!(verdict.block_reasons().is_empty());
    }

    #[test]
    fn no_short_circuit_under_layered_violations() {
        let store = Store::open_in_memory().unwrap();
        store.set_system_state("kill_switch", "true").unwrap();
        store.set_system_state("paused", "true").unwrap();

        let config = RiskConfig::default();
        let engine = RiskEngine::new(&config);
        let mut state = StateTracker::new(&store);
        state.hydrate().unwrap();

        // Oversized and near resolution on top of the flags.
        let verdict = engine
            .evaluate(
                &signal(50.0),
                &(Utc::now() + Duration::hours(1)).to_rfc3339(),
                0.07,
                0.0701,
                &mut state,
            )
            .unwrap();

        assert!(!verdict.approved);
        // Every check still ran.
        assert_eq!(verdict.checks.len(), 10);
        let reasons = verdict.block_reasons();
        assert!(reasons.contains(&BlockReason::KillSwitch));
        assert!(reasons.contains(&BlockReason::Paused));
        assert!(reasons.contains(&BlockReason::PositionSize));
        assert!(reasons.contains(&BlockReason::TimeToResolution));
        // total_exposure (0 + 50 > 25) and per_city (0 + 50 > 10) too.
        assert!(reasons.contains(&BlockReason::TotalExposure));
        assert!(reasons.contains(&BlockReason::PerCityExposure));
    }

    #[test]
    fn check_order_is_fixed() {
        let store = Store::open_in_memory().unwrap();
        let config = RiskConfig::default();
        let engine = RiskEngine::new(&config);
        let mut state = StateTracker::new(&store);

        let verdict = engine
            .evaluate(&signal(5.0), &far_end_date(), 0.07, 0.0701, &mut state)
            .unwrap();
        let names: Vec<&str> = verdict.checks.iter().map(|c| c.check_name).collect();
        assert_eq!(
            names,
            vec![
                "kill_switch",
                "paused",
                "position_size",
                "trades_per_run",
                "total_exposure",
                "per_city_exposure",
                "daily_loss",
                "cooldown",
                "time_to_resolution",
                "slippage",
            ]
        );
    }

    #[test]
    fn unparseable_end_date_fails_the_time_gate() {
        let store = Store::open_in_memory().unwrap();
        let config = RiskConfig::default();
        let engine = RiskEngine::new(&config);
        let mut state = StateTracker::new(&store);

        let verdict = engine
            .evaluate(&signal(5.0), "soon-ish", 0.07, 0.0701, &mut state)
            .unwrap();
        assert!(verdict
            .block_reasons()
            .contains(&BlockReason::TimeToResolution));
    }

    #[test]
    fn tracker_updates_flow_into_later_candidates() {
        let store = Store::open_in_memory().unwrap();
        let config = RiskConfig {
            max_per_city_exposure_usd: 100.0,
            max_total_exposure_usd: 100.0,
            ..RiskConfig::default()
        };
        let engine = RiskEngine::new(&config);
        let mut state = StateTracker::new(&store);
        state.hydrate().unwrap();

        // The N-th trade passes while trades_this_run < N.
        for _ in 0..config.max_trades_per_run {
            let verdict = engine
                .evaluate(&signal(5.0), &far_end_date(), 0.07, 0.0701, &mut state)
                .unwrap();
            assert!(verdict.approved);
            state.record_trade("nyc", 5.0);
        }

        // The (N+1)-th candidate is blocked without any store write.
        let verdict = engine
            .evaluate(&signal(5.0), &far_end_date(), 0.07, 0.0701, &mut state)
            .unwrap();
        assert!(!verdict.approved);
        assert_eq!(verdict.block_reasons(), vec![BlockReason::TradesPerRun]);
    }

    #[test]
    fn city_exposure_blocks_at_the_partition_level() {
        let store = Store::open_in_memory().unwrap();
        // Existing exposure in another city does not count against nyc.
        store
            .open_position("m9", "chicago", "2026-02-11", "30-31", 0.10, 9.0)
            .unwrap();
        store
            .open_position("m8", "nyc", "2026-02-11", "36-37", 0.10, 6.0)
            .unwrap();

        let config = RiskConfig::default();
        let engine = RiskEngine::new(&config);
        let mut state = StateTracker::new(&store);
        state.hydrate().unwrap();

        // nyc: 6 + 5 = 11 > 10 blocks; total: 15 + 5 = 20 <= 25 passes.
        let verdict = engine
            .evaluate(&signal(5.0), &far_end_date(), 0.07, 0.0701, &mut state)
            .unwrap();
        assert!(!verdict.approved);
        assert_eq!(verdict.block_reasons(), vec![BlockReason::PerCityExposure]);
    }
}
