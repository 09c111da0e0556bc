//! Scan pipeline: one full entry cycle.
//!
//! Stage order inside a cycle is fixed: market scan, forecast fetch,
//! edge generation, per-signal risk gate and execution, exit sweep,
//! run record. Stages run strictly sequentially; a fatal error at any
//! stage ends the cycle with status `failed` and the supervisor backs
//! off.

use std::collections::{HashMap, HashSet};
use std::time::Instant;

use chrono::Utc;
use tracing::{info, warn};

use crate::clients::{ForecastApi, MarketDataApi};
use crate::config::Config;
use crate::domain::execution::{OrderIntent, Side};
use crate::domain::forecast::ForecastPoint;
use crate::domain::market::MarketEvent;
use crate::domain::summary::RunSummary;
use crate::domain::{new_run_id, RunId};
use crate::error::Result;
use crate::execution::{idempotency_key, ExecutionAdapter, Executor};
use crate::ingest::scanner::ScanOutcome;
use crate::ingest::{ForecastFetcher, MarketScanner};
use crate::pipeline::ExitPipeline;
use crate::report::format::format_summary_text;
use crate::report::RunSummarizer;
use crate::risk::{RiskEngine, StateTracker};
use crate::signal::SignalGenerator;
use crate::store::Store;

pub struct ScanPipeline<'a> {
    config: &'a Config,
    store: &'a Store,
    markets: &'a dyn MarketDataApi,
    forecasts: &'a dyn ForecastApi,
    adapter: &'a dyn ExecutionAdapter,
}

impl<'a> ScanPipeline<'a> {
    #[must_use]
    pub fn new(
        config: &'a Config,
        store: &'a Store,
        markets: &'a dyn MarketDataApi,
        forecasts: &'a dyn ForecastApi,
        adapter: &'a dyn ExecutionAdapter,
    ) -> Self {
        Self {
            config,
            store,
            markets,
            forecasts,
            adapter,
        }
    }

    /// Execute one full cycle. Always returns a summary; the error
    /// list inside it decides whether the cycle counted as a success.
    pub async fn run(&self) -> RunSummary {
        let started = Instant::now();
        let run_id: RunId = new_run_id();
        let mode = self.config.execution.mode.to_string();
        let mut summarizer = RunSummarizer::new(&run_id, &mode);

        // Run bookkeeping has to land before anything else; failing
        // that is a failure to audit and aborts outright.
        if let Err(e) = self.start_run(&run_id, &mode) {
            summarizer.record_error(format!("failed to record run start: {e}"));
            summarizer.record_duration(started.elapsed().as_secs_f64());
            return summarizer.finalize();
        }

        // Control flags stop the cycle before any external traffic.
        match self.check_control_flags() {
            Ok(None) => {}
            Ok(Some(reason)) => {
                warn!(%reason, "aborting cycle");
                summarizer.record_error(reason);
                summarizer.record_duration(started.elapsed().as_secs_f64());
                let summary = summarizer.finalize();
                let _ = self.store.complete_run(&run_id, "aborted", &summary);
                return summary;
            }
            Err(e) => {
                summarizer.record_error(e.to_string());
                summarizer.record_duration(started.elapsed().as_secs_f64());
                let summary = summarizer.finalize();
                let _ = self.store.complete_run(&run_id, "failed", &summary);
                return summary;
            }
        }

        let status = match self.run_stages(&run_id, &mut summarizer).await {
            Ok(()) => "completed",
            Err(e) => {
                warn!(error = %e, "cycle failed");
                summarizer.record_error(e.to_string());
                "failed"
            }
        };

        summarizer.record_duration(started.elapsed().as_secs_f64());
        let summary = summarizer.finalize();
        if let Err(e) = self.store.complete_run(&run_id, status, &summary) {
            warn!(error = %e, "failed to record run completion");
        }

        info!("\n{}", format_summary_text(&summary));
        summary
    }

    fn start_run(&self, run_id: &str, mode: &str) -> Result<()> {
        let config_hash = self.store.snapshot_config(self.config)?;
        self.store.create_run(run_id, mode, &config_hash)
    }

    fn check_control_flags(&self) -> Result<Option<String>> {
        if self.store.is_kill_switch_active()? {
            return Ok(Some("Kill switch active".to_string()));
        }
        if self.store.is_paused()? {
            return Ok(Some("System paused".to_string()));
        }
        Ok(None)
    }

    async fn run_stages(&self, run_id: &str, summarizer: &mut RunSummarizer) -> Result<()> {
        // Stage 1: markets.
        let scanner = MarketScanner::new(self.config, self.markets);
        let outcome = scanner.scan(Utc::now().date_naive()).await;
        let events = self.persist_events(&outcome)?;
        summarizer.record_scan(self.config.enabled_cities().len(), events.len());
        info!(
            events = events.len(),
            cities = self.config.enabled_cities().len(),
            "market scan complete"
        );

        // Stage 2: forecasts.
        let forecasts = self.fetch_forecasts(&events).await?;
        info!(forecasts = forecasts.len(), "forecast fetch complete");

        // Stage 3: edges.
        let generator = SignalGenerator::new(self.config, run_id);
        let mut edge_results = generator.generate(&events, &forecasts)?;
        for skipped in &outcome.parse_failures {
            edge_results.push(generator.parse_failure_result(skipped));
        }
        self.store.save_edge_results(&edge_results)?;
        summarizer.record_edge_results(&edge_results);

        let opportunities = SignalGenerator::filter_opportunities(&edge_results);
        let signals = generator.to_signals(&opportunities, &events);
        info!(
            edges = edge_results.len(),
            opportunities = opportunities.len(),
            "signal generation complete"
        );

        // Stage 4: risk gate and execution, candidate by candidate.
        let executor = Executor::new(self.store, self.adapter);
        self.trade_signals(run_id, &signals, &events, &executor, summarizer)
            .await?;

        // Stage 5: exit sweep over open positions.
        let exit = ExitPipeline::new(self.config, self.store, self.markets, &executor, run_id);
        let exit_summary = exit.run().await?;
        if exit_summary.positions_checked > 0 {
            info!(
                checked = exit_summary.positions_checked,
                executed = exit_summary.exits_executed,
                failed = exit_summary.exits_failed,
                "exit sweep complete"
            );
        }

        // Stage 6: end-of-cycle exposure and PnL for the run record.
        let today = Utc::now().format("%Y-%m-%d").to_string();
        let daily_pnl = self
            .store
            .daily_pnl(&today)?
            .map(|row| row.total_pnl)
            .unwrap_or(0.0);
        summarizer.record_exposure(self.store.total_open_exposure()?, daily_pnl);
        Ok(())
    }

    fn persist_events(&self, outcome: &ScanOutcome) -> Result<Vec<MarketEvent>> {
        let mut events = Vec::with_capacity(outcome.events.len());
        for scanned in &outcome.events {
            self.store
                .save_market_event(&scanned.event, &scanned.raw_json)?;
            events.push(scanned.event.clone());
        }
        Ok(events)
    }

    async fn fetch_forecasts(
        &self,
        events: &[MarketEvent],
    ) -> Result<HashMap<(String, String), ForecastPoint>> {
        let city_map: HashMap<&str, _> = self
            .config
            .cities
            .iter()
            .map(|c| (c.slug.as_str(), c))
            .collect();

        let mut fetcher = ForecastFetcher::new(self.forecasts);
        let mut forecasts = HashMap::new();
        let mut seen: HashSet<(String, String)> = HashSet::new();

        for event in events {
            let pair = (event.city_slug.clone(), event.target_date.clone());
            if !seen.insert(pair.clone()) {
                continue;
            }
            let Some(city) = city_map.get(event.city_slug.as_str()) else {
                warn!(city = %event.city_slug, "event for unconfigured city");
                continue;
            };
            if let Some(point) = fetcher.fetch(city, &event.target_date).await {
                self.store.save_forecast(&point)?;
                forecasts.insert(pair, point);
            }
        }
        Ok(forecasts)
    }

    async fn trade_signals(
        &self,
        run_id: &str,
        signals: &[crate::domain::signal::Signal],
        events: &[MarketEvent],
        executor: &Executor<'_>,
        summarizer: &mut RunSummarizer,
    ) -> Result<()> {
        // Top-of-book and end-date lookup for the risk gate.
        let mut book: HashMap<&str, (&str, f64, f64)> = HashMap::new();
        for event in events {
            for bm in &event.buckets {
                book.insert(&bm.market_id, (&bm.end_date, bm.best_bid, bm.best_ask));
            }
        }

        let mut state = StateTracker::new(self.store);
        state.hydrate()?;
        let risk_engine = RiskEngine::new(&self.config.risk);

        for signal in signals {
            let (end_date, best_bid, best_ask) = book
                .get(signal.market_id.as_str())
                .map(|(d, b, a)| (d.to_string(), *b, *a))
                .unwrap_or_default();

            let verdict =
                risk_engine.evaluate(signal, &end_date, best_bid, best_ask, &mut state)?;
            summarizer.record_risk_verdict(&verdict);

            // The check bundle is persisted whatever the verdict.
            let key = idempotency_key(
                run_id,
                &signal.market_id,
                Side::Buy,
                signal.edge_result.market_price_yes,
            );
            self.store.save_risk_checks(run_id, &key, &verdict.checks)?;

            if !verdict.approved {
                info!(
                    market = %signal.market_id,
                    reasons = ?verdict
                        .block_reasons()
                        .iter()
                        .map(|r| r.as_str())
                        .collect::<Vec<_>>(),
                    "candidate blocked"
                );
                continue;
            }

            let intent = OrderIntent {
                run_id: run_id.to_string(),
                idempotency_key: key,
                market_id: signal.market_id.clone(),
                clob_token_id: signal.clob_token_id_yes.clone(),
                side: Side::Buy,
                price: signal.edge_result.market_price_yes,
                size_usd: signal.proposed_size_usd,
                city_slug: signal.edge_result.city_slug.clone(),
                target_date: signal.edge_result.target_date.clone(),
                bucket_label: signal.edge_result.bucket_label.clone(),
                net_edge: signal.edge_result.net_edge,
            };

            let result = executor.execute(&intent).await?;
            summarizer.record_order_result(&result);

            if result.status.is_success() {
                state.record_trade(&signal.edge_result.city_slug, signal.proposed_size_usd);
                self.store.open_position(
                    &signal.market_id,
                    &signal.edge_result.city_slug,
                    &signal.edge_result.target_date,
                    &signal.edge_result.bucket_label,
                    signal.edge_result.market_price_yes,
                    signal.proposed_size_usd,
                )?;
            }

            if state.trades_this_run >= self.config.risk.max_trades_per_run {
                info!("max trades per run reached, stopping entries");
                break;
            }
        }
        Ok(())
    }
}
