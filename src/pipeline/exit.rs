//! Exit pipeline: mark open positions to market and close the ones
//! whose price crossed the exit threshold.
//!
//! Runs after the entry stage in every cycle. Exits are
//! price-threshold only; there are no time-based forced exits.

use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::clients::MarketDataApi;
use crate::config::Config;
use crate::domain::execution::{OrderIntent, Side};
use crate::domain::position::Position;
use crate::error::Result;
use crate::execution::{idempotency_key, Executor};
use crate::store::Store;

/// Counters for one exit sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExitSummary {
    pub positions_checked: usize,
    pub prices_updated: usize,
    pub exits_found: usize,
    pub exits_executed: usize,
    pub exits_failed: usize,
}

pub struct ExitPipeline<'a> {
    config: &'a Config,
    store: &'a Store,
    markets: &'a dyn MarketDataApi,
    executor: &'a Executor<'a>,
    run_id: &'a str,
}

impl<'a> ExitPipeline<'a> {
    #[must_use]
    pub fn new(
        config: &'a Config,
        store: &'a Store,
        markets: &'a dyn MarketDataApi,
        executor: &'a Executor<'a>,
        run_id: &'a str,
    ) -> Self {
        Self {
            config,
            store,
            markets,
            executor,
            run_id,
        }
    }

    /// Sweep open positions once.
    pub async fn run(&self) -> Result<ExitSummary> {
        let mut summary = ExitSummary::default();

        if self.store.is_kill_switch_active()? {
            warn!("kill switch active, skipping exit sweep");
            return Ok(summary);
        }
        if self.store.is_paused()? {
            warn!("system paused, skipping exit sweep");
            return Ok(summary);
        }

        let positions = self.store.open_positions()?;
        if positions.is_empty() {
            return Ok(summary);
        }
        summary.positions_checked = positions.len();
        info!(count = positions.len(), "checking open positions for exit");

        let price_map = self.fetch_current_prices(&positions).await;
        let min_exit = self.config.strategy.min_exit_price;

        for position in &positions {
            let Some(&current_price) = price_map.get(position.market_id.as_str()) else {
                debug!(market = %position.market_id, "no current price, skipping");
                continue;
            };

            let unrealized = position.unrealized_at(current_price);
            self.store
                .mark_position(position.id, current_price, unrealized)?;
            summary.prices_updated += 1;

            if current_price >= min_exit {
                summary.exits_found += 1;
                info!(
                    city = %position.city_slug,
                    bucket = %position.bucket_label,
                    price = current_price,
                    threshold = min_exit,
                    entry = position.entry_price,
                    "exit threshold crossed"
                );
                if self.execute_exit(position, current_price).await? {
                    summary.exits_executed += 1;
                } else {
                    summary.exits_failed += 1;
                }
            } else {
                debug!(
                    city = %position.city_slug,
                    bucket = %position.bucket_label,
                    price = current_price,
                    "holding below exit threshold"
                );
            }
        }

        Ok(summary)
    }

    /// Best-effort price fetch per distinct open market. Individual
    /// failures skip that market, never the sweep.
    async fn fetch_current_prices(&self, positions: &[Position]) -> HashMap<String, f64> {
        let mut price_map = HashMap::new();
        for position in positions {
            if price_map.contains_key(position.market_id.as_str()) {
                continue;
            }
            match self.markets.yes_price(&position.market_id).await {
                Ok(Some(price)) => {
                    price_map.insert(position.market_id.clone(), price);
                }
                Ok(None) => debug!(market = %position.market_id, "no quote"),
                Err(e) => {
                    debug!(market = %position.market_id, error = %e, "price fetch failed");
                }
            }
        }
        price_map
    }

    /// Route a SELL through the executor; close the position when the
    /// order lands. Returns whether the exit executed.
    async fn execute_exit(&self, position: &Position, current_price: f64) -> Result<bool> {
        let shares = position.shares();
        let key = idempotency_key(self.run_id, &position.market_id, Side::Sell, current_price);
        let intent = OrderIntent {
            run_id: self.run_id.to_string(),
            idempotency_key: key,
            market_id: position.market_id.clone(),
            clob_token_id: String::new(),
            side: Side::Sell,
            price: current_price,
            size_usd: position.size_usd,
            city_slug: position.city_slug.clone(),
            target_date: position.target_date.clone(),
            bucket_label: position.bucket_label.clone(),
            net_edge: current_price - position.entry_price,
        };

        let result = self.executor.execute_sell(&intent, shares).await?;
        if result.status.is_success() {
            let realized = shares * (current_price - position.entry_price);
            self.store.close_position(position.id, realized)?;
            info!(
                city = %position.city_slug,
                bucket = %position.bucket_label,
                pnl = realized,
                "position closed"
            );
            Ok(true)
        } else {
            Ok(false)
        }
    }
}
