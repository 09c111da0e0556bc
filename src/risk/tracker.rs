//! Derived-state tracker feeding the risk engine.
//!
//! Exposure figures are hydrated lazily from the store and then
//! advanced in memory after each successful execution, so later
//! candidates in the same cycle see the updated totals without a
//! re-query.

use std::collections::HashMap;

use chrono::Utc;

use crate::error::Result;
use crate::store::Store;

pub struct StateTracker<'a> {
    store: &'a Store,
    pub trades_this_run: u32,
    total_exposure: Option<f64>,
    city_exposure: HashMap<String, f64>,
}

impl<'a> StateTracker<'a> {
    #[must_use]
    pub fn new(store: &'a Store) -> Self {
        Self {
            store,
            trades_this_run: 0,
            total_exposure: None,
            city_exposure: HashMap::new(),
        }
    }

    /// Pre-load the total exposure for the cycle.
    pub fn hydrate(&mut self) -> Result<()> {
        self.total_exposure = Some(self.store.total_open_exposure()?);
        self.city_exposure.clear();
        Ok(())
    }

    pub fn kill_switch_active(&self) -> Result<bool> {
        self.store.is_kill_switch_active()
    }

    pub fn is_paused(&self) -> Result<bool> {
        self.store.is_paused()
    }

    pub fn total_exposure(&mut self) -> Result<f64> {
        if let Some(exposure) = self.total_exposure {
            return Ok(exposure);
        }
        let exposure = self.store.total_open_exposure()?;
        self.total_exposure = Some(exposure);
        Ok(exposure)
    }

    pub fn city_exposure(&mut self, city_slug: &str) -> Result<f64> {
        if let Some(exposure) = self.city_exposure.get(city_slug) {
            return Ok(*exposure);
        }
        let exposure = self.store.city_open_exposure(city_slug)?;
        self.city_exposure.insert(city_slug.to_string(), exposure);
        Ok(exposure)
    }

    /// Today's realized loss as a positive number; profit reads as
    /// zero loss.
    pub fn daily_loss(&self) -> Result<f64> {
        let today = Utc::now().format("%Y-%m-%d").to_string();
        let total = self
            .store
            .daily_pnl(&today)?
            .map(|row| row.total_pnl)
            .unwrap_or(0.0);
        Ok(if total < 0.0 { -total } else { 0.0 })
    }

    /// Minutes since the last successful fill on a market; `None`
    /// when it was never traded.
    pub fn minutes_since_last_trade(&self, market_id: &str) -> Result<Option<f64>> {
        let last = self.store.last_trade_time(market_id)?;
        Ok(last.map(|ts| (Utc::now() - ts).num_seconds() as f64 / 60.0))
    }

    /// Advance in-memory counters after a successful execution.
    pub fn record_trade(&mut self, city_slug: &str, size_usd: f64) {
        self.trades_this_run += 1;
        if let Some(exposure) = self.total_exposure.as_mut() {
            *exposure += size_usd;
        }
        if let Some(exposure) = self.city_exposure.get_mut(city_slug) {
            *exposure += size_usd;
        }
    }
}
