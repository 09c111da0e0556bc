//! Order intent and result persistence.
//!
//! Intents are unique on idempotency key and never updated; results
//! are written once per intent.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::models::{NewOrderIntentRow, NewOrderResultRow, OrderIntentRow, OrderResultRow};
use super::schema::{order_intents, order_results};
use super::Store;
use crate::domain::execution::{OrderIntent, OrderResult};
use crate::error::Result;

impl Store {
    /// Persist an order intent. The idempotency key's UNIQUE
    /// constraint backstops the executor's duplicate check.
    pub fn save_order_intent(&self, intent: &OrderIntent) -> Result<()> {
        let mut conn = self.conn()?;
        diesel::insert_into(order_intents::table)
            .values(NewOrderIntentRow {
                run_id: intent.run_id.clone(),
                idempotency_key: intent.idempotency_key.clone(),
                market_id: intent.market_id.clone(),
                clob_token_id: intent.clob_token_id.clone(),
                side: intent.side.as_str().to_string(),
                price: intent.price,
                size_usd: intent.size_usd,
                city_slug: intent.city_slug.clone(),
                target_date: intent.target_date.clone(),
                bucket_label: intent.bucket_label.clone(),
                net_edge: intent.net_edge,
                created_at: Utc::now().to_rfc3339(),
            })
            .execute(&mut conn)?;
        Ok(())
    }

    /// Persist an order result.
    pub fn save_order_result(&self, result: &OrderResult) -> Result<()> {
        let mut conn = self.conn()?;
        diesel::insert_into(order_results::table)
            .values(NewOrderResultRow {
                idempotency_key: result.idempotency_key.clone(),
                status: result.status.as_str().to_string(),
                fill_price: result.fill_price,
                fill_size: result.fill_size,
                error_message: result.error_message.clone(),
                executed_at: result.executed_at.clone(),
            })
            .execute(&mut conn)?;
        Ok(())
    }

    /// True when an intent with this idempotency key already exists.
    pub fn intent_exists(&self, idempotency_key: &str) -> Result<bool> {
        let mut conn = self.conn()?;
        let found = order_intents::table
            .filter(order_intents::idempotency_key.eq(idempotency_key))
            .select(order_intents::id)
            .first::<i32>(&mut conn)
            .optional()?;
        Ok(found.is_some())
    }

    /// Fetch an intent by key.
    pub fn order_intent(&self, idempotency_key: &str) -> Result<Option<OrderIntentRow>> {
        let mut conn = self.conn()?;
        Ok(order_intents::table
            .filter(order_intents::idempotency_key.eq(idempotency_key))
            .select(OrderIntentRow::as_select())
            .first(&mut conn)
            .optional()?)
    }

    /// Results recorded for a key (at most one in normal operation).
    pub fn order_results_for(&self, idempotency_key: &str) -> Result<Vec<OrderResultRow>> {
        let mut conn = self.conn()?;
        Ok(order_results::table
            .filter(order_results::idempotency_key.eq(idempotency_key))
            .order(order_results::id.asc())
            .select(OrderResultRow::as_select())
            .load(&mut conn)?)
    }

    /// Timestamp of the most recent successful fill on a market, for
    /// the cooldown check. `None` when the market was never traded.
    pub fn last_trade_time(&self, market_id: &str) -> Result<Option<DateTime<Utc>>> {
        let mut conn = self.conn()?;
        let executed_at: Option<String> = order_results::table
            .inner_join(
                order_intents::table
                    .on(order_results::idempotency_key.eq(order_intents::idempotency_key)),
            )
            .filter(order_intents::market_id.eq(market_id))
            .filter(order_results::status.eq_any(["DRY_RUN", "FILLED"]))
            .order(order_results::executed_at.desc())
            .select(order_results::executed_at)
            .first::<String>(&mut conn)
            .optional()?;

        Ok(executed_at.and_then(|ts| {
            DateTime::parse_from_rfc3339(&ts)
                .ok()
                .map(|dt| dt.with_timezone(&Utc))
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::execution::{OrderStatus, Side};

    fn intent(key: &str, market: &str) -> OrderIntent {
        OrderIntent {
            run_id: "run1".to_string(),
            idempotency_key: key.to_string(),
            market_id: market.to_string(),
            clob_token_id: "tok".to_string(),
            side: Side::Buy,
            price: 0.075,
            size_usd: 5.0,
            city_slug: "nyc".to_string(),
            target_date: "2026-02-11".to_string(),
            bucket_label: "36-37".to_string(),
            net_edge: 0.156,
        }
    }

    #[test]
    fn intent_round_trip() {
        let store = Store::open_in_memory().unwrap();
        assert!(!store.intent_exists("k1").unwrap());
        store.save_order_intent(&intent("k1", "m1")).unwrap();
        assert!(store.intent_exists("k1").unwrap());

        let row = store.order_intent("k1").unwrap().unwrap();
        assert_eq!(row.side, "BUY");
        assert!((row.price - 0.075).abs() < 1e-12);
    }

    #[test]
    fn duplicate_intent_key_is_a_database_error() {
        let store = Store::open_in_memory().unwrap();
        store.save_order_intent(&intent("k1", "m1")).unwrap();
        assert!(store.save_order_intent(&intent("k1", "m1")).is_err());
    }

    #[test]
    fn last_trade_time_only_counts_successes() {
        let store = Store::open_in_memory().unwrap();
        store.save_order_intent(&intent("k1", "m1")).unwrap();
        store
            .save_order_result(&OrderResult {
                idempotency_key: "k1".to_string(),
                status: OrderStatus::Rejected,
                fill_price: None,
                fill_size: None,
                error_message: "nope".to_string(),
                executed_at: Utc::now().to_rfc3339(),
            })
            .unwrap();
        assert!(store.last_trade_time("m1").unwrap().is_none());

        store.save_order_intent(&intent("k2", "m1")).unwrap();
        store
            .save_order_result(&OrderResult {
                idempotency_key: "k2".to_string(),
                status: OrderStatus::DryRun,
                fill_price: Some(0.075),
                fill_size: Some(5.0),
                error_message: String::new(),
                executed_at: Utc::now().to_rfc3339(),
            })
            .unwrap();
        assert!(store.last_trade_time("m1").unwrap().is_some());
        assert!(store.last_trade_time("other").unwrap().is_none());
    }
}
