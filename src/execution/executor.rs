//! The order executor.
//!
//! Contract: one intent in, exactly one result out, both persisted.
//! Sequence: durable kill-switch recheck, idempotency probe, intent
//! persist, adapter dispatch, result persist. The kill-switch recheck
//! is not redundant with the risk engine's — it closes the race
//! between risk approval and the adapter call.

use tracing::{info, warn};

use super::ExecutionAdapter;
use crate::domain::execution::{OrderIntent, OrderResult, OrderStatus};
use crate::error::Result;
use crate::store::Store;

pub struct Executor<'a> {
    store: &'a Store,
    adapter: &'a dyn ExecutionAdapter,
}

impl<'a> Executor<'a> {
    #[must_use]
    pub fn new(store: &'a Store, adapter: &'a dyn ExecutionAdapter) -> Self {
        Self { store, adapter }
    }

    /// Execute a buy intent through the full safety pipeline.
    pub async fn execute(&self, intent: &OrderIntent) -> Result<OrderResult> {
        self.run(intent, None).await
    }

    /// Execute a sell intent for `shares` through the same pipeline.
    pub async fn execute_sell(&self, intent: &OrderIntent, shares: f64) -> Result<OrderResult> {
        self.run(intent, Some(shares)).await
    }

    async fn run(&self, intent: &OrderIntent, sell_shares: Option<f64>) -> Result<OrderResult> {
        let key = &intent.idempotency_key;

        // 1. Kill-switch recheck against the durable flag.
        if self.store.is_kill_switch_active()? {
            warn!(%key, "kill switch active at executor level");
            return Ok(OrderResult::unfilled(
                key,
                OrderStatus::Rejected,
                "Kill switch active at executor level",
            ));
        }

        // 2. Idempotency probe: an existing intent means some earlier
        // call owns this order. No new intent row, no adapter call.
        if self.store.intent_exists(key)? {
            info!(%key, "duplicate idempotency key");
            return Ok(OrderResult::unfilled(
                key,
                OrderStatus::Duplicate,
                "Duplicate idempotency key",
            ));
        }

        // 3. The intent commits before the adapter is allowed to act.
        self.store.save_order_intent(intent)?;

        // 4. Dispatch. Adapter errors become FAILED results with the
        // message preserved; they never abort the cycle.
        let result = match sell_shares {
            None => self.adapter.execute(intent).await,
            Some(shares) => self.adapter.execute_sell(intent, shares).await,
        };
        let result = match result {
            Ok(result) => result,
            Err(e) => {
                warn!(%key, error = %e, "adapter execution failed");
                OrderResult::unfilled(key, OrderStatus::Failed, e.to_string())
            }
        };

        // 5. Persist the single result for this intent.
        self.store.save_order_result(&result)?;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::execution::Side;
    use crate::execution::DryRunAdapter;
    use async_trait::async_trait;

    fn intent(key: &str) -> OrderIntent {
        OrderIntent {
            run_id: "run".to_string(),
            idempotency_key: key.to_string(),
            market_id: "m1".to_string(),
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

    struct ExplodingAdapter;

    #[async_trait]
    impl ExecutionAdapter for ExplodingAdapter {
        async fn execute(&self, _intent: &OrderIntent) -> Result<OrderResult> {
            Err(crate::error::Error::Broker("connection reset".to_string()))
        }

        async fn execute_sell(&self, _intent: &OrderIntent, _shares: f64) -> Result<OrderResult> {
            Err(crate::error::Error::Broker("connection reset".to_string()))
        }
    }

    #[tokio::test]
    async fn dry_run_persists_intent_and_result() {
        let store = Store::open_in_memory().unwrap();
        let adapter = DryRunAdapter;
        let executor = Executor::new(&store, &adapter);

        let result = executor.execute(&intent("k1")).await.unwrap();
        assert_eq!(result.status, OrderStatus::DryRun);
        assert!(store.intent_exists("k1").unwrap());
        assert_eq!(store.order_results_for("k1").unwrap().len(), 1);
    }

    #[tokio::test]
    async fn duplicate_submission_returns_duplicate_without_new_rows() {
        let store = Store::open_in_memory().unwrap();
        let adapter = DryRunAdapter;
        let executor = Executor::new(&store, &adapter);

        let first = executor.execute(&intent("k1")).await.unwrap();
        assert_eq!(first.status, OrderStatus::DryRun);

        let second = executor.execute(&intent("k1")).await.unwrap();
        assert_eq!(second.status, OrderStatus::Duplicate);

        // Exactly one intent and one persisted result.
        assert_eq!(store.order_results_for("k1").unwrap().len(), 1);
        let row = store.order_intent("k1").unwrap().unwrap();
        assert_eq!(row.idempotency_key, "k1");
    }

    #[tokio::test]
    async fn kill_switch_rejects_before_intent_is_written() {
        let store = Store::open_in_memory().unwrap();
        store.set_system_state("kill_switch", "true").unwrap();
        let adapter = DryRunAdapter;
        let executor = Executor::new(&store, &adapter);

        let result = executor.execute(&intent("k1")).await.unwrap();
        assert_eq!(result.status, OrderStatus::Rejected);
        assert!(result.error_message.contains("Kill switch"));
        // Defense in depth: no intent row was written.
        assert!(!store.intent_exists("k1").unwrap());
    }

    #[tokio::test]
    async fn adapter_error_becomes_failed_result() {
        let store = Store::open_in_memory().unwrap();
        let adapter = ExplodingAdapter;
        let executor = Executor::new(&store, &adapter);

        let result = executor.execute(&intent("k1")).await.unwrap();
        assert_eq!(result.status, OrderStatus::Failed);
        assert!(result.error_message.contains("connection reset"));

        // The intent and its FAILED result are both on record.
        assert!(store.intent_exists("k1").unwrap());
        let results = store.order_results_for("k1").unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].status, "FAILED");
    }
}
