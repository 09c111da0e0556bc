//! Executor safety-path tests against a real (in-memory) store.

use heatwave::domain::execution::{OrderIntent, OrderStatus, Side};
use heatwave::execution::{idempotency_key, DryRunAdapter, Executor};
use heatwave::store::Store;

fn intent(run_id: &str, market_id: &str, price: f64) -> OrderIntent {
    OrderIntent {
        run_id: run_id.to_string(),
        idempotency_key: idempotency_key(run_id, market_id, Side::Buy, price),
        market_id: market_id.to_string(),
        clob_token_id: "tok".to_string(),
        side: Side::Buy,
        price,
        size_usd: 5.0,
        city_slug: "nyc".to_string(),
        target_date: "2026-02-11".to_string(),
        bucket_label: "36-37".to_string(),
        net_edge: 0.156,
    }
}

#[tokio::test]
async fn kill_switch_flipped_after_approval_still_blocks_execution() {
    let store = Store::open_in_memory().unwrap();
    let adapter = DryRunAdapter;
    let executor = Executor::new(&store, &adapter);

    // The risk engine saw the switch off; an operator flips it before
    // the executor runs. The durable recheck closes the race.
    assert!(!store.is_kill_switch_active().unwrap());
    store.set_system_state("kill_switch", "true").unwrap();

    let order = intent("run1", "m1", 0.075);
    let result = executor.execute(&order).await.unwrap();

    assert_eq!(result.status, OrderStatus::Rejected);
    assert!(result.error_message.contains("Kill switch"));
    assert!(!store.intent_exists(&order.idempotency_key).unwrap());
}

#[tokio::test]
async fn duplicate_submission_within_a_cycle() {
    let store = Store::open_in_memory().unwrap();
    let adapter = DryRunAdapter;
    let executor = Executor::new(&store, &adapter);

    let order = intent("run1", "m1", 0.075);
    let first = executor.execute(&order).await.unwrap();
    assert_eq!(first.status, OrderStatus::DryRun);

    let second = executor.execute(&order).await.unwrap();
    assert_eq!(second.status, OrderStatus::Duplicate);

    // Exactly one intent row and one result row for the key.
    assert_eq!(
        store.order_results_for(&order.idempotency_key).unwrap().len(),
        1
    );
}

#[tokio::test]
async fn same_inputs_in_different_runs_are_distinct_orders() {
    let store = Store::open_in_memory().unwrap();
    let adapter = DryRunAdapter;
    let executor = Executor::new(&store, &adapter);

    let first = executor.execute(&intent("run1", "m1", 0.075)).await.unwrap();
    let second = executor.execute(&intent("run2", "m1", 0.075)).await.unwrap();
    assert_eq!(first.status, OrderStatus::DryRun);
    assert_eq!(second.status, OrderStatus::DryRun);
}

#[tokio::test]
async fn every_intent_has_exactly_one_result() {
    let store = Store::open_in_memory().unwrap();
    let adapter = DryRunAdapter;
    let executor = Executor::new(&store, &adapter);

    let keys: Vec<String> = {
        let mut keys = Vec::new();
        for (market, price) in [("m1", 0.075), ("m2", 0.10), ("m3", 0.12)] {
            let order = intent("run1", market, price);
            executor.execute(&order).await.unwrap();
            keys.push(order.idempotency_key);
        }
        keys
    };

    for key in keys {
        assert!(store.intent_exists(&key).unwrap());
        assert_eq!(store.order_results_for(&key).unwrap().len(), 1);
    }
}
