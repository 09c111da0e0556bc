//! Dry-run adapter: simulated fills, no external side effects.

use async_trait::async_trait;
use chrono::Utc;
use tracing::info;

use super::ExecutionAdapter;
use crate::domain::execution::{OrderIntent, OrderResult, OrderStatus};
use crate::error::Result;

pub struct DryRunAdapter;

#[async_trait]
impl ExecutionAdapter for DryRunAdapter {
    async fn execute(&self, intent: &OrderIntent) -> Result<OrderResult> {
        info!(
            side = %intent.side,
            bucket = %intent.bucket_label,
            market = %intent.market_id,
            price = intent.price,
            size = intent.size_usd,
            edge = intent.net_edge,
            "dry-run order"
        );
        Ok(OrderResult {
            idempotency_key: intent.idempotency_key.clone(),
            status: OrderStatus::DryRun,
            fill_price: Some(intent.price),
            fill_size: Some(intent.size_usd),
            error_message: String::new(),
            executed_at: Utc::now().to_rfc3339(),
        })
    }

    async fn execute_sell(&self, intent: &OrderIntent, shares: f64) -> Result<OrderResult> {
        info!(
            bucket = %intent.bucket_label,
            market = %intent.market_id,
            shares,
            price = intent.price,
            "dry-run exit"
        );
        Ok(OrderResult {
            idempotency_key: intent.idempotency_key.clone(),
            status: OrderStatus::DryRun,
            fill_price: Some(intent.price),
            fill_size: Some(shares),
            error_message: String::new(),
            executed_at: Utc::now().to_rfc3339(),
        })
    }
}
