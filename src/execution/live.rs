//! Live adapter over the brokerage bridge.
//!
//! Response mapping:
//! - bridge reports success (or hands back a trade id) => `FILLED`,
//!   taking fill price/size from the response when present;
//! - HTTP 2xx with a business failure => `REJECTED` with the vendor
//!   message;
//! - transport or non-2xx errors propagate as `Err`, which the
//!   executor records as `FAILED`.

use async_trait::async_trait;
use chrono::Utc;
use tracing::{info, warn};

use super::ExecutionAdapter;
use crate::clients::simmer::TradeResponse;
use crate::clients::SimmerClient;
use crate::config::ExecutionVenue;
use crate::domain::execution::{OrderIntent, OrderResult, OrderStatus};
use crate::error::Result;

pub struct LiveAdapter {
    client: SimmerClient,
    venue: ExecutionVenue,
}

impl LiveAdapter {
    #[must_use]
    pub fn new(client: SimmerClient, venue: ExecutionVenue) -> Self {
        Self { client, venue }
    }

    fn map_response(intent: &OrderIntent, response: &TradeResponse, size: f64) -> OrderResult {
        if response.is_filled() {
            info!(
                market = %intent.market_id,
                trade_id = response.trade_id.as_deref().unwrap_or(""),
                "live order filled"
            );
            OrderResult {
                idempotency_key: intent.idempotency_key.clone(),
                status: OrderStatus::Filled,
                fill_price: Some(response.price.unwrap_or(intent.price)),
                fill_size: Some(response.shares_bought.unwrap_or(size)),
                error_message: String::new(),
                executed_at: Utc::now().to_rfc3339(),
            }
        } else {
            let message = response
                .error
                .clone()
                .unwrap_or_else(|| "order rejected by venue".to_string());
            warn!(market = %intent.market_id, %message, "live order rejected");
            OrderResult::unfilled(&intent.idempotency_key, OrderStatus::Rejected, message)
        }
    }
}

#[async_trait]
impl ExecutionAdapter for LiveAdapter {
    async fn execute(&self, intent: &OrderIntent) -> Result<OrderResult> {
        let response = self
            .client
            .buy(&intent.market_id, intent.size_usd, self.venue)
            .await?;
        Ok(Self::map_response(intent, &response, intent.size_usd))
    }

    async fn execute_sell(&self, intent: &OrderIntent, shares: f64) -> Result<OrderResult> {
        let response = self
            .client
            .sell(&intent.market_id, shares, self.venue)
            .await?;
        Ok(Self::map_response(intent, &response, shares))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::execution::Side;

    fn intent() -> OrderIntent {
        OrderIntent {
            run_id: "run".to_string(),
            idempotency_key: "key".to_string(),
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

    #[test]
    fn successful_response_maps_to_filled() {
        let response: TradeResponse = serde_json::from_str(
            r#"{"success": true, "trade_id": "t-1", "shares_bought": 66.6, "price": 0.076}"#,
        )
        .unwrap();
        let result = LiveAdapter::map_response(&intent(), &response, 5.0);
        assert_eq!(result.status, OrderStatus::Filled);
        assert_eq!(result.fill_price, Some(0.076));
        assert_eq!(result.fill_size, Some(66.6));
    }

    #[test]
    fn fill_falls_back_to_intent_values() {
        let response: TradeResponse = serde_json::from_str(r#"{"success": true}"#).unwrap();
        let result = LiveAdapter::map_response(&intent(), &response, 5.0);
        assert_eq!(result.status, OrderStatus::Filled);
        assert_eq!(result.fill_price, Some(0.075));
        assert_eq!(result.fill_size, Some(5.0));
    }

    #[test]
    fn business_failure_maps_to_rejected_with_vendor_message() {
        let response: TradeResponse =
            serde_json::from_str(r#"{"success": false, "error": "market closed"}"#).unwrap();
        let result = LiveAdapter::map_response(&intent(), &response, 5.0);
        assert_eq!(result.status, OrderStatus::Rejected);
        assert_eq!(result.error_message, "market closed");
        assert_eq!(result.fill_price, None);
    }
}
