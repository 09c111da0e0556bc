//! Execution and order models.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Order side. The engine only ever buys YES and sells it back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal and intermediate order states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    DryRun,
    Submitted,
    Filled,
    Rejected,
    Failed,
    Duplicate,
}

impl OrderStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::DryRun => "DRY_RUN",
            Self::Submitted => "SUBMITTED",
            Self::Filled => "FILLED",
            Self::Rejected => "REJECTED",
            Self::Failed => "FAILED",
            Self::Duplicate => "DUPLICATE",
        }
    }

    /// True for statuses that put (or keep) money in the market.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::DryRun | Self::Filled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pre-execution order record, keyed by its idempotency fingerprint.
/// Immutable once persisted.
#[derive(Debug, Clone)]
pub struct OrderIntent {
    pub run_id: String,
    pub idempotency_key: String,
    pub market_id: String,
    pub clob_token_id: String,
    pub side: Side,
    pub price: f64,
    pub size_usd: f64,
    pub city_slug: String,
    pub target_date: String,
    pub bucket_label: String,
    pub net_edge: f64,
}

/// The single result recorded for an intent.
#[derive(Debug, Clone)]
pub struct OrderResult {
    pub idempotency_key: String,
    pub status: OrderStatus,
    pub fill_price: Option<f64>,
    pub fill_size: Option<f64>,
    pub error_message: String,
    /// RFC 3339.
    pub executed_at: String,
}

impl OrderResult {
    /// A result with no fill, used for rejections and failures.
    #[must_use]
    pub fn unfilled(key: &str, status: OrderStatus, message: impl Into<String>) -> Self {
        Self {
            idempotency_key: key.to_string(),
            status,
            fill_price: None,
            fill_size: None,
            error_message: message.into(),
            executed_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}
