//! Signal and edge computation models.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Outcome classification for one analyzed bucket market.
///
/// `Opportunity` is the only code that promotes to a [`Signal`]; the
/// rest explain why a bucket was passed over. These are business
/// outcomes, not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReasonCode {
    Opportunity,
    EdgeBelowThreshold,
    PriceAboveMaxEntry,
    NegativeEdge,
    NotAcceptingOrders,
    ZeroLiquidity,
    NoForecastAvailable,
    StaleForecastData,
    StaleMarketData,
    BucketParseError,
}

impl ReasonCode {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Opportunity => "OPPORTUNITY",
            Self::EdgeBelowThreshold => "EDGE_BELOW_THRESHOLD",
            Self::PriceAboveMaxEntry => "PRICE_ABOVE_MAX_ENTRY",
            Self::NegativeEdge => "NEGATIVE_EDGE",
            Self::NotAcceptingOrders => "NOT_ACCEPTING_ORDERS",
            Self::ZeroLiquidity => "ZERO_LIQUIDITY",
            Self::NoForecastAvailable => "NO_FORECAST_AVAILABLE",
            Self::StaleForecastData => "STALE_FORECAST_DATA",
            Self::StaleMarketData => "STALE_MARKET_DATA",
            Self::BucketParseError => "BUCKET_PARSE_ERROR",
        }
    }
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Probability and edge computation for one bucket market in one run.
#[derive(Debug, Clone)]
pub struct EdgeResult {
    pub run_id: String,
    pub event_id: String,
    pub market_id: String,
    pub city_slug: String,
    pub target_date: String,
    pub bucket_label: String,
    pub bucket_probability: f64,
    pub market_price_yes: f64,
    /// `probability - price`
    pub gross_edge: f64,
    pub fee_estimate: f64,
    pub slippage_estimate: f64,
    /// `gross - fee - slippage`
    pub net_edge: f64,
    pub reason_code: ReasonCode,
    pub sigma_used: f64,
}

/// An opportunity promoted to an executable candidate with a size.
#[derive(Debug, Clone)]
pub struct Signal {
    pub edge_result: EdgeResult,
    pub market_id: String,
    pub clob_token_id_yes: String,
    pub proposed_size_usd: f64,
}
