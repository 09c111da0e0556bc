//! Simmer SDK client: the brokerage bridge for live execution.
//!
//! Simmer proxies venue CLOB orders behind a bearer-authenticated
//! REST API. This client never retries; a blind retry on an order
//! submission could double-fill.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::error;

use crate::config::ExecutionVenue;
use crate::error::{Error, Result};

const SIMMER_BASE_URL: &str = "https://api.simmer.markets";
const TRADE_SOURCE: &str = "sdk:heatwave";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Request body for `POST /api/sdk/trade`.
#[derive(Debug, Serialize)]
struct TradeRequest<'a> {
    market_id: &'a str,
    side: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    action: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    shares: Option<f64>,
    venue: &'a str,
    source: &'a str,
}

/// Trade response subset the engine depends on.
#[derive(Debug, Clone, Deserialize)]
pub struct TradeResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub trade_id: Option<String>,
    #[serde(default)]
    pub shares_bought: Option<f64>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub error: Option<String>,
}

impl TradeResponse {
    /// A trade landed when the bridge says success or handed back an id.
    #[must_use]
    pub fn is_filled(&self) -> bool {
        self.success || self.trade_id.as_deref().is_some_and(|id| !id.is_empty())
    }
}

pub struct SimmerClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl SimmerClient {
    /// Build a client from the `SIMMER_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("SIMMER_API_KEY")
            .map_err(|_| Error::Config("SIMMER_API_KEY not set".to_string()))?;
        Self::new(api_key, SIMMER_BASE_URL)
    }

    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(Error::Config("SIMMER_API_KEY is empty".to_string()));
        }
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            api_key,
        })
    }

    /// Buy YES shares for a USD amount.
    pub async fn buy(
        &self,
        market_id: &str,
        amount_usd: f64,
        venue: ExecutionVenue,
    ) -> Result<TradeResponse> {
        self.trade(TradeRequest {
            market_id,
            side: "yes",
            action: None,
            amount: Some(amount_usd),
            shares: None,
            venue: venue.as_str(),
            source: TRADE_SOURCE,
        })
        .await
    }

    /// Sell a share count back.
    pub async fn sell(
        &self,
        market_id: &str,
        shares: f64,
        venue: ExecutionVenue,
    ) -> Result<TradeResponse> {
        self.trade(TradeRequest {
            market_id,
            side: "yes",
            action: Some("sell"),
            amount: None,
            shares: Some(shares),
            venue: venue.as_str(),
            source: TRADE_SOURCE,
        })
        .await
    }

    async fn trade(&self, request: TradeRequest<'_>) -> Result<TradeResponse> {
        let url = format!("{}/api/sdk/trade", self.base_url);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), %body, "brokerage API error");
            return Err(Error::Broker(format!("HTTP {status}: {body}")));
        }
        Ok(response.json().await?)
    }

    /// Portfolio summary (balance, exposure, position count).
    pub async fn portfolio(&self) -> Result<Value> {
        let url = format!("{}/api/sdk/portfolio", self.base_url);
        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }
}
