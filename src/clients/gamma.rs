//! Gamma API client for event and market data.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;

use super::MarketDataApi;
use crate::error::Result;

const GAMMA_BASE_URL: &str = "https://gamma-api.polymarket.com";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client for the Gamma events/markets REST API.
pub struct GammaClient {
    http: reqwest::Client,
    base_url: String,
}

impl GammaClient {
    pub fn new() -> Result<Self> {
        Self::with_base_url(GAMMA_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl MarketDataApi for GammaClient {
    async fn event_by_slug(&self, slug: &str) -> Result<Option<Value>> {
        let url = format!("{}/events", self.base_url);
        let response = self.http.get(&url).query(&[("slug", slug)]).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = response.error_for_status()?;
        let data: Value = response.json().await?;

        // Gamma returns a list for slug queries; take the first match.
        match data {
            Value::Array(mut items) => {
                if items.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(items.swap_remove(0)))
                }
            }
            other => Ok(Some(other)),
        }
    }

    async fn yes_price(&self, market_id: &str) -> Result<Option<f64>> {
        let url = format!("{}/markets/{market_id}", self.base_url);
        let response = self.http.get(&url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = response.error_for_status()?;
        let data: Value = response.json().await?;
        Ok(parse_yes_price(&data))
    }
}

/// Extract the YES outcome price from a market payload.
///
/// `outcomePrices` arrives either as a JSON array or as a
/// string-encoded array; the first element is the YES price.
fn parse_yes_price(market: &Value) -> Option<f64> {
    let prices = market.get("outcomePrices")?;
    let first = match prices {
        Value::Array(items) => items.first()?.clone(),
        Value::String(raw) => {
            let parsed: Value = serde_json::from_str(raw).ok()?;
            parsed.as_array()?.first()?.clone()
        }
        _ => return None,
    };
    match first {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}
