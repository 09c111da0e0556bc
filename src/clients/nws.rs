//! National Weather Service forecast client.
//!
//! The NWS API requires a User-Agent and rate-limits aggressively, so
//! this client retries 503/429 and transport failures with exponential
//! backoff. It is the only retrying client in the crate.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use tracing::warn;

use super::ForecastApi;
use crate::error::{Error, Result};

const NWS_BASE_URL: &str = "https://api.weather.gov";
const DEFAULT_USER_AGENT: &str = concat!("heatwave/", env!("CARGO_PKG_VERSION"));
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_RETRIES: u32 = 3;
const RETRY_BASE_DELAY_SECS: f64 = 5.0;

pub struct NwsClient {
    http: reqwest::Client,
    base_url: String,
    max_retries: u32,
    retry_base_delay: std::time::Duration,
}

impl NwsClient {
    pub fn new() -> Result<Self> {
        Self::with_base_url(NWS_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .user_agent(DEFAULT_USER_AGENT)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            max_retries: DEFAULT_MAX_RETRIES,
            retry_base_delay: std::time::Duration::from_secs_f64(RETRY_BASE_DELAY_SECS),
        })
    }

    /// Shrink the retry delay (tests).
    #[must_use]
    pub fn with_retry_base_delay(mut self, delay: std::time::Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }
}

#[async_trait]
impl ForecastApi for NwsClient {
    async fn gridpoint_forecast(
        &self,
        grid_id: &str,
        grid_x: i32,
        grid_y: i32,
    ) -> Result<Value> {
        let url = format!(
            "{}/gridpoints/{grid_id}/{grid_x},{grid_y}/forecast",
            self.base_url
        );

        let mut attempt = 0;
        loop {
            let outcome = self
                .http
                .get(&url)
                .header("Accept", "application/geo+json")
                .send()
                .await;

            match outcome {
                Ok(response) => {
                    let status = response.status();
                    let transient = status == StatusCode::SERVICE_UNAVAILABLE
                        || status == StatusCode::TOO_MANY_REQUESTS;
                    if transient && attempt < self.max_retries {
                        let delay = self.retry_base_delay * 2u32.pow(attempt);
                        warn!(
                            %url,
                            status = status.as_u16(),
                            attempt = attempt + 1,
                            "forecast API throttled, retrying"
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                        continue;
                    }
                    let response = response.error_for_status()?;
                    return Ok(response.json().await?);
                }
                Err(e) if attempt < self.max_retries => {
                    let delay = self.retry_base_delay * 2u32.pow(attempt);
                    warn!(%url, error = %e, "forecast request failed, retrying");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(Error::Http(e)),
            }
        }
    }
}
