//! Thin outbound HTTP clients.
//!
//! Each client owns its timeouts. Only the forecast client retries;
//! the markets client treats a missing event as `None` rather than an
//! error, and the brokerage client never retries (a blind retry could
//! double-submit an order).

pub mod gamma;
pub mod nws;
pub mod simmer;

use async_trait::async_trait;

use crate::error::Result;

/// Read access to the markets API, as consumed by the scanner and the
/// exit pipeline.
#[async_trait]
pub trait MarketDataApi: Send + Sync {
    /// Fetch a single event by slug. `None` when the event does not
    /// exist (404 or empty result).
    async fn event_by_slug(&self, slug: &str) -> Result<Option<serde_json::Value>>;

    /// Current YES price for a market, if quoted.
    async fn yes_price(&self, market_id: &str) -> Result<Option<f64>>;
}

/// Read access to the forecasts API.
#[async_trait]
pub trait ForecastApi: Send + Sync {
    /// Fetch the gridpoint forecast payload for the given grid cell.
    async fn gridpoint_forecast(
        &self,
        grid_id: &str,
        grid_x: i32,
        grid_y: i32,
    ) -> Result<serde_json::Value>;
}

pub use gamma::GammaClient;
pub use nws::NwsClient;
pub use simmer::SimmerClient;
