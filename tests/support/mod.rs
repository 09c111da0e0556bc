//! Shared test fixtures: fake HTTP clients and payload builders.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use parking_lot::Mutex;
use serde_json::{json, Value};

use heatwave::clients::{ForecastApi, MarketDataApi};
use heatwave::config::Config;
use heatwave::error::Result;
use heatwave::ingest::slug::build_event_slug;

/// Scripted markets API: events by slug, YES prices by market id.
#[derive(Default)]
pub struct FakeMarketsApi {
    pub events: HashMap<String, Value>,
    pub prices: Mutex<HashMap<String, f64>>,
}

impl FakeMarketsApi {
    pub fn with_event(slug: &str, event: Value) -> Self {
        let mut events = HashMap::new();
        events.insert(slug.to_string(), event);
        Self {
            events,
            prices: Mutex::new(HashMap::new()),
        }
    }

    pub fn set_price(&self, market_id: &str, price: f64) {
        self.prices.lock().insert(market_id.to_string(), price);
    }
}

#[async_trait]
impl MarketDataApi for FakeMarketsApi {
    async fn event_by_slug(&self, slug: &str) -> Result<Option<Value>> {
        Ok(self.events.get(slug).cloned())
    }

    async fn yes_price(&self, market_id: &str) -> Result<Option<f64>> {
        Ok(self.prices.lock().get(market_id).copied())
    }
}

/// Scripted forecast API: one canned gridpoint payload.
pub struct FakeForecastApi {
    pub payload: Value,
}

#[async_trait]
impl ForecastApi for FakeForecastApi {
    async fn gridpoint_forecast(&self, _grid_id: &str, _x: i32, _y: i32) -> Result<Value> {
        Ok(self.payload.clone())
    }
}

/// A forecast API that always fails.
pub struct DownForecastApi;

#[async_trait]
impl ForecastApi for DownForecastApi {
    async fn gridpoint_forecast(&self, _grid_id: &str, _x: i32, _y: i32) -> Result<Value> {
        Err(heatwave::error::Error::Parse("forecast source down".to_string()))
    }
}

/// Single-city config tuned for fast, deterministic cycles.
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.cities.retain(|c| c.slug == "nyc");
    config.ops.lookahead_days = 1;
    config.ops.request_delay_ms = 0;
    config
}

/// Today's UTC date as `YYYY-MM-DD`.
pub fn today() -> String {
    Utc::now().format("%Y-%m-%d").to_string()
}

/// The event slug the scanner will construct for nyc today.
pub fn todays_nyc_slug() -> String {
    let now = Utc::now().date_naive();
    use chrono::Datelike;
    build_event_slug("nyc", now.year(), now.month(), now.day())
}

/// Build a gamma-style market payload.
pub fn market_payload(
    id: &str,
    market_slug: &str,
    price_yes: f64,
    best_bid: f64,
    best_ask: f64,
    end_date: &str,
) -> Value {
    json!({
        "id": id,
        "slug": market_slug,
        "conditionId": format!("cond-{id}"),
        "clobTokenIds": format!("[\"{id}-yes\", \"{id}-no\"]"),
        "outcomePrices": format!("[\"{price_yes}\", \"{}\"]", 1.0 - price_yes),
        "bestBid": best_bid,
        "bestAsk": best_ask,
        "lastTradePrice": price_yes,
        "liquidity": "1000",
        "volume24hr": "400",
        "makerBaseFee": 0,
        "takerBaseFee": 0,
        "orderMinSize": 5,
        "acceptingOrders": true,
        "endDate": end_date,
        "groupItemTitle": format!("bucket-{id}"),
        "groupItemThreshold": ""
    })
}

/// Build a gamma-style event payload around the given markets.
pub fn event_payload(event_slug: &str, markets: Vec<Value>) -> Value {
    json!({
        "id": "ev-test",
        "slug": event_slug,
        "title": "Highest temperature?",
        "markets": markets,
    })
}

/// An end date comfortably past the time-to-resolution gate.
pub fn far_end_date() -> String {
    (Utc::now() + Duration::hours(48)).to_rfc3339()
}

/// A fresh NWS-style payload with one daytime period for today.
pub fn forecast_payload(high_temp: i32) -> Value {
    json!({
        "properties": {
            "generatedAt": Utc::now().to_rfc3339(),
            "periods": [
                {
                    "name": "Today",
                    "startTime": format!("{}T06:00:00Z", today()),
                    "endTime": format!("{}T18:00:00Z", today()),
                    "temperature": high_temp,
                    "temperatureUnit": "F",
                    "isDaytime": true,
                    "shortForecast": "Partly sunny"
                },
                {
                    "name": "Tonight",
                    "startTime": format!("{}T18:00:00Z", today()),
                    "endTime": format!("{}T06:00:00Z", today()),
                    "temperature": high_temp - 10,
                    "temperatureUnit": "F",
                    "isDaytime": false,
                    "shortForecast": "Clear"
                }
            ]
        }
    })
}
