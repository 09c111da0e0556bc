//! Market scanner: discovers active weather events across cities and
//! lookahead dates.

use chrono::{Datelike, Duration, NaiveDate};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::clients::MarketDataApi;
use crate::config::Config;
use crate::domain::market::{BucketMarket, MarketEvent};
use crate::ingest::slug::{build_event_slug, parse_event_slug, parse_market_slug};

/// A market whose bucket suffix failed to parse. Carried forward so a
/// `BUCKET_PARSE_ERROR` edge row is still recorded for it.
#[derive(Debug, Clone)]
pub struct SkippedMarket {
    pub event_id: String,
    pub market_id: String,
    pub city_slug: String,
    pub target_date: String,
    pub bucket_label: String,
    pub outcome_price_yes: f64,
}

/// One scanned event together with the raw vendor payload for audit.
#[derive(Debug, Clone)]
pub struct ScannedEvent {
    pub event: MarketEvent,
    pub raw_json: String,
}

/// Everything a scan pass produced.
#[derive(Debug, Clone, Default)]
pub struct ScanOutcome {
    pub events: Vec<ScannedEvent>,
    pub parse_failures: Vec<SkippedMarket>,
}

pub struct MarketScanner<'a> {
    config: &'a Config,
    markets: &'a dyn MarketDataApi,
}

impl<'a> MarketScanner<'a> {
    #[must_use]
    pub fn new(config: &'a Config, markets: &'a dyn MarketDataApi) -> Self {
        Self { config, markets }
    }

    /// Scan every enabled city over `today + [0, lookahead_days)`.
    ///
    /// A missing event (404/empty) is normal; a network failure on a
    /// single slug is logged and skipped without failing the cycle.
    pub async fn scan(&self, today: NaiveDate) -> ScanOutcome {
        let mut outcome = ScanOutcome::default();
        let delay = std::time::Duration::from_millis(self.config.ops.request_delay_ms);

        for city in self.config.enabled_cities() {
            for day_offset in 0..self.config.ops.lookahead_days {
                let target = today + Duration::days(i64::from(day_offset));
                let slug =
                    build_event_slug(&city.slug, target.year(), target.month(), target.day());

                match self.markets.event_by_slug(&slug).await {
                    Ok(Some(raw)) => {
                        let target_date = target.format("%Y-%m-%d").to_string();
                        if let Some((event, failures)) =
                            parse_event(&raw, &city.slug, &target_date)
                        {
                            info!(%slug, buckets = event.buckets.len(), "found event");
                            outcome.events.push(ScannedEvent {
                                event,
                                raw_json: raw.to_string(),
                            });
                            outcome.parse_failures.extend(failures);
                        }
                    }
                    Ok(None) => debug!(%slug, "no event listed"),
                    Err(e) => warn!(%slug, error = %e, "scan failed for slug, skipping"),
                }

                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
            }
        }

        outcome
    }
}

/// Parse a vendor event payload into a `MarketEvent` plus the markets
/// whose bucket suffix did not parse.
fn parse_event(
    raw: &Value,
    city_slug: &str,
    target_date: &str,
) -> Option<(MarketEvent, Vec<SkippedMarket>)> {
    let event_id = string_field(raw, "id");
    let slug = raw.get("slug").and_then(Value::as_str).unwrap_or_default();
    let title = raw.get("title").and_then(Value::as_str).unwrap_or_default();
    let markets = raw.get("markets").and_then(Value::as_array)?;

    if event_id.is_empty() || markets.is_empty() {
        return None;
    }

    // The vendor occasionally serves a different event under a queried
    // slug; a city mismatch means this payload is not ours.
    if let Some(parsed) = parse_event_slug(slug) {
        if parsed.city_slug != city_slug {
            warn!(%slug, expected = city_slug, "event slug names another city, skipping");
            return None;
        }
    }

    let mut buckets = Vec::new();
    let mut failures = Vec::new();
    for market in markets {
        match parse_bucket_market(market, slug) {
            ParsedMarket::Bucket(bm) => buckets.push(bm),
            ParsedMarket::Unparseable { market_id, label, price } => {
                debug!(%market_id, "could not parse bucket suffix");
                failures.push(SkippedMarket {
                    event_id: event_id.clone(),
                    market_id,
                    city_slug: city_slug.to_string(),
                    target_date: target_date.to_string(),
                    bucket_label: label,
                    outcome_price_yes: price,
                });
            }
            ParsedMarket::Malformed => {}
        }
    }

    if buckets.is_empty() && failures.is_empty() {
        warn!(%slug, "no parseable buckets in event");
        return None;
    }

    Some((
        MarketEvent {
            event_id,
            slug: slug.to_string(),
            city_slug: city_slug.to_string(),
            target_date: target_date.to_string(),
            title: title.to_string(),
            fetched_at: chrono::Utc::now().to_rfc3339(),
            buckets,
        },
        failures,
    ))
}

enum ParsedMarket {
    Bucket(BucketMarket),
    /// Identifiable market with an unrecognized bucket suffix.
    Unparseable {
        market_id: String,
        label: String,
        price: f64,
    },
    /// Structurally broken payload (missing ids/tokens).
    Malformed,
}

fn parse_bucket_market(market: &Value, event_slug: &str) -> ParsedMarket {
    let market_id = string_field(market, "id");
    if market_id.is_empty() {
        return ParsedMarket::Malformed;
    }

    let clob_ids = json_list_field(market, "clobTokenIds");
    if clob_ids.len() < 2 {
        return ParsedMarket::Malformed;
    }

    let prices = json_list_field(market, "outcomePrices");
    let price_yes = prices.first().and_then(|p| p.parse::<f64>().ok()).unwrap_or(0.0);
    let label = market
        .get("groupItemTitle")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let market_slug = market.get("slug").and_then(Value::as_str).unwrap_or_default();
    let Some(parsed) = parse_market_slug(market_slug, event_slug) else {
        return ParsedMarket::Unparseable {
            market_id,
            label,
            price: price_yes,
        };
    };

    ParsedMarket::Bucket(BucketMarket {
        market_id,
        condition_id: string_field(market, "conditionId"),
        clob_token_id_yes: clob_ids[0].clone(),
        clob_token_id_no: clob_ids[1].clone(),
        outcome_price_yes: price_yes,
        best_bid: f64_field(market, "bestBid"),
        best_ask: f64_field(market, "bestAsk"),
        last_trade_price: f64_field(market, "lastTradePrice"),
        liquidity: f64_field(market, "liquidity"),
        volume_24hr: f64_field(market, "volume24hr"),
        maker_base_fee: f64_field(market, "makerBaseFee"),
        taker_base_fee: f64_field(market, "takerBaseFee"),
        order_min_size: f64_field(market, "orderMinSize"),
        accepting_orders: market
            .get("acceptingOrders")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        end_date: string_field(market, "endDate"),
        group_item_title: label,
        group_item_threshold: string_field(market, "groupItemThreshold"),
        bucket: parsed.bucket,
    })
}

/// Read a field that is a string, or stringify a number.
fn string_field(value: &Value, field: &str) -> String {
    match value.get(field) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

/// Numbers arrive as JSON numbers or numeric strings.
fn f64_field(value: &Value, field: &str) -> f64 {
    match value.get(field) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// A list field that may be a JSON array or a string-encoded array.
fn json_list_field(value: &Value, field: &str) -> Vec<String> {
    let raw = match value.get(field) {
        Some(Value::Array(items)) => return items.iter().map(element_to_string).collect(),
        Some(Value::String(s)) => s.clone(),
        _ => return Vec::new(),
    };
    match serde_json::from_str::<Value>(&raw) {
        Ok(Value::Array(items)) => items.iter().map(element_to_string).collect(),
        _ => Vec::new(),
    }
}

fn element_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
