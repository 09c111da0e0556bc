//! Market data models for weather bucket contracts.

use super::bucket::TemperatureBucket;

/// A single bucket market inside an event, with the top-of-book
/// fields the engine consumes.
#[derive(Debug, Clone)]
pub struct BucketMarket {
    pub market_id: String,
    pub condition_id: String,
    pub clob_token_id_yes: String,
    pub clob_token_id_no: String,
    pub outcome_price_yes: f64,
    pub best_bid: f64,
    pub best_ask: f64,
    pub last_trade_price: f64,
    pub liquidity: f64,
    pub volume_24hr: f64,
    pub maker_base_fee: f64,
    pub taker_base_fee: f64,
    pub order_min_size: f64,
    pub accepting_orders: bool,
    /// Market resolution timestamp (vendor ISO-8601 string).
    pub end_date: String,
    /// Human bucket label from the vendor ("34-35°F").
    pub group_item_title: String,
    pub group_item_threshold: String,
    pub bucket: TemperatureBucket,
}

/// One city × target-date event and its bucket markets.
#[derive(Debug, Clone)]
pub struct MarketEvent {
    pub event_id: String,
    pub slug: String,
    pub city_slug: String,
    /// `YYYY-MM-DD`
    pub target_date: String,
    pub title: String,
    /// When this snapshot was taken (RFC 3339); feeds the
    /// market-data staleness gate.
    pub fetched_at: String,
    pub buckets: Vec<BucketMarket>,
}
