//! Market event persistence.

use chrono::Utc;
use diesel::prelude::*;

use super::models::{NewBucketMarketRow, NewMarketEventRow};
use super::schema::{bucket_markets, market_events};
use super::Store;
use crate::domain::market::MarketEvent;
use crate::error::Result;

impl Store {
    /// Append a market event snapshot with its bucket rows and the
    /// raw vendor payload, atomically.
    pub fn save_market_event(&self, event: &MarketEvent, raw_json: &str) -> Result<i32> {
        let fetched_at = if event.fetched_at.is_empty() {
            Utc::now().to_rfc3339()
        } else {
            event.fetched_at.clone()
        };
        let mut conn = self.conn()?;

        let event_row_id = conn.transaction::<i32, diesel::result::Error, _>(|conn| {
            diesel::insert_into(market_events::table)
                .values(NewMarketEventRow {
                    event_id: event.event_id.clone(),
                    slug: event.slug.clone(),
                    city_slug: event.city_slug.clone(),
                    target_date: event.target_date.clone(),
                    title: event.title.clone(),
                    raw_json: raw_json.to_string(),
                    fetched_at: fetched_at.clone(),
                })
                .execute(conn)?;

            let event_row_id: i32 = market_events::table
                .select(diesel::dsl::max(market_events::id))
                .first::<Option<i32>>(conn)?
                .unwrap_or_default();

            for bm in &event.buckets {
                diesel::insert_into(bucket_markets::table)
                    .values(NewBucketMarketRow {
                        event_row_id,
                        market_id: bm.market_id.clone(),
                        condition_id: bm.condition_id.clone(),
                        clob_token_id_yes: bm.clob_token_id_yes.clone(),
                        clob_token_id_no: bm.clob_token_id_no.clone(),
                        outcome_price_yes: bm.outcome_price_yes,
                        best_bid: bm.best_bid,
                        best_ask: bm.best_ask,
                        last_trade_price: bm.last_trade_price,
                        liquidity: bm.liquidity,
                        volume_24hr: bm.volume_24hr,
                        maker_base_fee: bm.maker_base_fee,
                        taker_base_fee: bm.taker_base_fee,
                        order_min_size: bm.order_min_size,
                        accepting_orders: bm.accepting_orders,
                        end_date: bm.end_date.clone(),
                        group_item_title: bm.group_item_title.clone(),
                        group_item_threshold: bm.group_item_threshold.clone(),
                        bucket_kind: bm.bucket.kind.as_str().to_string(),
                        bucket_low: bm.bucket.low,
                        bucket_high: bm.bucket.high,
                        bucket_unit: bm.bucket.unit.as_str().to_string(),
                        fetched_at: fetched_at.clone(),
                    })
                    .execute(conn)?;
            }

            Ok(event_row_id)
        })?;

        Ok(event_row_id)
    }
}
