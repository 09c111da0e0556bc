//! Age checks for market data and forecasts.
//!
//! Records with unparseable timestamps are treated as stale; a source
//! that cannot prove its freshness does not get traded on.

use chrono::{DateTime, Utc};

/// True when market data fetched at `fetched_at_iso` is older than
/// `max_age_minutes`.
#[must_use]
pub fn is_market_data_stale(fetched_at_iso: &str, max_age_minutes: u32, now: DateTime<Utc>) -> bool {
    age_minutes(fetched_at_iso, now).map_or(true, |age| age > f64::from(max_age_minutes))
}

/// True when a forecast generated at `source_generated_at_iso` is
/// older than `max_age_minutes`.
#[must_use]
pub fn is_forecast_stale(
    source_generated_at_iso: &str,
    max_age_minutes: u32,
    now: DateTime<Utc>,
) -> bool {
    age_minutes(source_generated_at_iso, now).map_or(true, |age| age > f64::from(max_age_minutes))
}

fn age_minutes(iso: &str, now: DateTime<Utc>) -> Option<f64> {
    let parsed = DateTime::parse_from_rfc3339(iso).ok()?.with_timezone(&Utc);
    Some((now - parsed).num_seconds() as f64 / 60.0)
}
