//! Event and bucket-market slug grammar.
//!
//! Event slugs are deterministic:
//! `highest-temperature-in-<city>-on-<monthname>-<day>-<year>`.
//! A market slug is the event slug plus a bucket suffix such as
//! `34-35f`, `22f`, `44forhigher` or `33forbelow`. Temperatures may
//! carry a `neg` prefix for below-zero readings (`neg1-2f`).

use crate::domain::bucket::{TemperatureBucket, TemperatureUnit};

const MONTH_NAMES: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Build the deterministic event slug for a city and date.
#[must_use]
pub fn build_event_slug(city_slug: &str, year: i32, month: u32, day: u32) -> String {
    let month_name = MONTH_NAMES[(month as usize).saturating_sub(1) % 12];
    format!("highest-temperature-in-{city_slug}-on-{month_name}-{day}-{year}")
}

/// A parsed bucket suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedBucket {
    pub bucket: TemperatureBucket,
    pub raw_suffix: String,
}

/// Parse a bucket suffix from a market slug.
///
/// Matching is case-insensitive and tries the more specific shapes
/// first (`orhigher`/`orbelow`, then range, then exact). Returns
/// `None` when the suffix fits no known shape.
#[must_use]
pub fn parse_bucket_suffix(suffix: &str) -> Option<ParsedBucket> {
    let raw = suffix.trim().to_ascii_lowercase();

    let bucket = parse_threshold(&raw, "orhigher")
        .map(|(t, unit)| TemperatureBucket::or_higher(t, unit))
        .or_else(|| {
            parse_threshold(&raw, "orbelow").map(|(t, unit)| TemperatureBucket::or_below(t, unit))
        })
        .or_else(|| parse_range(&raw))
        .or_else(|| parse_exact(&raw))?;

    Some(ParsedBucket {
        bucket,
        raw_suffix: raw,
    })
}

/// Extract the bucket suffix from a market slug given its event slug,
/// falling back to the legacy `-be-` separator, and parse it.
#[must_use]
pub fn parse_market_slug(market_slug: &str, event_slug: &str) -> Option<ParsedBucket> {
    if !event_slug.is_empty() {
        if let Some(suffix) = market_slug.strip_prefix(&format!("{event_slug}-")) {
            if let Some(parsed) = parse_bucket_suffix(suffix) {
                return Some(parsed);
            }
        }
    }
    // Legacy market slugs separated the suffix with "-be-".
    market_slug
        .rsplit_once("-be-")
        .and_then(|(_, suffix)| parse_bucket_suffix(suffix))
}

/// `"44forhigher"` -> `(44, F)`; `"neg5corbelow"` -> `(-5, C)`.
fn parse_threshold(s: &str, keyword: &str) -> Option<(i32, TemperatureUnit)> {
    let body = s.strip_suffix(keyword)?;
    let (temp_str, unit) = split_unit(body)?;
    Some((parse_temp(temp_str)?, unit))
}

/// `"34-35f"` -> range(34, 35); `"neg1-2f"` -> range(-1, 2).
fn parse_range(s: &str) -> Option<TemperatureBucket> {
    let (body, unit) = split_unit(s)?;
    // Split on the dash separating low from high; a leading minus on
    // the low temperature is spelled "neg", so the first '-' past the
    // low digits is the separator.
    let sep = find_range_separator(body)?;
    let low = parse_temp(&body[..sep])?;
    let high = parse_temp(&body[sep + 1..])?;
    Some(TemperatureBucket::range(low, high, unit))
}

/// `"22f"` -> exact(22).
fn parse_exact(s: &str) -> Option<TemperatureBucket> {
    let (temp_str, unit) = split_unit(s)?;
    Some(TemperatureBucket::exact(parse_temp(temp_str)?, unit))
}

/// Strip a trailing `f`/`c` unit letter.
fn split_unit(s: &str) -> Option<(&str, TemperatureUnit)> {
    let unit = match s.chars().last()? {
        'f' => TemperatureUnit::Fahrenheit,
        'c' => TemperatureUnit::Celsius,
        _ => return None,
    };
    Some((&s[..s.len() - 1], unit))
}

/// Parse a temperature token: digits, optionally prefixed with "neg"
/// and/or a literal '-' sign.
fn parse_temp(s: &str) -> Option<i32> {
    if s.is_empty() {
        return None;
    }
    if let Some(rest) = s.strip_prefix("neg") {
        let digits = rest.strip_prefix('-').unwrap_or(rest);
        return digits.parse::<i32>().ok().map(|t| -t);
    }
    s.parse::<i32>().ok()
}

/// Index of the '-' separating low from high in a range body.
fn find_range_separator(body: &str) -> Option<usize> {
    let start = if body.starts_with("neg") { 3 } else { 0 };
    // Skip a signed low ("neg-1" or "-1") before looking for the dash.
    let offset = if body[start..].starts_with('-') {
        start + 1
    } else {
        start
    };
    body[offset..].find('-').map(|i| i + offset)
}

/// A parsed event slug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedEventSlug {
    pub city_slug: String,
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

/// Parse city and date back out of an event slug.
#[must_use]
pub fn parse_event_slug(slug: &str) -> Option<ParsedEventSlug> {
    let rest = slug.to_ascii_lowercase();
    let rest = rest.strip_prefix("highest-temperature-in-")?;
    let (city, date_part) = rest.split_once("-on-")?;
    let mut parts = date_part.split('-');
    let month_name = parts.next()?;
    let day: u32 = parts.next()?.parse().ok()?;
    let year: i32 = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    let month = MONTH_NAMES.iter().position(|m| *m == month_name)? as u32 + 1;
    Some(ParsedEventSlug {
        city_slug: city.to_string(),
        year,
        month,
        day,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::bucket::BucketKind;

    #[test]
    fn builds_event_slug() {
        assert_eq!(
            build_event_slug("nyc", 2026, 2, 11),
            "highest-temperature-in-nyc-on-february-11-2026"
        );
        assert_eq!(
            build_event_slug("chicago", 2026, 12, 3),
            "highest-temperature-in-chicago-on-december-3-2026"
        );
    }

    #[test]
    fn event_slug_round_trip() {
        let slug = build_event_slug("seattle", 2026, 7, 4);
        let parsed = parse_event_slug(&slug).unwrap();
        assert_eq!(parsed.city_slug, "seattle");
        assert_eq!((parsed.year, parsed.month, parsed.day), (2026, 7, 4));
    }

    #[test]
    fn rejects_malformed_event_slug() {
        assert!(parse_event_slug("lowest-temperature-in-nyc-on-may-1-2026").is_none());
        assert!(parse_event_slug("highest-temperature-in-nyc-on-smarch-1-2026").is_none());
        assert!(parse_event_slug("highest-temperature-in-nyc-on-may-1").is_none());
    }

    #[test]
    fn parses_range_suffix() {
        let parsed = parse_bucket_suffix("34-35f").unwrap();
        assert_eq!(parsed.bucket.kind, BucketKind::Range);
        assert_eq!((parsed.bucket.low, parsed.bucket.high), (34, 35));
        assert_eq!(parsed.bucket.unit, TemperatureUnit::Fahrenheit);
    }

    #[test]
    fn parses_exact_suffix() {
        let parsed = parse_bucket_suffix("22f").unwrap();
        assert_eq!(parsed.bucket.kind, BucketKind::Exact);
        assert_eq!(parsed.bucket.low, 22);
    }

    #[test]
    fn parses_or_higher_and_or_below() {
        let hi = parse_bucket_suffix("44forhigher").unwrap();
        assert_eq!(hi.bucket.kind, BucketKind::OrHigher);
        assert_eq!(hi.bucket.low, 44);

        let lo = parse_bucket_suffix("33forbelow").unwrap();
        assert_eq!(lo.bucket.kind, BucketKind::OrBelow);
        assert_eq!(lo.bucket.high, 33);
    }

    #[test]
    fn parses_celsius_suffixes() {
        let parsed = parse_bucket_suffix("10corhigher").unwrap();
        assert_eq!(parsed.bucket.unit, TemperatureUnit::Celsius);
        let parsed = parse_bucket_suffix("8-9c").unwrap();
        assert_eq!(parsed.bucket.unit, TemperatureUnit::Celsius);
    }

    #[test]
    fn parses_negative_temperatures() {
        let parsed = parse_bucket_suffix("neg5forbelow").unwrap();
        assert_eq!(parsed.bucket.high, -5);

        let parsed = parse_bucket_suffix("neg1-2f").unwrap();
        assert_eq!((parsed.bucket.low, parsed.bucket.high), (-1, 2));

        let parsed = parse_bucket_suffix("neg-3f").unwrap();
        assert_eq!(parsed.bucket.kind, BucketKind::Exact);
        assert_eq!(parsed.bucket.low, -3);
    }

    #[test]
    fn is_case_insensitive_and_trims() {
        let parsed = parse_bucket_suffix(" 44FORHIGHER ").unwrap();
        assert_eq!(parsed.bucket.kind, BucketKind::OrHigher);
        assert_eq!(parsed.raw_suffix, "44forhigher");
    }

    #[test]
    fn rejects_garbage_suffix() {
        assert!(parse_bucket_suffix("").is_none());
        assert!(parse_bucket_suffix("hot").is_none());
        assert!(parse_bucket_suffix("34-35").is_none());
        assert!(parse_bucket_suffix("f").is_none());
        assert!(parse_bucket_suffix("34-f").is_none());
    }

    #[test]
    fn extracts_suffix_from_market_slug() {
        let event = "highest-temperature-in-nyc-on-february-11-2026";
        let market = format!("{event}-34-35f");
        let parsed = parse_market_slug(&market, event).unwrap();
        assert_eq!((parsed.bucket.low, parsed.bucket.high), (34, 35));
    }

    #[test]
    fn falls_back_to_legacy_separator() {
        let parsed = parse_market_slug("some-old-market-be-40forhigher", "unrelated").unwrap();
        assert_eq!(parsed.bucket.kind, BucketKind::OrHigher);
    }

    #[test]
    fn unparseable_market_slug_is_none() {
        let event = "highest-temperature-in-nyc-on-february-11-2026";
        assert!(parse_market_slug(&format!("{event}-balmy"), event).is_none());
        assert!(parse_market_slug("totally-different", event).is_none());
    }
}
