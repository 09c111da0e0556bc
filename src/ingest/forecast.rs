//! Forecast fetcher with an in-cycle cache.
//!
//! The cache is keyed by `(city_slug, target_date)` and lives for one
//! cycle only, coalescing duplicate requests when several events share
//! a city.

use std::collections::HashMap;

use chrono::Utc;
use serde_json::Value;
use tracing::warn;

use crate::clients::ForecastApi;
use crate::config::CityConfig;
use crate::domain::forecast::{ForecastPeriod, ForecastPoint};

pub struct ForecastFetcher<'a> {
    forecasts: &'a dyn ForecastApi,
    cache: HashMap<(String, String), ForecastPoint>,
}

impl<'a> ForecastFetcher<'a> {
    #[must_use]
    pub fn new(forecasts: &'a dyn ForecastApi) -> Self {
        Self {
            forecasts,
            cache: HashMap::new(),
        }
    }

    /// Fetch the forecast for a city and target date, at most once per
    /// cycle per key.
    ///
    /// Returns `None` when the forecast is unavailable or carries no
    /// matching daytime period; the caller records
    /// `NO_FORECAST_AVAILABLE` for the affected buckets.
    pub async fn fetch(&mut self, city: &CityConfig, target_date: &str) -> Option<ForecastPoint> {
        let key = (city.slug.clone(), target_date.to_string());
        if let Some(cached) = self.cache.get(&key) {
            return Some(cached.clone());
        }

        let raw = match self
            .forecasts
            .gridpoint_forecast(&city.grid_id, city.grid_x, city.grid_y)
            .await
        {
            Ok(raw) => raw,
            Err(e) => {
                warn!(city = %city.slug, %target_date, error = %e, "forecast fetch failed");
                return None;
            }
        };

        let point = extract_forecast_point(&raw, &city.slug, target_date)?;
        self.cache.insert(key, point.clone());
        Some(point)
    }
}

/// Extract the daytime high for `target_date` from a gridpoint
/// forecast payload.
fn extract_forecast_point(raw: &Value, city_slug: &str, target_date: &str) -> Option<ForecastPoint> {
    let properties = raw.get("properties")?;
    let periods = properties.get("periods").and_then(Value::as_array)?;
    let generated_at = properties
        .get("generatedAt")
        .and_then(Value::as_str)
        .unwrap_or_default();

    let mut parsed = Vec::with_capacity(periods.len());
    let mut high_temp: Option<i32> = None;

    for p in periods {
        let period = ForecastPeriod {
            name: str_of(p, "name"),
            start_time: str_of(p, "startTime"),
            end_time: str_of(p, "endTime"),
            temperature: p.get("temperature").and_then(Value::as_i64).unwrap_or(0) as i32,
            temperature_unit: str_of(p, "temperatureUnit"),
            is_daytime: p.get("isDaytime").and_then(Value::as_bool).unwrap_or(false),
            short_forecast: str_of(p, "shortForecast"),
        };

        // The period's local start date must match the target date.
        if period.is_daytime
            && period.start_time.get(..10) == Some(target_date)
            && high_temp.map_or(true, |h| period.temperature > h)
        {
            high_temp = Some(period.temperature);
        }
        parsed.push(period);
    }

    let Some(high) = high_temp else {
        warn!(
            city = %city_slug,
            %target_date,
            periods = periods.len(),
            "no daytime high in forecast"
        );
        return None;
    };

    Some(ForecastPoint {
        city_slug: city_slug.to_string(),
        target_date: target_date.to_string(),
        high_temp_f: high,
        source_generated_at: generated_at.to_string(),
        fetched_at: Utc::now().to_rfc3339(),
        raw_periods: parsed,
    })
}

fn str_of(value: &Value, field: &str) -> String {
    value
        .get(field)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
