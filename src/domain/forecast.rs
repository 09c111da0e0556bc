//! Forecast data models.

use serde::{Deserialize, Serialize};

/// One forecast period as returned by the weather API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastPeriod {
    pub name: String,
    pub start_time: String,
    pub end_time: String,
    pub temperature: i32,
    pub temperature_unit: String,
    pub is_daytime: bool,
    pub short_forecast: String,
}

/// The extracted daytime high for a (city, target date) pair.
#[derive(Debug, Clone)]
pub struct ForecastPoint {
    pub city_slug: String,
    /// `YYYY-MM-DD`
    pub target_date: String,
    pub high_temp_f: i32,
    /// When the source generated the forecast (vendor timestamp).
    pub source_generated_at: String,
    /// When we fetched it (RFC 3339).
    pub fetched_at: String,
    pub raw_periods: Vec<ForecastPeriod>,
}
