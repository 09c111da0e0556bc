//! Forecast snapshot persistence (append-only).

use diesel::prelude::*;

use super::models::NewForecastRow;
use super::schema::forecast_snapshots;
use super::Store;
use crate::domain::forecast::ForecastPoint;
use crate::error::Result;

impl Store {
    /// Append a forecast snapshot, retaining the raw periods as JSON.
    pub fn save_forecast(&self, point: &ForecastPoint) -> Result<()> {
        let raw_json = serde_json::to_string(&point.raw_periods)?;
        let mut conn = self.conn()?;
        diesel::insert_into(forecast_snapshots::table)
            .values(NewForecastRow {
                city_slug: point.city_slug.clone(),
                target_date: point.target_date.clone(),
                high_temp_f: point.high_temp_f,
                source_generated_at: point.source_generated_at.clone(),
                fetched_at: point.fetched_at.clone(),
                raw_json,
            })
            .execute(&mut conn)?;
        Ok(())
    }

    /// The most recent stored high for a city and date, if any.
    pub fn latest_forecast_high(&self, city_slug: &str, target_date: &str) -> Result<Option<i32>> {
        let mut conn = self.conn()?;
        let high = forecast_snapshots::table
            .filter(forecast_snapshots::city_slug.eq(city_slug))
            .filter(forecast_snapshots::target_date.eq(target_date))
            .order(forecast_snapshots::id.desc())
            .select(forecast_snapshots::high_temp_f)
            .first::<i32>(&mut conn)
            .optional()?;
        Ok(high)
    }
}
