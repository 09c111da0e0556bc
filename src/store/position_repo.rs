//! Position and daily-PnL persistence.

use chrono::Utc;
use diesel::prelude::*;

use super::models::{DailyPnlRow, NewPositionRow, PositionRow};
use super::schema::{daily_pnl, positions};
use super::Store;
use crate::domain::position::{Position, PositionStatus};
use crate::error::Result;

fn to_domain(row: PositionRow) -> Position {
    let status = if row.status == "closed" {
        PositionStatus::Closed
    } else {
        PositionStatus::Open
    };
    Position {
        id: row.id,
        market_id: row.market_id,
        city_slug: row.city_slug,
        target_date: row.target_date,
        bucket_label: row.bucket_label,
        entry_price: row.entry_price,
        current_price: row.current_price,
        size_usd: row.size_usd,
        unrealized_pnl: row.unrealized_pnl,
        status,
    }
}

impl Store {
    /// Open a position at its entry price.
    pub fn open_position(
        &self,
        market_id: &str,
        city_slug: &str,
        target_date: &str,
        bucket_label: &str,
        entry_price: f64,
        size_usd: f64,
    ) -> Result<()> {
        let mut conn = self.conn()?;
        diesel::insert_into(positions::table)
            .values(NewPositionRow {
                market_id: market_id.to_string(),
                city_slug: city_slug.to_string(),
                target_date: target_date.to_string(),
                bucket_label: bucket_label.to_string(),
                entry_price,
                current_price: entry_price,
                size_usd,
                unrealized_pnl: 0.0,
                status: PositionStatus::Open.as_str().to_string(),
                opened_at: Utc::now().to_rfc3339(),
            })
            .execute(&mut conn)?;
        Ok(())
    }

    /// Every open position.
    pub fn open_positions(&self) -> Result<Vec<Position>> {
        let mut conn = self.conn()?;
        let rows = positions::table
            .filter(positions::status.eq("open"))
            .order(positions::id.asc())
            .select(PositionRow::as_select())
            .load(&mut conn)?;
        Ok(rows.into_iter().map(to_domain).collect())
    }

    /// Sum of open sizes across all cities.
    pub fn total_open_exposure(&self) -> Result<f64> {
        let mut conn = self.conn()?;
        let sum: Option<f64> = positions::table
            .filter(positions::status.eq("open"))
            .select(diesel::dsl::sum(positions::size_usd))
            .first(&mut conn)?;
        Ok(sum.unwrap_or(0.0))
    }

    /// Sum of open sizes for one city.
    pub fn city_open_exposure(&self, city_slug: &str) -> Result<f64> {
        let mut conn = self.conn()?;
        let sum: Option<f64> = positions::table
            .filter(positions::status.eq("open"))
            .filter(positions::city_slug.eq(city_slug))
            .select(diesel::dsl::sum(positions::size_usd))
            .first(&mut conn)?;
        Ok(sum.unwrap_or(0.0))
    }

    /// Mark a position to market.
    pub fn mark_position(&self, position_id: i32, current_price: f64, unrealized: f64) -> Result<()> {
        let mut conn = self.conn()?;
        diesel::update(positions::table.find(position_id))
            .set((
                positions::current_price.eq(current_price),
                positions::unrealized_pnl.eq(unrealized),
            ))
            .execute(&mut conn)?;
        Ok(())
    }

    /// Close a position and credit its realized PnL to today's
    /// ledger, atomically.
    pub fn close_position(&self, position_id: i32, realized_pnl: f64) -> Result<()> {
        let now = Utc::now();
        let today = now.format("%Y-%m-%d").to_string();
        let mut conn = self.conn()?;
        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            diesel::update(positions::table.find(position_id))
                .set((
                    positions::status.eq(PositionStatus::Closed.as_str()),
                    positions::closed_at.eq(now.to_rfc3339()),
                    positions::unrealized_pnl.eq(0.0),
                ))
                .execute(conn)?;
            credit_realized(conn, &today, realized_pnl)?;
            Ok(())
        })?;
        Ok(())
    }

    /// Today's PnL row, if any trading happened.
    pub fn daily_pnl(&self, date: &str) -> Result<Option<DailyPnlRow>> {
        let mut conn = self.conn()?;
        Ok(daily_pnl::table
            .filter(daily_pnl::date.eq(date))
            .select(DailyPnlRow::as_select())
            .first(&mut conn)
            .optional()?)
    }
}

/// Upsert a realized-PnL delta into the daily ledger.
fn credit_realized(
    conn: &mut SqliteConnection,
    date: &str,
    delta: f64,
) -> std::result::Result<(), diesel::result::Error> {
    let now = Utc::now().to_rfc3339();
    let existing: Option<DailyPnlRow> = daily_pnl::table
        .filter(daily_pnl::date.eq(date))
        .select(DailyPnlRow::as_select())
        .first(conn)
        .optional()?;

    match existing {
        Some(row) => {
            let realized = row.realized_pnl + delta;
            diesel::update(daily_pnl::table.find(row.id))
                .set((
                    daily_pnl::realized_pnl.eq(realized),
                    daily_pnl::total_pnl.eq(realized + row.unrealized_pnl),
                    daily_pnl::updated_at.eq(now),
                ))
                .execute(conn)?;
        }
        None => {
            diesel::insert_into(daily_pnl::table)
                .values((
                    daily_pnl::date.eq(date),
                    daily_pnl::realized_pnl.eq(delta),
                    daily_pnl::unrealized_pnl.eq(0.0),
                    daily_pnl::total_pnl.eq(delta),
                    daily_pnl::updated_at.eq(now),
                ))
                .execute(conn)?;
        }
    }
    Ok(())
}
