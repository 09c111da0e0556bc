//! Position models.

use std::fmt;

/// Position lifecycle. Positions are opened by the entry pipeline and
/// only ever mutated by the exit pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionStatus {
    Open,
    Closed,
}

impl PositionStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for PositionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An open or closed position as read back from the store.
#[derive(Debug, Clone)]
pub struct Position {
    /// Store row id.
    pub id: i32,
    pub market_id: String,
    pub city_slug: String,
    pub target_date: String,
    pub bucket_label: String,
    pub entry_price: f64,
    pub current_price: f64,
    pub size_usd: f64,
    pub unrealized_pnl: f64,
    pub status: PositionStatus,
}

impl Position {
    /// Shares held, derived from entry cost.
    #[must_use]
    pub fn shares(&self) -> f64 {
        if self.entry_price > 0.0 {
            self.size_usd / self.entry_price
        } else {
            0.0
        }
    }

    /// Unrealized PnL at the given mark.
    #[must_use]
    pub fn unrealized_at(&self, current_price: f64) -> f64 {
        if self.entry_price > 0.0 {
            self.size_usd * (current_price - self.entry_price) / self.entry_price
        } else {
            0.0
        }
    }
}
