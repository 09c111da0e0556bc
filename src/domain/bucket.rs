//! Temperature bucket definitions.
//!
//! A bucket is a contiguous subset of the integer temperature domain
//! backing a single binary market. Across one event the buckets are
//! expected to partition the real line, but the engine tolerates gaps
//! and never assumes ordering.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The four bucket shapes markets are quoted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BucketKind {
    /// `T >= t`
    OrHigher,
    /// `T <= t`
    OrBelow,
    /// `low <= T <= high`, inclusive.
    Range,
    /// `T == t`
    Exact,
}

impl BucketKind {
    /// Stable string form used in persisted rows.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::OrHigher => "or_higher",
            Self::OrBelow => "or_below",
            Self::Range => "range",
            Self::Exact => "exact",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TemperatureUnit {
    #[serde(rename = "F")]
    Fahrenheit,
    #[serde(rename = "C")]
    Celsius,
}

impl TemperatureUnit {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Fahrenheit => "F",
            Self::Celsius => "C",
        }
    }
}

/// A parsed temperature bucket.
///
/// For `OrHigher`, `OrBelow` and `Exact` buckets `low == high` holds
/// the single threshold temperature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemperatureBucket {
    pub kind: BucketKind,
    pub low: i32,
    pub high: i32,
    pub unit: TemperatureUnit,
}

impl TemperatureBucket {
    #[must_use]
    pub const fn range(low: i32, high: i32, unit: TemperatureUnit) -> Self {
        Self {
            kind: BucketKind::Range,
            low,
            high,
            unit,
        }
    }

    #[must_use]
    pub const fn exact(t: i32, unit: TemperatureUnit) -> Self {
        Self {
            kind: BucketKind::Exact,
            low: t,
            high: t,
            unit,
        }
    }

    #[must_use]
    pub const fn or_higher(t: i32, unit: TemperatureUnit) -> Self {
        Self {
            kind: BucketKind::OrHigher,
            low: t,
            high: t,
            unit,
        }
    }

    #[must_use]
    pub const fn or_below(t: i32, unit: TemperatureUnit) -> Self {
        Self {
            kind: BucketKind::OrBelow,
            low: t,
            high: t,
            unit,
        }
    }
}

impl fmt::Display for TemperatureBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let u = self.unit.as_str();
        match self.kind {
            BucketKind::Range => write!(f, "{}-{}{u}", self.low, self.high),
            BucketKind::Exact => write!(f, "{}{u}", self.low),
            BucketKind::OrHigher => write!(f, "{}{u} or higher", self.low),
            BucketKind::OrBelow => write!(f, "{}{u} or below", self.high),
        }
    }
}
