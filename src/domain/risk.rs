//! Risk check models.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Why a candidate was blocked. One variant per check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlockReason {
    KillSwitch,
    Paused,
    PositionSize,
    TradesPerRun,
    TotalExposure,
    PerCityExposure,
    DailyLoss,
    Cooldown,
    TimeToResolution,
    Slippage,
}

impl BlockReason {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::KillSwitch => "KILL_SWITCH",
            Self::Paused => "PAUSED",
            Self::PositionSize => "POSITION_SIZE",
            Self::TradesPerRun => "TRADES_PER_RUN",
            Self::TotalExposure => "TOTAL_EXPOSURE",
            Self::PerCityExposure => "PER_CITY_EXPOSURE",
            Self::DailyLoss => "DAILY_LOSS",
            Self::Cooldown => "COOLDOWN",
            Self::TimeToResolution => "TIME_TO_RESOLUTION",
            Self::Slippage => "SLIPPAGE",
        }
    }
}

impl fmt::Display for BlockReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a single risk check.
#[derive(Debug, Clone)]
pub struct RiskCheckResult {
    pub check_name: &'static str,
    pub passed: bool,
    pub block_reason: Option<BlockReason>,
    pub detail: String,
}

impl RiskCheckResult {
    #[must_use]
    pub fn pass(check_name: &'static str) -> Self {
        Self {
            check_name,
            passed: true,
            block_reason: None,
            detail: "ok".to_string(),
        }
    }

    #[must_use]
    pub fn block(check_name: &'static str, reason: BlockReason, detail: String) -> Self {
        Self {
            check_name,
            passed: false,
            block_reason: Some(reason),
            detail,
        }
    }
}

/// The full ten-check verdict for one candidate.
#[derive(Debug, Clone)]
pub struct RiskVerdict {
    pub approved: bool,
    pub checks: Vec<RiskCheckResult>,
}

impl RiskVerdict {
    /// The block reasons of every failed check, in check order.
    #[must_use]
    pub fn block_reasons(&self) -> Vec<BlockReason> {
        self.checks.iter().filter_map(|c| c.block_reason).collect()
    }
}
