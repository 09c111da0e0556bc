//! The ten pre-trade checks.
//!
//! Each check is a pure function over the single fact it consumes and
//! returns a [`RiskCheckResult`]. Ordering and aggregation live in the
//! engine; nothing here short-circuits or touches I/O.
//!
//! Boundary policy: limits compare strictly, so a value exactly at its
//! limit passes. Cooldown passes at exactly the configured minute.

use crate::domain::risk::{BlockReason, RiskCheckResult};

pub fn kill_switch(active: bool) -> RiskCheckResult {
    if active {
        RiskCheckResult::block(
            "kill_switch",
            BlockReason::KillSwitch,
            "Kill switch is active".to_string(),
        )
    } else {
        RiskCheckResult::pass("kill_switch")
    }
}

pub fn paused(is_paused: bool) -> RiskCheckResult {
    if is_paused {
        RiskCheckResult::block("paused", BlockReason::Paused, "System is paused".to_string())
    } else {
        RiskCheckResult::pass("paused")
    }
}

pub fn position_size(proposed_size_usd: f64, max_position_size_usd: f64) -> RiskCheckResult {
    if proposed_size_usd > max_position_size_usd {
        RiskCheckResult::block(
            "position_size",
            BlockReason::PositionSize,
            format!("${proposed_size_usd:.2} > limit ${max_position_size_usd:.2}"),
        )
    } else {
        RiskCheckResult::pass("position_size")
    }
}

pub fn trades_per_run(trades_this_run: u32, max_trades_per_run: u32) -> RiskCheckResult {
    if trades_this_run >= max_trades_per_run {
        RiskCheckResult::block(
            "trades_per_run",
            BlockReason::TradesPerRun,
            format!("{trades_this_run} >= limit {max_trades_per_run}"),
        )
    } else {
        RiskCheckResult::pass("trades_per_run")
    }
}

pub fn total_exposure(
    current_exposure_usd: f64,
    proposed_size_usd: f64,
    max_total_exposure_usd: f64,
) -> RiskCheckResult {
    let new_total = current_exposure_usd + proposed_size_usd;
    if new_total > max_total_exposure_usd {
        RiskCheckResult::block(
            "total_exposure",
            BlockReason::TotalExposure,
            format!("${new_total:.2} > limit ${max_total_exposure_usd:.2}"),
        )
    } else {
        RiskCheckResult::pass("total_exposure")
    }
}

pub fn per_city_exposure(
    city_exposure_usd: f64,
    proposed_size_usd: f64,
    max_per_city_exposure_usd: f64,
) -> RiskCheckResult {
    let new_total = city_exposure_usd + proposed_size_usd;
    if new_total > max_per_city_exposure_usd {
        RiskCheckResult::block(
            "per_city_exposure",
            BlockReason::PerCityExposure,
            format!("${new_total:.2} > limit ${max_per_city_exposure_usd:.2}"),
        )
    } else {
        RiskCheckResult::pass("per_city_exposure")
    }
}

pub fn daily_loss(daily_loss_usd: f64, max_daily_loss_usd: f64) -> RiskCheckResult {
    if daily_loss_usd > max_daily_loss_usd {
        RiskCheckResult::block(
            "daily_loss",
            BlockReason::DailyLoss,
            format!("${daily_loss_usd:.2} > limit ${max_daily_loss_usd:.2}"),
        )
    } else {
        RiskCheckResult::pass("daily_loss")
    }
}

/// `minutes_since_last_trade` is `None` when the market was never
/// traded, which passes.
pub fn cooldown(minutes_since_last_trade: Option<f64>, cooldown_minutes: u32) -> RiskCheckResult {
    match minutes_since_last_trade {
        Some(minutes) if minutes < f64::from(cooldown_minutes) => RiskCheckResult::block(
            "cooldown",
            BlockReason::Cooldown,
            format!("{minutes:.1}min < {cooldown_minutes}min cooldown"),
        ),
        _ => RiskCheckResult::pass("cooldown"),
    }
}

pub fn time_to_resolution(hours_to_resolution: f64, min_hours: f64) -> RiskCheckResult {
    if hours_to_resolution < min_hours {
        RiskCheckResult::block(
            "time_to_resolution",
            BlockReason::TimeToResolution,
            format!("{hours_to_resolution:.1}h < {min_hours:.1}h minimum"),
        )
    } else {
        RiskCheckResult::pass("time_to_resolution")
    }
}

/// A non-positive best bid fails outright; the spread is undefined.
pub fn slippage(best_bid: f64, best_ask: f64, slippage_ceiling: f64) -> RiskCheckResult {
    if best_bid <= 0.0 {
        return RiskCheckResult::block(
            "slippage",
            BlockReason::Slippage,
            "Best bid is zero or negative".to_string(),
        );
    }
    let spread = (best_ask - best_bid) / best_bid;
    if spread > slippage_ceiling {
        RiskCheckResult::block(
            "slippage",
            BlockReason::Slippage,
            format!("Spread {spread:.4} > ceiling {slippage_ceiling:.4}"),
        )
    } else {
        RiskCheckResult::pass("slippage")
    }
}
