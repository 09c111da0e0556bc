//! Forecast uncertainty calibration.
//!
//! Sigma grows linearly with days until resolution and is floored at
//! [`MIN_SIGMA`] to prevent overconfidence on same-day forecasts.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

/// Sigma floor in degrees F.
pub const MIN_SIGMA: f64 = 1.0;

/// Compute forecast uncertainty for a target date.
///
/// `days_out` is measured to the target date's end of day UTC and
/// clamped at zero for dates already past.
#[must_use]
pub fn compute_sigma(target_date: &str, now: DateTime<Utc>, base: f64, per_day: f64) -> f64 {
    let days_out = days_until_end_of_day(target_date, now);
    (base + days_out * per_day).max(MIN_SIGMA)
}

fn days_until_end_of_day(target_date: &str, now: DateTime<Utc>) -> f64 {
    let Ok(date) = NaiveDate::parse_from_str(target_date, "%Y-%m-%d") else {
        return 0.0;
    };
    let end_of_day = date
        .and_time(NaiveTime::from_hms_opt(23, 59, 59).unwrap_or_default())
        .and_utc();
    let seconds = (end_of_day - now).num_seconds();
    (seconds.max(0) as f64) / 86_400.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn same_day_uses_partial_day() {
        // Noon on the target day: ~0.5 days out.
        let sigma = compute_sigma("2026-02-11", at(2026, 2, 11, 12), 2.5, 0.5);
        assert!((sigma - 2.75).abs() < 0.01, "sigma = {sigma}");
    }

    #[test]
    fn grows_per_day_out() {
        let near = compute_sigma("2026-02-11", at(2026, 2, 11, 0), 2.5, 0.5);
        let far = compute_sigma("2026-02-16", at(2026, 2, 11, 0), 2.5, 0.5);
        assert!(far > near + 2.0, "near = {near}, far = {far}");
    }

    #[test]
    fn past_dates_clamp_to_base() {
        let sigma = compute_sigma("2026-02-01", at(2026, 2, 11, 0), 2.5, 0.5);
        assert!((sigma - 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn floored_at_min_sigma() {
        let sigma = compute_sigma("2026-02-01", at(2026, 2, 11, 0), 0.1, 0.0);
        assert!((sigma - MIN_SIGMA).abs() < f64::EPSILON);
    }

    #[test]
    fn unparseable_date_falls_back_to_base() {
        let sigma = compute_sigma("not-a-date", at(2026, 2, 11, 0), 2.5, 0.5);
        assert!((sigma - 2.5).abs() < f64::EPSILON);
    }
}
