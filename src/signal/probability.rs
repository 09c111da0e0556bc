//! Normal-CDF bucket probabilities with continuity correction.
//!
//! The realized daily high is modeled as the rounded draw from
//! `N(mu, sigma^2)`, so every bucket boundary gets a +-0.5 correction.

use statrs::distribution::{ContinuousCDF, Normal};

use crate::domain::bucket::{BucketKind, TemperatureBucket};
use crate::error::{Error, Result};

/// Probability that the realized temperature lands in `bucket`.
///
/// # Errors
/// `sigma <= 0` is a precondition violation and returns
/// [`Error::InvalidSigma`].
pub fn bucket_probability(bucket: &TemperatureBucket, mu: f64, sigma: f64) -> Result<f64> {
    if sigma <= 0.0 {
        return Err(Error::InvalidSigma(sigma));
    }
    // Normal::new only fails on a non-positive std dev, checked above.
    let normal = Normal::new(mu, sigma).map_err(|_| Error::InvalidSigma(sigma))?;

    let low = f64::from(bucket.low);
    let high = f64::from(bucket.high);

    let p = match bucket.kind {
        // P(low <= T <= high) = Phi(high + 0.5) - Phi(low - 0.5)
        BucketKind::Range => normal.cdf(high + 0.5) - normal.cdf(low - 0.5),
        // P(T == t) = Phi(t + 0.5) - Phi(t - 0.5)
        BucketKind::Exact => normal.cdf(low + 0.5) - normal.cdf(low - 0.5),
        // P(T >= t) = 1 - Phi(t - 0.5)
        BucketKind::OrHigher => 1.0 - normal.cdf(low - 0.5),
        // P(T <= t) = Phi(t + 0.5)
        BucketKind::OrBelow => normal.cdf(high + 0.5),
    };
    Ok(p.clamp(0.0, 1.0))
}
