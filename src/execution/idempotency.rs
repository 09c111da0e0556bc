//! Deterministic order fingerprints.
//!
//! The fingerprint anchors at-most-once submission: two producers
//! computing it over identical `(run, market, side, price)` inputs
//! must agree bit for bit, so the price is fixed to four decimals
//! before hashing.

use sha2::{Digest, Sha256};

use crate::domain::execution::Side;

/// First 32 hex chars of `sha256("{run}|{market}|{side}|{price:.4}")`.
#[must_use]
pub fn idempotency_key(run_id: &str, market_id: &str, side: Side, price: f64) -> String {
    let raw = format!("{run_id}|{market_id}|{}|{price:.4}", side.as_str());
    let digest = Sha256::digest(raw.as_bytes());
    hex::encode(digest)[..32].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_deterministic() {
        let a = idempotency_key("run1", "m1", Side::Buy, 0.075);
        let b = idempotency_key("run1", "m1", Side::Buy, 0.075);
        assert_eq!(a, b);
        assert_eq!(a.len(), 32);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn any_component_changes_the_key() {
        let base = idempotency_key("run1", "m1", Side::Buy, 0.075);
        assert_ne!(base, idempotency_key("run2", "m1", Side::Buy, 0.075));
        assert_ne!(base, idempotency_key("run1", "m2", Side::Buy, 0.075));
        assert_ne!(base, idempotency_key("run1", "m1", Side::Sell, 0.075));
        assert_ne!(base, idempotency_key("run1", "m1", Side::Buy, 0.0751));
    }

    #[test]
    fn price_is_fingerprinted_at_four_decimals() {
        // Differences below 4dp collapse to the same key.
        let a = idempotency_key("run1", "m1", Side::Buy, 0.07500004);
        let b = idempotency_key("run1", "m1", Side::Buy, 0.075);
        assert_eq!(a, b);
    }
}
