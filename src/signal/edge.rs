//! Edge computation and reason resolution for a single bucket market.

use crate::domain::signal::{EdgeResult, ReasonCode};

/// Inputs that decide a bucket's reason code, beyond the edge itself.
#[derive(Debug, Clone, Copy)]
pub struct EdgeInputs<'a> {
    pub run_id: &'a str,
    pub event_id: &'a str,
    pub market_id: &'a str,
    pub city_slug: &'a str,
    pub target_date: &'a str,
    pub bucket_label: &'a str,
    pub bucket_probability: f64,
    pub market_price_yes: f64,
    pub fee_estimate: f64,
    pub slippage_estimate: f64,
    pub sigma_used: f64,
    pub accepting_orders: bool,
    pub liquidity: f64,
}

/// Compute gross/net edge and resolve the reason code.
///
/// Reasons are evaluated in a fixed order and the first trigger wins;
/// a bucket with none of them is an `OPPORTUNITY`.
#[must_use]
pub fn compute_edge(
    inputs: EdgeInputs<'_>,
    min_edge_threshold: f64,
    max_entry_price: f64,
) -> EdgeResult {
    let gross_edge = inputs.bucket_probability - inputs.market_price_yes;
    let net_edge = gross_edge - inputs.fee_estimate - inputs.slippage_estimate;

    let reason_code = if !inputs.accepting_orders {
        ReasonCode::NotAcceptingOrders
    } else if inputs.liquidity <= 0.0 {
        ReasonCode::ZeroLiquidity
    } else if inputs.market_price_yes > max_entry_price {
        ReasonCode::PriceAboveMaxEntry
    } else if net_edge < 0.0 {
        ReasonCode::NegativeEdge
    } else if net_edge < min_edge_threshold {
        ReasonCode::EdgeBelowThreshold
    } else {
        ReasonCode::Opportunity
    };

    EdgeResult {
        run_id: inputs.run_id.to_string(),
        event_id: inputs.event_id.to_string(),
        market_id: inputs.market_id.to_string(),
        city_slug: inputs.city_slug.to_string(),
        target_date: inputs.target_date.to_string(),
        bucket_label: inputs.bucket_label.to_string(),
        bucket_probability: inputs.bucket_probability,
        market_price_yes: inputs.market_price_yes,
        gross_edge,
        fee_estimate: inputs.fee_estimate,
        slippage_estimate: inputs.slippage_estimate,
        net_edge,
        reason_code,
        sigma_used: inputs.sigma_used,
    }
}
