//! Signal generator: probability + edge computation across events.

use std::collections::HashMap;

use chrono::Utc;
use tracing::{info, warn};

use crate::config::Config;
use crate::domain::forecast::ForecastPoint;
use crate::domain::market::MarketEvent;
use crate::domain::signal::{EdgeResult, ReasonCode, Signal};
use crate::error::Result;
use crate::ingest::scanner::SkippedMarket;
use crate::ingest::staleness::{is_forecast_stale, is_market_data_stale};
use crate::signal::calibration::compute_sigma;
use crate::signal::edge::{compute_edge, EdgeInputs};
use crate::signal::probability::bucket_probability;

/// Tolerance for the per-event probability-sum coherence check.
const PROBABILITY_SUM_EPSILON: f64 = 0.01;

pub struct SignalGenerator<'a> {
    config: &'a Config,
    run_id: String,
}

impl<'a> SignalGenerator<'a> {
    #[must_use]
    pub fn new(config: &'a Config, run_id: impl Into<String>) -> Self {
        Self {
            config,
            run_id: run_id.into(),
        }
    }

    /// Generate edge results for every bucket market across events,
    /// sorted by net edge descending.
    ///
    /// Events without a matched forecast produce a
    /// `NO_FORECAST_AVAILABLE` result per bucket rather than an error.
    pub fn generate(
        &self,
        events: &[MarketEvent],
        forecasts: &HashMap<(String, String), ForecastPoint>,
    ) -> Result<Vec<EdgeResult>> {
        let mut results = Vec::new();

        for event in events {
            let key = (event.city_slug.clone(), event.target_date.clone());
            let Some(forecast) = forecasts.get(&key) else {
                for bm in &event.buckets {
                    results.push(self.flat_result(event, bm, ReasonCode::NoForecastAvailable));
                }
                continue;
            };

            // Inputs past their freshness window are no better than
            // missing ones.
            if is_forecast_stale(
                &forecast.source_generated_at,
                self.config.ops.forecast_max_age_minutes,
                Utc::now(),
            ) {
                for bm in &event.buckets {
                    results.push(self.flat_result(event, bm, ReasonCode::StaleForecastData));
                }
                continue;
            }
            if is_market_data_stale(
                &event.fetched_at,
                self.config.ops.market_data_max_age_minutes,
                Utc::now(),
            ) {
                for bm in &event.buckets {
                    results.push(self.flat_result(event, bm, ReasonCode::StaleMarketData));
                }
                continue;
            }

            let mu = f64::from(forecast.high_temp_f);
            let sigma = compute_sigma(
                &event.target_date,
                Utc::now(),
                self.config.strategy.uncertainty_base_f,
                self.config.strategy.uncertainty_per_day_f,
            );

            let mut probability_sum = 0.0;
            for bm in &event.buckets {
                let prob = bucket_probability(&bm.bucket, mu, sigma)?;
                probability_sum += prob;
                results.push(compute_edge(
                    EdgeInputs {
                        run_id: &self.run_id,
                        event_id: &event.event_id,
                        market_id: &bm.market_id,
                        city_slug: &event.city_slug,
                        target_date: &event.target_date,
                        bucket_label: &bm.group_item_title,
                        bucket_probability: prob,
                        market_price_yes: bm.outcome_price_yes,
                        fee_estimate: self.config.strategy.fee_estimate,
                        slippage_estimate: self.config.strategy.slippage_estimate,
                        sigma_used: sigma,
                        accepting_orders: bm.accepting_orders,
                        liquidity: bm.liquidity,
                    },
                    self.config.strategy.min_edge_threshold,
                    self.config.strategy.max_entry_price,
                ));
            }

            // Coherence check: an event whose buckets partition the
            // line should sum to ~1. Drift beyond the continuity-seam
            // tolerance is informational, never a block.
            let drift = (probability_sum - 1.0).abs();
            if drift >= PROBABILITY_SUM_EPSILON {
                info!(
                    event = %event.slug,
                    sum = probability_sum,
                    "bucket probabilities do not sum to 1"
                );
            }
        }

        results.sort_by(|a, b| {
            b.net_edge
                .partial_cmp(&a.net_edge)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        Ok(results)
    }

    /// Keep only the opportunities.
    #[must_use]
    pub fn filter_opportunities(results: &[EdgeResult]) -> Vec<EdgeResult> {
        results
            .iter()
            .filter(|r| r.reason_code == ReasonCode::Opportunity)
            .cloned()
            .collect()
    }

    /// Promote opportunities to sized, executable signals.
    ///
    /// Sizing is the constant `max_position_size_usd`; fractional
    /// (Kelly-style) sizing is deliberately not done here.
    #[must_use]
    pub fn to_signals(
        &self,
        opportunities: &[EdgeResult],
        events: &[MarketEvent],
    ) -> Vec<Signal> {
        let mut token_map: HashMap<&str, &str> = HashMap::new();
        for event in events {
            for bm in &event.buckets {
                token_map.insert(&bm.market_id, &bm.clob_token_id_yes);
            }
        }

        opportunities
            .iter()
            .filter_map(|opp| {
                let Some(token) = token_map.get(opp.market_id.as_str()) else {
                    warn!(market_id = %opp.market_id, "opportunity has no market entry");
                    return None;
                };
                Some(Signal {
                    edge_result: opp.clone(),
                    market_id: opp.market_id.clone(),
                    clob_token_id_yes: (*token).to_string(),
                    proposed_size_usd: self.config.risk.max_position_size_usd,
                })
            })
            .collect()
    }

    /// Edge row recorded for a bucket that never reached the model
    /// (missing or stale inputs, unparseable bucket).
    fn flat_result(
        &self,
        event: &MarketEvent,
        bm: &crate::domain::market::BucketMarket,
        reason_code: ReasonCode,
    ) -> EdgeResult {
        EdgeResult {
            run_id: self.run_id.clone(),
            event_id: event.event_id.clone(),
            market_id: bm.market_id.clone(),
            city_slug: event.city_slug.clone(),
            target_date: event.target_date.clone(),
            bucket_label: bm.group_item_title.clone(),
            bucket_probability: 0.0,
            market_price_yes: bm.outcome_price_yes,
            gross_edge: 0.0,
            fee_estimate: 0.0,
            slippage_estimate: 0.0,
            net_edge: 0.0,
            reason_code,
            sigma_used: 0.0,
        }
    }

    /// Edge row for a market whose bucket suffix failed to parse.
    #[must_use]
    pub fn parse_failure_result(&self, skipped: &SkippedMarket) -> EdgeResult {
        EdgeResult {
            run_id: self.run_id.clone(),
            event_id: skipped.event_id.clone(),
            market_id: skipped.market_id.clone(),
            city_slug: skipped.city_slug.clone(),
            target_date: skipped.target_date.clone(),
            bucket_label: skipped.bucket_label.clone(),
            bucket_probability: 0.0,
            market_price_yes: skipped.outcome_price_yes,
            gross_edge: 0.0,
            fee_estimate: 0.0,
            slippage_estimate: 0.0,
            net_edge: 0.0,
            reason_code: ReasonCode::BucketParseError,
            sigma_used: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::bucket::{TemperatureBucket, TemperatureUnit};
    use crate::domain::market::BucketMarket;

    fn bucket_market(id: &str, bucket: TemperatureBucket, price: f64) -> BucketMarket {
        BucketMarket {
            market_id: id.to_string(),
            condition_id: format!("c-{id}"),
            clob_token_id_yes: format!("{id}-yes"),
            clob_token_id_no: format!("{id}-no"),
            outcome_price_yes: price,
            best_bid: price - 0.005,
            best_ask: price + 0.005,
            last_trade_price: price,
            liquidity: 1000.0,
            volume_24hr: 500.0,
            maker_base_fee: 0.0,
            taker_base_fee: 0.0,
            order_min_size: 1.0,
            accepting_orders: true,
            end_date: "2026-02-12T00:00:00Z".to_string(),
            group_item_title: id.to_string(),
            group_item_threshold: String::new(),
            bucket,
        }
    }

    fn event(city: &str, date: &str, buckets: Vec<BucketMarket>) -> MarketEvent {
        MarketEvent {
            event_id: "ev1".to_string(),
            slug: format!("highest-temperature-in-{city}-on-{date}"),
            city_slug: city.to_string(),
            target_date: date.to_string(),
            title: "Highest temperature".to_string(),
            fetched_at: Utc::now().to_rfc3339(),
            buckets,
        }
    }

    fn forecast(city: &str, date: &str, high: i32) -> ForecastPoint {
        ForecastPoint {
            city_slug: city.to_string(),
            target_date: date.to_string(),
            high_temp_f: high,
            source_generated_at: Utc::now().to_rfc3339(),
            fetched_at: Utc::now().to_rfc3339(),
            raw_periods: vec![],
        }
    }

    const F: TemperatureUnit = TemperatureUnit::Fahrenheit;

    #[test]
    fn missing_forecast_yields_no_forecast_results() {
        let config = Config::default();
        let generator = SignalGenerator::new(&config, "run");
        let events = vec![event(
            "nyc",
            "2026-02-11",
            vec![
                bucket_market("m1", TemperatureBucket::range(36, 37, F), 0.075),
                bucket_market("m2", TemperatureBucket::or_higher(44, F), 0.02),
            ],
        )];
        let results = generator.generate(&events, &HashMap::new()).unwrap();
        assert_eq!(results.len(), 2);
        assert!(results
            .iter()
            .all(|r| r.reason_code == ReasonCode::NoForecastAvailable));
    }

    #[test]
    fn stale_forecast_yields_stale_results() {
        let config = Config::default();
        let generator = SignalGenerator::new(&config, "run");
        let events = vec![event(
            "nyc",
            "2026-02-11",
            vec![bucket_market(
                "m1",
                TemperatureBucket::range(36, 37, F),
                0.075,
            )],
        )];
        let mut stale = forecast("nyc", "2026-02-11", 38);
        stale.source_generated_at = "2020-01-01T00:00:00Z".to_string();
        let mut forecasts = HashMap::new();
        forecasts.insert(("nyc".to_string(), "2026-02-11".to_string()), stale);

        let results = generator.generate(&events, &forecasts).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].reason_code, ReasonCode::StaleForecastData);
    }

    #[test]
    fn results_are_sorted_by_net_edge_descending() {
        let config = Config::default();
        let generator = SignalGenerator::new(&config, "run");
        let events = vec![event(
            "nyc",
            "2026-02-11",
            vec![
                bucket_market("far", TemperatureBucket::or_higher(60, F), 0.10),
                bucket_market("near", TemperatureBucket::range(36, 37, F), 0.075),
            ],
        )];
        let mut forecasts = HashMap::new();
        forecasts.insert(
            ("nyc".to_string(), "2026-02-11".to_string()),
            forecast("nyc", "2026-02-11", 38),
        );
        let results = generator.generate(&events, &forecasts).unwrap();
        assert_eq!(results.len(), 2);
        assert!(results[0].net_edge >= results[1].net_edge);
        assert_eq!(results[0].market_id, "near");
    }

    #[test]
    fn opportunities_promote_with_constant_size() {
        let config = Config::default();
        let generator = SignalGenerator::new(&config, "run");
        let events = vec![event(
            "nyc",
            "2026-02-11",
            vec![bucket_market(
                "m1",
                TemperatureBucket::range(36, 37, F),
                0.075,
            )],
        )];
        let mut forecasts = HashMap::new();
        forecasts.insert(
            ("nyc".to_string(), "2026-02-11".to_string()),
            forecast("nyc", "2026-02-11", 38),
        );
        let results = generator.generate(&events, &forecasts).unwrap();
        let opportunities = SignalGenerator::filter_opportunities(&results);
        let signals = generator.to_signals(&opportunities, &events);

        // Sigma clamps to base for past targets, so prob ~0.26
        // clears the default 0.05 net-edge threshold at price 0.075.
        assert_eq!(signals.len(), 1);
        assert!(
            (signals[0].proposed_size_usd - config.risk.max_position_size_usd).abs()
                < f64::EPSILON
        );
        assert_eq!(signals[0].clob_token_id_yes, "m1-yes");
    }
}
