//! Edge evaluator
//!
//! Decision order matters: both feeds must be present, then the oracle must
//! be stale enough, then the gap must clear the threshold. Staleness gates
//! actionability independently of gap size.

use super::{Direction, EdgeSignal, NoEdgeReason};
use crate::config::EdgeConfig;
use crate::feed::FeedSample;

/// Computes the directional signal from one tick's feed sample
pub struct EdgeEvaluator {
    config: EdgeConfig,
}

impl EdgeEvaluator {
    pub fn new(config: EdgeConfig) -> Self {
        Self { config }
    }

    /// Evaluate a feed sample into a signal or the reason there is none
    pub fn evaluate(&self, sample: &FeedSample) -> Result<EdgeSignal, NoEdgeReason> {
        let (reference, oracle) = match (sample.reference, sample.oracle) {
            (Some(r), Some(o)) => (r, o),
            _ => return Err(NoEdgeReason::FeedUnavailable),
        };

        let staleness = sample
            .oracle_staleness_secs
            .ok_or(NoEdgeReason::FeedUnavailable)?;

        // Below the floor, the oracle may already reflect the move and the
        // "resolution price is known" assumption does not hold.
        if staleness < self.config.min_staleness_secs {
            return Err(NoEdgeReason::OracleTooFresh);
        }

        let gap_pct = (reference.price - oracle.price) / oracle.price;

        if gap_pct.abs() < self.config.min_gap_pct {
            return Err(NoEdgeReason::GapTooSmall);
        }

        let direction = if gap_pct.is_sign_positive() {
            Direction::Up
        } else {
            Direction::Down
        };

        let confidence = (self.config.base_confidence
            + self.config.confidence_slope * gap_pct.abs())
        .min(self.config.max_confidence);

        Ok(EdgeSignal {
            direction,
            gap_pct,
            confidence,
            oracle_staleness_secs: staleness,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::PriceObservation;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn evaluator() -> EdgeEvaluator {
        EdgeEvaluator::new(EdgeConfig::default())
    }

    fn sample(
        reference: Option<Decimal>,
        oracle: Option<Decimal>,
        staleness: Option<i64>,
    ) -> FeedSample {
        let now = Utc::now();
        FeedSample {
            reference: reference.map(|price| PriceObservation {
                price,
                observed_at: now,
            }),
            oracle: oracle.map(|price| PriceObservation {
                price,
                observed_at: now,
            }),
            oracle_staleness_secs: staleness,
            sampled_at: now,
        }
    }

    #[test]
    fn test_up_signal_on_positive_gap() {
        // Reference 50000 vs oracle 49900 at 50s staleness: +0.2% gap
        let result = evaluator().evaluate(&sample(Some(dec!(50000)), Some(dec!(49900)), Some(50)));

        let signal = result.unwrap();
        assert_eq!(signal.direction, Direction::Up);
        assert!(signal.gap_pct > dec!(0.002) && signal.gap_pct < dec!(0.0021));
        assert!(signal.confidence > dec!(0.70));
        assert_eq!(signal.oracle_staleness_secs, 50);
    }

    #[test]
    fn test_down_signal_on_negative_gap() {
        let result = evaluator().evaluate(&sample(Some(dec!(49700)), Some(dec!(49900)), Some(50)));

        let signal = result.unwrap();
        assert_eq!(signal.direction, Direction::Down);
        assert!(signal.gap_pct < Decimal::ZERO);
    }

    #[test]
    fn test_absent_reference_yields_no_signal() {
        let result = evaluator().evaluate(&sample(None, Some(dec!(49900)), Some(50)));
        assert_eq!(result.unwrap_err(), NoEdgeReason::FeedUnavailable);
    }

    #[test]
    fn test_absent_oracle_yields_no_signal() {
        let result = evaluator().evaluate(&sample(Some(dec!(50000)), None, None));
        assert_eq!(result.unwrap_err(), NoEdgeReason::FeedUnavailable);
    }

    #[test]
    fn test_fresh_oracle_overrides_large_gap() {
        // 1% gap but only 20s staleness: staleness gate wins
        let result = evaluator().evaluate(&sample(Some(dec!(50400)), Some(dec!(49900)), Some(20)));
        assert_eq!(result.unwrap_err(), NoEdgeReason::OracleTooFresh);
    }

    #[test]
    fn test_identical_prices_yield_no_signal() {
        let result = evaluator().evaluate(&sample(Some(dec!(50000)), Some(dec!(50000)), Some(120)));
        assert_eq!(result.unwrap_err(), NoEdgeReason::GapTooSmall);
    }

    #[test]
    fn test_gap_just_below_threshold() {
        // 0.0999...% gap with default 0.1% threshold
        let result = evaluator().evaluate(&sample(Some(dec!(50049)), Some(dec!(50000)), Some(60)));
        assert_eq!(result.unwrap_err(), NoEdgeReason::GapTooSmall);
    }

    #[test]
    fn test_gap_at_threshold_is_actionable() {
        let result = evaluator().evaluate(&sample(Some(dec!(50050)), Some(dec!(50000)), Some(60)));
        assert!(result.is_ok());
    }

    #[test]
    fn test_staleness_exactly_at_floor() {
        let result = evaluator().evaluate(&sample(Some(dec!(50200)), Some(dec!(50000)), Some(45)));
        assert!(result.is_ok());
    }

    #[test]
    fn test_confidence_monotonic_in_gap() {
        let evaluator = evaluator();
        let mut last = Decimal::ZERO;
        for reference in [50060, 50150, 50300, 50600, 51200, 52400] {
            let signal = evaluator
                .evaluate(&sample(
                    Some(Decimal::from(reference)),
                    Some(dec!(50000)),
                    Some(60),
                ))
                .unwrap();
            assert!(signal.confidence >= last);
            last = signal.confidence;
        }
    }

    #[test]
    fn test_confidence_never_exceeds_ceiling() {
        // 20% gap would put the linear curve far above the cap
        let signal = evaluator()
            .evaluate(&sample(Some(dec!(60000)), Some(dec!(50000)), Some(60)))
            .unwrap();
        assert_eq!(signal.confidence, dec!(0.95));
    }
}
