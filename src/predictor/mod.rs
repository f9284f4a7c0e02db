//! Window-open direction prediction
//!
//! Separate from the oracle-gap path: the predictor looks only at how a
//! window opens and guesses where it resolves, for paper evaluation of
//! early-entry strategies.

mod features;

pub use features::WindowFeatures;

use crate::edge::Direction;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// A directional call with a confidence score in `[0.5, 0.95]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub direction: Direction,
    pub confidence: Decimal,
}

/// Turns window features into a directional call
pub trait Predictor: Send + Sync {
    fn predict(&self, features: &WindowFeatures) -> Prediction;
}

/// Momentum baseline
///
/// Direction follows the sign of the opening move; confidence grows with
/// the size of the move and gets a small bump when the candle colors
/// agree with it. A fitted classifier drops in behind the same trait.
pub struct MomentumPredictor;

const BASE_CONFIDENCE: Decimal = dec!(0.50);
const MOVE_WEIGHT: Decimal = dec!(25);
const AGREEMENT_BONUS: Decimal = dec!(0.05);
const MAX_CONFIDENCE: Decimal = dec!(0.95);

impl Predictor for MomentumPredictor {
    fn predict(&self, features: &WindowFeatures) -> Prediction {
        let direction = if features.price_change >= Decimal::ZERO {
            Direction::Up
        } else {
            Direction::Down
        };

        let mut confidence = BASE_CONFIDENCE + features.price_change.abs() * MOVE_WEIGHT;

        let green = Decimal::from_u32(features.green_candles).unwrap_or_default();
        let candles_agree = match direction {
            Direction::Up => green >= dec!(2),
            Direction::Down => green.is_zero(),
        };
        if candles_agree {
            confidence += AGREEMENT_BONUS;
        }

        Prediction {
            direction,
            confidence: confidence.min(MAX_CONFIDENCE),
        }
    }
}
