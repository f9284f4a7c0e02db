//! Session output
//!
//! Append-only CSV logs written at shutdown: one for admitted trades, one
//! for predictor paper signals. Records are never mutated after creation.

mod prediction_log;
mod trade_log;

pub use prediction_log::{PredictionLog, PredictionRecord};
pub use trade_log::{TradeLog, TradeRecord};
