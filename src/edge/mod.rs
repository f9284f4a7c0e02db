//! Edge detection
//!
//! Turns a pair of feed observations into a directional signal with a
//! confidence score, gated on oracle staleness. The oracle's lag is the
//! entire edge: a gap against a fresh oracle is noise, not arbitrage.

mod evaluator;

pub use evaluator::EdgeEvaluator;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Predicted window resolution direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Up,
    Down,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Up => write!(f, "UP"),
            Direction::Down => write!(f, "DOWN"),
        }
    }
}

impl std::str::FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "UP" => Ok(Direction::Up),
            "DOWN" => Ok(Direction::Down),
            other => Err(format!("unknown direction {:?}", other)),
        }
    }
}

/// An actionable signal derived from one tick's feed sample
///
/// Recomputed fresh every tick from the two most recent observations;
/// never persisted or carried across ticks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeSignal {
    /// Which way the reference has moved relative to the oracle
    pub direction: Direction,
    /// Signed relative gap: (reference - oracle) / oracle
    pub gap_pct: Decimal,
    /// Saturating linear confidence, capped at the configured ceiling
    pub confidence: Decimal,
    /// Oracle age at sample time
    pub oracle_staleness_secs: i64,
}

/// Why no directional signal was produced this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoEdgeReason {
    /// One or both observations absent; no directional claim without both
    FeedUnavailable,
    /// Oracle updated too recently for the delay assumption to hold
    OracleTooFresh,
    /// Gap below the minimum actionable threshold
    GapTooSmall,
}

impl std::fmt::Display for NoEdgeReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NoEdgeReason::FeedUnavailable => write!(f, "feed observation unavailable"),
            NoEdgeReason::OracleTooFresh => write!(f, "oracle too fresh"),
            NoEdgeReason::GapTooSmall => write!(f, "gap below threshold"),
        }
    }
}
