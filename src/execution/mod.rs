//! Trade execution
//!
//! The engine talks to a sink behind a trait so paper and live execution
//! swap without touching the decision path. Paper mode records only; live
//! mode is an external venue integration that is not wired up.

mod paper;

pub use paper::PaperSink;

use crate::edge::Direction;
use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

/// A decided trade handed to the sink
#[derive(Debug, Clone, Copy)]
pub struct TradeRequest {
    /// Unique id carried through logs and fills
    pub id: Uuid,
    /// Predicted resolution direction
    pub direction: Direction,
    /// Stake in USD
    pub size: Decimal,
    /// Signal confidence at decision time
    pub confidence: Decimal,
    /// Reference price at decision time
    pub price: Decimal,
    /// Seconds left in the window when the decision was made
    pub remaining_secs: i64,
}

/// Destination for decided trades
#[async_trait]
pub trait ExecutionSink: Send + Sync {
    /// Submit a trade; `Ok(false)` means the venue declined it
    async fn submit(&self, request: &TradeRequest) -> anyhow::Result<bool>;
}

/// Live execution stub
///
/// Submitting against the real venue needs API credentials and an order
/// signing flow that lives outside this crate; until then every request
/// is declined loudly.
pub struct LiveSink;

#[async_trait]
impl ExecutionSink for LiveSink {
    async fn submit(&self, request: &TradeRequest) -> anyhow::Result<bool> {
        tracing::warn!(
            trade_id = %request.id,
            direction = %request.direction,
            "live execution not configured, declining trade"
        );
        Ok(false)
    }
}
