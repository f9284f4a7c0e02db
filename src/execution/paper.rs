//! Paper trading sink

use super::{ExecutionSink, TradeRequest};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};

/// Records decided trades without touching the venue
///
/// Every submission is accepted; the trade log and settlement path give
/// the paper session the same bookkeeping a live one would have.
pub struct PaperSink {
    submitted: AtomicU64,
}

impl PaperSink {
    pub fn new() -> Self {
        Self {
            submitted: AtomicU64::new(0),
        }
    }

    /// Number of trades accepted this session
    pub fn submitted_count(&self) -> u64 {
        self.submitted.load(Ordering::Relaxed)
    }
}

impl Default for PaperSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExecutionSink for PaperSink {
    async fn submit(&self, request: &TradeRequest) -> anyhow::Result<bool> {
        self.submitted.fetch_add(1, Ordering::Relaxed);
        tracing::info!(
            trade_id = %request.id,
            direction = %request.direction,
            size = %request.size,
            confidence = %request.confidence,
            price = %request.price,
            remaining_secs = request.remaining_secs,
            "paper trade submitted"
        );
        Ok(true)
    }
}
