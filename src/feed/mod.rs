//! Price feeds
//!
//! Two independently-latent sources feed the edge detector:
//! - reference: exchange REST price, effectively real-time
//! - oracle: Chainlink aggregator round data, tens of seconds behind
//!
//! Every fetch fails soft: the caller gets an explicit error variant, never
//! a stale price silently reused across ticks.

mod binance;
mod chainlink;
mod sampler;

pub use binance::{BinanceClient, Candle};
pub use chainlink::ChainlinkClient;
pub use sampler::{DualFeedSampler, FeedSample};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single price observation from one feed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceObservation {
    /// Observed price, always positive
    pub price: Decimal,
    /// When the source produced this price. For the reference feed this is
    /// the fetch instant; for the oracle it is the round's updatedAt.
    pub observed_at: DateTime<Utc>,
}

impl PriceObservation {
    /// Age of the observation at `now`, clamped to zero for skewed clocks
    pub fn staleness_secs(&self, now: DateTime<Utc>) -> i64 {
        (now - self.observed_at).num_seconds().max(0)
    }
}

/// Why a feed fetch produced no observation
#[derive(Debug, Error)]
pub enum FeedError {
    /// Request exceeded its deadline
    #[error("request timed out")]
    Timeout,

    /// Transport or HTTP-level failure
    #[error("http error: {0}")]
    Http(String),

    /// Response arrived but could not be decoded
    #[error("malformed payload: {0}")]
    Malformed(String),

    /// Oracle call returned fewer bytes than the encoded tuple requires
    #[error("payload too short: {0} chars")]
    ShortPayload(usize),
}

impl From<reqwest::Error> for FeedError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FeedError::Timeout
        } else {
            FeedError::Http(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    #[test]
    fn test_staleness_positive() {
        let observed = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let obs = PriceObservation {
            price: dec!(50000),
            observed_at: observed,
        };

        let now = observed + chrono::Duration::seconds(52);
        assert_eq!(obs.staleness_secs(now), 52);
    }

    #[test]
    fn test_staleness_clamped_at_zero() {
        let observed = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let obs = PriceObservation {
            price: dec!(50000),
            observed_at: observed,
        };

        // Source clock slightly ahead of ours
        let now = observed - chrono::Duration::seconds(3);
        assert_eq!(obs.staleness_secs(now), 0);
    }

    #[test]
    fn test_feed_error_display() {
        assert_eq!(FeedError::Timeout.to_string(), "request timed out");
        assert_eq!(
            FeedError::ShortPayload(66).to_string(),
            "payload too short: 66 chars"
        );
    }
}
