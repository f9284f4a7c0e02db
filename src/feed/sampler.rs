//! Dual feed sampler
//!
//! One call per tick fetches both observations concurrently and joins them
//! before evaluation. A failed fetch degrades that feed to absent for this
//! tick only; retry cadence is the tick loop itself.

use super::{BinanceClient, ChainlinkClient, FeedError, PriceObservation};
use crate::telemetry::{record_latency, LatencyMetric};
use chrono::{DateTime, Utc};
use std::time::Instant;

/// Both observations for one tick, as sampled at `sampled_at`
#[derive(Debug, Clone, Copy)]
pub struct FeedSample {
    /// Real-time exchange price, absent on fetch failure
    pub reference: Option<PriceObservation>,
    /// Delayed oracle price, absent on fetch failure
    pub oracle: Option<PriceObservation>,
    /// Oracle age measured at sample time, not decode time
    pub oracle_staleness_secs: Option<i64>,
    /// The instant both fetches were joined
    pub sampled_at: DateTime<Utc>,
}

/// Samples the reference and oracle feeds together
pub struct DualFeedSampler {
    reference: BinanceClient,
    oracle: ChainlinkClient,
}

impl DualFeedSampler {
    pub fn new(reference: BinanceClient, oracle: ChainlinkClient) -> Self {
        Self { reference, oracle }
    }

    /// Fetch both feeds concurrently and join into one sample
    ///
    /// Never returns an error: each side fails soft to `None` and the cause
    /// is logged so "network timeout" and "malformed payload" stay
    /// distinguishable without changing control flow.
    pub async fn sample(&self) -> FeedSample {
        let started = Instant::now();
        let (reference, oracle) = tokio::join!(self.reference.spot_price(), self.oracle.latest_round());
        record_latency(LatencyMetric::FeedSample, started.elapsed());

        let sampled_at = Utc::now();

        let reference = log_absent("reference", reference);
        let oracle = log_absent("oracle", oracle);
        let oracle_staleness_secs = oracle.map(|obs| obs.staleness_secs(sampled_at));

        FeedSample {
            reference,
            oracle,
            oracle_staleness_secs,
            sampled_at,
        }
    }

    /// Fetch only the reference price (settlement checks)
    pub async fn reference_price(&self) -> Option<PriceObservation> {
        log_absent("reference", self.reference.spot_price().await)
    }
}

fn log_absent(feed: &str, result: Result<PriceObservation, FeedError>) -> Option<PriceObservation> {
    match result {
        Ok(obs) => Some(obs),
        Err(err) => {
            tracing::warn!(feed, error = %err, "feed fetch failed, observation absent");
            None
        }
    }
}
