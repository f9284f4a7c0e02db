//! Monitor command implementation
//!
//! Observes both feeds side by side without trading: gap, staleness, and
//! oracle round updates, with an alert line whenever the gap crosses the
//! watch threshold.

use crate::config::Config;
use crate::feed::{BinanceClient, ChainlinkClient, DualFeedSampler, PriceObservation};
use crate::window::WindowClock;
use clap::Args;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::time::Duration;

#[derive(Args, Debug)]
pub struct MonitorArgs {
    /// Polling interval in seconds
    #[arg(short, long, default_value_t = 5)]
    pub interval: u64,

    /// Alert when the absolute gap exceeds this fraction
    #[arg(long, default_value = "0.003")]
    pub alert_gap: Decimal,
}

impl MonitorArgs {
    pub async fn execute(&self, config: Config) -> anyhow::Result<()> {
        let reference = BinanceClient::new(config.reference_feed.clone())?;
        let oracle = ChainlinkClient::new(config.oracle_feed.clone())?;
        let sampler = DualFeedSampler::new(reference, oracle);
        let clock = WindowClock::new(&config.window);

        tracing::info!(
            interval_secs = self.interval,
            alert_gap = %self.alert_gap,
            "monitor started"
        );

        let mut ticker = tokio::time::interval(Duration::from_secs(self.interval));
        let mut last_round: Option<PriceObservation> = None;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let sample = sampler.sample().await;
                    let window = clock.at(sample.sampled_at);

                    if let (Some(reference), Some(oracle)) = (sample.reference, sample.oracle) {
                        let gap_pct = (reference.price - oracle.price) / oracle.price;

                        tracing::info!(
                            window_id = window.window_id,
                            elapsed = window.elapsed,
                            reference = %reference.price,
                            oracle = %oracle.price,
                            gap_pct = %(gap_pct * dec!(100)).round_dp(4),
                            staleness_secs = sample.oracle_staleness_secs,
                            "feeds"
                        );

                        if gap_pct.abs() > self.alert_gap {
                            tracing::warn!(
                                gap_pct = %(gap_pct * dec!(100)).round_dp(4),
                                "ALERT: gap above watch threshold"
                            );
                        }

                        if let Some(prev) = last_round {
                            if oracle.observed_at > prev.observed_at {
                                tracing::info!(
                                    price = %oracle.price,
                                    previous = %prev.price,
                                    "oracle round updated"
                                );
                            }
                        }
                        last_round = Some(oracle);
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("monitor stopped");
                    return Ok(());
                }
            }
        }
    }
}
