//! Predict command implementation
//!
//! Paper-runs the window-open predictor: each check pulls the first 1m
//! candles of the current window, extracts features, and logs any signal
//! that clears the confidence floor. Nothing is traded.

use crate::config::Config;
use crate::data::{PredictionLog, PredictionRecord};
use crate::feed::BinanceClient;
use crate::predictor::{MomentumPredictor, Predictor, WindowFeatures};
use chrono::Utc;
use clap::Args;
use std::time::Duration;

#[derive(Args, Debug)]
pub struct PredictArgs {
    /// Override the polling cadence in seconds
    #[arg(short, long)]
    pub interval: Option<u64>,
}

impl PredictArgs {
    pub async fn execute(&self, config: Config) -> anyhow::Result<()> {
        let client = BinanceClient::new(config.reference_feed.clone())?;
        let predictor = MomentumPredictor;
        let mut log = PredictionLog::new();

        let interval_secs = self.interval.unwrap_or(config.predictor.check_interval_secs);
        let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));

        tracing::info!(
            interval_secs,
            min_confidence = %config.predictor.min_confidence,
            "predictor started"
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    check(&client, &predictor, &config, &mut log).await;
                }
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("predictor stopped");
                    break;
                }
            }
        }

        let filename = format!("predictions_{}.csv", Utc::now().format("%Y%m%d_%H%M%S"));
        let path = config.data.output_dir.join(filename);
        match log.write_csv(&path) {
            Ok(()) => tracing::info!(
                path = %path.display(),
                predictions = log.len(),
                "prediction log written"
            ),
            Err(err) => tracing::error!(
                path = %path.display(),
                error = %err,
                "failed to write prediction log"
            ),
        }

        Ok(())
    }
}

async fn check(
    client: &BinanceClient,
    predictor: &dyn Predictor,
    config: &Config,
    log: &mut PredictionLog,
) {
    let candles = match client.recent_klines(2).await {
        Ok(candles) => candles,
        Err(err) => {
            tracing::warn!(error = %err, "kline fetch failed, skipping check");
            return;
        }
    };

    let features = match WindowFeatures::from_candles(&candles) {
        Some(features) => features,
        None => {
            tracing::debug!(candles = candles.len(), "not enough candles for features");
            return;
        }
    };

    let prediction = predictor.predict(&features);

    if prediction.confidence < config.predictor.min_confidence {
        tracing::debug!(
            direction = %prediction.direction,
            confidence = %prediction.confidence,
            "prediction below confidence floor"
        );
        return;
    }

    tracing::info!(
        direction = %prediction.direction,
        confidence = %prediction.confidence,
        price = %features.current_price,
        price_change = %features.price_change,
        "prediction"
    );

    log.push(PredictionRecord {
        time: Utc::now(),
        direction: prediction.direction,
        confidence: prediction.confidence,
        price: features.current_price,
    });
}
