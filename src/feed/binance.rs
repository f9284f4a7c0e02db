//! Binance REST reference feed
//!
//! Serves two queries: the spot ticker used as the real-time reference price
//! on every engine tick, and 1-minute klines consumed by the predictor's
//! feature extraction.

use super::{FeedError, PriceObservation};
use crate::config::ReferenceFeedConfig;
use chrono::{DateTime, TimeZone, Utc};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;
use std::time::Duration;

/// Ticker response: `{"symbol": "BTCUSDT", "price": "50123.45"}`
#[derive(Debug, Deserialize)]
struct TickerResponse {
    price: String,
}

/// A 1-minute OHLCV candle
#[derive(Debug, Clone, PartialEq)]
pub struct Candle {
    pub open_time: DateTime<Utc>,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: Decimal,
}

/// REST client for the exchange reference feed
pub struct BinanceClient {
    config: ReferenceFeedConfig,
    client: Client,
}

impl BinanceClient {
    /// Create a new client with the configured timeout
    pub fn new(config: ReferenceFeedConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { config, client })
    }

    /// Fetch the current spot price
    ///
    /// The observation timestamp is the fetch instant: the ticker endpoint
    /// updates at sub-second cadence, so fetch latency is the only lag.
    pub async fn spot_price(&self) -> Result<PriceObservation, FeedError> {
        let url = format!("{}/api/v3/ticker/price", self.config.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("symbol", self.config.symbol.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FeedError::Http(format!("status {}", response.status())));
        }

        let ticker: TickerResponse = response
            .json()
            .await
            .map_err(|e| FeedError::Malformed(e.to_string()))?;

        let price = parse_price(&ticker.price)?;

        Ok(PriceObservation {
            price,
            observed_at: Utc::now(),
        })
    }

    /// Fetch the most recent 1-minute candles, oldest first
    pub async fn recent_klines(&self, limit: usize) -> Result<Vec<Candle>, FeedError> {
        let url = format!("{}/api/v3/klines", self.config.base_url);
        let limit_str = limit.to_string();

        let response = self
            .client
            .get(&url)
            .query(&[
                ("symbol", self.config.symbol.as_str()),
                ("interval", "1m"),
                ("limit", limit_str.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FeedError::Http(format!("status {}", response.status())));
        }

        let rows: Vec<serde_json::Value> = response
            .json()
            .await
            .map_err(|e| FeedError::Malformed(e.to_string()))?;

        rows.iter().map(parse_kline).collect()
    }
}

fn parse_price(raw: &str) -> Result<Decimal, FeedError> {
    let price =
        Decimal::from_str(raw).map_err(|_| FeedError::Malformed(format!("price {:?}", raw)))?;
    if price <= Decimal::ZERO {
        return Err(FeedError::Malformed(format!("non-positive price {}", price)));
    }
    Ok(price)
}

/// Decode one kline row: `[openTime, "open", "high", "low", "close", "volume", ...]`
fn parse_kline(row: &serde_json::Value) -> Result<Candle, FeedError> {
    let fields = row
        .as_array()
        .ok_or_else(|| FeedError::Malformed("kline row is not an array".to_string()))?;
    if fields.len() < 6 {
        return Err(FeedError::Malformed(format!(
            "kline row has {} fields",
            fields.len()
        )));
    }

    let open_ms = fields[0]
        .as_i64()
        .ok_or_else(|| FeedError::Malformed("kline open time".to_string()))?;
    let open_time = Utc
        .timestamp_millis_opt(open_ms)
        .single()
        .ok_or_else(|| FeedError::Malformed(format!("kline open time {}", open_ms)))?;

    let field = |idx: usize, name: &str| -> Result<Decimal, FeedError> {
        let raw = fields[idx]
            .as_str()
            .ok_or_else(|| FeedError::Malformed(format!("kline {} not a string", name)))?;
        Decimal::from_str(raw).map_err(|_| FeedError::Malformed(format!("kline {} {:?}", name, raw)))
    };

    Ok(Candle {
        open_time,
        open: field(1, "open")?,
        high: field(2, "high")?,
        low: field(3, "low")?,
        close: field(4, "close")?,
        volume: field(5, "volume")?,
    })
}
