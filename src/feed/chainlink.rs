//! Chainlink oracle feed
//!
//! Reads the BTC/USD aggregator's `latestRoundData()` through a plain
//! `eth_call`, then extracts the answer and its update timestamp from the
//! hex-encoded return tuple. This price is what the market resolves
//! against, and its lag behind the exchange is the entire edge.

use super::{FeedError, PriceObservation};
use crate::config::OracleFeedConfig;
use chrono::{TimeZone, Utc};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

/// Function selector for `latestRoundData()`
const LATEST_ROUND_DATA_SELECTOR: &str = "0xfeaf968c";

/// The aggregator answer carries 8 implied decimal places
const ANSWER_DECIMALS: u32 = 8;

/// Return tuple layout: (roundId, answer, startedAt, updatedAt, answeredInRound),
/// each field 32 bytes (64 hex chars) after the 0x prefix.
const ANSWER_RANGE: std::ops::Range<usize> = 66..130;
const UPDATED_AT_RANGE: std::ops::Range<usize> = 194..258;
const MIN_PAYLOAD_CHARS: usize = 258;

#[derive(Debug, Deserialize)]
struct RpcResponse {
    result: Option<String>,
    error: Option<serde_json::Value>,
}

/// JSON-RPC client for the Chainlink aggregator
pub struct ChainlinkClient {
    config: OracleFeedConfig,
    client: Client,
}

impl ChainlinkClient {
    /// Create a new client with the configured timeout
    pub fn new(config: OracleFeedConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { config, client })
    }

    /// Fetch the latest oracle round
    ///
    /// The observation timestamp is the round's on-chain updatedAt, not the
    /// fetch instant; staleness is measured by the caller at sample time.
    pub async fn latest_round(&self) -> Result<PriceObservation, FeedError> {
        let payload = json!({
            "jsonrpc": "2.0",
            "method": "eth_call",
            "params": [
                {
                    "to": self.config.contract,
                    "data": LATEST_ROUND_DATA_SELECTOR,
                },
                "latest"
            ],
            "id": 1
        });

        let response = self
            .client
            .post(&self.config.rpc_url)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FeedError::Http(format!("status {}", response.status())));
        }

        let rpc: RpcResponse = response
            .json()
            .await
            .map_err(|e| FeedError::Malformed(e.to_string()))?;

        if let Some(err) = rpc.error {
            return Err(FeedError::Http(format!("rpc error: {}", err)));
        }

        let raw = rpc
            .result
            .ok_or_else(|| FeedError::Malformed("missing result field".to_string()))?;

        decode_round_data(&raw)
    }
}

/// Decode the hex return tuple of `latestRoundData()`
///
/// A payload shorter than the encoded tuple, a non-positive answer, or a
/// timestamp that does not fit a Unix epoch all count as malformed; the
/// caller degrades to an absent observation, never a default price.
fn decode_round_data(raw: &str) -> Result<PriceObservation, FeedError> {
    if raw.len() < MIN_PAYLOAD_CHARS {
        return Err(FeedError::ShortPayload(raw.len()));
    }

    // Checked slicing: the ranges are byte offsets, so a payload smuggling
    // multi-byte characters past the length gate must fail here, not panic.
    let answer_hex = raw
        .get(ANSWER_RANGE)
        .ok_or_else(|| FeedError::Malformed("answer field not hex".to_string()))?;
    let answer = i128::from_str_radix(answer_hex, 16)
        .map_err(|_| FeedError::Malformed("answer field".to_string()))?;
    if answer <= 0 {
        return Err(FeedError::Malformed(format!("non-positive answer {}", answer)));
    }

    let price = Decimal::try_from_i128_with_scale(answer, ANSWER_DECIMALS)
        .map_err(|_| FeedError::Malformed("answer out of range".to_string()))?;

    let updated_hex = raw
        .get(UPDATED_AT_RANGE)
        .ok_or_else(|| FeedError::Malformed("updatedAt field not hex".to_string()))?;
    let updated_at = i64::from_str_radix(updated_hex, 16)
        .map_err(|_| FeedError::Malformed("updatedAt field".to_string()))?;
    let observed_at = Utc
        .timestamp_opt(updated_at, 0)
        .single()
        .ok_or_else(|| FeedError::Malformed(format!("updatedAt {}", updated_at)))?;

    Ok(PriceObservation { price, observed_at })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    /// Build a full 5-field return payload from an answer and timestamps
    fn encode_round(answer: u128, started_at: u64, updated_at: u64) -> String {
        format!(
            "0x{:064x}{:064x}{:064x}{:064x}{:064x}",
            0x1234u64, answer, started_at, updated_at, 0x1234u64
        )
    }

    #[test]
    fn test_decode_valid_round() {
        // 49900.00 USD with 8 implied decimals
        let raw = encode_round(4_990_000_000_000, 1_717_243_000, 1_717_243_140);

        let obs = decode_round_data(&raw).unwrap();
        assert_eq!(obs.price, dec!(49900));
        assert_eq!(obs.observed_at.timestamp(), 1_717_243_140);
    }

    #[test]
    fn test_decode_preserves_fractional_price() {
        // 50123.45678901
        let raw = encode_round(5_012_345_678_901, 1_717_243_000, 1_717_243_140);

        let obs = decode_round_data(&raw).unwrap();
        assert_eq!(obs.price, dec!(50123.45678901));
    }

    #[test]
    fn test_decode_short_payload() {
        let err = decode_round_data("0x1234").unwrap_err();
        assert!(matches!(err, FeedError::ShortPayload(6)));
    }

    #[test]
    fn test_decode_empty_result() {
        let err = decode_round_data("0x").unwrap_err();
        assert!(matches!(err, FeedError::ShortPayload(2)));
    }

    #[test]
    fn test_decode_zero_answer() {
        let raw = encode_round(0, 1_717_243_000, 1_717_243_140);
        assert!(matches!(
            decode_round_data(&raw).unwrap_err(),
            FeedError::Malformed(_)
        ));
    }

    #[test]
    fn test_decode_negative_answer_rejected() {
        // Two's-complement negative answer overflows the unsigned parse
        let raw = format!(
            "0x{:064x}{}{:064x}{:064x}{:064x}",
            1u64,
            "f".repeat(64),
            1_717_243_000u64,
            1_717_243_140u64,
            1u64
        );
        assert!(matches!(
            decode_round_data(&raw).unwrap_err(),
            FeedError::Malformed(_)
        ));
    }

    #[test]
    fn test_decode_multibyte_payload_rejected() {
        // Long enough in bytes to pass the length gate, but the field
        // offsets land mid-character; must degrade, never panic
        let raw = format!("0xa{}", "é".repeat(130));
        assert!(raw.len() >= MIN_PAYLOAD_CHARS);
        assert!(matches!(
            decode_round_data(&raw).unwrap_err(),
            FeedError::Malformed(_)
        ));
    }

    #[test]
    fn test_decode_multibyte_in_timestamp_field() {
        // Valid hex through the answer field, multi-byte bytes only in the
        // updatedAt region
        let head = format!("0x{:064x}{:064x}{:064x}", 1u64, 4_990_000_000_000u128, 1u64);
        let raw = format!("{}{}", head, "é".repeat(40));
        assert!(raw.len() >= MIN_PAYLOAD_CHARS);
        assert!(matches!(
            decode_round_data(&raw).unwrap_err(),
            FeedError::Malformed(_)
        ));
    }

    #[test]
    fn test_decode_non_hex_garbage() {
        let raw = format!("0x{}", "zz".repeat(160));
        assert!(matches!(
            decode_round_data(&raw).unwrap_err(),
            FeedError::Malformed(_)
        ));
    }

    #[test]
    fn test_updated_at_is_fourth_field() {
        // startedAt and updatedAt differ; decoding must take the fourth field
        let raw = encode_round(4_990_000_000_000, 1_717_243_000, 1_717_243_090);
        let obs = decode_round_data(&raw).unwrap();
        assert_eq!(obs.observed_at.timestamp(), 1_717_243_090);
    }
}
