//! Window feature extraction
//!
//! Features summarize the opening minutes of a window from 1m candles.
//! Two candles is the minimum: the direction heuristics compare the first
//! two minute returns against each other.

use crate::feed::Candle;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Derived features over the opening candles of a window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowFeatures {
    /// Open of the first candle
    pub start_price: Decimal,
    /// Close of the latest candle
    pub current_price: Decimal,
    /// Highest high across the candles
    pub high: Decimal,
    /// Lowest low across the candles
    pub low: Decimal,
    /// Total traded volume
    pub volume: Decimal,
    /// Fractional move from start to current
    pub price_change: Decimal,
    /// Candles that closed above their open
    pub green_candles: u32,
    /// Sample standard deviation of closes
    pub volatility: f64,
    /// Second-minute volume over first-minute volume
    pub volume_trend: Decimal,
    /// Fractional return of the first candle
    pub return_min1: Decimal,
    /// Fractional return of the second candle
    pub return_min2: Decimal,
}

impl WindowFeatures {
    /// Compute features from at least two 1m candles, oldest first
    pub fn from_candles(candles: &[Candle]) -> Option<Self> {
        let (first, second) = match candles {
            [first, second, ..] => (first, second),
            _ => return None,
        };

        let start_price = first.open;
        if start_price.is_zero() {
            return None;
        }
        let current_price = second.close;

        let high = candles.iter().map(|c| c.high).max()?;
        let low = candles.iter().map(|c| c.low).min()?;
        let volume: Decimal = candles.iter().map(|c| c.volume).sum();

        let green_candles = candles.iter().filter(|c| c.close > c.open).count() as u32;

        let closes: Vec<f64> = candles
            .iter()
            .filter_map(|c| c.close.to_f64())
            .collect();
        let volatility = sample_std_dev(&closes);

        // A dead first minute gives no trend information
        let volume_trend = if first.volume.is_zero() {
            Decimal::ONE
        } else {
            second.volume / first.volume
        };

        Some(Self {
            start_price,
            current_price,
            high,
            low,
            volume,
            price_change: (current_price - start_price) / start_price,
            green_candles,
            volatility,
            volume_trend,
            return_min1: candle_return(first),
            return_min2: candle_return(second),
        })
    }
}

fn candle_return(candle: &Candle) -> Decimal {
    if candle.open.is_zero() {
        Decimal::ZERO
    } else {
        (candle.close - candle.open) / candle.open
    }
}

fn sample_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let variance = values
        .iter()
        .map(|v| (v - mean).powi(2))
        .sum::<f64>()
        / (values.len() - 1) as f64;
    variance.sqrt()
}
