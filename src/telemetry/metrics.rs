//! Metric hooks
//!
//! Emitted as structured debug events today; the names are stable so an
//! exporter can be layered in without touching call sites.

use std::time::Duration;

/// Latency metric types
#[derive(Debug, Clone, Copy)]
pub enum LatencyMetric {
    /// Combined reference + oracle sample latency
    FeedSample,
    /// Oracle round fetch latency
    OracleRound,
    /// Order submission latency
    OrderSubmission,
}

/// Gauge metric types
#[derive(Debug, Clone, Copy)]
pub enum GaugeMetric {
    /// Session P&L
    DailyPnl,
    /// Oracle staleness in seconds
    OracleStaleness,
    /// Reference-vs-oracle gap percentage
    PriceGapPct,
    /// Consecutive losses
    LossStreak,
}

/// Record a latency measurement
pub fn record_latency(metric: LatencyMetric, duration: Duration) {
    let metric_name = match metric {
        LatencyMetric::FeedSample => "oracle_edge_feed_sample_latency_ms",
        LatencyMetric::OracleRound => "oracle_edge_oracle_round_latency_ms",
        LatencyMetric::OrderSubmission => "oracle_edge_order_submission_latency_ms",
    };

    tracing::debug!(
        metric = metric_name,
        value_ms = duration.as_millis(),
        "Recording latency"
    );
}

/// Set a gauge value
pub fn set_gauge(metric: GaugeMetric, value: f64) {
    let metric_name = match metric {
        GaugeMetric::DailyPnl => "oracle_edge_daily_pnl_usd",
        GaugeMetric::OracleStaleness => "oracle_edge_oracle_staleness_secs",
        GaugeMetric::PriceGapPct => "oracle_edge_price_gap_pct",
        GaugeMetric::LossStreak => "oracle_edge_loss_streak",
    };

    tracing::debug!(metric = metric_name, value = value, "Setting gauge");
}
