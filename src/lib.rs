//! oracle-edge: Oracle-delay arbitrage detector for BTC 5-minute up/down markets
//!
//! This library provides the core components for:
//! - Real-time reference prices from Binance
//! - Delayed oracle prices from a Chainlink aggregator via JSON-RPC
//! - Window timing for the recurring 5-minute market cycle
//! - Gap/staleness edge evaluation with a confidence curve
//! - Risk gating: per-window dedup, loss cap, streak limit, cooldown
//! - Paper/live execution behind a sink trait
//! - A window-open momentum predictor for paper evaluation
//! - CSV session logs and a structured telemetry stack

pub mod cli;
pub mod config;
pub mod data;
pub mod edge;
pub mod engine;
pub mod execution;
pub mod feed;
pub mod predictor;
pub mod risk;
pub mod telemetry;
pub mod window;
