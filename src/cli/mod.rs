//! CLI interface for oracle-edge
//!
//! Provides subcommands for:
//! - `run`: Start the trading engine
//! - `monitor`: Watch the oracle gap without trading
//! - `predict`: Paper-run the window-open predictor
//! - `status`: Show current state
//! - `config`: Show effective configuration

mod monitor;
mod predict;
mod run;

pub use monitor::MonitorArgs;
pub use predict::PredictArgs;
pub use run::RunArgs;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "oracle-edge")]
#[command(about = "Oracle-delay arbitrage detector for BTC 5-minute up/down markets")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the trading engine
    Run(RunArgs),
    /// Watch the oracle gap without trading
    Monitor(MonitorArgs),
    /// Paper-run the window-open predictor
    Predict(PredictArgs),
    /// Show current state
    Status,
    /// Show effective configuration
    Config,
}
