//! Configuration types for oracle-edge
//!
//! Every policy constant from the strategy (staleness floor, gap threshold,
//! confidence curve, loss limits, entry window bounds) lives here with a
//! documented default, so nothing numeric is buried in the components.

use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub reference_feed: ReferenceFeedConfig,
    #[serde(default)]
    pub oracle_feed: OracleFeedConfig,
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub edge: EdgeConfig,
    #[serde(default)]
    pub risk: RiskConfig,
    #[serde(default)]
    pub execution: ExecutionConfig,
    #[serde(default)]
    pub predictor: PredictorConfig,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
    #[serde(default)]
    pub engine: EngineConfig,
}

/// Reference (exchange) price feed configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ReferenceFeedConfig {
    /// Exchange REST base URL
    #[serde(default = "default_reference_base_url")]
    pub base_url: String,

    /// Trading symbol to query
    #[serde(default = "default_symbol")]
    pub symbol: String,

    /// Request timeout in seconds
    #[serde(default = "default_reference_timeout")]
    pub timeout_secs: u64,
}

fn default_reference_base_url() -> String {
    "https://api.binance.com".to_string()
}
fn default_symbol() -> String {
    "BTCUSDT".to_string()
}
fn default_reference_timeout() -> u64 {
    2
}

impl Default for ReferenceFeedConfig {
    fn default() -> Self {
        Self {
            base_url: default_reference_base_url(),
            symbol: default_symbol(),
            timeout_secs: default_reference_timeout(),
        }
    }
}

/// Oracle price feed configuration (Chainlink aggregator via JSON-RPC)
#[derive(Debug, Clone, Deserialize)]
pub struct OracleFeedConfig {
    /// JSON-RPC endpoint for the chain hosting the aggregator
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,

    /// Aggregator contract address (BTC/USD on Polygon)
    #[serde(default = "default_contract")]
    pub contract: String,

    /// Request timeout in seconds
    #[serde(default = "default_oracle_timeout")]
    pub timeout_secs: u64,
}

fn default_rpc_url() -> String {
    "https://polygon-rpc.com".to_string()
}
fn default_contract() -> String {
    "0xc907E116054Ad103354f2D350FD2514433D57F6f".to_string()
}
fn default_oracle_timeout() -> u64 {
    5
}

impl Default for OracleFeedConfig {
    fn default() -> Self {
        Self {
            rpc_url: default_rpc_url(),
            contract: default_contract(),
            timeout_secs: default_oracle_timeout(),
        }
    }
}

/// Market window timing configuration
#[derive(Debug, Clone, Deserialize)]
pub struct WindowConfig {
    /// Window length in seconds (5-minute markets)
    #[serde(default = "default_window_length")]
    pub length_secs: i64,

    /// Entry window opens this many seconds into the window
    #[serde(default = "default_entry_start")]
    pub entry_start_secs: i64,

    /// Entry window closes this many seconds into the window
    #[serde(default = "default_entry_end")]
    pub entry_end_secs: i64,
}

fn default_window_length() -> i64 {
    300
}
fn default_entry_start() -> i64 {
    240
}
fn default_entry_end() -> i64 {
    270
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            length_secs: default_window_length(),
            entry_start_secs: default_entry_start(),
            entry_end_secs: default_entry_end(),
        }
    }
}

/// Edge evaluation configuration
#[derive(Debug, Clone, Deserialize)]
pub struct EdgeConfig {
    /// Minimum absolute gap (as a fraction) to act on, e.g. 0.001 = 0.1%
    #[serde(default = "default_min_gap_pct")]
    pub min_gap_pct: Decimal,

    /// Oracle must be at least this stale for the signal to be actionable
    #[serde(default = "default_min_staleness")]
    pub min_staleness_secs: i64,

    /// Confidence floor assigned to any actionable gap
    #[serde(default = "default_base_confidence")]
    pub base_confidence: Decimal,

    /// Confidence added per unit of absolute gap
    #[serde(default = "default_confidence_slope")]
    pub confidence_slope: Decimal,

    /// Confidence ceiling
    #[serde(default = "default_max_confidence")]
    pub max_confidence: Decimal,
}

fn default_min_gap_pct() -> Decimal {
    Decimal::new(1, 3) // 0.001 = 0.1%
}
fn default_min_staleness() -> i64 {
    45
}
fn default_base_confidence() -> Decimal {
    Decimal::new(70, 2) // 0.70
}
fn default_confidence_slope() -> Decimal {
    Decimal::new(10, 0)
}
fn default_max_confidence() -> Decimal {
    Decimal::new(95, 2) // 0.95
}

impl Default for EdgeConfig {
    fn default() -> Self {
        Self {
            min_gap_pct: default_min_gap_pct(),
            min_staleness_secs: default_min_staleness(),
            base_confidence: default_base_confidence(),
            confidence_slope: default_confidence_slope(),
            max_confidence: default_max_confidence(),
        }
    }
}

/// Risk gate configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RiskConfig {
    /// Stop trading once cumulative session losses reach this amount (USD)
    #[serde(default = "default_max_daily_loss")]
    pub max_daily_loss: Decimal,

    /// Stop trading after this many consecutive losses
    #[serde(default = "default_loss_streak_limit")]
    pub loss_streak_limit: u32,

    /// Refuse trades this soon after the previous one (seconds)
    #[serde(default = "default_cooldown")]
    pub cooldown_secs: i64,

    /// Cooldown only applies while window elapsed is below this (seconds)
    #[serde(default = "default_cooldown_elapsed")]
    pub cooldown_elapsed_secs: i64,
}

fn default_max_daily_loss() -> Decimal {
    Decimal::new(50, 0)
}
fn default_loss_streak_limit() -> u32 {
    5
}
fn default_cooldown() -> i64 {
    30
}
fn default_cooldown_elapsed() -> i64 {
    10
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            max_daily_loss: default_max_daily_loss(),
            loss_streak_limit: default_loss_streak_limit(),
            cooldown_secs: default_cooldown(),
            cooldown_elapsed_secs: default_cooldown_elapsed(),
        }
    }
}

/// Execution configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ExecutionConfig {
    #[serde(default = "default_mode")]
    pub mode: ExecutionMode,

    /// Stake per trade in USD
    #[serde(default = "default_position_size")]
    pub position_size: Decimal,
}

fn default_mode() -> ExecutionMode {
    ExecutionMode::Paper
}
fn default_position_size() -> Decimal {
    Decimal::new(5, 0)
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            position_size: default_position_size(),
        }
    }
}

/// Execution mode: paper trading or live
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    Paper,
    Live,
}

/// Predictor (classifier) configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PredictorConfig {
    /// Minimum model confidence to log a paper signal
    #[serde(default = "default_min_model_confidence")]
    pub min_confidence: Decimal,

    /// Polling cadence for the predict loop (seconds)
    #[serde(default = "default_check_interval")]
    pub check_interval_secs: u64,
}

fn default_min_model_confidence() -> Decimal {
    Decimal::new(65, 2) // 0.65
}
fn default_check_interval() -> u64 {
    60
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            min_confidence: default_min_model_confidence(),
            check_interval_secs: default_check_interval(),
        }
    }
}

/// Output configuration for trade/prediction logs
#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    /// Directory for CSV output
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./data")
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Run loop configuration
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Tick granularity in seconds
    #[serde(default = "default_tick")]
    pub tick_secs: u64,

    /// Emit a status line every N seconds outside the entry window
    #[serde(default = "default_status_interval")]
    pub status_interval_secs: i64,
}

fn default_tick() -> u64 {
    1
}
fn default_status_interval() -> i64 {
    30
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_secs: default_tick(),
            status_interval_secs: default_status_interval(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would break the tick loop arithmetic
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.engine.tick_secs > 0, "engine.tick_secs must be positive");
        anyhow::ensure!(
            self.engine.status_interval_secs > 0,
            "engine.status_interval_secs must be positive"
        );
        anyhow::ensure!(
            self.window.length_secs > 0,
            "window.length_secs must be positive"
        );
        anyhow::ensure!(
            self.window.entry_start_secs >= 0
                && self.window.entry_start_secs <= self.window.entry_end_secs
                && self.window.entry_end_secs <= self.window.length_secs,
            "window entry band must lie inside the window"
        );
        Ok(())
    }
}
