//! Trading engine
//!
//! Drives the tick loop: settle the previous window's trade when the
//! boundary passes, evaluate for a new entry inside the entry window, and
//! emit a periodic status line the rest of the time. All policy lives in
//! the components; the engine only sequences them.

use crate::config::{Config, ExecutionMode};
use crate::data::{TradeLog, TradeRecord};
use crate::edge::{Direction, EdgeEvaluator};
use crate::execution::{ExecutionSink, LiveSink, PaperSink, TradeRequest};
use crate::feed::{BinanceClient, ChainlinkClient, DualFeedSampler};
use crate::risk::{Admission, RiskGate};
use crate::telemetry::{set_gauge, GaugeMetric};
use crate::window::WindowClock;
use chrono::Utc;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::time::Duration;

/// A paper position awaiting window close
#[derive(Debug, Clone, Copy)]
struct PendingTrade {
    window_id: i64,
    direction: Direction,
    entry_reference: Decimal,
    stake: Decimal,
    market_price: Decimal,
}

/// The run loop and its wiring
pub struct Engine {
    config: Config,
    clock: WindowClock,
    sampler: DualFeedSampler,
    evaluator: EdgeEvaluator,
    gate: RiskGate,
    sink: Box<dyn ExecutionSink>,
    log: TradeLog,
    pending: Option<PendingTrade>,
}

impl Engine {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let reference = BinanceClient::new(config.reference_feed.clone())?;
        let oracle = ChainlinkClient::new(config.oracle_feed.clone())?;

        let sink: Box<dyn ExecutionSink> = match config.execution.mode {
            ExecutionMode::Paper => Box::new(PaperSink::new()),
            ExecutionMode::Live => Box::new(LiveSink),
        };

        Ok(Self {
            clock: WindowClock::new(&config.window),
            sampler: DualFeedSampler::new(reference, oracle),
            evaluator: EdgeEvaluator::new(config.edge.clone()),
            gate: RiskGate::new(config.risk.clone()),
            sink,
            log: TradeLog::new(),
            pending: None,
            config,
        })
    }

    /// Tick until interrupted, then flush the trade log
    pub async fn run(&mut self) -> anyhow::Result<()> {
        tracing::info!(
            symbol = %self.config.reference_feed.symbol,
            mode = ?self.config.execution.mode,
            stake = %self.config.execution.position_size,
            "engine started"
        );

        let mut ticker = tokio::time::interval(Duration::from_secs(self.config.engine.tick_secs));
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => self.tick().await,
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("shutdown requested");
                    break;
                }
            }
        }

        self.flush();
        Ok(())
    }

    async fn tick(&mut self) {
        let now = Utc::now();
        let window = self.clock.at(now);

        // Window rollover settles before anything else so the gate's
        // counters are current when the new window is evaluated.
        if let Some(pending) = self.pending {
            if window.window_id > pending.window_id {
                self.settle(pending).await;
            }
        }

        if self.clock.in_entry_window(&window) {
            self.try_enter(window).await;
        } else if window.elapsed % self.config.engine.status_interval_secs == 0 {
            self.status(window).await;
        }
    }

    /// Evaluate this tick for a new trade
    async fn try_enter(&mut self, window: crate::window::WindowState) {
        // An unsettled trade from an earlier window still owns the book;
        // entering now would overwrite it and lose its win/loss.
        if carries_unsettled(self.pending.as_ref(), window.window_id) {
            tracing::warn!(
                window_id = window.window_id,
                "previous trade still unsettled, skipping entry"
            );
            return;
        }

        let now = Utc::now();

        // Gate before sampling: a blocked window should not burn feed calls
        match self.gate.admit(&window, now) {
            Admission::Admit => {}
            Admission::Blocked(reason) => {
                tracing::debug!(window_id = window.window_id, %reason, "trade blocked");
                return;
            }
        }

        let sample = self.sampler.sample().await;
        let signal = match self.evaluator.evaluate(&sample) {
            Ok(signal) => signal,
            Err(reason) => {
                tracing::debug!(window_id = window.window_id, %reason, "no edge");
                return;
            }
        };

        // Both present, evaluate() already required them
        let (reference, oracle) = match (sample.reference, sample.oracle) {
            (Some(r), Some(o)) => (r, o),
            _ => return,
        };

        let request = TradeRequest {
            id: uuid::Uuid::new_v4(),
            direction: signal.direction,
            size: self.config.execution.position_size,
            confidence: signal.confidence,
            price: reference.price,
            remaining_secs: window.remaining,
        };

        match self.sink.submit(&request).await {
            Ok(true) => {}
            Ok(false) => {
                tracing::warn!(window_id = window.window_id, "sink declined trade");
                return;
            }
            Err(err) => {
                tracing::error!(window_id = window.window_id, error = %err, "trade submission failed");
                return;
            }
        }

        self.gate.mark_traded(window.window_id, now);
        self.log.push(TradeRecord {
            time: now,
            direction: signal.direction,
            confidence: signal.confidence,
            reference_price: reference.price,
            oracle_price: oracle.price,
            gap_pct: signal.gap_pct,
            oracle_staleness_secs: signal.oracle_staleness_secs,
            remaining_secs: window.remaining,
        });
        self.pending = Some(PendingTrade {
            window_id: window.window_id,
            direction: signal.direction,
            entry_reference: reference.price,
            stake: self.config.execution.position_size,
            market_price: settlement_market_price(signal.confidence),
        });

        tracing::info!(
            window_id = window.window_id,
            direction = %signal.direction,
            gap_pct = %signal.gap_pct,
            confidence = %signal.confidence,
            staleness_secs = signal.oracle_staleness_secs,
            "trade entered"
        );
    }

    /// Settle a pending paper trade against the current reference price
    ///
    /// A failed reference fetch leaves the trade pending; the next tick
    /// retries, and the small extra drift is acceptable for paper books.
    async fn settle(&mut self, pending: PendingTrade) {
        let settle_price = match self.sampler.reference_price().await {
            Some(obs) => obs.price,
            None => {
                tracing::warn!(
                    window_id = pending.window_id,
                    "settlement price unavailable, retrying next tick"
                );
                return;
            }
        };

        let won = trade_won(pending.direction, pending.entry_reference, settle_price);
        let amount = if won {
            let profit = settlement_profit(pending.stake, pending.market_price);
            self.gate.record_win(profit);
            profit
        } else {
            self.gate.record_loss(pending.stake);
            -pending.stake
        };

        self.pending = None;

        let state = self.gate.state();
        set_gauge(
            GaugeMetric::DailyPnl,
            state.daily_pnl.to_f64().unwrap_or(0.0),
        );
        set_gauge(GaugeMetric::LossStreak, state.consecutive_losses as f64);

        tracing::info!(
            window_id = pending.window_id,
            direction = %pending.direction,
            entry = %pending.entry_reference,
            settle = %settle_price,
            won,
            amount = %amount,
            daily_pnl = %state.daily_pnl,
            "trade settled"
        );
    }

    /// Periodic heartbeat outside the entry window
    async fn status(&mut self, window: crate::window::WindowState) {
        let sample = self.sampler.sample().await;
        let state = self.gate.state();

        if let Some(staleness) = sample.oracle_staleness_secs {
            set_gauge(GaugeMetric::OracleStaleness, staleness as f64);
        }

        tracing::info!(
            window_id = window.window_id,
            elapsed = window.elapsed,
            remaining = window.remaining,
            reference = sample.reference.map(|o| o.price.to_string()),
            oracle = sample.oracle.map(|o| o.price.to_string()),
            staleness_secs = sample.oracle_staleness_secs,
            trades = state.trades_today,
            daily_pnl = %state.daily_pnl,
            "status"
        );
    }

    /// Write the trade log; persistence failure never fails the shutdown
    fn flush(&self) {
        let filename = format!("trades_{}.csv", Utc::now().format("%Y%m%d_%H%M%S"));
        let path = self.config.data.output_dir.join(filename);

        match self.log.write_csv(&path) {
            Ok(()) => tracing::info!(
                path = %path.display(),
                trades = self.log.len(),
                "trade log written"
            ),
            Err(err) => tracing::error!(
                path = %path.display(),
                error = %err,
                "failed to write trade log"
            ),
        }
    }
}

/// Whether an earlier window's trade is still awaiting settlement
fn carries_unsettled(pending: Option<&PendingTrade>, window_id: i64) -> bool {
    pending.is_some_and(|p| p.window_id != window_id)
}

/// Implied market price for a signal of the given confidence
///
/// High-confidence entries are assumed to pay the market's premium for the
/// near-certain side rather than an even-odds price.
pub fn settlement_market_price(confidence: Decimal) -> Decimal {
    dec!(0.50) + (confidence - dec!(0.5)) * dec!(0.5)
}

/// Profit on a winning stake bought at the given market price
pub fn settlement_profit(stake: Decimal, market_price: Decimal) -> Decimal {
    let tokens = stake / market_price;
    tokens - stake
}

/// Whether a settled window resolved in the trade's direction
///
/// An exactly flat window loses either side.
pub fn trade_won(direction: Direction, entry: Decimal, settle: Decimal) -> bool {
    match direction {
        Direction::Up => settle > entry,
        Direction::Down => settle < entry,
    }
}
