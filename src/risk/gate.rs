//! Trade admission state machine

use crate::config::RiskConfig;
use crate::window::WindowState;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Mutable risk counters for the trading session
///
/// Counters are session-scoped: there is no calendar-day reset, so a
/// breached loss cap stays breached until the process restarts.
#[derive(Debug, Clone, Default)]
pub struct RiskState {
    /// Cumulative session P&L in USD
    pub daily_pnl: Decimal,
    /// Losses since the last recorded win
    pub consecutive_losses: u32,
    /// Trades admitted this session
    pub trades_today: u32,
    /// When the last trade was admitted
    pub last_trade_time: Option<DateTime<Utc>>,
    /// Window id of the last admitted trade; compared, never cleared
    pub window_already_traded: Option<i64>,
    /// Latched once the loss cap is hit; wins never clear it
    pub loss_cap_breached: bool,
}

/// Outcome of an admission check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Trade may proceed
    Admit,
    /// Trade refused, with the specific reason for observability
    Blocked(BlockReason),
}

/// Why the gate refused a proposal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockReason {
    /// This window already has an admitted trade (hard invariant)
    WindowAlreadyTraded,
    /// Session losses reached the cap; terminal for this session
    DailyLossLimit,
    /// Too many consecutive losses; cleared only by a recorded win
    LossStreak,
    /// Trade landed too recently before this window reopened
    Cooldown,
}

impl std::fmt::Display for BlockReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BlockReason::WindowAlreadyTraded => write!(f, "window already traded"),
            BlockReason::DailyLossLimit => write!(f, "daily loss limit reached"),
            BlockReason::LossStreak => write!(f, "consecutive loss limit reached"),
            BlockReason::Cooldown => write!(f, "cooldown after recent trade"),
        }
    }
}

/// Gates trade proposals against the risk state
pub struct RiskGate {
    config: RiskConfig,
    state: RiskState,
}

impl RiskGate {
    pub fn new(config: RiskConfig) -> Self {
        Self {
            config,
            state: RiskState::default(),
        }
    }

    /// Check whether a trade for this window may proceed
    ///
    /// Dedup is checked first and unconditionally: at most one admitted
    /// trade per window id, regardless of how healthy the other counters
    /// look.
    pub fn admit(&self, window: &WindowState, now: DateTime<Utc>) -> Admission {
        if self.state.window_already_traded == Some(window.window_id) {
            return Admission::Blocked(BlockReason::WindowAlreadyTraded);
        }

        if self.state.loss_cap_breached {
            return Admission::Blocked(BlockReason::DailyLossLimit);
        }

        if self.state.consecutive_losses >= self.config.loss_streak_limit {
            return Admission::Blocked(BlockReason::LossStreak);
        }

        // Suppress fast refires right after a window reopens
        if window.elapsed < self.config.cooldown_elapsed_secs {
            if let Some(last) = self.state.last_trade_time {
                if (now - last).num_seconds() < self.config.cooldown_secs {
                    return Admission::Blocked(BlockReason::Cooldown);
                }
            }
        }

        Admission::Admit
    }

    /// Record an admitted trade for dedup and cooldown tracking
    pub fn mark_traded(&mut self, window_id: i64, now: DateTime<Utc>) {
        self.state.window_already_traded = Some(window_id);
        self.state.last_trade_time = Some(now);
        self.state.trades_today += 1;
    }

    /// Record a winning settlement
    pub fn record_win(&mut self, amount: Decimal) {
        self.state.daily_pnl += amount;
        self.state.consecutive_losses = 0;
    }

    /// Record a losing settlement
    ///
    /// Hitting the loss cap latches the session shut; subsequent wins
    /// adjust P&L but never reopen trading.
    pub fn record_loss(&mut self, amount: Decimal) {
        self.state.daily_pnl -= amount;
        self.state.consecutive_losses += 1;
        if self.state.daily_pnl <= -self.config.max_daily_loss {
            self.state.loss_cap_breached = true;
            tracing::warn!(daily_pnl = %self.state.daily_pnl, "session loss cap reached, trading halted");
        }
    }

    /// Current risk counters
    pub fn state(&self) -> &RiskState {
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn window(window_id: i64, elapsed: i64) -> WindowState {
        WindowState {
            elapsed,
            remaining: 300 - elapsed,
            window_id,
        }
    }

    fn gate() -> RiskGate {
        RiskGate::new(RiskConfig::default())
    }

    #[test]
    fn test_fresh_gate_admits() {
        let gate = gate();
        assert_eq!(gate.admit(&window(100, 250), Utc::now()), Admission::Admit);
    }

    #[test]
    fn test_window_dedup_refuses_second_trade() {
        let mut gate = gate();
        let now = Utc::now();

        assert_eq!(gate.admit(&window(100, 250), now), Admission::Admit);
        gate.mark_traded(100, now);

        // All other counters healthy, still refused
        assert_eq!(
            gate.admit(&window(100, 255), now + chrono::Duration::seconds(5)),
            Admission::Blocked(BlockReason::WindowAlreadyTraded)
        );
    }

    #[test]
    fn test_next_window_admits_after_dedup() {
        let mut gate = gate();
        let now = Utc::now();
        gate.mark_traded(100, now);

        // New window, past the cooldown elapsed region
        assert_eq!(
            gate.admit(&window(101, 250), now + chrono::Duration::seconds(100)),
            Admission::Admit
        );
    }

    #[test]
    fn test_daily_loss_limit_is_terminal() {
        let mut gate = gate();
        let now = Utc::now();

        // Ten $5 losses reach the default $50 cap exactly
        for _ in 0..10 {
            gate.record_loss(dec!(5));
            gate.record_win(dec!(0)); // keep the streak gate out of the way
        }
        assert_eq!(gate.state().daily_pnl, dec!(-50));
        assert!(gate.state().loss_cap_breached);

        assert_eq!(
            gate.admit(&window(200, 250), now),
            Admission::Blocked(BlockReason::DailyLossLimit)
        );

        // A later win pulls P&L back above the cap but does not reopen
        gate.record_win(dec!(20));
        assert_eq!(gate.state().daily_pnl, dec!(-30));
        assert_eq!(
            gate.admit(&window(201, 250), now),
            Admission::Blocked(BlockReason::DailyLossLimit)
        );
    }

    #[test]
    fn test_loss_below_cap_still_admits() {
        let mut gate = gate();
        gate.record_loss(dec!(49.99));
        assert_eq!(gate.admit(&window(100, 250), Utc::now()), Admission::Admit);
    }

    #[test]
    fn test_loss_streak_blocks_and_win_clears() {
        let mut gate = gate();
        let now = Utc::now();

        for _ in 0..5 {
            gate.record_loss(dec!(1));
        }
        assert_eq!(
            gate.admit(&window(100, 250), now),
            Admission::Blocked(BlockReason::LossStreak)
        );

        gate.record_win(dec!(1));
        assert_eq!(gate.state().consecutive_losses, 0);
        assert_eq!(gate.admit(&window(100, 250), now), Admission::Admit);
    }

    #[test]
    fn test_cooldown_near_window_open() {
        let mut gate = gate();
        let now = Utc::now();
        gate.mark_traded(100, now);

        // 5s into the next window, 20s after the trade: blocked
        assert_eq!(
            gate.admit(&window(101, 5), now + chrono::Duration::seconds(20)),
            Admission::Blocked(BlockReason::Cooldown)
        );

        // Same elapsed but 40s after the trade: cooldown expired
        assert_eq!(
            gate.admit(&window(101, 5), now + chrono::Duration::seconds(40)),
            Admission::Admit
        );
    }

    #[test]
    fn test_cooldown_not_applied_mid_window() {
        let mut gate = gate();
        let now = Utc::now();
        gate.mark_traded(100, now);

        // 20s after the trade but already 50s into the window
        assert_eq!(
            gate.admit(&window(101, 50), now + chrono::Duration::seconds(20)),
            Admission::Admit
        );
    }

    #[test]
    fn test_dedup_precedes_other_blocks() {
        let mut gate = gate();
        let now = Utc::now();
        gate.mark_traded(100, now);
        for _ in 0..5 {
            gate.record_loss(dec!(20));
        }

        // Both loss cap and streak are breached, dedup still reported
        assert_eq!(
            gate.admit(&window(100, 250), now),
            Admission::Blocked(BlockReason::WindowAlreadyTraded)
        );
    }

    #[test]
    fn test_mark_traded_counts_trades() {
        let mut gate = gate();
        let now = Utc::now();
        gate.mark_traded(100, now);
        gate.mark_traded(101, now);
        assert_eq!(gate.state().trades_today, 2);
        assert_eq!(gate.state().window_already_traded, Some(101));
    }

    #[test]
    fn test_block_reason_display() {
        assert_eq!(
            BlockReason::WindowAlreadyTraded.to_string(),
            "window already traded"
        );
        assert_eq!(
            BlockReason::DailyLossLimit.to_string(),
            "daily loss limit reached"
        );
    }
}
