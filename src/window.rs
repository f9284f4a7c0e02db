//! Market window clock
//!
//! Converts wall-clock time into position within the recurring 5-minute
//! up/down market cycle. Windows open on exact 5-minute boundaries, so the
//! whole state is a pure derivation from the timestamp with no internal
//! state, which makes every timing decision replayable in tests.

use crate::config::WindowConfig;
use chrono::{DateTime, Utc};

/// Position within the current market window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowState {
    /// Seconds since the window opened (0..length)
    pub elapsed: i64,
    /// Seconds until the window closes
    pub remaining: i64,
    /// Epoch-derived window index, strictly monotonic across windows
    pub window_id: i64,
}

/// Clock for the recurring fixed-length market cycle
///
/// `window_id` is the authoritative dedup key for "one trade per window":
/// a tick that straddles a boundary mid-computation still lands in exactly
/// one window by id, even though elapsed/remaining flip around it.
#[derive(Debug, Clone, Copy)]
pub struct WindowClock {
    length_secs: i64,
    entry_start_secs: i64,
    entry_end_secs: i64,
}

impl WindowClock {
    /// Create a clock from window configuration
    pub fn new(config: &WindowConfig) -> Self {
        Self {
            length_secs: config.length_secs,
            entry_start_secs: config.entry_start_secs,
            entry_end_secs: config.entry_end_secs,
        }
    }

    /// Window state for the current wall-clock time
    pub fn now(&self) -> WindowState {
        self.at(Utc::now())
    }

    /// Window state for an explicit timestamp (testing/backtesting)
    pub fn at(&self, ts: DateTime<Utc>) -> WindowState {
        let unix = ts.timestamp();
        let elapsed = unix.rem_euclid(self.length_secs);
        WindowState {
            elapsed,
            remaining: self.length_secs - elapsed,
            window_id: unix.div_euclid(self.length_secs),
        }
    }

    /// Whether the state falls inside the entry window near window close
    pub fn in_entry_window(&self, state: &WindowState) -> bool {
        state.elapsed >= self.entry_start_secs && state.elapsed <= self.entry_end_secs
    }

    /// Configured window length in seconds
    pub fn length_secs(&self) -> i64 {
        self.length_secs
    }
}
