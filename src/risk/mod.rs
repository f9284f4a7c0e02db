//! Risk management
//!
//! A single state machine gates every proposed trade: per-window dedup,
//! session loss cap, consecutive-loss halt, and a short cooldown around
//! window reopen. Risk state is an explicit value owned by the run loop
//! and mutated only through the gate's interface.

mod gate;

pub use gate::{Admission, BlockReason, RiskGate, RiskState};
