//! End-to-end integration tests
//!
//! Walks the decision pipeline the way a live tick would: clock the
//! timestamp into a window, evaluate the feed sample, and push the result
//! through the risk gate.

use chrono::{TimeZone, Utc};
use oracle_edge::config::Config;
use oracle_edge::edge::{Direction, EdgeEvaluator, NoEdgeReason};
use oracle_edge::feed::{FeedSample, PriceObservation};
use oracle_edge::risk::{Admission, BlockReason, RiskGate};
use oracle_edge::window::WindowClock;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn sample_at(
    sampled_at: chrono::DateTime<Utc>,
    reference: Decimal,
    oracle: Decimal,
    staleness: i64,
) -> FeedSample {
    let oracle_obs = PriceObservation {
        price: oracle,
        observed_at: sampled_at - chrono::Duration::seconds(staleness),
    };
    FeedSample {
        reference: Some(PriceObservation {
            price: reference,
            observed_at: sampled_at,
        }),
        oracle: Some(oracle_obs),
        oracle_staleness_secs: Some(oracle_obs.staleness_secs(sampled_at)),
        sampled_at,
    }
}

#[test]
fn test_entry_window_signal_is_admitted_once() {
    let config = Config::default();
    let clock = WindowClock::new(&config.window);
    let evaluator = EdgeEvaluator::new(config.edge.clone());
    let mut gate = RiskGate::new(config.risk.clone());

    // 250s into a window: inside the 240-270s entry band
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 4, 10).unwrap();
    let window = clock.at(now);
    assert!(clock.in_entry_window(&window));

    // Reference moved 0.2% above a 50s-stale oracle
    let sample = sample_at(now, dec!(50000), dec!(49900), 50);
    let signal = evaluator.evaluate(&sample).unwrap();
    assert_eq!(signal.direction, Direction::Up);
    assert!(signal.confidence > dec!(0.70));

    assert_eq!(gate.admit(&window, now), Admission::Admit);
    gate.mark_traded(window.window_id, now);

    // A second signal ten seconds later lands in the same window
    let later = now + chrono::Duration::seconds(10);
    let window = clock.at(later);
    assert!(clock.in_entry_window(&window));
    assert_eq!(
        gate.admit(&window, later),
        Admission::Blocked(BlockReason::WindowAlreadyTraded)
    );
}

#[test]
fn test_fresh_oracle_never_reaches_the_gate() {
    let config = Config::default();
    let clock = WindowClock::new(&config.window);
    let evaluator = EdgeEvaluator::new(config.edge.clone());

    let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 4, 10).unwrap();
    assert!(clock.in_entry_window(&clock.at(now)));

    // Large gap, but the oracle updated 10s ago
    let sample = sample_at(now, dec!(50400), dec!(49900), 10);
    assert_eq!(
        evaluator.evaluate(&sample).unwrap_err(),
        NoEdgeReason::OracleTooFresh
    );
}

#[test]
fn test_next_window_reopens_after_trade() {
    let config = Config::default();
    let clock = WindowClock::new(&config.window);
    let mut gate = RiskGate::new(config.risk.clone());

    let entry = Utc.with_ymd_and_hms(2024, 6, 1, 12, 4, 10).unwrap();
    let window = clock.at(entry);
    gate.mark_traded(window.window_id, entry);

    // Entry band of the following window, well past cooldown
    let next_entry = Utc.with_ymd_and_hms(2024, 6, 1, 12, 9, 10).unwrap();
    let next_window = clock.at(next_entry);
    assert_eq!(next_window.window_id, window.window_id + 1);
    assert!(clock.in_entry_window(&next_window));
    assert_eq!(gate.admit(&next_window, next_entry), Admission::Admit);
}

#[test]
fn test_loss_cap_halts_all_future_windows() {
    let config = Config::default();
    let clock = WindowClock::new(&config.window);
    let mut gate = RiskGate::new(config.risk.clone());

    for _ in 0..10 {
        gate.record_loss(dec!(5));
        gate.record_win(Decimal::ZERO);
    }

    let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 4, 10).unwrap();
    for offset in 0..5 {
        let ts = now + chrono::Duration::minutes(5 * offset);
        assert_eq!(
            gate.admit(&clock.at(ts), ts),
            Admission::Blocked(BlockReason::DailyLossLimit)
        );
    }
}

#[test]
fn test_degraded_feed_produces_no_signal() {
    let config = Config::default();
    let evaluator = EdgeEvaluator::new(config.edge);

    let now = Utc::now();
    let sample = FeedSample {
        reference: Some(PriceObservation {
            price: dec!(50000),
            observed_at: now,
        }),
        oracle: None,
        oracle_staleness_secs: None,
        sampled_at: now,
    };

    assert_eq!(
        evaluator.evaluate(&sample).unwrap_err(),
        NoEdgeReason::FeedUnavailable
    );
}
