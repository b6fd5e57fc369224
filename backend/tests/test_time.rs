//! Tests for simulated time primitives

use spoofing_simulator_core_rs::{MarketHours, SimDuration, SimTime};

#[test]
fn test_time_is_totally_ordered() {
    let a = SimTime::from_nanos(1);
    let b = SimTime::from_nanos(2);

    assert!(a < b);
    assert_eq!(a.max(b), b);
    assert_eq!(SimTime::EPOCH, SimTime::from_nanos(0));
}

#[test]
fn test_offsetting_by_duration() {
    let t = SimTime::from_nanos(1_000);

    assert_eq!(t + SimDuration::from_nanos(500), SimTime::from_nanos(1_500));
    assert_eq!(t + SimDuration::ZERO, t);
}

#[test]
fn test_elapsed_between_timestamps() {
    let open = SimTime::from_nanos(100);
    let close = SimTime::from_nanos(350);

    assert_eq!(close - open, SimDuration::from_nanos(250));
    // Saturates rather than wrapping
    assert_eq!(open - close, SimDuration::ZERO);
}

#[test]
fn test_liquidation_style_offset_before_close() {
    // The coordinator schedules its dump wakeup 20ms before the close.
    let close = SimTime::from_nanos(57_600 * 1_000_000_000);
    let dump = close.saturating_sub(SimDuration::from_millis(20));

    assert_eq!(close - dump, SimDuration::from_millis(20));
    assert!(dump < close);
}

#[test]
fn test_saturating_sub_stops_at_epoch() {
    let early = SimTime::from_nanos(5);
    assert_eq!(early.saturating_sub(SimDuration::from_secs(1)), SimTime::EPOCH);
}

#[test]
fn test_market_hours_membership() {
    let hours = MarketHours::new(SimTime::from_nanos(100), SimTime::from_nanos(200));

    assert!(!hours.contains(SimTime::from_nanos(50)));
    assert!(hours.contains(SimTime::from_nanos(100)));
    assert!(!hours.contains(SimTime::from_nanos(200)));
}

#[test]
fn test_duration_unit_conversions() {
    assert_eq!(SimDuration::from_millis(20).nanos(), 20_000_000);
    assert_eq!(SimDuration::from_secs(2).nanos(), 2_000_000_000);
    assert_eq!(SimDuration::from_micros(3).nanos(), 3_000);
}
