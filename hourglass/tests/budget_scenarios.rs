//! End-to-end budget scenarios against the real clocks.
//!
//! Deterministic edge cases live in the unit tests with a hand-driven clock;
//! these exercise the production `MonotonicClock` wiring with real time, so
//! the timing assertions carry slack for scheduler noise.

use std::time::{Duration, Instant};

use hourglass::{Accounting, BudgetOptions, TimeBudget, TimeLimit};

#[test]
fn wall_clock_budget_trips_and_latches() {
    let started = Instant::now();
    let mut budget = TimeBudget::from_seconds(0.2);

    assert!(!budget.limit_reached(), "fresh budget reported exhausted");

    while !budget.limit_reached() {
        assert!(
            started.elapsed() < Duration::from_secs(5),
            "budget never tripped"
        );
    }
    let tripped_after = started.elapsed();
    assert!(
        tripped_after >= Duration::from_millis(100),
        "tripped far too early: {tripped_after:?}"
    );
    assert!(
        tripped_after <= Duration::from_secs(1),
        "tripped far too late: {tripped_after:?}"
    );

    // exhaustion is a latch and the remaining budget reads zero
    assert_eq!(budget.time_left(), TimeLimit::Finite(Duration::ZERO));
    for _ in 0..1_000 {
        assert!(budget.limit_reached());
    }
    budget.advance_deterministic_time(5.0);
    assert!(budget.limit_reached());
}

#[test]
fn deterministic_budget_dominates_infinite_wall_clock() {
    let mut budget = TimeBudget::new(BudgetOptions::default().with_deterministic_limit(10.0));

    for _ in 0..3 {
        budget.advance_deterministic_time(3.0);
        assert!(!budget.limit_reached());
    }
    assert_eq!(budget.elapsed_deterministic(), 9.0);
    assert_eq!(budget.deterministic_time_left(), 1.0);

    budget.advance_deterministic_time(2.0);
    assert!(budget.limit_reached());
    assert_eq!(budget.deterministic_time_left(), 0.0);
    // the wall axis was configured infinite and stays that way
    assert_eq!(budget.time_left(), TimeLimit::Infinite);
}

#[test]
fn infinite_budget_never_trips() {
    let started = Instant::now();
    let mut budget = TimeBudget::infinite();

    while started.elapsed() < Duration::from_millis(50) {
        assert!(!budget.limit_reached());
        assert_eq!(budget.time_left(), TimeLimit::Infinite);
        assert_eq!(budget.deterministic_time_left(), f64::INFINITY);
    }
    assert!(budget.elapsed() >= Duration::from_millis(40));
}

#[test]
fn cpu_accounting_outlives_an_equal_wall_limit_under_sleep() {
    // Sleeping burns wall time but almost no CPU, so a CPU-accounted budget
    // must survive a sleep that crosses its wall-clock equivalent.
    let mut budget = TimeBudget::new(
        BudgetOptions::default()
            .with_wall_limit(TimeLimit::Finite(Duration::from_millis(100)))
            .with_accounting(Accounting::ProcessCpu),
    );

    assert!(!budget.limit_reached());
    std::thread::sleep(Duration::from_millis(150));
    assert!(
        !budget.limit_reached(),
        "sleep consumed the CPU budget even though no CPU was burned"
    );
    match budget.time_left() {
        TimeLimit::Finite(left) => assert!(left > Duration::from_millis(50), "left {left:?}"),
        TimeLimit::Infinite => panic!("finite budget reported infinite"),
    }
}
