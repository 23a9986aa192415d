//! Polling overhead probe for `limit_reached`.
//!
//! The whole point of the primitive is that polling it every iteration of an
//! inner search loop is affordable. This measures the per-call cost.
//!
//! Run with: cargo test --release -p hourglass poll_overhead -- --ignored --nocapture

use std::time::Instant;

use hourglass::TimeBudget;

#[test]
#[ignore]
fn poll_overhead_bench() {
    let mut budget = TimeBudget::from_seconds(3600.0);
    let count: u64 = 10_000_000;

    // Warmup
    for _ in 0..100_000 {
        assert!(!budget.limit_reached());
    }

    let start = Instant::now();
    let mut exhausted = 0u64;
    for _ in 0..count {
        exhausted += u64::from(budget.limit_reached());
    }
    let elapsed = start.elapsed();

    assert_eq!(exhausted, 0, "hour-long budget tripped during the probe");
    let per_call = elapsed.as_nanos() as f64 / count as f64;
    let rate = count as f64 / elapsed.as_secs_f64();
    println!("limit_reached: {count} calls in {elapsed:?} ({per_call:.1} ns/call, {rate:.0} calls/s)");
}
