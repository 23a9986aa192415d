//! Clock sources for budget tracking.
//!
//! All budget arithmetic runs in u64 nanoseconds relative to a clock's own
//! anchor, captured when the clock is created. [`MonotonicClock`] is the
//! production source: `minstant` for the monotonic domain (TSC-backed where
//! available, much cheaper than a `clock_gettime` syscall) and
//! `CLOCK_PROCESS_CPUTIME_ID` for the CPU domain. The trait exists so tests
//! can drive time by hand.

use minstant::Instant;
use rustix::time::{ClockId, clock_gettime};

/// Source of monotonic and process-CPU timestamps, in nanoseconds.
pub trait Clock {
    /// Nanoseconds of monotonic time since the clock's anchor.
    ///
    /// Must not decrease between calls on the same clock; callers clamp
    /// negative gaps regardless.
    fn monotonic_ns(&self) -> u64;

    /// Cumulative process CPU time in nanoseconds.
    ///
    /// A syscall on most platforms, so read only on the cold path.
    fn process_cpu_ns(&self) -> u64;
}

/// Default clock: anchored at creation, so readings start near zero.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    anchor: Instant,
}

impl MonotonicClock {
    /// Creates a clock anchored at the current instant.
    #[must_use]
    pub fn new() -> Self {
        Self {
            anchor: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    #[inline]
    fn monotonic_ns(&self) -> u64 {
        self.anchor.elapsed().as_nanos() as u64
    }

    fn process_cpu_ns(&self) -> u64 {
        let ts = clock_gettime(ClockId::ProcessCPUTime);
        ts.tv_sec.max(0) as u64 * 1_000_000_000 + ts.tv_nsec.max(0) as u64
    }
}
