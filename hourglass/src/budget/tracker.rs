//! Deadline tracker enforcing wall-clock and deterministic budgets.
//!
//! [`TimeBudget::limit_reached`] is conservative: it reports
//! exhaustion when `now + worst_recent_gap >= deadline`, where the worst
//! recent gap is the largest interval between consecutive checks over the
//! last [`HISTORY_WINDOW`] calls (never below [`SAFETY_MARGIN`]). The caller
//! could be doing unbounded work between two checks, so the next check is
//! assumed to land as late as the worst gap already observed; stopping that
//! much early bounds overshoot by the caller's own polling cadence.
//!
//! Exhaustion is a latch: once reported, every later check reports it too.

use std::num::NonZeroUsize;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::budget::limit::TimeLimit;
use crate::budget::running_max::RunningMax;
use crate::clock::{Clock, MonotonicClock};
use crate::trace::{debug, trace};

/// Conservative padding applied to every observed gap and estimate.
///
/// Absorbs check latency and clock granularity, and puts a floor under
/// gaps from a clock that stepped backwards.
pub const SAFETY_MARGIN: Duration = Duration::from_micros(100);

/// Number of recent inter-call gaps considered when estimating how late the
/// next check might be.
pub const HISTORY_WINDOW: usize = 100;

const SAFETY_MARGIN_NS: u64 = SAFETY_MARGIN.as_nanos() as u64;

/// Sentinel deadline for "no wall-clock limit".
const NEVER_NS: u64 = u64::MAX;

/// Clock domain the primary limit is enforced against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Accounting {
    /// Real elapsed time from a monotonic clock.
    #[default]
    WallClock,
    /// Process CPU time instead of wall time; useful for reproducible
    /// benchmarking. Conservative only while the process burns at most one
    /// CPU between checks, since CPU time is then no faster than wall time.
    ProcessCpu,
}

/// Construction options for a [`TimeBudget`].
///
/// This is the configuration boundary: an external parameter layer hands
/// over two scalar budgets and the accounting mode, nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BudgetOptions {
    /// Wall-clock budget for the run.
    pub wall_limit: TimeLimit,
    /// Deterministic-time budget, in abstract seconds.
    pub deterministic_limit: f64,
    /// Which clock the wall budget is accounted against.
    pub accounting: Accounting,
}

impl Default for BudgetOptions {
    fn default() -> Self {
        Self {
            wall_limit: TimeLimit::Infinite,
            deterministic_limit: f64::INFINITY,
            accounting: Accounting::WallClock,
        }
    }
}

impl BudgetOptions {
    /// Builder-style setter for the wall-clock budget.
    #[must_use]
    pub const fn with_wall_limit(mut self, limit: TimeLimit) -> Self {
        self.wall_limit = limit;
        self
    }

    /// Builder-style setter for the deterministic budget, in seconds.
    #[must_use]
    pub const fn with_deterministic_limit(mut self, seconds: f64) -> Self {
        self.deterministic_limit = seconds;
        self
    }

    /// Builder-style setter for the accounting mode.
    #[must_use]
    pub const fn with_accounting(mut self, accounting: Accounting) -> Self {
        self.accounting = accounting;
        self
    }
}

/// CPU accounting state; present only in [`Accounting::ProcessCpu`] mode.
#[derive(Debug)]
struct CpuAccounting {
    /// Process CPU time at construction.
    start_cpu_ns: u64,
    /// The configured wall budget, re-checked against CPU time on crossings.
    limit_secs: f64,
}

/// Tracks a wall-clock and a deterministic budget for one search run.
///
/// Poll [`TimeBudget::limit_reached`] from the inner loop until it returns
/// true, then abort as fast as possible. One tracker per run, and not
/// `Clone`: concurrent workers each own a private instance.
#[derive(Debug)]
pub struct TimeBudget<C: Clock = MonotonicClock> {
    clock: C,
    start_ns: u64,
    last_ns: u64,
    /// Deadline in clock nanoseconds. `NEVER_NS` means unlimited; latched to
    /// 0 once exhaustion has been reported, so it stays reported.
    limit_ns: u64,
    gap_history: RunningMax<u64>,
    deterministic_limit: f64,
    deterministic_elapsed: f64,
    cpu: Option<CpuAccounting>,
}

impl TimeBudget {
    /// Tracker on the default monotonic clock.
    #[must_use]
    pub fn new(options: BudgetOptions) -> Self {
        Self::with_clock(options, MonotonicClock::new())
    }

    /// Tracker with no limits on either axis.
    #[must_use]
    pub fn infinite() -> Self {
        Self::new(BudgetOptions::default())
    }

    /// Wall-clock-only tracker from a limit in seconds (`+∞` for none).
    ///
    /// # Panics
    ///
    /// Panics if `seconds` is negative or NaN; see [`TimeLimit::from_seconds`].
    #[must_use]
    pub fn from_seconds(seconds: f64) -> Self {
        Self::new(BudgetOptions::default().with_wall_limit(TimeLimit::from_seconds(seconds)))
    }
}

impl<C: Clock> TimeBudget<C> {
    /// Tracker on a caller-supplied clock.
    #[must_use]
    pub fn with_clock(options: BudgetOptions, clock: C) -> Self {
        debug_assert!(
            options.deterministic_limit >= 0.0,
            "deterministic limit must be >= 0"
        );

        let start_ns = clock.monotonic_ns();
        let limit_ns = match options.wall_limit {
            TimeLimit::Infinite => NEVER_NS,
            TimeLimit::Finite(d) => start_ns.saturating_add(saturating_ns(d)),
        };
        let cpu = match options.accounting {
            Accounting::WallClock => None,
            Accounting::ProcessCpu => Some(CpuAccounting {
                start_cpu_ns: clock.process_cpu_ns(),
                limit_secs: match options.wall_limit {
                    TimeLimit::Infinite => f64::INFINITY,
                    TimeLimit::Finite(d) => d.as_secs_f64(),
                },
            }),
        };

        Self {
            clock,
            start_ns,
            last_ns: start_ns,
            limit_ns,
            gap_history: RunningMax::new(
                NonZeroUsize::new(HISTORY_WINDOW).expect("window size is nonzero"),
            ),
            deterministic_limit: options.deterministic_limit,
            deterministic_elapsed: 0.0,
            cpu,
        }
    }

    /// Returns true when either budget is exhausted; once true, always true.
    ///
    /// Cost per call is one clock read plus a handful of arithmetic ops. The
    /// result errs on the early side (see the module docs) so the caller
    /// never runs meaningfully past the limit even when it polls sparsely.
    #[must_use]
    pub fn limit_reached(&mut self) -> bool {
        if self.deterministic_time_left() <= 0.0 {
            return true;
        }

        let current_ns = self.clock.monotonic_ns();
        let gap = current_ns
            .saturating_sub(self.last_ns)
            .max(SAFETY_MARGIN_NS);
        self.gap_history.add(gap);
        self.last_ns = current_ns;

        let worst_recent_gap = self.gap_history.max().unwrap_or(gap);
        if current_ns.saturating_add(worst_recent_gap) >= self.limit_ns {
            if let Some(cpu) = &self.cpu {
                // Checked only on a crossing, so the syscall stays off the
                // hot path. On one core CPU time advances no faster than
                // wall time, so re-deriving the deadline from it is still
                // conservative.
                let cpu_left_secs = cpu.limit_secs - self.cpu_elapsed_secs(cpu);
                if cpu_left_secs > SAFETY_MARGIN.as_secs_f64() {
                    self.limit_ns = self
                        .last_ns
                        .saturating_add((cpu_left_secs * 1e9) as u64);
                    trace!(
                        "wall deadline crossed; extended by {:.3}s of remaining cpu budget",
                        cpu_left_secs
                    );
                    return false;
                }
            }

            debug!("time budget exhausted; latching");
            self.limit_ns = 0;
            return true;
        }
        false
    }

    /// Remaining wall-clock budget, or CPU budget in CPU accounting mode.
    ///
    /// May be positive even though [`TimeBudget::limit_reached`] would return
    /// true, because the latter is conservative. Once `limit_reached` has
    /// actually returned true, this reports zero. Not tuned for the hot path
    /// the way `limit_reached` is.
    #[must_use]
    pub fn time_left(&self) -> TimeLimit {
        if self.limit_ns == NEVER_NS {
            return TimeLimit::Infinite;
        }
        let now_ns = self.clock.monotonic_ns();
        if self.limit_ns <= now_ns {
            return TimeLimit::Finite(Duration::ZERO);
        }
        match &self.cpu {
            Some(cpu) => {
                let left_secs = (cpu.limit_secs - self.cpu_elapsed_secs(cpu)).max(0.0);
                TimeLimit::Finite(Duration::from_secs_f64(left_secs))
            }
            None => TimeLimit::Finite(Duration::from_nanos(self.limit_ns - now_ns)),
        }
    }

    /// Remaining deterministic time before the deterministic limit trips.
    ///
    /// Never negative; infinite iff the limit was configured infinite.
    #[must_use]
    pub fn deterministic_time_left(&self) -> f64 {
        (self.deterministic_limit - self.deterministic_elapsed).max(0.0)
    }

    /// Advances the deterministic counter by `seconds`.
    ///
    /// Deterministic time never advances on its own: reproducible runs call
    /// this with a machine-independent cost estimate of the work performed.
    /// `seconds` must be non-negative; a negative value is a programming
    /// error, caught by a debug assertion.
    pub fn advance_deterministic_time(&mut self, seconds: f64) {
        debug_assert!(seconds >= 0.0, "deterministic duration must be >= 0");
        self.deterministic_elapsed += seconds;
    }

    /// Wall-clock time elapsed since construction.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        Duration::from_nanos(self.clock.monotonic_ns().saturating_sub(self.start_ns))
    }

    /// Deterministic time accumulated so far.
    #[must_use]
    pub const fn elapsed_deterministic(&self) -> f64 {
        self.deterministic_elapsed
    }

    fn cpu_elapsed_secs(&self, cpu: &CpuAccounting) -> f64 {
        self.clock
            .process_cpu_ns()
            .saturating_sub(cpu.start_cpu_ns) as f64
            * 1e-9
    }
}

/// Duration to u64 nanoseconds, saturating at the sentinel.
fn saturating_ns(d: Duration) -> u64 {
    u64::try_from(d.as_nanos()).unwrap_or(NEVER_NS)
}
