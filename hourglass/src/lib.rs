//! Budget-driven stopping for search and optimization loops.
//!
//! An iterative search owns a [`TimeBudget`] and polls [`TimeBudget::limit_reached`]
//! from its inner loop, as often as it can, until it returns true. The call
//! costs one clock read plus a few instructions, so polling every iteration
//! is the intended usage even at millions of iterations per second.
//!
//! Two independent budgets are tracked:
//!
//! - **Wall-clock**: real elapsed time against a monotonic clock, with a
//!   conservative early stop: the check pads "now" by the worst inter-call
//!   gap observed over recent history, so a caller that polls sparsely is
//!   stopped before it can overshoot the limit by a whole work interval.
//! - **Deterministic**: an abstract counter advanced manually via
//!   [`TimeBudget::advance_deterministic_time`], giving reproducible stopping
//!   behavior independent of machine load.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use hourglass::{BudgetOptions, TimeBudget, TimeLimit};
//!
//! let options = BudgetOptions::default()
//!     .with_wall_limit(TimeLimit::Finite(Duration::from_millis(500)))
//!     .with_deterministic_limit(1_000.0);
//! let mut budget = TimeBudget::new(options);
//!
//! while !budget.limit_reached() {
//!     // one step of work, costing roughly two deterministic "seconds"
//!     budget.advance_deterministic_time(2.0);
//! }
//! ```

pub mod budget;
pub mod clock;
mod trace;

pub use budget::{Accounting, BudgetOptions, RunningMax, TimeBudget, TimeLimit};
pub use clock::{Clock, MonotonicClock};
pub use trace::init_tracing;
