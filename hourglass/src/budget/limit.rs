//! Limit values: a finite duration or no limit at all.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// A time budget on one axis: either a finite duration or unlimited.
///
/// Also the result type of remaining-budget queries, which by construction
/// can never go negative: a drained budget reports `Finite(Duration::ZERO)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeLimit {
    /// No limit; the budget never runs out on this axis.
    Infinite,
    /// At most the given duration.
    Finite(Duration),
}

impl TimeLimit {
    /// Builds a limit from seconds, mapping `+∞` to [`TimeLimit::Infinite`].
    ///
    /// # Panics
    ///
    /// Panics if `seconds` is negative or NaN. Limits below zero are caller
    /// misuse, not a runtime condition.
    #[must_use]
    pub fn from_seconds(seconds: f64) -> Self {
        if seconds == f64::INFINITY {
            return Self::Infinite;
        }
        Self::Finite(Duration::from_secs_f64(seconds))
    }

    /// Returns true for [`TimeLimit::Infinite`].
    #[must_use]
    pub const fn is_infinite(&self) -> bool {
        matches!(self, Self::Infinite)
    }

    /// The finite duration, or `None` when unlimited.
    #[must_use]
    pub const fn as_duration(&self) -> Option<Duration> {
        match self {
            Self::Infinite => None,
            Self::Finite(d) => Some(*d),
        }
    }
}

impl From<Duration> for TimeLimit {
    fn from(d: Duration) -> Self {
        Self::Finite(d)
    }
}
