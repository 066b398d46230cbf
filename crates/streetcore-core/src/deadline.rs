//! Wall-clock budget tracking for the courier planner.
//!
//! # Design
//!
//! Unlike the tick-based time model a discrete-event simulation would use,
//! the courier planner is bounded by real wall-clock time: it keeps
//! improving a tour for up to a fixed number of seconds and then returns
//! whatever it has. [`Deadline`] wraps `std::time::Instant` so every stage of
//! the planner can cheaply ask "how much time is left?" without threading a
//! start time through every function call.

use std::time::{Duration, Instant};

/// A wall-clock budget that started counting down at construction time.
#[derive(Copy, Clone, Debug)]
pub struct Deadline {
    start: Instant,
    budget: Duration,
}

impl Deadline {
    /// Start a new deadline with `budget` remaining from now.
    pub fn starting_now(budget: Duration) -> Self {
        Self {
            start: Instant::now(),
            budget,
        }
    }

    /// Time elapsed since the deadline started.
    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    #[inline]
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed().as_secs_f64()
    }

    /// Time remaining, or `Duration::ZERO` once the budget is exhausted.
    #[inline]
    pub fn remaining(&self) -> Duration {
        self.budget.saturating_sub(self.elapsed())
    }

    #[inline]
    pub fn remaining_secs(&self) -> f64 {
        self.remaining().as_secs_f64()
    }

    #[inline]
    pub fn expired(&self) -> bool {
        self.elapsed() >= self.budget
    }

    /// Fraction of the budget consumed so far, in `[0.0, 1.0]`.
    pub fn fraction_used(&self) -> f64 {
        if self.budget.is_zero() {
            return 1.0;
        }
        (self.elapsed_secs() / self.budget.as_secs_f64()).min(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_deadline_has_full_budget() {
        let d = Deadline::starting_now(Duration::from_secs(45));
        assert!(!d.expired());
        assert!(d.remaining_secs() > 44.0);
    }

    #[test]
    fn zero_budget_is_immediately_expired() {
        let d = Deadline::starting_now(Duration::ZERO);
        assert!(d.expired());
        assert_eq!(d.fraction_used(), 1.0);
    }
}
