//! # Outcome resolution policy.
//!
//! When a publish fans out to several handlers, their per-handler
//! [`Outcome`]s must collapse into one boolean for the caller.
//! [`OutcomePolicy`] decides how.

use crate::outcomes::Outcome;

/// How a publish folds its handlers' outcomes into one result.
///
/// # Example
/// ```
/// use hubcast::{Outcome, OutcomePolicy};
///
/// let outcomes = [Outcome::of(true), Outcome::of(false)];
/// assert!(!OutcomePolicy::Pessimistic.resolve(&outcomes));
/// assert!(OutcomePolicy::Optimistic.resolve(&outcomes));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutcomePolicy {
    /// The publish succeeds only if **every** outcome succeeded.
    ///
    /// Vacuously true for an empty outcome set (no bound handlers).
    #[default]
    Pessimistic,

    /// The publish succeeds if **any** outcome succeeded.
    Optimistic,
}

impl OutcomePolicy {
    /// Folds a batch of outcomes under this policy.
    pub fn resolve(&self, outcomes: &[Outcome]) -> bool {
        match self {
            OutcomePolicy::Pessimistic => outcomes.iter().all(|o| o.ok),
            OutcomePolicy::Optimistic => outcomes.iter().any(|o| o.ok),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            OutcomePolicy::Pessimistic => "pessimistic",
            OutcomePolicy::Optimistic => "optimistic",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pessimistic_requires_all_successes() {
        let all_good = [Outcome::of(true), Outcome::of(true)];
        let one_bad = [Outcome::of(true), Outcome::rejected()];
        assert!(OutcomePolicy::Pessimistic.resolve(&all_good));
        assert!(!OutcomePolicy::Pessimistic.resolve(&one_bad));
    }

    #[test]
    fn optimistic_needs_a_single_success() {
        let one_good = [Outcome::rejected(), Outcome::of(true)];
        let all_bad = [Outcome::rejected(), Outcome::rejected()];
        assert!(OutcomePolicy::Optimistic.resolve(&one_good));
        assert!(!OutcomePolicy::Optimistic.resolve(&all_bad));
    }

    #[test]
    fn empty_set_is_vacuously_pessimistic_true() {
        assert!(OutcomePolicy::Pessimistic.resolve(&[]));
        assert!(!OutcomePolicy::Optimistic.resolve(&[]));
    }
}
