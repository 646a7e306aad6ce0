//! # Per-subscription outcome ledger.
//!
//! Ordered sequence of [`Outcome`]s for one subscription, appended to only by
//! that type's drain worker. A dispatch marks its start position, records one
//! outcome per bound handler, then takes its batch back out, so resolution
//! is always scoped to the outcomes of exactly one publish, and bookkeeping
//! for a completed publish can never leak into the next one.
//!
//! ```text
//! publish A:  mark=0  record record        take_batch(0) -> [a1, a2]
//! publish B:  mark=0  record record record take_batch(0) -> [b1, b2, b3]
//! ```

use crate::outcomes::Outcome;

/// Ordered outcome sequence for one subscription.
#[derive(Default)]
pub(crate) struct OutcomeLedger {
    outcomes: Vec<Outcome>,
}

impl OutcomeLedger {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Returns the position a dispatch should resolve from.
    pub(crate) fn mark(&self) -> usize {
        self.outcomes.len()
    }

    /// Appends one recorded outcome.
    pub(crate) fn record(&mut self, outcome: Outcome) {
        self.outcomes.push(outcome);
    }

    /// Removes and returns every outcome recorded at or after `mark`.
    pub(crate) fn take_batch(&mut self, mark: usize) -> Vec<Outcome> {
        self.outcomes.split_off(mark.min(self.outcomes.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batches_are_isolated_per_mark() {
        let mut ledger = OutcomeLedger::new();

        let first = ledger.mark();
        ledger.record(Outcome::of(false));
        ledger.record(Outcome::of(true));
        let batch = ledger.take_batch(first);
        assert_eq!(batch.len(), 2);
        assert!(!batch[0].ok);

        // The next dispatch starts clean.
        let second = ledger.mark();
        assert_eq!(second, 0);
        ledger.record(Outcome::of(true));
        let batch = ledger.take_batch(second);
        assert_eq!(batch.len(), 1);
        assert!(batch[0].ok);
    }

    #[test]
    fn take_batch_past_end_is_empty() {
        let mut ledger = OutcomeLedger::new();
        assert!(ledger.take_batch(5).is_empty());
    }
}
