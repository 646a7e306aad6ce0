//! # Retry disposition for undeliverable items.

/// Intended disposition of an item that failed batch delivery.
///
/// The batching core only ever performs the [`RetryDecision::Undeliverable`]
/// routing itself (forwarding to the attached sink); the other dispositions
/// are vocabulary for a caller-supplied sink to act on: requeue into the
/// consumer, park in a backlog, retry inline, or drop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RetryDecision {
    /// Retry the item inline, immediately.
    RetryImmediately,
    /// Put the item back at the end of the source queue.
    Requeue,
    /// Park the item in a backlog for later inspection.
    Backlog,
    /// Route the item to the undeliverable sink.
    Undeliverable,
    /// Drop the item.
    Destroy,
}

impl RetryDecision {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            RetryDecision::RetryImmediately => "retry_immediately",
            RetryDecision::Requeue => "requeue",
            RetryDecision::Backlog => "backlog",
            RetryDecision::Undeliverable => "undeliverable",
            RetryDecision::Destroy => "destroy",
        }
    }
}
