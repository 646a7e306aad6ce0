//! # Core consumer trait
//!
//! [`Consume`] is the extension point for anything that accepts items: hub
//! subscribers, batching consumers, file sinks, protocol stages. One item in,
//! one accept/reject verdict out.
//!
//! ## Contract
//! - `Ok(true)` — the item was durably accepted downstream.
//! - `Ok(false)` — the item was rejected; this is a reported decision, not a
//!   fault.
//! - `Err(_)` — the handler faulted. Callers that aggregate outcomes (the
//!   hub) route the error to the binding's error callback.
//!
//! Implementations may be slow (I/O, batching, retries); callers that must
//! not block route items through a queue first.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::HandlerError;

/// Contract for accepting a single item asynchronously.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use hubcast::{Consume, HandlerError};
///
/// struct Counter(std::sync::atomic::AtomicUsize);
///
/// #[async_trait]
/// impl Consume<u64> for Counter {
///     async fn handle(&self, _message: u64) -> Result<bool, HandlerError> {
///         self.0.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
///         Ok(true)
///     }
/// }
/// ```
#[async_trait]
pub trait Consume<T: Send + 'static>: Send + Sync + 'static {
    /// Handles a single item, reporting whether it was accepted downstream.
    async fn handle(&self, message: T) -> Result<bool, HandlerError>;

    /// Human-readable name (for logs/metrics).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Closure-backed consumer.
///
/// Wraps a synchronous `Fn(T)` as a [`Consume`] that always accepts. This is
/// the convenience used by `attach`-style call sites and tests.
///
/// # Example
/// ```
/// use hubcast::ActionConsumer;
///
/// let sink = ActionConsumer::arc(|n: u64| println!("got {n}"));
/// # let _ = sink;
/// ```
pub struct ActionConsumer<F> {
    f: F,
}

impl<F> ActionConsumer<F> {
    /// Creates a new closure-backed consumer.
    pub fn new(f: F) -> Self {
        Self { f }
    }

    /// Creates the consumer and returns it as a shared handle.
    pub fn arc(f: F) -> Arc<Self> {
        Arc::new(Self::new(f))
    }
}

#[async_trait]
impl<T, F> Consume<T> for ActionConsumer<F>
where
    T: Send + 'static,
    F: Fn(T) + Send + Sync + 'static,
{
    async fn handle(&self, message: T) -> Result<bool, HandlerError> {
        (self.f)(message);
        Ok(true)
    }
}

/// The no-op sink: accepts and discards everything.
///
/// Default undeliverable sink of the batching consumer.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullConsumer;

#[async_trait]
impl<T: Send + 'static> Consume<T> for NullConsumer {
    async fn handle(&self, _message: T) -> Result<bool, HandlerError> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[tokio::test]
    async fn action_consumer_invokes_closure_and_accepts() {
        let seen = Arc::new(AtomicUsize::new(0));
        let probe = Arc::clone(&seen);
        let consumer = ActionConsumer::arc(move |n: usize| {
            probe.fetch_add(n, Ordering::SeqCst);
        });

        assert!(consumer.handle(3).await.unwrap());
        assert!(consumer.handle(4).await.unwrap());
        assert_eq!(seen.load(Ordering::SeqCst), 7);
    }

    #[tokio::test]
    async fn null_consumer_accepts_everything() {
        let sink = NullConsumer;
        assert!(Consume::<String>::handle(&sink, "dropped".into()).await.unwrap());
    }
}
