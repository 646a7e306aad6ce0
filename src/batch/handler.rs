//! # Batch handler: the batching consumer's single extension point.
//!
//! [`HandleBatch`] processes one whole window and reports a single aggregate
//! verdict. [`BatchFn`] wraps a plain closure as a handler.
//!
//! ## Contract
//! - `true` — the batch was processed; its items are done.
//! - `false` — the batch failed as a whole; every item in it is routed,
//!   individually and in order, to the undeliverable sink.
//! - A panic inside the handler is caught by the worker and treated exactly
//!   like `false`; it never reaches the item producers.
//!
//! The handler runs on the window worker and may block it: a long-running
//! handler delays subsequent flushes of the same consumer, nothing else.

use std::sync::Arc;

use async_trait::async_trait;

/// Processes one accumulated window of items.
#[async_trait]
pub trait HandleBatch<T: Send + Sync + 'static>: Send + Sync + 'static {
    /// Handles the whole batch, reporting success or failure for all of it.
    async fn handle_batch(&self, batch: &[T]) -> bool;

    /// Human-readable name (for logs/metrics).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Closure-backed batch handler.
///
/// # Example
/// ```
/// use hubcast::BatchFn;
///
/// let handler = BatchFn::arc(|batch: &[u64]| {
///     println!("flushing {} readings", batch.len());
///     true
/// });
/// # let _ = handler;
/// ```
pub struct BatchFn<F> {
    f: F,
}

impl<F> BatchFn<F> {
    /// Creates a new closure-backed batch handler.
    pub fn new(f: F) -> Self {
        Self { f }
    }

    /// Creates the handler and returns it as a shared handle.
    pub fn arc(f: F) -> Arc<Self> {
        Arc::new(Self::new(f))
    }
}

#[async_trait]
impl<T, F> HandleBatch<T> for BatchFn<F>
where
    T: Send + Sync + 'static,
    F: Fn(&[T]) -> bool + Send + Sync + 'static,
{
    async fn handle_batch(&self, batch: &[T]) -> bool {
        (self.f)(batch)
    }
}
