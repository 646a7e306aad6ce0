//! Batching consumer: windows an item stream into bounded batches.
//!
//! ## Contents
//! - [`BatchWindow`] — count/interval flush thresholds
//! - [`HandleBatch`] — the batch-processing extension point
//! - [`BatchFn`] — closure-backed batch handler
//! - [`BatchingConsumer`] — the windowing consumer itself
//!
//! ## Quick wiring
//! ```text
//! BatchingConsumer::new(handler, BatchWindow { .. })
//!      ├─ Consume<T>::handle(item)  non-blocking enqueue
//!      ├─ Produce<T>::attach(sink)  undeliverable sink (default: no-op)
//!      └─ close().await             drain + flush + join workers
//! ```

mod consumer;
mod handler;
mod window;

pub use consumer::BatchingConsumer;
pub use handler::{BatchFn, HandleBatch};
pub use window::BatchWindow;
