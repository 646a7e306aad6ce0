//! # BatchingConsumer: windows an item stream into batches.
//!
//! Accepts individual items (non-blocking enqueue), accumulates them into
//! windows bounded by [`BatchWindow`] thresholds, and hands each closed
//! window to a [`HandleBatch`] handler. A failed batch is redelivered, item by
//! item, to the attached fallback sink: batch handlers report one aggregate
//! verdict, so the whole batch is treated as undeliverable.
//!
//! ## Architecture
//! ```text
//! handle(item) ──► [unbounded queue] ──► window worker
//!                                           │ accumulate until count/interval
//!                                           ▼
//!                                     handle_batch(&[T])
//!                                       ├─ true  → done
//!                                       └─ false/panic
//!                                           │ (whole batch, original order)
//!                                           ▼
//!                                   [failed-batch queue] ──► redelivery worker
//!                                                               │ per item
//!                                                               ▼
//!                                                      undeliverable sink
//! ```
//!
//! ## Rules
//! - `handle` never suspends and never blocks the caller; admission is
//!   bounded only by memory.
//! - Redelivery runs on its own worker, so a slow undeliverable sink cannot
//!   stall accumulation of subsequent windows.
//! - A long-running batch handler delays subsequent flushes of **this**
//!   consumer only.
//! - `close` delivers the open partial window (and anything still queued)
//!   through the same flush/failure path before returning; no item is
//!   silently dropped.

use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use async_trait::async_trait;
use futures::FutureExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::batch::{BatchWindow, HandleBatch};
use crate::error::HandlerError;
use crate::pipes::{Consume, NullConsumer, Produce};

/// Shared, swappable undeliverable sink.
type SharedSink<T> = Arc<RwLock<Arc<dyn Consume<T>>>>;

/// Windows an incoming item stream into batches and hands them downstream.
///
/// ## Example
/// ```
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use hubcast::{BatchFn, BatchWindow, BatchingConsumer, Consume};
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     let flushed = Arc::new(AtomicUsize::new(0));
///     let probe = Arc::clone(&flushed);
///
///     let consumer = BatchingConsumer::new(
///         BatchFn::arc(move |batch: &[u64]| {
///             probe.fetch_add(batch.len(), Ordering::SeqCst);
///             true
///         }),
///         BatchWindow::items(3),
///     );
///
///     for n in 0..3 {
///         assert!(consumer.handle(n).await.unwrap());
///     }
///     consumer.close().await;
///     assert_eq!(flushed.load(Ordering::SeqCst), 3);
/// }
/// ```
pub struct BatchingConsumer<T: Send + Sync + 'static> {
    tx: mpsc::UnboundedSender<T>,
    cancel: CancellationToken,
    workers: Mutex<Vec<JoinHandle<()>>>,
    undeliverable: SharedSink<T>,
}

impl<T: Send + Sync + 'static> BatchingConsumer<T> {
    /// Creates a consumer flushing through `handler` under `window`
    /// thresholds. The undeliverable sink defaults to [`NullConsumer`] until
    /// [`attach`](Produce::attach)ed.
    ///
    /// Must be called from within a tokio runtime (spawns the window and
    /// redelivery workers).
    pub fn new(handler: Arc<dyn HandleBatch<T>>, window: BatchWindow) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let (failed_tx, failed_rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let undeliverable: SharedSink<T> = Arc::new(RwLock::new(Arc::new(NullConsumer)));

        let window_worker = tokio::spawn(run_window(
            rx,
            handler,
            window,
            cancel.clone(),
            failed_tx,
        ));
        let redelivery_worker =
            tokio::spawn(run_redelivery(failed_rx, Arc::clone(&undeliverable)));

        Self {
            tx,
            cancel,
            workers: Mutex::new(vec![window_worker, redelivery_worker]),
            undeliverable,
        }
    }

    /// Creates a consumer with the default window (1000 items / 1 second).
    pub fn with_defaults(handler: Arc<dyn HandleBatch<T>>) -> Self {
        Self::new(handler, BatchWindow::default())
    }

    /// Closes the consumer: cancels accumulation, delivers the open partial
    /// window (and anything still queued) through the normal flush/failure
    /// path, and waits for pending redeliveries. Safe to call more than once.
    pub async fn close(&self) {
        self.cancel.cancel();
        let workers: Vec<JoinHandle<()>> = {
            let mut guard = self.workers.lock().unwrap_or_else(PoisonError::into_inner);
            guard.drain(..).collect()
        };
        for worker in workers {
            let _ = worker.await;
        }
    }
}

#[async_trait]
impl<T: Send + Sync + 'static> Consume<T> for BatchingConsumer<T> {
    /// Enqueues the item into the current window. Never blocks; returns
    /// `Ok(false)` only once the consumer has been closed.
    async fn handle(&self, message: T) -> Result<bool, HandlerError> {
        Ok(self.tx.send(message).is_ok())
    }
}

impl<T: Send + Sync + 'static> Produce<T> for BatchingConsumer<T> {
    /// Sets the sink that receives items of failed batches.
    fn attach(&self, consumer: Arc<dyn Consume<T>>) {
        *self
            .undeliverable
            .write()
            .unwrap_or_else(PoisonError::into_inner) = consumer;
    }
}

/// Accumulates windows and flushes them to the batch handler.
async fn run_window<T: Send + Sync + 'static>(
    mut rx: mpsc::UnboundedReceiver<T>,
    handler: Arc<dyn HandleBatch<T>>,
    window: BatchWindow,
    cancel: CancellationToken,
    failed: mpsc::UnboundedSender<Vec<T>>,
) {
    let mut buf: Vec<T> = Vec::new();

    'windows: loop {
        // A window opens when its first item arrives.
        tokio::select! {
            _ = cancel.cancelled() => break 'windows,
            first = rx.recv() => match first {
                Some(item) => buf.push(item),
                None => break 'windows,
            }
        }

        // The interval is measured from the window opening.
        let timer = async {
            match window.interval {
                Some(interval) => tokio::time::sleep(interval).await,
                None => std::future::pending::<()>().await,
            }
        };
        tokio::pin!(timer);

        while window.count_threshold().map_or(true, |n| buf.len() < n) {
            tokio::select! {
                _ = cancel.cancelled() => break 'windows,
                _ = &mut timer => break,
                item = rx.recv() => match item {
                    Some(item) => buf.push(item),
                    None => break 'windows,
                }
            }
        }

        flush(&mut buf, handler.as_ref(), &failed).await;
    }

    // Closing: pull anything still queued, then push the open window through
    // the normal flush/failure path.
    rx.close();
    while let Ok(item) = rx.try_recv() {
        buf.push(item);
    }
    flush(&mut buf, handler.as_ref(), &failed).await;
}

/// Hands one closed window to the handler; routes the whole batch to the
/// failed-batch queue on rejection or panic.
async fn flush<T: Send + Sync + 'static>(
    buf: &mut Vec<T>,
    handler: &dyn HandleBatch<T>,
    failed: &mpsc::UnboundedSender<Vec<T>>,
) {
    if buf.is_empty() {
        return;
    }
    let batch = std::mem::take(buf);

    let ok = match AssertUnwindSafe(handler.handle_batch(&batch))
        .catch_unwind()
        .await
    {
        Ok(ok) => ok,
        Err(_panic) => {
            tracing::warn!(handler = handler.name(), "batch handler panicked");
            false
        }
    };

    if !ok {
        tracing::debug!(items = batch.len(), "batch rejected; redelivering individually");
        let _ = failed.send(batch);
    }
}

/// Forwards each item of every failed batch to the undeliverable sink,
/// preserving original batch order. Runs until the window worker drops the
/// failed-batch sender and the queue drains.
async fn run_redelivery<T: Send + Sync + 'static>(
    mut rx: mpsc::UnboundedReceiver<Vec<T>>,
    sink: SharedSink<T>,
) {
    while let Some(batch) = rx.recv().await {
        for item in batch {
            let sink = sink.read().unwrap_or_else(PoisonError::into_inner).clone();
            match AssertUnwindSafe(sink.handle(item)).catch_unwind().await {
                Ok(Ok(_accepted)) => {}
                Ok(Err(error)) => {
                    tracing::warn!(sink = sink.name(), %error, "undeliverable sink failed");
                }
                Err(_panic) => {
                    tracing::warn!(sink = sink.name(), "undeliverable sink panicked");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{Duration, Instant};

    use super::*;
    use crate::batch::BatchFn;
    use crate::consumers::CollectionConsumer;

    /// Polls `probe` until it returns true or `timeout` elapses.
    async fn wait_until(timeout: Duration, probe: impl Fn() -> bool) -> bool {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if probe() {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        probe()
    }

    #[tokio::test]
    async fn count_threshold_flushes_exactly_one_batch() {
        for items_per_batch in [1_usize, 10, 100] {
            let handled = Arc::new(AtomicUsize::new(0));
            let probe = Arc::clone(&handled);

            let consumer = BatchingConsumer::new(
                BatchFn::arc(move |batch: &[usize]| {
                    probe.fetch_add(batch.len(), Ordering::SeqCst);
                    true
                }),
                BatchWindow::items_or_interval(items_per_batch, Duration::from_secs(3600)),
            );

            for n in 0..items_per_batch {
                assert!(consumer.handle(n).await.unwrap());
            }

            let flushed = Arc::clone(&handled);
            assert!(
                wait_until(Duration::from_secs(2), move || {
                    flushed.load(Ordering::SeqCst) == items_per_batch
                })
                .await,
                "batch of {items_per_batch} was not flushed"
            );
            consumer.close().await;
        }
    }

    #[tokio::test]
    async fn excess_item_stays_pending_until_close() {
        let handled = Arc::new(AtomicUsize::new(0));
        let probe = Arc::clone(&handled);

        let consumer = BatchingConsumer::new(
            BatchFn::arc(move |batch: &[usize]| {
                probe.fetch_add(batch.len(), Ordering::SeqCst);
                true
            }),
            BatchWindow::items(100),
        );

        for n in 0..101 {
            assert!(consumer.handle(n).await.unwrap());
        }

        let flushed = Arc::clone(&handled);
        assert!(
            wait_until(Duration::from_secs(2), move || {
                flushed.load(Ordering::SeqCst) == 100
            })
            .await
        );
        // One item is pending in the open window; close drains it through the
        // normal flush path.
        consumer.close().await;
        assert_eq!(handled.load(Ordering::SeqCst), 101);
    }

    #[tokio::test]
    async fn interval_flushes_a_partial_window() {
        let handled = Arc::new(AtomicUsize::new(0));
        let probe = Arc::clone(&handled);

        let consumer = BatchingConsumer::new(
            BatchFn::arc(move |batch: &[usize]| {
                probe.fetch_add(batch.len(), Ordering::SeqCst);
                true
            }),
            BatchWindow::interval(Duration::from_millis(25)),
        );

        for n in 0..7 {
            assert!(consumer.handle(n).await.unwrap());
        }

        let flushed = Arc::clone(&handled);
        assert!(
            wait_until(Duration::from_secs(2), move || {
                flushed.load(Ordering::SeqCst) == 7
            })
            .await
        );
        consumer.close().await;
    }

    #[tokio::test]
    async fn failed_batches_redeliver_every_item_in_order() {
        let handled = Arc::new(AtomicUsize::new(0));
        let calls = Arc::new(AtomicUsize::new(0));
        let handled_probe = Arc::clone(&handled);
        let calls_probe = Arc::clone(&calls);

        // Fails every other batch, by panicking: the panic must behave
        // exactly like returning false.
        let consumer = BatchingConsumer::new(
            BatchFn::arc(move |batch: &[usize]| {
                if calls_probe.fetch_add(1, Ordering::SeqCst) % 2 == 0 {
                    handled_probe.fetch_add(batch.len(), Ordering::SeqCst);
                    true
                } else {
                    panic!("batch handler exploded");
                }
            }),
            BatchWindow::items_or_interval(100, Duration::from_millis(25)),
        );

        let undelivered = CollectionConsumer::new();
        consumer.attach(Arc::new(undelivered.clone()));

        for n in 0..150 {
            assert!(consumer.handle(n).await.unwrap());
        }

        let sink = undelivered.clone();
        assert!(
            wait_until(Duration::from_secs(3), move || sink.len() == 50).await,
            "expected 50 undeliverable items, saw {}",
            undelivered.len()
        );
        assert_eq!(handled.load(Ordering::SeqCst), 100);
        assert_eq!(undelivered.snapshot(), (100..150).collect::<Vec<_>>());

        consumer.close().await;
    }

    #[tokio::test]
    async fn close_routes_the_open_window_through_the_failure_path() {
        let consumer = BatchingConsumer::new(
            BatchFn::arc(|_batch: &[usize]| false),
            BatchWindow::items(100),
        );
        let undelivered = CollectionConsumer::new();
        consumer.attach(Arc::new(undelivered.clone()));

        for n in 0..3 {
            assert!(consumer.handle(n).await.unwrap());
        }
        consumer.close().await;

        // close() waits for redelivery, so the failed open window is fully
        // routed by the time it returns.
        assert_eq!(undelivered.snapshot(), vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn close_is_idempotent_and_rejects_new_items() {
        let consumer = BatchingConsumer::with_defaults(BatchFn::arc(|_: &[usize]| true));
        consumer.close().await;
        consumer.close().await;
        assert!(!consumer.handle(1).await.unwrap());
    }

    #[tokio::test]
    async fn default_sink_discards_failed_batches() {
        let consumer = BatchingConsumer::new(
            BatchFn::arc(|_batch: &[usize]| false),
            BatchWindow::items(2),
        );
        for n in 0..2 {
            assert!(consumer.handle(n).await.unwrap());
        }
        // Nothing attached: the failed batch drains into the no-op sink.
        consumer.close().await;
    }
}
