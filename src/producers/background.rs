//! # BackgroundProducer: hosts a continuously-running source.
//!
//! Wraps an async source closure and invokes it in a loop on a dedicated
//! worker, forwarding each produced item to the attached consumer. The worker
//! stops cooperatively: on [`stop`](BackgroundProducer::stop), or when the
//! source returns `None`.
//!
//! ## Rules
//! - Items the source already has ready are delivered before cancellation is
//!   observed; a source that is **waiting** for work yields to cancellation.
//!   A source that never waits must check its [`CancellationToken`] itself.
//! - `start` is a no-op while the worker is already running; after `stop` the
//!   producer can be started again.
//! - Rejected or faulted deliveries are logged and do not stop production.

use std::borrow::Cow;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::pipes::{Consume, NullConsumer, Produce};

type SourceFn<T> =
    Arc<dyn Fn(CancellationToken) -> Pin<Box<dyn Future<Output = Option<T>> + Send>> + Send + Sync>;

/// Producer that continuously invokes an async source on a worker task.
///
/// ## Example
/// ```
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicU32, Ordering};
/// use hubcast::{BackgroundProducer, CollectionConsumer, Produce};
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     let counter = Arc::new(AtomicU32::new(0));
///     let producer = BackgroundProducer::new("counter", move |_ctx| {
///         let counter = Arc::clone(&counter);
///         async move {
///             match counter.fetch_add(1, Ordering::SeqCst) {
///                 n if n < 3 => Some(n),
///                 _ => None, // source exhausted
///             }
///         }
///     });
///
///     let collected = CollectionConsumer::new();
///     producer.attach(Arc::new(collected.clone()));
///     producer.start();
///     producer.stop().await;
///     assert_eq!(collected.snapshot(), vec![0, 1, 2]);
/// }
/// ```
pub struct BackgroundProducer<T: Send + 'static> {
    name: Cow<'static, str>,
    source: SourceFn<T>,
    downstream: Arc<RwLock<Arc<dyn Consume<T>>>>,
    cancel: Mutex<Option<CancellationToken>>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl<T: Send + 'static> BackgroundProducer<T> {
    /// Creates a producer around an async source.
    ///
    /// The source is invoked once per item; returning `None` ends production.
    pub fn new<F, Fut>(name: impl Into<Cow<'static, str>>, source: F) -> Self
    where
        F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Option<T>> + Send + 'static,
    {
        Self {
            name: name.into(),
            source: Arc::new(move |ctx| Box::pin(source(ctx))),
            downstream: Arc::new(RwLock::new(Arc::new(NullConsumer))),
            cancel: Mutex::new(None),
            worker: Mutex::new(None),
        }
    }

    /// Spawns the production worker. No-op if already running.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self) {
        let mut cancel_slot = self.cancel.lock().unwrap_or_else(PoisonError::into_inner);
        if cancel_slot.is_some() {
            return;
        }
        let cancel = CancellationToken::new();
        *cancel_slot = Some(cancel.clone());

        let name = self.name.clone();
        let source = Arc::clone(&self.source);
        let downstream = Arc::clone(&self.downstream);

        let handle = tokio::spawn(async move {
            loop {
                // Poll the source first: items it already has ready are
                // delivered even when stop() races with startup. A source
                // waiting for work yields to the cancellation arm.
                let produced = tokio::select! {
                    biased;
                    produced = (source)(cancel.clone()) => produced,
                    _ = cancel.cancelled() => break,
                };
                let Some(item) = produced else { break };

                let sink = downstream
                    .read()
                    .unwrap_or_else(PoisonError::into_inner)
                    .clone();
                match sink.handle(item).await {
                    Ok(true) => {}
                    Ok(false) => {
                        tracing::warn!(producer = %name, sink = sink.name(), "consumer rejected item");
                    }
                    Err(error) => {
                        tracing::warn!(producer = %name, sink = sink.name(), %error, "consumer faulted");
                    }
                }
            }
            tracing::debug!(producer = %name, "background producer stopped");
        });

        *self.worker.lock().unwrap_or_else(PoisonError::into_inner) = Some(handle);
    }

    /// Cancels the worker and waits for it to stop. Safe to call when not
    /// running; the producer can be started again afterwards.
    pub async fn stop(&self) {
        let cancel = self
            .cancel
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(cancel) = cancel {
            cancel.cancel();
        }
        let worker = self
            .worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(worker) = worker {
            let _ = worker.await;
        }
    }

    /// The producer's name (for logs/metrics).
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<T: Send + 'static> Produce<T> for BackgroundProducer<T> {
    fn attach(&self, consumer: Arc<dyn Consume<T>>) {
        *self
            .downstream
            .write()
            .unwrap_or_else(PoisonError::into_inner) = consumer;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    use super::*;
    use crate::consumers::CollectionConsumer;

    #[tokio::test]
    async fn produces_until_the_source_is_exhausted() {
        let counter = Arc::new(AtomicU32::new(0));
        let source_counter = Arc::clone(&counter);
        let producer = BackgroundProducer::new("finite", move |_ctx| {
            let counter = Arc::clone(&source_counter);
            async move {
                match counter.fetch_add(1, Ordering::SeqCst) {
                    n if n < 5 => Some(n),
                    _ => None,
                }
            }
        });

        let collected = CollectionConsumer::new();
        producer.attach(Arc::new(collected.clone()));
        producer.start();
        producer.stop().await;

        assert_eq!(collected.snapshot(), vec![0, 1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn stop_cancels_a_blocked_source() {
        let producer: BackgroundProducer<u32> = BackgroundProducer::new("stuck", |ctx| async move {
            ctx.cancelled().await;
            None
        });
        producer.start();
        // The source never yields an item; stop must still return promptly.
        tokio::time::timeout(Duration::from_secs(1), producer.stop())
            .await
            .expect("stop() hung on a cancelled source");
    }

    #[tokio::test]
    async fn restart_after_stop_produces_again() {
        let counter = Arc::new(AtomicU32::new(0));
        let source_counter = Arc::clone(&counter);
        let producer = BackgroundProducer::new("restartable", move |_ctx| {
            let counter = Arc::clone(&source_counter);
            async move {
                let n = counter.fetch_add(1, Ordering::SeqCst);
                if n % 2 == 0 {
                    Some(n)
                } else {
                    None
                }
            }
        });

        let collected = CollectionConsumer::new();
        producer.attach(Arc::new(collected.clone()));

        producer.start();
        producer.stop().await;
        producer.start();
        producer.stop().await;

        assert_eq!(collected.snapshot(), vec![0, 2]);
    }
}
