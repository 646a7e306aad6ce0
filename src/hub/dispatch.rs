//! # Per-type drain worker.
//!
//! Each subscribed event type gets exactly one unbounded dispatch channel and
//! one drain worker. Publishers enqueue an [`Envelope`] (event + oneshot
//! reply); the worker delivers the event to every binding in registration
//! order, records one [`Outcome`] per binding into the type's ledger, folds
//! that batch under the hub's [`OutcomePolicy`], and answers the reply.
//!
//! ## Rules
//! - Handlers for one type never run concurrently (single worker per type).
//! - Each publish resolves against exactly its own outcome batch: concurrent
//!   publishes to the same type cannot corrupt each other's results.
//! - Once the worker is cancelled, every envelope still queued (and every
//!   reply dropped on the floor) resolves to `false`: the channel is gone and
//!   delivery can no longer be guaranteed.
//!
//! ```text
//! publish ──► [unbounded queue] ──► drain worker ──► binding #1 ─► outcome
//!                                        │          binding #2 ─► outcome
//!                                        │               ...
//!                                        └── fold batch ──► oneshot reply
//! ```

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::DispatchFault;
use crate::hub::binding::Binding;
use crate::outcomes::{Outcome, OutcomeLedger};
use crate::policies::OutcomePolicy;

/// One queued publish: the event plus the slot its result is reported into.
pub(crate) struct Envelope<T> {
    pub(crate) event: T,
    pub(crate) reply: oneshot::Sender<bool>,
}

/// The typed half of a registry entry: the dispatch queue sender and the
/// binding list shared with the drain worker.
pub(crate) struct TypedChannel<T> {
    pub(crate) tx: mpsc::UnboundedSender<Envelope<T>>,
    pub(crate) bindings: Arc<Mutex<Vec<Arc<Binding<T>>>>>,
}

impl<T> Clone for TypedChannel<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            bindings: Arc::clone(&self.bindings),
        }
    }
}

impl<T> TypedChannel<T> {
    /// Appends a binding; the drain worker observes it for subsequent events.
    pub(crate) fn push_binding(&self, binding: Binding<T>) {
        self.bindings
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::new(binding));
    }
}

/// Creates the channel for one event type and spawns its drain worker.
pub(crate) fn open_channel<T: Clone + Send + Sync + 'static>(
    policy: OutcomePolicy,
    cancel: CancellationToken,
) -> (TypedChannel<T>, JoinHandle<()>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let bindings: Arc<Mutex<Vec<Arc<Binding<T>>>>> = Arc::new(Mutex::new(Vec::new()));
    let worker = tokio::spawn(drain(rx, Arc::clone(&bindings), policy, cancel));
    (TypedChannel { tx, bindings }, worker)
}

/// Serialized dispatch loop for one event type.
async fn drain<T: Clone + Send + Sync + 'static>(
    mut rx: mpsc::UnboundedReceiver<Envelope<T>>,
    bindings: Arc<Mutex<Vec<Arc<Binding<T>>>>>,
    policy: OutcomePolicy,
    cancel: CancellationToken,
) {
    let mut ledger = OutcomeLedger::new();

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            next = rx.recv() => match next {
                Some(envelope) => {
                    dispatch_event(envelope, &bindings, &mut ledger, policy, &cancel).await;
                }
                None => break,
            }
        }
    }

    // The subscription is gone; fail every publish still queued.
    rx.close();
    while let Ok(envelope) = rx.try_recv() {
        let _ = envelope.reply.send(false);
    }
}

/// Delivers one event to every binding and answers its publish.
async fn dispatch_event<T: Clone + Send + Sync + 'static>(
    envelope: Envelope<T>,
    bindings: &Arc<Mutex<Vec<Arc<Binding<T>>>>>,
    ledger: &mut OutcomeLedger,
    policy: OutcomePolicy,
    cancel: &CancellationToken,
) {
    let snapshot: Vec<Arc<Binding<T>>> = bindings
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .clone();

    let mark = ledger.mark();
    for binding in &snapshot {
        // Cancellation mid-dispatch: stop delivering further callbacks, but
        // keep already-recorded outcomes valid and fill one failed slot per
        // remaining binding so the publish still resolves.
        if cancel.is_cancelled() {
            ledger.record(Outcome::faulted(DispatchFault::ChannelClosed));
            continue;
        }
        ledger.record(binding.dispatch(&envelope.event).await);
    }

    let batch = ledger.take_batch(mark);
    let _ = envelope.reply.send(policy.resolve(&batch));
}
