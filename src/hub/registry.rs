//! # Subscription registry: type key → live subscription.
//!
//! Maps each subscribed event type (by [`TypeId`], an explicit static type
//! descriptor, never reflection) to its dispatch channel, cancellation token,
//! and drain worker handle. Exactly one channel ever exists per type: the map
//! is guarded by a single lock, so concurrent `get_or_create` calls for the
//! same type race on insert-if-absent and later callers receive the existing
//! channel.
//!
//! ## Rules
//! - The registry owns the per-type handles (`JoinHandle` + `CancellationToken`).
//! - `remove` cancels the type's token and drops the entry; removing a type
//!   that was never subscribed is a no-op.
//! - `drain` cancels everything and hands the worker handles back so the
//!   caller can await the workers actually stopping.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::hub::dispatch::TypedChannel;

/// Handle to one live subscription.
struct Entry {
    /// Type-erased [`TypedChannel<T>`] for the entry's event type.
    channel: Box<dyn Any + Send>,
    /// Cancellation token for the type's drain worker.
    cancel: CancellationToken,
    /// Join handle for the drain worker.
    worker: JoinHandle<()>,
}

/// Type-keyed table of live subscriptions.
#[derive(Default)]
pub(crate) struct Registry {
    entries: Mutex<HashMap<TypeId, Entry>>,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Returns the channel for `T` if a subscription is live.
    pub(crate) fn get<T: 'static>(&self) -> Option<TypedChannel<T>> {
        let entries = self.lock();
        entries.get(&TypeId::of::<T>()).map(downcast_channel)
    }

    /// Returns the channel for `T`, creating it (and its drain worker)
    /// through `create` if this is the first registration for the type.
    pub(crate) fn get_or_create<T, F>(&self, create: F) -> TypedChannel<T>
    where
        T: 'static + Send,
        F: FnOnce(CancellationToken) -> (TypedChannel<T>, JoinHandle<()>),
    {
        let mut entries = self.lock();
        if let Some(entry) = entries.get(&TypeId::of::<T>()) {
            return downcast_channel(entry);
        }

        let cancel = CancellationToken::new();
        let (channel, worker) = create(cancel.clone());
        entries.insert(
            TypeId::of::<T>(),
            Entry {
                channel: Box::new(channel.clone()),
                cancel,
                worker,
            },
        );
        channel
    }

    /// Cancels and drops the subscription for `T`. No-op for unknown types.
    pub(crate) fn remove<T: 'static>(&self) {
        let entry = self.lock().remove(&TypeId::of::<T>());
        if let Some(entry) = entry {
            entry.cancel.cancel();
        }
    }

    /// Cancels every subscription and returns the drain worker handles for
    /// the caller to await.
    pub(crate) fn drain(&self) -> Vec<JoinHandle<()>> {
        let entries: Vec<Entry> = {
            let mut map = self.lock();
            map.drain().map(|(_, entry)| entry).collect()
        };
        entries
            .into_iter()
            .map(|entry| {
                entry.cancel.cancel();
                entry.worker
            })
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<TypeId, Entry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn downcast_channel<T: 'static>(entry: &Entry) -> TypedChannel<T> {
    entry
        .channel
        .downcast_ref::<TypedChannel<T>>()
        .expect("registry entry matches its TypeId key")
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hub::dispatch::open_channel;
    use crate::policies::OutcomePolicy;

    #[derive(Clone)]
    struct Ping;

    #[tokio::test]
    async fn same_type_reuses_the_channel() {
        let registry = Registry::new();
        let first = registry
            .get_or_create(|cancel| open_channel::<Ping>(OutcomePolicy::Pessimistic, cancel));
        let second = registry
            .get_or_create(|cancel| open_channel::<Ping>(OutcomePolicy::Pessimistic, cancel));

        assert!(std::sync::Arc::ptr_eq(&first.bindings, &second.bindings));
        assert_eq!(registry.drain().len(), 1);
    }

    #[tokio::test]
    async fn removing_unknown_type_is_a_noop() {
        let registry = Registry::new();
        registry.remove::<Ping>();
        assert!(registry.get::<Ping>().is_none());
    }
}
