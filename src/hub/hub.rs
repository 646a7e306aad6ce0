//! # Hub: the publish/subscribe dispatch engine.
//!
//! Registers handlers by delegate, by [`Consume`] object, or by explicit
//! [`Manifold`](crate::Manifold) set; applies topic filters; invokes handlers
//! with fault isolation; and folds per-handler outcomes into one boolean per
//! publish under the hub's [`OutcomePolicy`].

use std::sync::Arc;

use tokio::sync::oneshot;

use crate::error::HandlerError;
use crate::hub::binding::{Binding, HandlerKind, HandlerOptions};
use crate::hub::dispatch::{open_channel, Envelope, TypedChannel};
use crate::hub::manifold::Manifold;
use crate::hub::registry::Registry;
use crate::pipes::Consume;
use crate::policies::OutcomePolicy;

/// In-process publish/subscribe hub.
///
/// Cheap to clone (clones share one dispatch engine). Each subscribed event
/// type gets a single serialized drain worker, so handlers for one type never
/// run concurrently with each other while different types dispatch in
/// parallel.
///
/// ## Example
/// ```
/// use hubcast::Hub;
///
/// #[derive(Clone)]
/// struct OrderPlaced {
///     total_cents: u64,
/// }
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     let hub = Hub::new();
///     hub.subscribe(|order: &OrderPlaced| {
///         if order.total_cents == 0 {
///             return Err("empty order".into());
///         }
///         Ok(())
///     });
///
///     assert!(hub.publish(OrderPlaced { total_cents: 1299 }).await);
///     assert!(!hub.publish(OrderPlaced { total_cents: 0 }).await);
///     hub.shutdown().await;
/// }
/// ```
#[derive(Clone)]
pub struct Hub {
    inner: Arc<HubInner>,
}

struct HubInner {
    registry: Registry,
    policy: OutcomePolicy,
}

impl Default for Hub {
    fn default() -> Self {
        Self::new()
    }
}

impl Hub {
    /// Creates a hub resolving publishes pessimistically.
    pub fn new() -> Self {
        Self::with_policy(OutcomePolicy::default())
    }

    /// Creates a hub with an explicit outcome policy.
    pub fn with_policy(policy: OutcomePolicy) -> Self {
        Self {
            inner: Arc::new(HubInner {
                registry: Registry::new(),
                policy,
            }),
        }
    }

    /// Returns the hub's outcome policy.
    pub fn policy(&self) -> OutcomePolicy {
        self.inner.policy
    }

    /// Subscribes a delegate handler for events of type `T`.
    ///
    /// The delegate runs synchronously on the type's drain worker; returning
    /// `Err` (or panicking) records a failed outcome and fires the binding's
    /// error callback.
    ///
    /// Must be called from within a tokio runtime (the first registration for
    /// a type spawns its drain worker).
    pub fn subscribe<T, F>(&self, handler: F)
    where
        T: Clone + Send + Sync + 'static,
        F: Fn(&T) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        self.subscribe_with(handler, HandlerOptions::new());
    }

    /// Subscribes a delegate handler with explicit options (topic filter,
    /// error callback, pre/post hooks).
    pub fn subscribe_with<T, F>(&self, handler: F, options: HandlerOptions<T>)
    where
        T: Clone + Send + Sync + 'static,
        F: Fn(&T) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        self.channel::<T>()
            .push_binding(Binding::new(HandlerKind::Delegate(Box::new(handler)), options));
    }

    /// Subscribes a [`Consume`] object for events of type `T`.
    pub fn subscribe_consumer<T, C>(&self, consumer: Arc<C>)
    where
        T: Clone + Send + Sync + 'static,
        C: Consume<T>,
    {
        self.subscribe_consumer_with(consumer, HandlerOptions::new());
    }

    /// Subscribes a [`Consume`] object with explicit options.
    pub fn subscribe_consumer_with<T, C>(&self, consumer: Arc<C>, options: HandlerOptions<T>)
    where
        T: Clone + Send + Sync + 'static,
        C: Consume<T>,
    {
        let consumer: Arc<dyn Consume<T>> = consumer;
        self.channel::<T>()
            .push_binding(Binding::new(HandlerKind::Consumer(consumer), options));
    }

    /// Subscribes every binding a [`Manifold`] handler declares.
    ///
    /// Required when one object consumes more than one event type.
    pub fn subscribe_manifold<M: Manifold + 'static>(&self, manifold: Arc<M>) {
        for binding in manifold.bindings() {
            binding.register(self, None);
        }
    }

    /// Subscribes a [`Manifold`] handler, sharing one error callback across
    /// all of its bindings.
    pub fn subscribe_manifold_with<M, E>(&self, manifold: Arc<M>, on_error: E)
    where
        M: Manifold + 'static,
        E: Fn(&HandlerError) + Send + Sync + 'static,
    {
        let on_error: crate::hub::binding::ErrorFn = Arc::new(on_error);
        for binding in manifold.bindings() {
            binding.register(self, Some(on_error.clone()));
        }
    }

    /// Removes the subscription for `T`.
    ///
    /// In-flight dispatch for the type observes cancellation and stops
    /// delivering further callbacks; outcomes already recorded remain valid.
    /// Registrations made afterwards get a fresh, independent channel.
    pub fn unsubscribe<T: 'static>(&self) {
        self.inner.registry.remove::<T>();
    }

    /// Publishes an event, resolving once every handler bound to its type has
    /// produced an outcome for exactly this publish.
    ///
    /// Returns the fold of those outcomes under the hub policy (pessimistic
    /// by default: `true` iff every handler succeeded). Publishing a type
    /// with no live subscription resolves the empty outcome set under the
    /// policy without creating a channel.
    pub async fn publish<T: Send + 'static>(&self, event: T) -> bool {
        match self.send(event) {
            Ok(reply) => reply.await.unwrap_or(false),
            Err(resolved) => resolved,
        }
    }

    /// Synchronous [`Hub::publish`]: blocks the calling thread until the
    /// publish resolves.
    ///
    /// Must not be called from async context; use [`Hub::publish`] there.
    pub fn publish_blocking<T: Send + 'static>(&self, event: T) -> bool {
        match self.send(event) {
            Ok(reply) => reply.blocking_recv().unwrap_or(false),
            Err(resolved) => resolved,
        }
    }

    /// Cancels every subscription and waits until every drain worker has
    /// actually stopped. Idempotent.
    pub async fn shutdown(&self) {
        for worker in self.inner.registry.drain() {
            let _ = worker.await;
        }
    }

    /// Enqueues the event, or resolves immediately when no subscription
    /// exists (`Err` carries the resolved result).
    fn send<T: Send + 'static>(&self, event: T) -> Result<oneshot::Receiver<bool>, bool> {
        let Some(channel) = self.inner.registry.get::<T>() else {
            return Err(self.inner.policy.resolve(&[]));
        };
        let (reply, rx) = oneshot::channel();
        match channel.tx.send(Envelope { event, reply }) {
            Ok(()) => Ok(rx),
            // The drain worker is gone; delivery can no longer be guaranteed.
            Err(_) => Err(false),
        }
    }

    fn channel<T: Clone + Send + Sync + 'static>(&self) -> TypedChannel<T> {
        let policy = self.inner.policy;
        self.inner
            .registry
            .get_or_create(|cancel| open_channel::<T>(policy, cancel))
    }
}
