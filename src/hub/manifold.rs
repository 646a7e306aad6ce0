//! # Manifold subscription: one object consuming several event types.
//!
//! A handler that consumes more than one event type registers through
//! [`Manifold`]: it enumerates the finite set of typed consumer bindings it
//! wants bound, and the hub iterates that explicit set. Nothing is discovered
//! at runtime: the set is declared by the implementor.
//!
//! ## Example
//! ```
//! use std::sync::Arc;
//! use async_trait::async_trait;
//! use hubcast::{Consume, HandlerError, Manifold, ManifoldBinding};
//!
//! #[derive(Clone)]
//! struct Opened;
//! #[derive(Clone)]
//! struct Closed;
//!
//! struct Auditor;
//!
//! #[async_trait]
//! impl Consume<Opened> for Auditor {
//!     async fn handle(&self, _: Opened) -> Result<bool, HandlerError> { Ok(true) }
//! }
//!
//! #[async_trait]
//! impl Consume<Closed> for Auditor {
//!     async fn handle(&self, _: Closed) -> Result<bool, HandlerError> { Ok(true) }
//! }
//!
//! impl Manifold for Auditor {
//!     fn bindings(self: Arc<Self>) -> Vec<ManifoldBinding> {
//!         vec![
//!             ManifoldBinding::consume::<Opened, _>(self.clone()),
//!             ManifoldBinding::consume::<Closed, _>(self),
//!         ]
//!     }
//! }
//! ```

use std::sync::Arc;

use crate::hub::binding::{ErrorFn, HandlerOptions};
use crate::hub::Hub;
use crate::pipes::Consume;

/// A handler that consumes more than one event type.
///
/// Implementors enumerate every typed consumer binding they want registered;
/// [`Hub::subscribe_manifold`] iterates the set.
pub trait Manifold: Send + Sync {
    /// Returns the finite set of (event type, consumer) bindings to register.
    fn bindings(self: Arc<Self>) -> Vec<ManifoldBinding>;
}

/// One deferred typed registration produced by a [`Manifold`].
pub struct ManifoldBinding {
    apply: Box<dyn FnOnce(&Hub, Option<ErrorFn>) + Send>,
}

impl ManifoldBinding {
    /// Binds `consumer` as the handler for event type `T`.
    pub fn consume<T, C>(consumer: Arc<C>) -> Self
    where
        T: Clone + Send + Sync + 'static,
        C: Consume<T>,
    {
        Self {
            apply: Box::new(move |hub, on_error| {
                let mut options = HandlerOptions::new();
                if let Some(on_error) = on_error {
                    options = options.with_error_arc(on_error);
                }
                hub.subscribe_consumer_with(consumer, options);
            }),
        }
    }

    /// Registers this binding on the hub.
    pub(crate) fn register(self, hub: &Hub, on_error: Option<ErrorFn>) {
        (self.apply)(hub, on_error);
    }
}
