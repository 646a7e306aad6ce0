//! Dispatch engine: typed pub/sub with outcome aggregation.
//!
//! The only public entry point is [`Hub`], plus the registration-time types
//! ([`HandlerOptions`], [`Manifold`], [`ManifoldBinding`]).
//!
//! Internal modules:
//! - [`registry`]: type-keyed table of live subscriptions;
//! - [`dispatch`]: per-type dispatch channel and drain worker;
//! - [`binding`]: one registered handler plus its delivery options;
//! - [`manifold`]: explicit multi-type registration.
//!
//! ## System wiring
//! ```text
//! subscribe::<T>(...)            publish(event).await
//!        │                              │
//!        ▼                              ▼
//! Registry[TypeId(T)] ──────► TypedChannel<T> (unbounded queue)
//!   ├─ bindings: Vec<Binding<T>>        │
//!   ├─ CancellationToken                ▼
//!   └─ JoinHandle ──────────── drain worker (one per type)
//!                                for each binding, in order:
//!                                  topic? → before? → handle → after?
//!                                  └► Outcome ──► OutcomeLedger
//!                                fold batch (OutcomePolicy) ──► reply
//! ```

mod binding;
mod dispatch;
mod hub;
mod manifold;
mod registry;

pub use binding::HandlerOptions;
pub use hub::Hub;
pub use manifold::{Manifold, ManifoldBinding};
