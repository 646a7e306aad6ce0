//! # hubcast
//!
//! **hubcast** is an in-process publish/subscribe library for Rust.
//!
//! It routes typed events through a central [`Hub`] to any number of
//! subscribers, folds per-handler outcomes into a single publish result, and
//! windows item streams into bounded batches with a defined redelivery path
//! for failures. The crate is designed as a building block for services that
//! need eventing without a broker.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!  publishers (any thread/task)              subscribers
//!  ───────────────────────────              ────────────────────────────
//!   hub.publish(OrderPlaced { .. })          delegates   Fn(&T) -> Result
//!   hub.publish(StockMoved { .. })           consumers   Consume<T>
//!          │                                 manifolds   Manifold (N types)
//!          ▼
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │ Hub                                                                  │
//! │  Registry: TypeId ─► TypedChannel (one per event type)               │
//! │    ├─ bindings (registration order)                                  │
//! │    ├─ CancellationToken (unsubscribe / shutdown)                     │
//! │    └─ drain worker: topic? → before? → handle → after? → Outcome     │
//! │  OutcomeLedger per type; OutcomePolicy folds each publish's batch    │
//! └──────────────────────────────────────────────────────────────────────┘
//!          │
//!          ▼ per publish: future<bool> (pessimistic by default)
//!
//!  item streams
//!  ────────────
//!   consumer.handle(item) ─► BatchingConsumer ─► handle_batch(&[T])
//!                               │ count/interval window      │ false/panic
//!                               └── reopen window            ▼
//!                                              undeliverable sink (per item)
//! ```
//!
//! ### Delivery rules
//! - One serialized drain worker per event type: handlers for the same type
//!   never run concurrently and observe events in dequeue order; different
//!   types dispatch fully in parallel.
//! - A publish resolves against exactly the outcomes generated by that
//!   publish: interleaved publishes to one type cannot corrupt each other.
//! - Handler faults and panics are caught at the dispatch boundary, routed to
//!   the binding's error callback, and recorded as failed outcomes; they
//!   never reach the publisher.
//! - No per-handler timeout exists: a hung handler hangs its type's dispatch.
//!   This is a documented limitation.
//!
//! ## Features
//! | Area             | Description                                            | Key types / traits                          |
//! |------------------|--------------------------------------------------------|---------------------------------------------|
//! | **Dispatch**     | Typed pub/sub with filters, hooks, outcome folding.    | [`Hub`], [`HandlerOptions`], [`Manifold`]   |
//! | **Outcomes**     | Per-handler results and resolution policies.           | [`Outcome`], [`OutcomePolicy`]              |
//! | **Batching**     | Count/interval windows with undeliverable redelivery.  | [`BatchingConsumer`], [`BatchWindow`]       |
//! | **Capabilities** | Composable consumer/producer/pipe contracts.           | [`Consume`], [`Produce`], [`Pipe`]          |
//! | **Codecs**       | Pluggable payload (de)serialization.                   | [`Codec`], [`JsonCodec`], [`BinaryCodec`]   |
//! | **Collaborators**| File/collection sinks, protocol stages, hosted sources.| [`FileConsumer`], [`BackgroundProducer`]    |
//! | **Errors**       | Typed faults for dispatch and codecs.                  | [`DispatchFault`], [`CodecError`]           |
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use hubcast::{BatchFn, BatchWindow, BatchingConsumer, Consume, HandlerOptions, Hub};
//!
//! #[derive(Clone)]
//! struct Reading {
//!     sensor: u32,
//!     value: f64,
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     // Dispatch: route readings to a handler, filtered by topic.
//!     let hub = Hub::new();
//!     hub.subscribe_with(
//!         |reading: &Reading| {
//!             if reading.value.is_nan() {
//!                 return Err("reading is not a number".into());
//!             }
//!             Ok(())
//!         },
//!         HandlerOptions::new().with_topic(|reading: &Reading| reading.sensor < 16),
//!     );
//!     assert!(hub.publish(Reading { sensor: 3, value: 21.5 }).await);
//!
//!     // Batching: accumulate readings, flush every 2 items.
//!     let flushed = Arc::new(AtomicUsize::new(0));
//!     let probe = Arc::clone(&flushed);
//!     let batches = BatchingConsumer::new(
//!         BatchFn::arc(move |batch: &[Reading]| {
//!             probe.fetch_add(batch.len(), Ordering::SeqCst);
//!             true
//!         }),
//!         BatchWindow::items(2),
//!     );
//!     for sensor in 0..2 {
//!         batches.handle(Reading { sensor, value: 1.0 }).await.unwrap();
//!     }
//!     batches.close().await;
//!     assert_eq!(flushed.load(Ordering::SeqCst), 2);
//!
//!     hub.shutdown().await;
//! }
//! ```

mod batch;
mod codec;
mod consumers;
mod error;
mod hub;
mod outcomes;
mod pipes;
mod policies;
mod producers;

// ---- Public re-exports ----

pub use batch::{BatchFn, BatchWindow, BatchingConsumer, HandleBatch};
pub use codec::{BinaryCodec, Codec, JsonCodec};
pub use consumers::{CollectionConsumer, FileConsumer, ProtocolConsumer};
pub use error::{CodecError, DispatchFault, HandlerError};
pub use hub::{HandlerOptions, Hub, Manifold, ManifoldBinding};
pub use outcomes::Outcome;
pub use pipes::{ActionConsumer, Consume, NullConsumer, Pipe, Produce};
pub use policies::{OutcomePolicy, RetryDecision};
pub use producers::{BackgroundProducer, ProtocolProducer};
