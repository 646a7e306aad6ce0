//! Capability contracts for composing message-flow stages.
//!
//! This module groups the three minimal polymorphic contracts everything else
//! is built on, plus two trivial consumers used as building blocks.
//!
//! ## Contents
//! - [`Consume`] — accept one item asynchronously, report accept/reject
//! - [`Produce`] — wire a downstream [`Consume`] to receive output
//! - [`Pipe`] — both at once, for transformation stages
//! - [`ActionConsumer`] — closure-backed consumer
//! - [`NullConsumer`] — the no-op sink
//!
//! ## Quick reference
//! ```text
//! Producer ── attach ──► Consume::handle(item) ─► Ok(true)   accepted
//!                                               ─► Ok(false)  rejected (not a fault)
//!                                               ─► Err(_)     handler fault
//! ```

mod consume;
mod pipe;
mod produce;

pub use consume::{ActionConsumer, Consume, NullConsumer};
pub use pipe::Pipe;
pub use produce::Produce;
