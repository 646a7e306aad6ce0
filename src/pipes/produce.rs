//! # Core producer trait
//!
//! A [`Produce`] is anything with a downstream: it accepts a [`Consume`] and
//! forwards its output there. Attachment uses interior mutability so a shared
//! producer can be re-pointed at a different consumer while running; stages
//! that have not been attached yet forward into a no-op sink.

use std::sync::Arc;

use crate::pipes::Consume;

/// Contract for wiring a downstream consumer.
pub trait Produce<T: Send + 'static>: Send + Sync {
    /// Attaches the consumer that will receive this producer's output,
    /// replacing any previous attachment.
    fn attach(&self, consumer: Arc<dyn Consume<T>>);
}
