//! # Pipe: a consumer that is also a producer.
//!
//! Transformation stages (decode-then-forward, encode-then-forward, batching)
//! consume one shape and produce another. [`Pipe`] is blanket-implemented, so
//! implementing [`Consume`] and [`Produce`] is all a stage needs.

use crate::pipes::{Consume, Produce};

/// A composable transformation stage: consumes `In`, produces `Out`.
pub trait Pipe<In: Send + 'static, Out: Send + 'static>: Consume<In> + Produce<Out> {}

impl<In, Out, P> Pipe<In, Out> for P
where
    In: Send + 'static,
    Out: Send + 'static,
    P: Consume<In> + Produce<Out>,
{
}
