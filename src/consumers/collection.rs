//! # CollectionConsumer: fan-in into a shared in-memory vector.
//!
//! Accepts every item into an append-only shared buffer. Useful as a test
//! probe, an undeliverable sink you can inspect, or a simple fan-in point.
//! Clones share the same buffer.

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;

use crate::error::HandlerError;
use crate::pipes::Consume;

/// Consumer that collects everything it handles.
pub struct CollectionConsumer<T> {
    items: Arc<Mutex<Vec<T>>>,
}

impl<T> Clone for CollectionConsumer<T> {
    fn clone(&self) -> Self {
        Self {
            items: Arc::clone(&self.items),
        }
    }
}

impl<T> Default for CollectionConsumer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> CollectionConsumer<T> {
    /// Creates an empty collection consumer.
    pub fn new() -> Self {
        Self {
            items: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Number of collected items.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// True if nothing has been collected.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Removes and returns everything collected so far, in arrival order.
    pub fn drain(&self) -> Vec<T> {
        self.lock().drain(..).collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<T>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Clone> CollectionConsumer<T> {
    /// Returns a copy of everything collected so far, in arrival order.
    pub fn snapshot(&self) -> Vec<T> {
        self.lock().clone()
    }
}

#[async_trait]
impl<T: Send + 'static> Consume<T> for CollectionConsumer<T> {
    async fn handle(&self, message: T) -> Result<bool, HandlerError> {
        self.lock().push(message);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn collects_in_arrival_order() {
        let consumer = CollectionConsumer::new();
        for n in 0..4 {
            assert!(consumer.handle(n).await.unwrap());
        }

        assert_eq!(consumer.len(), 4);
        assert_eq!(consumer.snapshot(), vec![0, 1, 2, 3]);
        assert_eq!(consumer.drain(), vec![0, 1, 2, 3]);
        assert!(consumer.is_empty());
    }

    #[tokio::test]
    async fn clones_share_the_buffer() {
        let consumer = CollectionConsumer::new();
        let other = consumer.clone();
        consumer.handle("a").await.unwrap();
        other.handle("b").await.unwrap();
        assert_eq!(consumer.snapshot(), vec!["a", "b"]);
    }
}
