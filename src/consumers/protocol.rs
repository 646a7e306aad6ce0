//! # ProtocolConsumer: the decoding end of a codec pipe.
//!
//! Consumes byte payloads, decodes them with the configured [`Codec`], and
//! forwards the typed value downstream; downstream consumers never see the
//! serialization mechanism. Until attached, decoded values drain into a
//! no-op sink.

use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::codec::Codec;
use crate::error::HandlerError;
use crate::pipes::{Consume, NullConsumer, Produce};

/// Pipe stage: bytes in, decoded values out.
pub struct ProtocolConsumer<T, C> {
    codec: C,
    downstream: RwLock<Arc<dyn Consume<T>>>,
}

impl<T: Send + 'static, C> ProtocolConsumer<T, C> {
    /// Creates a decode stage with no downstream attached yet.
    pub fn new(codec: C) -> Self {
        Self {
            codec,
            downstream: RwLock::new(Arc::new(NullConsumer)),
        }
    }

    fn downstream(&self) -> Arc<dyn Consume<T>> {
        self.downstream
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl<T, C> Consume<Vec<u8>> for ProtocolConsumer<T, C>
where
    T: DeserializeOwned + Send + 'static,
    C: Codec + 'static,
{
    async fn handle(&self, message: Vec<u8>) -> Result<bool, HandlerError> {
        let value: T = self.codec.decode(&message)?;
        self.downstream().handle(value).await
    }
}

impl<T, C> Produce<T> for ProtocolConsumer<T, C>
where
    T: Send + 'static,
    C: Codec + 'static,
{
    fn attach(&self, consumer: Arc<dyn Consume<T>>) {
        *self
            .downstream
            .write()
            .unwrap_or_else(PoisonError::into_inner) = consumer;
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    use super::*;
    use crate::codec::JsonCodec;
    use crate::consumers::CollectionConsumer;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    struct Reading {
        value: u32,
    }

    #[tokio::test]
    async fn decodes_and_forwards_downstream() {
        let stage: ProtocolConsumer<Reading, _> = ProtocolConsumer::new(JsonCodec);
        let collected = CollectionConsumer::new();
        stage.attach(Arc::new(collected.clone()));

        let bytes = JsonCodec.encode(&Reading { value: 7 }).unwrap();
        assert!(stage.handle(bytes).await.unwrap());
        assert_eq!(collected.snapshot(), vec![Reading { value: 7 }]);
    }

    #[tokio::test]
    async fn malformed_payload_faults() {
        let stage: ProtocolConsumer<Reading, _> = ProtocolConsumer::new(JsonCodec);
        assert!(stage.handle(b"{broken".to_vec()).await.is_err());
    }
}
