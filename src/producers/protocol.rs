//! # ProtocolProducer: the encoding end of a codec pipe.
//!
//! Consumes typed values, encodes them with the configured [`Codec`], and
//! forwards the byte payload downstream; the serialization mechanism stays
//! invisible on both sides of the pipe.

use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use serde::Serialize;

use crate::codec::Codec;
use crate::error::HandlerError;
use crate::pipes::{Consume, NullConsumer, Produce};

/// Pipe stage: typed values in, encoded bytes out.
pub struct ProtocolProducer<C> {
    codec: C,
    downstream: RwLock<Arc<dyn Consume<Vec<u8>>>>,
}

impl<C> ProtocolProducer<C> {
    /// Creates an encode stage with no downstream attached yet.
    pub fn new(codec: C) -> Self {
        Self {
            codec,
            downstream: RwLock::new(Arc::new(NullConsumer)),
        }
    }

    fn downstream(&self) -> Arc<dyn Consume<Vec<u8>>> {
        self.downstream
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl<T, C> Consume<T> for ProtocolProducer<C>
where
    T: Serialize + Send + 'static,
    C: Codec + 'static,
{
    async fn handle(&self, message: T) -> Result<bool, HandlerError> {
        let bytes = self.codec.encode(&message)?;
        self.downstream().handle(bytes).await
    }
}

impl<C: Codec + 'static> Produce<Vec<u8>> for ProtocolProducer<C> {
    fn attach(&self, consumer: Arc<dyn Consume<Vec<u8>>>) {
        *self
            .downstream
            .write()
            .unwrap_or_else(PoisonError::into_inner) = consumer;
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;
    use crate::codec::BinaryCodec;
    use crate::consumers::{CollectionConsumer, ProtocolConsumer};

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    struct Reading {
        value: u32,
    }

    #[tokio::test]
    async fn encode_and_decode_stages_compose_into_a_pipe() {
        // value ─► encode ─► bytes ─► decode ─► value
        let encode = ProtocolProducer::new(BinaryCodec);
        let decode: Arc<ProtocolConsumer<Reading, _>> =
            Arc::new(ProtocolConsumer::new(BinaryCodec));
        let collected = CollectionConsumer::new();

        decode.attach(Arc::new(collected.clone()));
        encode.attach(decode);

        assert!(encode.handle(Reading { value: 11 }).await.unwrap());
        assert_eq!(collected.snapshot(), vec![Reading { value: 11 }]);
    }
}
