//! # FileConsumer: persists each handled item to its own file.
//!
//! Encodes every item with the configured [`Codec`] and writes it to
//! `<dir>/<uuid><extension>`. IO and codec failures surface as handler
//! faults, which outcome aggregation already knows how to fold.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

use crate::codec::Codec;
use crate::error::HandlerError;
use crate::pipes::Consume;

/// Consumer that writes one codec-encoded file per item.
///
/// ## Example
/// ```no_run
/// use hubcast::{Consume, FileConsumer, JsonCodec};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let sink = FileConsumer::new(JsonCodec, "/var/spool/readings");
/// sink.handle(42_u64).await.unwrap();
/// # }
/// ```
pub struct FileConsumer<C> {
    dir: PathBuf,
    extension: String,
    codec: C,
}

impl<C> FileConsumer<C> {
    /// Creates a consumer writing `.dat` files into `dir`.
    ///
    /// The directory must already exist.
    pub fn new(codec: C, dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            extension: ".dat".to_string(),
            codec,
        }
    }

    /// Overrides the file extension (a leading dot is added if missing).
    pub fn with_extension(mut self, extension: &str) -> Self {
        self.extension = if extension.starts_with('.') {
            extension.to_string()
        } else {
            format!(".{extension}")
        };
        self
    }

    /// The directory files are written into.
    pub fn dir(&self) -> &std::path::Path {
        &self.dir
    }
}

#[async_trait]
impl<T, C> Consume<T> for FileConsumer<C>
where
    T: Serialize + Send + 'static,
    C: Codec + 'static,
{
    async fn handle(&self, message: T) -> Result<bool, HandlerError> {
        let bytes = self.codec.encode(&message)?;
        let path = self.dir.join(format!("{}{}", Uuid::new_v4(), self.extension));
        tokio::fs::write(&path, bytes).await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;
    use crate::codec::JsonCodec;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Reading {
        value: u32,
    }

    #[tokio::test]
    async fn writes_one_file_per_item() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileConsumer::new(JsonCodec, dir.path()).with_extension("json");

        assert!(sink.handle(Reading { value: 1 }).await.unwrap());
        assert!(sink.handle(Reading { value: 2 }).await.unwrap());

        let mut values = Vec::new();
        for entry in std::fs::read_dir(dir.path()).unwrap() {
            let path = entry.unwrap().path();
            assert_eq!(path.extension().and_then(|e| e.to_str()), Some("json"));
            let bytes = std::fs::read(&path).unwrap();
            let reading: Reading = JsonCodec.decode(&bytes).unwrap();
            values.push(reading.value);
        }
        values.sort_unstable();
        assert_eq!(values, vec![1, 2]);
    }

    #[tokio::test]
    async fn missing_directory_is_a_handler_fault() {
        let sink = FileConsumer::new(JsonCodec, "/nonexistent/spool/dir");
        assert!(sink.handle(Reading { value: 1 }).await.is_err());
    }
}
