//! Collaborator consumers: simple single-purpose sinks and pipe stages.
//!
//! ## Contents
//! - [`CollectionConsumer`] — fan-in into a shared in-memory vector
//! - [`FileConsumer`] — one codec-encoded file per item
//! - [`ProtocolConsumer`] — decode stage: bytes in, typed values out

mod collection;
mod file;
mod protocol;

pub use collection::CollectionConsumer;
pub use file::FileConsumer;
pub use protocol::ProtocolConsumer;
