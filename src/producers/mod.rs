//! Collaborator producers: hosted sources and the encoding pipe stage.
//!
//! ## Contents
//! - [`BackgroundProducer`] — hosts a continuously-invoked async source on a
//!   cancellable worker
//! - [`ProtocolProducer`] — encode stage: typed values in, bytes out

mod background;
mod protocol;

pub use background::BackgroundProducer;
pub use protocol::ProtocolProducer;
