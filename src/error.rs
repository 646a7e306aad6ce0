//! Error types used by the dispatch engine and codecs.
//!
//! This module defines:
//!
//! - [`HandlerError`] — the boxed error a handler body reports when it faults.
//! - [`DispatchFault`] — what the dispatcher recorded about a failed delivery.
//! - [`CodecError`] — encode/decode failures from payload codecs.
//!
//! Fault types provide `as_label()` helpers returning short stable labels
//! for logs and metrics.

use thiserror::Error;

/// Boxed error reported by a handler body.
///
/// Handlers and consumers surface faults as this type; the dispatcher catches
/// them, routes them to the binding's error callback, and records a failed
/// [`Outcome`](crate::Outcome). Faults never propagate to the publisher.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// # What went wrong while delivering one event to one handler.
///
/// Recorded on the failed [`Outcome`](crate::Outcome) so that a transport
/// failure ([`DispatchFault::ChannelClosed`]) stays distinguishable from a
/// failure inside user code ([`DispatchFault::Handler`],
/// [`DispatchFault::Panicked`]), even though both collapse to `false` in the
/// aggregate publish result.
#[non_exhaustive]
#[derive(Error, Debug, Clone)]
pub enum DispatchFault {
    /// The handler body returned an error.
    #[error("handler failed: {error}")]
    Handler {
        /// The underlying error message.
        error: String,
    },

    /// The handler body panicked; the panic was caught at the dispatch boundary.
    #[error("handler panicked: {error}")]
    Panicked {
        /// The panic payload, rendered as text.
        error: String,
    },

    /// The type's delivery channel stopped before the event was handled.
    ///
    /// Delivery can no longer be guaranteed for that subscription, so any
    /// outcome still awaiting resolution is failed with this fault.
    #[error("delivery channel closed before the event was handled")]
    ChannelClosed,
}

impl DispatchFault {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            DispatchFault::Handler { .. } => "handler_failed",
            DispatchFault::Panicked { .. } => "handler_panicked",
            DispatchFault::ChannelClosed => "channel_closed",
        }
    }

    /// Builds a [`DispatchFault::Handler`] from a caught handler error.
    pub(crate) fn from_error(error: &HandlerError) -> Self {
        DispatchFault::Handler {
            error: error.to_string(),
        }
    }

    /// Builds a [`DispatchFault::Panicked`] from a caught panic payload.
    pub(crate) fn from_panic(payload: &PanicPayload) -> Self {
        DispatchFault::Panicked {
            error: panic_message(payload),
        }
    }
}

/// Payload carried by a caught panic.
pub(crate) type PanicPayload = Box<dyn std::any::Any + Send>;

/// Renders a panic payload as text (panics carry `&str` or `String` almost
/// exclusively; anything else is opaque).
pub(crate) fn panic_message(payload: &PanicPayload) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "opaque panic payload".to_string()
    }
}

/// # Errors produced by payload codecs.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum CodecError {
    /// A typed value could not be encoded to bytes.
    #[error("encode failed: {error}")]
    Encode {
        /// The underlying error message.
        error: String,
    },

    /// A byte payload could not be decoded into the requested type.
    #[error("decode failed: {error}")]
    Decode {
        /// The underlying error message.
        error: String,
    },
}

impl CodecError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            CodecError::Encode { .. } => "codec_encode_failed",
            CodecError::Decode { .. } => "codec_decode_failed",
        }
    }

    /// Wraps an encoder error.
    pub fn encode(error: impl std::fmt::Display) -> Self {
        CodecError::Encode {
            error: error.to_string(),
        }
    }

    /// Wraps a decoder error.
    pub fn decode(error: impl std::fmt::Display) -> Self {
        CodecError::Decode {
            error: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fault_labels_are_stable() {
        let fault = DispatchFault::Handler {
            error: "boom".into(),
        };
        assert_eq!(fault.as_label(), "handler_failed");
        assert_eq!(fault.to_string(), "handler failed: boom");
        assert_eq!(DispatchFault::ChannelClosed.as_label(), "channel_closed");
    }

    #[test]
    fn panic_payloads_render_as_text() {
        let payload: PanicPayload = Box::new("went sideways");
        assert!(matches!(
            DispatchFault::from_panic(&payload),
            DispatchFault::Panicked { error } if error == "went sideways"
        ));

        let payload: PanicPayload = Box::new(42_u32);
        assert!(matches!(
            DispatchFault::from_panic(&payload),
            DispatchFault::Panicked { error } if error == "opaque panic payload"
        ));
    }

    #[test]
    fn codec_errors_carry_context() {
        let err = CodecError::decode("unexpected end of input");
        assert_eq!(err.as_label(), "codec_decode_failed");
        assert_eq!(err.to_string(), "decode failed: unexpected end of input");
    }
}
