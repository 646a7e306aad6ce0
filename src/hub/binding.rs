//! # Handler bindings: one registered handler plus its delivery options.
//!
//! A [`Binding`] is what a subscribe call leaves behind: the handler itself
//! (a sync delegate or an async [`Consume`] object), an optional topic
//! predicate, optional pre/post hooks, and the error callback. Hooks are
//! chosen explicitly at registration time through [`HandlerOptions`]; there
//! is no runtime capability probing.
//!
//! ## Dispatch order (per binding, per event)
//! ```text
//! topic filter rejects ──► failed outcome, body + error callback skipped
//! pre-hook vetoes      ──► failed outcome, body skipped
//! handler faults/panics──► error callback, failed outcome (typed fault)
//! handler completes    ──► post-hook may transform the bool ──► outcome
//! ```

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;

use crate::error::{panic_message, DispatchFault, HandlerError, PanicPayload};
use crate::outcomes::Outcome;
use crate::pipes::Consume;

pub(crate) type DelegateFn<T> = Box<dyn Fn(&T) -> Result<(), HandlerError> + Send + Sync>;
pub(crate) type TopicFn<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;
pub(crate) type BeforeFn = Box<dyn Fn() -> bool + Send + Sync>;
pub(crate) type AfterFn = Box<dyn Fn(bool) -> bool + Send + Sync>;
pub(crate) type ErrorFn = Arc<dyn Fn(&HandlerError) + Send + Sync>;

/// Registration-time options for one handler binding.
///
/// # Example
/// ```
/// use hubcast::HandlerOptions;
///
/// #[derive(Clone)]
/// struct Ping { urgent: bool }
///
/// let options = HandlerOptions::<Ping>::new()
///     .with_topic(|ping| ping.urgent)
///     .with_error(|err| eprintln!("ping handler failed: {err}"));
/// # let _ = options;
/// ```
pub struct HandlerOptions<T> {
    pub(crate) topic: Option<TopicFn<T>>,
    pub(crate) before: Option<BeforeFn>,
    pub(crate) after: Option<AfterFn>,
    pub(crate) on_error: Option<ErrorFn>,
}

impl<T> Default for HandlerOptions<T> {
    fn default() -> Self {
        Self {
            topic: None,
            before: None,
            after: None,
            on_error: None,
        }
    }
}

impl<T> HandlerOptions<T> {
    /// Creates empty options: no topic filter, no hooks, no-op error callback.
    pub fn new() -> Self {
        Self::default()
    }

    /// Admits only events the predicate accepts; rejected events count as a
    /// failed outcome without invoking the handler.
    pub fn with_topic(mut self, topic: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
        self.topic = Some(Box::new(topic));
        self
    }

    /// Invoked when the bound handler faults.
    pub fn with_error(mut self, on_error: impl Fn(&HandlerError) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Arc::new(on_error));
        self
    }

    /// Pre-hook: runs before the handler body and may veto handling.
    /// A veto records a failed outcome without invoking the handler.
    pub fn with_before(mut self, before: impl Fn() -> bool + Send + Sync + 'static) -> Self {
        self.before = Some(Box::new(before));
        self
    }

    /// Post-hook: may transform the handler's boolean result after it runs.
    pub fn with_after(mut self, after: impl Fn(bool) -> bool + Send + Sync + 'static) -> Self {
        self.after = Some(Box::new(after));
        self
    }

    /// Installs an already-shared error callback (manifold registration).
    pub(crate) fn with_error_arc(mut self, on_error: ErrorFn) -> Self {
        self.on_error = Some(on_error);
        self
    }
}

/// The handler half of a binding.
pub(crate) enum HandlerKind<T> {
    /// Synchronous delegate; success unless it returns `Err` or panics.
    Delegate(DelegateFn<T>),
    /// Asynchronous consumer; reports its own accept/reject verdict.
    Consumer(Arc<dyn Consume<T>>),
}

/// One registered handler with its delivery options.
pub(crate) struct Binding<T> {
    kind: HandlerKind<T>,
    topic: Option<TopicFn<T>>,
    before: Option<BeforeFn>,
    after: Option<AfterFn>,
    on_error: ErrorFn,
}

impl<T: Clone + Send + Sync + 'static> Binding<T> {
    pub(crate) fn new(kind: HandlerKind<T>, options: HandlerOptions<T>) -> Self {
        Self {
            kind,
            topic: options.topic,
            before: options.before,
            after: options.after,
            on_error: options.on_error.unwrap_or_else(|| Arc::new(|_| {})),
        }
    }

    /// Delivers one event to this binding, producing exactly one outcome.
    pub(crate) async fn dispatch(&self, event: &T) -> Outcome {
        if let Some(topic) = &self.topic {
            if !topic(event) {
                return Outcome::rejected();
            }
        }
        if let Some(before) = &self.before {
            if !before() {
                return Outcome::rejected();
            }
        }

        match self.invoke(event).await {
            Ok(mut ok) => {
                if let Some(after) = &self.after {
                    ok = after(ok);
                }
                Outcome::of(ok)
            }
            Err(Fault::Error(error)) => {
                (self.on_error)(&error);
                tracing::debug!(fault = "handler_failed", %error, "handler fault during dispatch");
                Outcome::faulted(DispatchFault::from_error(&error))
            }
            Err(Fault::Panic(payload)) => {
                let error: HandlerError = panic_message(&payload).into();
                (self.on_error)(&error);
                tracing::debug!(fault = "handler_panicked", %error, "handler fault during dispatch");
                Outcome::faulted(DispatchFault::from_panic(&payload))
            }
        }
    }

    /// Runs the handler body with panic isolation.
    async fn invoke(&self, event: &T) -> Result<bool, Fault> {
        match &self.kind {
            HandlerKind::Delegate(f) => {
                match std::panic::catch_unwind(AssertUnwindSafe(|| f(event))) {
                    Ok(Ok(())) => Ok(true),
                    Ok(Err(error)) => Err(Fault::Error(error)),
                    Err(payload) => Err(Fault::Panic(payload)),
                }
            }
            HandlerKind::Consumer(consumer) => {
                match AssertUnwindSafe(consumer.handle(event.clone()))
                    .catch_unwind()
                    .await
                {
                    Ok(Ok(ok)) => Ok(ok),
                    Ok(Err(error)) => Err(Fault::Error(error)),
                    Err(payload) => Err(Fault::Panic(payload)),
                }
            }
        }
    }
}

/// What `invoke` caught.
enum Fault {
    Error(HandlerError),
    Panic(PanicPayload),
}
