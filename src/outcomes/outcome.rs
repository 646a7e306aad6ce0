//! # Outcome: the result of delivering one event to one handler.

use crate::error::DispatchFault;

/// Result of one handler invocation for one event.
///
/// Three shapes occur:
/// - `ok == true` — the handler accepted the event;
/// - `ok == false, fault == None` — the event was rejected without running
///   the handler body (topic filter, pre-hook veto) or the handler reported
///   rejection;
/// - `ok == false, fault == Some(_)` — delivery faulted; the fault kind keeps
///   transport failures distinguishable from handler failures.
#[derive(Clone, Debug)]
pub struct Outcome {
    /// Whether this handler's handling of the event succeeded.
    pub ok: bool,
    /// The captured fault, if delivery failed abnormally.
    pub fault: Option<DispatchFault>,
}

impl Outcome {
    /// Records a plain boolean result with no fault attached.
    pub fn of(ok: bool) -> Self {
        Self { ok, fault: None }
    }

    /// Records a rejection that never ran the handler body (topic filter or
    /// pre-hook veto). Counts against aggregation but is not an error.
    pub fn rejected() -> Self {
        Self::of(false)
    }

    /// Records a failed delivery with its captured fault.
    pub fn faulted(fault: DispatchFault) -> Self {
        Self {
            ok: false,
            fault: Some(fault),
        }
    }

    /// True if this outcome failed because of a fault (rather than a
    /// filter/pre-hook rejection or a reported `false`).
    pub fn is_fault(&self) -> bool {
        self.fault.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_is_failed_but_not_a_fault() {
        let outcome = Outcome::rejected();
        assert!(!outcome.ok);
        assert!(!outcome.is_fault());
    }

    #[test]
    fn fault_is_failed_and_typed() {
        let outcome = Outcome::faulted(DispatchFault::ChannelClosed);
        assert!(!outcome.ok);
        assert!(outcome.is_fault());
        assert_eq!(outcome.fault.unwrap().as_label(), "channel_closed");
    }
}
