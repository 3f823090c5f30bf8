//! Signal sink port

use workbase_domain::Signal;

/// Destination for process-wide signals.
///
/// Publishing is fire-and-forget: a sink must never fail the call that
/// raised the signal.
pub trait SignalSink: Send + Sync {
    fn publish(&self, signal: Signal);
}
