//! Broadcast signal bus
//!
//! Any number of consumers (the UI shell, an audit surface, tests) subscribe
//! and each receives every signal published after it subscribed.

use tokio::sync::broadcast;
use tracing::{debug, trace};
use workbase_domain::constants::SIGNAL_CHANNEL_CAPACITY;
use workbase_domain::Signal;

use super::ports::SignalSink;

/// In-memory broadcast bus for [`Signal`]s
#[derive(Debug, Clone)]
pub struct SignalBus {
    sender: broadcast::Sender<Signal>,
}

impl Default for SignalBus {
    fn default() -> Self {
        Self::new(SIGNAL_CHANNEL_CAPACITY)
    }
}

impl SignalBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Signal> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl SignalSink for SignalBus {
    fn publish(&self, signal: Signal) {
        let name = signal.name();
        match self.sender.send(signal) {
            Ok(receivers) => debug!(signal = name, receivers, "Signal published"),
            // No subscribers yet
            Err(_) => trace!(signal = name, "Signal dropped, no subscribers"),
        }
    }
}
