//! Destination of the pipeline's output.
use crate::protocol::messages::N2kMessage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Connection state reported by the gateway supervisor.
pub enum LinkState {
    Connected,
    Disconnected,
}

/// Receives every message that passes the filter, in arrival order.
pub trait MessageSink {
    fn on_message(&mut self, message: N2kMessage);

    /// Connection transitions. Ignored by default.
    fn on_link_state(&mut self, _state: LinkState) {}
}

impl MessageSink for Vec<N2kMessage> {
    fn on_message(&mut self, message: N2kMessage) {
        self.push(message);
    }
}

impl<F: FnMut(N2kMessage)> MessageSink for F {
    fn on_message(&mut self, message: N2kMessage) {
        self(message)
    }
}
