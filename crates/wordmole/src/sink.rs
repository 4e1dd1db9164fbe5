//! Outbound event delivery.
//!
//! The engine never talks to sockets. Every event it produces goes
//! through an [`EventSink`] addressed to a single player id; the
//! pub/sub layer above owns fan-out to actual connections.

use std::sync::{Arc, Mutex};

use wordmole_protocol::{PlayerId, ServerEvent};

/// Delivers one event to one recipient. Implementations must tolerate
/// recipients that are already gone; delivery is fire-and-forget.
pub trait EventSink: Send + Sync + 'static {
    fn send(&self, recipient: &PlayerId, event: ServerEvent);
}

impl<T: EventSink> EventSink for Arc<T> {
    fn send(&self, recipient: &PlayerId, event: ServerEvent) {
        (**self).send(recipient, event);
    }
}

// ---------------------------------------------------------------------------
// BufferedSink
// ---------------------------------------------------------------------------

/// Collects events in memory instead of delivering them. Used by tests
/// and by transports that drain the engine's output in batches.
#[derive(Default)]
pub struct BufferedSink {
    events: Mutex<Vec<(PlayerId, ServerEvent)>>,
}

impl BufferedSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drains and returns everything sent so far, in send order.
    pub fn take(&self) -> Vec<(PlayerId, ServerEvent)> {
        std::mem::take(&mut self.events.lock().expect("sink lock poisoned"))
    }

    /// Events addressed to `recipient`, in send order, without draining.
    pub fn events_for(&self, recipient: &PlayerId) -> Vec<ServerEvent> {
        self.events
            .lock()
            .expect("sink lock poisoned")
            .iter()
            .filter(|(to, _)| to == recipient)
            .map(|(_, e)| e.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.events.lock().expect("sink lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EventSink for BufferedSink {
    fn send(&self, recipient: &PlayerId, event: ServerEvent) {
        self.events
            .lock()
            .expect("sink lock poisoned")
            .push((recipient.clone(), event));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffered_sink_preserves_send_order() {
        let sink = BufferedSink::new();
        sink.send(&PlayerId::from("a"), ServerEvent::GameStarted);
        sink.send(&PlayerId::from("b"), ServerEvent::VotingStarted);

        let events = sink.take();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].0, PlayerId::from("a"));
        assert!(matches!(events[0].1, ServerEvent::GameStarted));
        assert!(sink.is_empty());
    }

    #[test]
    fn test_events_for_filters_by_recipient() {
        let sink = BufferedSink::new();
        sink.send(&PlayerId::from("a"), ServerEvent::GameStarted);
        sink.send(&PlayerId::from("b"), ServerEvent::VotingStarted);
        sink.send(&PlayerId::from("a"), ServerEvent::VotingStarted);

        assert_eq!(sink.events_for(&PlayerId::from("a")).len(), 2);
        assert_eq!(sink.events_for(&PlayerId::from("b")).len(), 1);
        assert_eq!(sink.len(), 3, "events_for must not drain");
    }
}
