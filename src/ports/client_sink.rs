//! Client sink port - delivering outbound events to live connections.
//!
//! The publish primitive ("send event X to connection Y") is assumed supplied
//! by the transport layer; this port is its seam. Delivery is best-effort:
//! sending to a connection that has since disappeared is a silent no-op, so
//! the engine never couples room state to transport failures.

use async_trait::async_trait;

use crate::domain::{ConnectionId, ServerEvent};

/// Port for delivering server events to a single connection.
#[async_trait]
pub trait ClientSink: Send + Sync {
    /// Delivers `event` to `connection`, if it is still registered.
    async fn send(&self, connection: ConnectionId, event: ServerEvent);
}

/// In-memory sink that records every delivery, for tests.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: std::sync::Mutex<Vec<(ConnectionId, ServerEvent)>>,
}

impl RecordingSink {
    /// Creates an empty recording sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every (connection, event) pair delivered so far, in order.
    pub fn deliveries(&self) -> Vec<(ConnectionId, ServerEvent)> {
        self.events.lock().unwrap().clone()
    }

    /// Returns the events delivered to one connection, in order.
    pub fn sent_to(&self, connection: ConnectionId) -> Vec<ServerEvent> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|(c, _)| *c == connection)
            .map(|(_, e)| e.clone())
            .collect()
    }

    /// Discards all recorded deliveries.
    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }
}

#[async_trait]
impl ClientSink for RecordingSink {
    async fn send(&self, connection: ConnectionId, event: ServerEvent) {
        self.events.lock().unwrap().push((connection, event));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn recording_sink_tracks_per_connection_order() {
        let sink = RecordingSink::new();
        let a = ConnectionId::new();
        let b = ConnectionId::new();

        sink.send(a, ServerEvent::ReturnToSetup).await;
        sink.send(b, ServerEvent::RoomExpired).await;
        sink.send(a, ServerEvent::RoomExpired).await;

        assert_eq!(sink.deliveries().len(), 3);
        assert_eq!(
            sink.sent_to(a),
            vec![ServerEvent::ReturnToSetup, ServerEvent::RoomExpired]
        );
        assert_eq!(sink.sent_to(b), vec![ServerEvent::RoomExpired]);
    }
}
