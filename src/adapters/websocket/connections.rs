//! Registry of live connections and their outbound channels.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::{mpsc, RwLock};

use crate::domain::{ConnectionId, ServerEvent};
use crate::ports::ClientSink;

/// Maps connection ids to the outbound channel of their socket task.
///
/// Implements [`ClientSink`]: delivery to a connection that has since
/// disappeared is a silent no-op, keeping transport failures out of the
/// engine.
#[derive(Debug, Default)]
pub struct ConnectionManager {
    connections: RwLock<HashMap<ConnectionId, mpsc::UnboundedSender<ServerEvent>>>,
}

impl ConnectionManager {
    /// Creates an empty connection manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a connection and returns the receiving half of its
    /// outbound channel.
    pub async fn register(&self, connection: ConnectionId) -> mpsc::UnboundedReceiver<ServerEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.connections.write().await.insert(connection, tx);
        rx
    }

    /// Removes a connection's outbound channel.
    pub async fn unregister(&self, connection: ConnectionId) {
        self.connections.write().await.remove(&connection);
    }

    /// Number of registered connections.
    pub async fn count(&self) -> usize {
        self.connections.read().await.len()
    }
}

#[async_trait]
impl ClientSink for ConnectionManager {
    async fn send(&self, connection: ConnectionId, event: ServerEvent) {
        let connections = self.connections.read().await;
        match connections.get(&connection) {
            Some(tx) => {
                // A closed channel means the socket task is already gone.
                if tx.send(event).is_err() {
                    tracing::trace!(%connection, "dropping event for closing connection");
                }
            }
            None => {
                tracing::trace!(%connection, "dropping event for unknown connection");
            }
        }
    }
}
