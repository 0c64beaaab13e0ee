//! Registry of connected clients and the fan-out path for server messages.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tokio::sync::mpsc;
use uuid::Uuid;

use crate::protocol::ServerMessage;

/// Random identity assigned to each connection for its lifetime.
pub type ClientId = String;

// Bounded per-client buffer; a subscriber that stops draining gets its
// messages dropped and the sender pruned rather than stalling the game.
const OUTBOUND_BUFFER: usize = 256;

pub type MessageSender = mpsc::Sender<ServerMessage>;
pub type MessageReceiver = mpsc::Receiver<ServerMessage>;

/// One registered connection. Dropping it unregisters the client.
pub struct ClientConnection {
    hub: ClientHub,
    id: ClientId,
    receiver: Option<MessageReceiver>,
}

impl ClientConnection {
    pub fn id(&self) -> &ClientId {
        &self.id
    }

    /// Hand the receiving end over to a send pump. Returns `None` once the
    /// receiver has already been taken; the registration itself stays alive
    /// until the connection is dropped.
    pub fn take_receiver(&mut self) -> Option<MessageReceiver> {
        self.receiver.take()
    }

    /// Pop one pending message without blocking. For callers that poll the
    /// connection directly instead of pumping the receiver into a socket.
    pub fn try_recv(&mut self) -> Option<ServerMessage> {
        self.receiver.as_mut()?.try_recv().ok()
    }
}

impl Drop for ClientConnection {
    fn drop(&mut self) {
        self.hub.unregister(&self.id);
    }
}

/// Shared registry of every connected viewer/player.
///
/// The transport layer registers a connection on upgrade, pumps its receiver
/// into the socket, and relies on `broadcast`/`send_to` for delivery.
#[derive(Debug, Clone, Default)]
pub struct ClientHub {
    inner: Arc<HubInner>,
}

#[derive(Debug, Default)]
struct HubInner {
    clients: RwLock<HashMap<ClientId, MessageSender>>,
}

impl ClientHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new connection under a fresh uuid.
    pub fn register(&self) -> ClientConnection {
        let id = Uuid::new_v4().to_string();
        let (tx, rx) = mpsc::channel(OUTBOUND_BUFFER);
        {
            let mut guard = self.inner.clients.write().expect("client lock poisoned");
            guard.insert(id.clone(), tx);
        }

        tracing::info!(client_id = %id, "player connected");

        ClientConnection {
            hub: self.clone(),
            id,
            receiver: Some(rx),
        }
    }

    /// Deliver a message to every connected client.
    pub fn broadcast(&self, message: ServerMessage) {
        let clients: Vec<(ClientId, MessageSender)> = {
            let guard = self.inner.clients.read().expect("client lock poisoned");
            guard.iter().map(|(id, tx)| (id.clone(), tx.clone())).collect()
        };

        tracing::debug!(clients = clients.len(), "broadcasting message");

        let mut dead = Vec::new();
        for (id, sender) in clients {
            if let Err(err) = sender.try_send(message.clone()) {
                tracing::warn!(
                    client_id = %id,
                    error = ?err,
                    "failed to deliver broadcast, dropping client"
                );
                dead.push(id);
            }
        }
        for id in &dead {
            self.unregister(id);
        }
    }

    /// Deliver a message to one client; returns false if it is gone or its
    /// buffer is full.
    pub fn send_to(&self, client_id: &ClientId, message: ServerMessage) -> bool {
        let sender = {
            let guard = self.inner.clients.read().expect("client lock poisoned");
            guard.get(client_id).cloned()
        };
        match sender {
            Some(tx) => tx.try_send(message).is_ok(),
            None => false,
        }
    }

    pub fn client_count(&self) -> usize {
        let guard = self.inner.clients.read().expect("client lock poisoned");
        guard.len()
    }

    fn unregister(&self, client_id: &ClientId) {
        let mut guard = self.inner.clients.write().expect("client lock poisoned");
        if guard.remove(client_id).is_some() {
            tracing::info!(client_id = %client_id, "player disconnected");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skirmish_engine::piece::Player;

    fn ping() -> ServerMessage {
        ServerMessage::Error {
            message: "ping".to_string(),
        }
    }

    #[test]
    fn dropping_a_connection_unregisters_it() {
        let hub = ClientHub::new();
        {
            let _conn = hub.register();
            assert_eq!(hub.client_count(), 1);
        }
        assert_eq!(hub.client_count(), 0);
    }

    #[test]
    fn broadcast_reaches_every_client() {
        let hub = ClientHub::new();
        let mut first = hub.register();
        let mut second = hub.register();

        hub.broadcast(ping());

        assert!(first.try_recv().is_some());
        assert!(second.try_recv().is_some());
    }

    #[test]
    fn take_receiver_hands_over_the_channel_once() {
        let hub = ClientHub::new();
        let mut conn = hub.register();

        let mut receiver = conn.take_receiver().expect("first take");
        assert!(conn.take_receiver().is_none());
        // A taken connection no longer yields messages itself, but the
        // registration still routes them to the handed-over receiver.
        hub.broadcast(ping());
        assert!(conn.try_recv().is_none());
        assert!(receiver.try_recv().is_ok());
    }

    #[test]
    fn send_to_targets_a_single_client() {
        let hub = ClientHub::new();
        let mut first = hub.register();
        let mut second = hub.register();

        let delivered = hub.send_to(
            &first.id().clone(),
            ServerMessage::GameOver {
                winner: Some(Player::B),
            },
        );
        assert!(delivered);
        assert!(first.try_recv().is_some());
        assert!(second.try_recv().is_none());
    }

    #[test]
    fn send_to_unknown_client_reports_failure() {
        let hub = ClientHub::new();
        assert!(!hub.send_to(&"nobody".to_string(), ping()));
    }
}
