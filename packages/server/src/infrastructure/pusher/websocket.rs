//! WebSocket-backed [`MessagePusher`] implementation.
//!
//! The session layer (`ui/handler/websocket.rs`) accepts the WebSocket and
//! creates the per-connection channel; this implementation holds the sender
//! halves and performs the actual delivery. Splitting the two keeps socket
//! ownership in the session loop and delivery behind the trait seam.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ConnectionId, MessagePushError, MessagePusher, PusherChannel};

/// [`MessagePusher`] over the per-connection WebSocket sender channels.
pub struct WebSocketMessagePusher {
    /// Sender channels of all currently connected clients
    clients: Mutex<HashMap<ConnectionId, PusherChannel>>,
}

impl WebSocketMessagePusher {
    pub fn new() -> Self {
        Self {
            clients: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for WebSocketMessagePusher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(&self, client_id: ConnectionId, sender: PusherChannel) {
        let mut clients = self.clients.lock().await;
        tracing::debug!("Client '{}' registered to MessagePusher", client_id.as_str());
        clients.insert(client_id, sender);
    }

    async fn unregister_client(&self, client_id: &ConnectionId) {
        let mut clients = self.clients.lock().await;
        clients.remove(client_id);
        tracing::debug!(
            "Client '{}' unregistered from MessagePusher",
            client_id.as_str()
        );
    }

    async fn push_to(
        &self,
        client_id: &ConnectionId,
        content: &str,
    ) -> Result<(), MessagePushError> {
        let clients = self.clients.lock().await;

        if let Some(sender) = clients.get(client_id) {
            sender
                .send(content.to_string())
                .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
            tracing::debug!("Pushed message to client '{}'", client_id.as_str());
            Ok(())
        } else {
            Err(MessagePushError::ClientNotFound(
                client_id.as_str().to_string(),
            ))
        }
    }

    async fn broadcast(&self, targets: Vec<ConnectionId>, content: &str) {
        let clients = self.clients.lock().await;

        for target in targets {
            if let Some(sender) = clients.get(&target) {
                // A single broken member must not abort the batch; its own
                // session notices the closed transport and cleans up.
                if let Err(e) = sender.send(content.to_string()) {
                    tracing::warn!(
                        "Failed to push message to client '{}': {}",
                        target.as_str(),
                        e
                    );
                }
            } else {
                tracing::warn!(
                    "Client '{}' not found during broadcast, skipping",
                    target.as_str()
                );
            }
        }
    }

    async fn broadcast_all(&self, content: &str) {
        let clients = self.clients.lock().await;

        for (client_id, sender) in clients.iter() {
            if let Err(e) = sender.send(content.to_string()) {
                tracing::warn!(
                    "Failed to push message to client '{}': {}",
                    client_id.as_str(),
                    e
                );
            }
        }
    }
}
