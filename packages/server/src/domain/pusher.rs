//! Message pusher abstraction.
//!
//! The session layer creates a channel per connection; the pusher owns the
//! sender halves and delivers payloads to them. The use case layer depends
//! on this trait only, not on the WebSocket implementation.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use super::ConnectionId;

/// Sender half of a connection's outbound channel. Everything a connection
/// receives travels through this one channel, which is what keeps
/// per-connection delivery FIFO relative to the order the server issued it.
pub type PusherChannel = mpsc::UnboundedSender<String>;

#[derive(Debug, Error)]
pub enum MessagePushError {
    #[error("Client '{0}' is not registered")]
    ClientNotFound(String),
    #[error("Failed to push message: {0}")]
    PushFailed(String),
}

/// Delivery of serialized payloads to connected clients.
///
/// `broadcast` and `broadcast_all` tolerate per-member failures: a broken
/// channel is logged and skipped, never raised to the caller. The failing
/// connection's own session detects the closed transport and runs its
/// cleanup independently.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// Register a newly connected client's sender channel
    async fn register_client(&self, client_id: ConnectionId, sender: PusherChannel);

    /// Remove a disconnected client's sender channel
    async fn unregister_client(&self, client_id: &ConnectionId);

    /// Push a payload to a single client
    async fn push_to(&self, client_id: &ConnectionId, content: &str)
    -> Result<(), MessagePushError>;

    /// Push a payload to each of the given clients, independently
    async fn broadcast(&self, targets: Vec<ConnectionId>, content: &str);

    /// Push a payload to every connected client (joined to a room or not)
    async fn broadcast_all(&self, content: &str);
}
