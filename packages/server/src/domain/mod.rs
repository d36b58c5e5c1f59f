//! Domain layer: value objects, the room entity, the room registry and the
//! message pusher abstraction.

pub mod pusher;
pub mod registry;
pub mod room;

pub use pusher::{MessagePushError, MessagePusher, PusherChannel};
pub use registry::{
    JoinOutcome, LeaveOutcome, PublicRoomInfo, RelayOutcome, RoomDetail, RoomRegistry, RoomSummary,
};
pub use room::{Occupant, Room};

use thiserror::Error;
use uuid::Uuid;

/// Errors a protocol operation can surface to the originating connection.
///
/// All of these are recoverable at the connection level: the sender gets a
/// response and shared state is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomError {
    #[error("Room not found")]
    RoomNotFound,
    #[error("Incorrect password")]
    WrongPassword,
    #[error("Room is full (max {0})")]
    RoomFull(usize),
    #[error("You are not in a room")]
    NotInRoom,
    #[error("Already in a room, leave it first")]
    AlreadyInRoom,
}

/// Opaque identifier of one client connection, generated at connect time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(String);

impl ConnectionId {
    /// Generate a fresh unique connection id
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn new(id: String) -> Self {
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Opaque identifier of one room, generated at creation time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomId(String);

impl RoomId {
    /// Generate a fresh unique room id
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn new(id: String) -> Self {
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// User-facing room name, truncated to the configured maximum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomName(String);

impl RoomName {
    pub const DEFAULT: &str = "Unnamed Room";

    /// Build a room name from raw client input. Missing or empty input
    /// falls back to [`RoomName::DEFAULT`]; longer input is truncated.
    pub fn sanitize(raw: Option<String>, max_len: usize) -> Self {
        let raw = raw
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| Self::DEFAULT.to_string());
        Self(truncate_chars(raw, max_len))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// User-facing display name, truncated to the configured maximum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayName(String);

impl DisplayName {
    pub const DEFAULT: &str = "Anonymous";

    /// Build a display name from raw client input. Missing or empty input
    /// falls back to [`DisplayName::DEFAULT`]; longer input is truncated.
    pub fn sanitize(raw: Option<String>, max_len: usize) -> Self {
        let raw = raw
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| Self::DEFAULT.to_string());
        Self(truncate_chars(raw, max_len))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Chat message body, truncated to the configured maximum. Empty is allowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageText(String);

impl MessageText {
    pub fn sanitize(raw: String, max_len: usize) -> Self {
        Self(truncate_chars(raw, max_len))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Unix timestamp in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(millis: i64) -> Self {
        Self(millis)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

/// Truncate a string to `max_len` chars, keeping char boundaries intact.
fn truncate_chars(s: String, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s
    } else {
        s.chars().take(max_len).collect()
    }
}
