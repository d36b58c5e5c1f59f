//! Server configuration.

use std::time::Duration;

/// Tunable limits and policies for the chat server.
///
/// Every limit the protocol enforces lives here; the registry and the
/// handlers receive this struct at construction time instead of reading
/// ambient constants.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Maximum simultaneous members a room permits
    pub max_members_per_room: usize,
    /// Maximum room name length (in chars, longer names are truncated)
    pub max_room_name_len: usize,
    /// Maximum display name length (in chars, longer names are truncated)
    pub max_display_name_len: usize,
    /// Maximum chat message length (in chars, longer messages are truncated)
    pub max_message_len: usize,
    /// How long an emptied room survives before deletion; a join during
    /// this window keeps the room alive
    pub empty_room_grace: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            max_members_per_room: 4,
            max_room_name_len: 100,
            max_display_name_len: 30,
            max_message_len: 2000,
            empty_room_grace: Duration::from_secs(1),
        }
    }
}
