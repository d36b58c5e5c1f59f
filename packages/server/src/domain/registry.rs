//! Room registry: the single source of truth for room existence and
//! membership.
//!
//! Every operation is a synchronous method so that callers can hold one
//! mutex across an entire check-then-act sequence (capacity check plus
//! insert, membership lookup plus removal). Operations return snapshot
//! structs so that broadcast sends happen after the lock is released.

use std::collections::HashMap;

use crate::config::ServerConfig;

use super::{
    ConnectionId, DisplayName, Occupant, Room, RoomError, RoomId, RoomName, Timestamp,
};

/// Public identity of a room, as returned to the creator and to joiners.
#[derive(Debug, Clone)]
pub struct RoomSummary {
    pub id: RoomId,
    pub name: RoomName,
    pub is_private: bool,
}

/// One entry of the public room list.
#[derive(Debug, Clone)]
pub struct PublicRoomInfo {
    pub id: RoomId,
    pub name: RoomName,
    pub count: usize,
}

/// Detail view of a public room (HTTP API).
#[derive(Debug, Clone)]
pub struct RoomDetail {
    pub id: RoomId,
    pub name: RoomName,
    pub occupants: Vec<Occupant>,
    pub created_at: Timestamp,
}

/// Result of a successful join, snapshotted under the registry lock.
#[derive(Debug, Clone)]
pub struct JoinOutcome {
    pub room: RoomSummary,
    /// Members after the join (the joiner included), sorted by id
    pub occupants: Vec<Occupant>,
    pub joiner: Occupant,
    /// Every member except the joiner, for the `user_joined` fan-out
    pub others: Vec<ConnectionId>,
    pub member_count: usize,
}

/// Result of a successful leave, snapshotted under the registry lock.
#[derive(Debug, Clone)]
pub struct LeaveOutcome {
    pub room_id: RoomId,
    pub user: Occupant,
    /// Members remaining after the leave, for the `user_left` fan-out
    pub remaining: Vec<ConnectionId>,
    pub member_count: usize,
    /// True when the leave emptied the room; the caller schedules the
    /// deferred deletion check
    pub now_empty: bool,
}

/// Relay targets for one chat message, snapshotted under the registry lock.
#[derive(Debug, Clone)]
pub struct RelayOutcome {
    pub from: Occupant,
    /// Every current member of the sender's room, the sender included:
    /// the echo is the sender's delivery confirmation
    pub targets: Vec<ConnectionId>,
}

/// The authoritative mapping from room id to room, plus the membership
/// index mapping each connection to its current room.
///
/// Keeping the index here (instead of on the session) makes the
/// one-room-per-connection invariant structural and redundant cleanup a
/// natural no-op.
pub struct RoomRegistry {
    rooms: HashMap<RoomId, Room>,
    memberships: HashMap<ConnectionId, RoomId>,
    config: ServerConfig,
}

impl RoomRegistry {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            rooms: HashMap::new(),
            memberships: HashMap::new(),
            config,
        }
    }

    /// Create a new empty room and return its public identity.
    ///
    /// Creation always succeeds; malformed input is coerced (name
    /// truncated or defaulted, password kept only for private rooms).
    pub fn create_room(
        &mut self,
        name: Option<String>,
        is_private: bool,
        password: Option<String>,
        now: Timestamp,
    ) -> RoomSummary {
        let id = RoomId::generate();
        let name = RoomName::sanitize(name, self.config.max_room_name_len);
        let room = Room::new(
            id.clone(),
            name.clone(),
            is_private,
            password,
            self.config.max_members_per_room,
            now,
        );
        self.rooms.insert(id.clone(), room);
        tracing::info!("Room '{}' ({}) created", name.as_str(), id.as_str());
        RoomSummary {
            id,
            name,
            is_private,
        }
    }

    /// Join a connection into a room.
    ///
    /// Guards run in order: already-joined, room existence, password,
    /// capacity. A failed guard leaves the registry untouched.
    pub fn join(
        &mut self,
        conn_id: &ConnectionId,
        room_id: &RoomId,
        password: Option<&str>,
        display_name: Option<String>,
    ) -> Result<JoinOutcome, RoomError> {
        if self.memberships.contains_key(conn_id) {
            return Err(RoomError::AlreadyInRoom);
        }
        let room = self.rooms.get_mut(room_id).ok_or(RoomError::RoomNotFound)?;

        let display_name = DisplayName::sanitize(display_name, self.config.max_display_name_len);
        room.add_member(conn_id.clone(), display_name.clone(), password)?;
        self.memberships.insert(conn_id.clone(), room_id.clone());

        let others = room
            .member_ids()
            .into_iter()
            .filter(|id| id != conn_id)
            .collect();
        Ok(JoinOutcome {
            room: RoomSummary {
                id: room.id.clone(),
                name: room.name.clone(),
                is_private: room.is_private,
            },
            occupants: room.occupants(),
            joiner: Occupant {
                id: conn_id.clone(),
                display_name,
            },
            others,
            member_count: room.member_count(),
        })
    }

    /// Remove a connection from its current room.
    ///
    /// Idempotent: a connection with no current room (including one whose
    /// cleanup already ran) yields `NotInRoom` and no mutation.
    pub fn leave(&mut self, conn_id: &ConnectionId) -> Result<LeaveOutcome, RoomError> {
        let room_id = self.memberships.remove(conn_id).ok_or(RoomError::NotInRoom)?;

        // The membership index never points at a deleted room: deletion
        // requires the member set to be empty, which requires every index
        // entry for it to have been removed first.
        let room = self.rooms.get_mut(&room_id).ok_or(RoomError::NotInRoom)?;
        let display_name = room.remove_member(conn_id).ok_or(RoomError::NotInRoom)?;

        Ok(LeaveOutcome {
            room_id: room_id.clone(),
            user: Occupant {
                id: conn_id.clone(),
                display_name,
            },
            remaining: room.member_ids(),
            member_count: room.member_count(),
            now_empty: room.is_empty(),
        })
    }

    /// Delete a room, but only if it is (still) empty. Returns whether a
    /// deletion happened. Called from the deferred cleanup task after the
    /// grace period; a join during the window keeps the room.
    pub fn delete_if_empty(&mut self, room_id: &RoomId) -> bool {
        match self.rooms.get(room_id) {
            Some(room) if room.is_empty() => {
                self.rooms.remove(room_id);
                true
            }
            _ => false,
        }
    }

    /// The room a connection is currently in, if any.
    pub fn room_of(&self, conn_id: &ConnectionId) -> Option<&RoomId> {
        self.memberships.get(conn_id)
    }

    /// Sender identity and fan-out targets for one chat message.
    pub fn relay_targets(&self, conn_id: &ConnectionId) -> Result<RelayOutcome, RoomError> {
        let room_id = self.memberships.get(conn_id).ok_or(RoomError::NotInRoom)?;
        let room = self.rooms.get(room_id).ok_or(RoomError::NotInRoom)?;
        let display_name = room
            .occupants()
            .into_iter()
            .find(|o| &o.id == conn_id)
            .map(|o| o.display_name)
            .ok_or(RoomError::NotInRoom)?;
        Ok(RelayOutcome {
            from: Occupant {
                id: conn_id.clone(),
                display_name,
            },
            targets: room.member_ids(),
        })
    }

    /// Snapshot of all public rooms, sorted by creation time then id so
    /// listings are deterministic. Private rooms never appear.
    pub fn public_rooms(&self) -> Vec<PublicRoomInfo> {
        let mut rooms: Vec<&Room> = self.rooms.values().filter(|r| !r.is_private).collect();
        rooms.sort_by(|a, b| (a.created_at, &a.id).cmp(&(b.created_at, &b.id)));
        rooms
            .into_iter()
            .map(|r| PublicRoomInfo {
                id: r.id.clone(),
                name: r.name.clone(),
                count: r.member_count(),
            })
            .collect()
    }

    /// Detail view of one public room. Unknown ids and private rooms are
    /// both `None`: a private room's existence is not disclosed.
    pub fn room_detail(&self, room_id: &RoomId) -> Option<RoomDetail> {
        self.rooms
            .get(room_id)
            .filter(|r| !r.is_private)
            .map(|r| RoomDetail {
                id: r.id.clone(),
                name: r.name.clone(),
                occupants: r.occupants(),
                created_at: r.created_at,
            })
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}
