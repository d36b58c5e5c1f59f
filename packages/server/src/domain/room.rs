//! Room entity: a bounded set of member connections plus access control.

use std::collections::HashMap;

use super::{ConnectionId, DisplayName, RoomError, RoomId, RoomName, Timestamp};

/// A member of a room as seen by clients: connection id plus display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occupant {
    pub id: ConnectionId,
    pub display_name: DisplayName,
}

/// A chat room with a fixed capacity and optional password protection.
///
/// The member map holds connection ids and display names only; the sockets
/// themselves are owned by the session loops and reached through the
/// message pusher.
#[derive(Debug, Clone)]
pub struct Room {
    pub id: RoomId,
    pub name: RoomName,
    pub is_private: bool,
    /// Present iff the room is private (empty string when the creator
    /// supplied none)
    password: Option<String>,
    pub capacity: usize,
    members: HashMap<ConnectionId, DisplayName>,
    pub created_at: Timestamp,
}

impl Room {
    pub fn new(
        id: RoomId,
        name: RoomName,
        is_private: bool,
        password: Option<String>,
        capacity: usize,
        created_at: Timestamp,
    ) -> Self {
        // The password invariant is enforced structurally: a public room
        // never stores one, a private room always does.
        let password = if is_private {
            Some(password.unwrap_or_default())
        } else {
            None
        };
        Self {
            id,
            name,
            is_private,
            password,
            capacity,
            members: HashMap::new(),
            created_at,
        }
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.members.len() >= self.capacity
    }

    /// Check a supplied password against the stored one. Public rooms
    /// accept anything; private rooms require an exact match, with a
    /// missing supplied password treated as the empty string.
    pub fn verify_password(&self, supplied: Option<&str>) -> bool {
        match &self.password {
            None => true,
            Some(stored) => stored == supplied.unwrap_or(""),
        }
    }

    /// Admit a connection into the room.
    ///
    /// The password and capacity checks plus the insert form one unit; a
    /// failed check never mutates the member set.
    pub fn add_member(
        &mut self,
        id: ConnectionId,
        display_name: DisplayName,
        supplied_password: Option<&str>,
    ) -> Result<(), RoomError> {
        if !self.verify_password(supplied_password) {
            return Err(RoomError::WrongPassword);
        }
        if self.is_full() {
            return Err(RoomError::RoomFull(self.capacity));
        }
        self.members.insert(id, display_name);
        Ok(())
    }

    /// Remove a member, returning its display name if it was present.
    pub fn remove_member(&mut self, id: &ConnectionId) -> Option<DisplayName> {
        self.members.remove(id)
    }

    pub fn contains(&self, id: &ConnectionId) -> bool {
        self.members.contains_key(id)
    }

    pub fn member_ids(&self) -> Vec<ConnectionId> {
        self.members.keys().cloned().collect()
    }

    /// Snapshot of the current members, sorted by connection id for
    /// consistent ordering.
    pub fn occupants(&self) -> Vec<Occupant> {
        let mut occupants: Vec<Occupant> = self
            .members
            .iter()
            .map(|(id, display_name)| Occupant {
                id: id.clone(),
                display_name: display_name.clone(),
            })
            .collect();
        occupants.sort_by(|a, b| a.id.cmp(&b.id));
        occupants
    }
}
