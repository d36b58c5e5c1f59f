//! HTTP API response DTOs.

use serde::Serialize;

/// One entry of `GET /api/rooms`.
#[derive(Debug, Clone, Serialize)]
pub struct RoomSummaryDto {
    pub id: String,
    pub name: String,
    pub count: usize,
}

/// Response of `GET /api/rooms/{room_id}` (public rooms only).
#[derive(Debug, Clone, Serialize)]
pub struct RoomDetailDto {
    pub id: String,
    pub name: String,
    pub occupants: Vec<RoomOccupantDto>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoomOccupantDto {
    pub id: String,
    pub display_name: String,
}
