//! Conversion logic between domain snapshots and DTOs.

use hiroma_shared::time::timestamp_to_rfc3339;

use crate::domain::{Occupant, PublicRoomInfo, RoomDetail, RoomSummary};
use crate::infrastructure::dto::http;
use crate::infrastructure::dto::websocket as dto;

// ========================================
// Domain snapshot → WebSocket DTO
// ========================================

impl From<Occupant> for dto::UserDto {
    fn from(occupant: Occupant) -> Self {
        Self {
            id: occupant.id.into_string(),
            display_name: occupant.display_name.into_string(),
        }
    }
}

impl From<RoomSummary> for dto::RoomInfoDto {
    fn from(summary: RoomSummary) -> Self {
        Self {
            id: summary.id.into_string(),
            name: summary.name.into_string(),
            is_private: summary.is_private,
        }
    }
}

impl From<RoomSummary> for dto::RoomRefDto {
    fn from(summary: RoomSummary) -> Self {
        Self {
            id: summary.id.into_string(),
            name: summary.name.into_string(),
        }
    }
}

impl From<PublicRoomInfo> for dto::PublicRoomDto {
    fn from(info: PublicRoomInfo) -> Self {
        Self {
            id: info.id.into_string(),
            name: info.name.into_string(),
            count: info.count,
        }
    }
}

// ========================================
// Domain snapshot → HTTP DTO
// ========================================

impl From<PublicRoomInfo> for http::RoomSummaryDto {
    fn from(info: PublicRoomInfo) -> Self {
        Self {
            id: info.id.into_string(),
            name: info.name.into_string(),
            count: info.count,
        }
    }
}

impl From<RoomDetail> for http::RoomDetailDto {
    fn from(detail: RoomDetail) -> Self {
        Self {
            id: detail.id.into_string(),
            name: detail.name.into_string(),
            occupants: detail
                .occupants
                .into_iter()
                .map(|o| http::RoomOccupantDto {
                    id: o.id.into_string(),
                    display_name: o.display_name.into_string(),
                })
                .collect(),
            created_at: timestamp_to_rfc3339(detail.created_at.value()),
        }
    }
}
