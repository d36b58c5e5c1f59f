//! HTTP API handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::domain::RoomId;
use crate::infrastructure::dto::http::{RoomDetailDto, RoomSummaryDto};
use crate::ui::state::AppState;

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get the list of public rooms
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    let rooms = state.list_rooms_usecase.public_rooms().await;
    Json(rooms.into_iter().map(Into::into).collect())
}

/// Get the detail of one public room by id.
///
/// Unknown ids and private rooms are both 404: a private room's
/// existence is not disclosed over the HTTP API.
pub async fn get_room_detail(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<RoomDetailDto>, StatusCode> {
    let room_id = RoomId::new(room_id);
    match state.list_rooms_usecase.room_detail(&room_id).await {
        Some(detail) => Ok(Json(detail.into())),
        None => Err(StatusCode::NOT_FOUND),
    }
}
