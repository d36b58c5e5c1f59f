//! UseCase: 公開ルーム一覧の取得

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::{PublicRoomInfo, RoomDetail, RoomId, RoomRegistry};

/// 公開ルーム一覧取得のユースケース
///
/// Serves both the on-demand `list_rooms` query and the proactive room
/// list pushes that follow every room population change, as well as the
/// HTTP room endpoints.
pub struct ListRoomsUseCase {
    registry: Arc<Mutex<RoomRegistry>>,
}

impl ListRoomsUseCase {
    pub fn new(registry: Arc<Mutex<RoomRegistry>>) -> Self {
        Self { registry }
    }

    /// Snapshot of all public rooms, private rooms excluded.
    pub async fn public_rooms(&self) -> Vec<PublicRoomInfo> {
        let registry = self.registry.lock().await;
        registry.public_rooms()
    }

    /// Detail view of one public room; `None` for unknown or private ids.
    pub async fn room_detail(&self, room_id: &RoomId) -> Option<RoomDetail> {
        let registry = self.registry.lock().await;
        registry.room_detail(room_id)
    }
}
