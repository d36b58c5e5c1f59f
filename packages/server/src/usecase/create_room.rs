//! UseCase: ルーム作成処理

use std::sync::Arc;

use hiroma_shared::time::Clock;
use tokio::sync::Mutex;

use crate::domain::{RoomRegistry, RoomSummary, Timestamp};

/// ルーム作成のユースケース
pub struct CreateRoomUseCase {
    registry: Arc<Mutex<RoomRegistry>>,
    clock: Arc<dyn Clock>,
}

impl CreateRoomUseCase {
    pub fn new(registry: Arc<Mutex<RoomRegistry>>, clock: Arc<dyn Clock>) -> Self {
        Self { registry, clock }
    }

    /// Create a room and return its public identity.
    ///
    /// Always succeeds: the name is truncated or defaulted and the
    /// password is kept only when the room is private. The creator is not
    /// joined automatically; it joins via `join_room` like anyone else.
    pub async fn execute(
        &self,
        name: Option<String>,
        is_private: bool,
        password: Option<String>,
    ) -> RoomSummary {
        let now = Timestamp::new(self.clock.now_millis());
        let mut registry = self.registry.lock().await;
        registry.create_room(name, is_private, password, now)
    }
}
