//! UseCase: ルーム退室処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - LeaveRoomUseCase::execute() と delete_room_if_empty()
//! - 退室処理（通知対象選定、メンバー削除、空ルームの遅延削除チェック）
//!
//! ### なぜこのテストが必要か
//! - 明示的な leave_room と切断時のクリーンアップが同一パスを通ることを保証
//! - 二重クリーンアップが no-op であることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：退室と user_left 通知
//! - エッジケース：最後のメンバーの退室（空ルーム化）
//! - 異常系：未参加の接続の退室試行

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::{ConnectionId, LeaveOutcome, MessagePusher, RoomError, RoomId, RoomRegistry};

/// ルーム退室のユースケース
///
/// Both the explicit `leave_room` message and the disconnect cleanup run
/// through [`LeaveRoomUseCase::execute`]; there is no separate "silent"
/// cleanup path.
pub struct LeaveRoomUseCase {
    registry: Arc<Mutex<RoomRegistry>>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl LeaveRoomUseCase {
    pub fn new(registry: Arc<Mutex<RoomRegistry>>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            registry,
            message_pusher,
        }
    }

    /// Remove the connection from its current room.
    ///
    /// Idempotent: a second call for the same connection yields
    /// `NotInRoom` and mutates nothing, so redundant cleanup produces no
    /// duplicate `user_left` events.
    pub async fn execute(&self, conn_id: &ConnectionId) -> Result<LeaveOutcome, RoomError> {
        let mut registry = self.registry.lock().await;
        registry.leave(conn_id)
    }

    /// Broadcast a `user_left` payload to the remaining members.
    pub async fn broadcast_user_left(&self, targets: Vec<ConnectionId>, json: &str) {
        self.message_pusher.broadcast(targets, json).await;
    }

    /// Grace-period re-check: delete the room if it is still empty.
    /// Returns whether a deletion happened.
    pub async fn delete_room_if_empty(&self, room_id: &RoomId) -> bool {
        let mut registry = self.registry.lock().await;
        registry.delete_if_empty(room_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;
    use crate::domain::{RoomSummary, Timestamp};
    use crate::infrastructure::pusher::WebSocketMessagePusher;

    fn create_test_registry() -> Arc<Mutex<RoomRegistry>> {
        Arc::new(Mutex::new(RoomRegistry::new(ServerConfig::default())))
    }

    fn create_test_usecase(registry: Arc<Mutex<RoomRegistry>>) -> LeaveRoomUseCase {
        LeaveRoomUseCase::new(registry, Arc::new(WebSocketMessagePusher::new()))
    }

    async fn create_and_fill_room(
        registry: &Arc<Mutex<RoomRegistry>>,
        members: &[&ConnectionId],
    ) -> RoomSummary {
        let mut reg = registry.lock().await;
        let summary = reg.create_room(Some("Lobby".to_string()), false, None, Timestamp::new(1000));
        for conn in members {
            reg.join(conn, &summary.id, None, None).unwrap();
        }
        summary
    }

    #[tokio::test]
    async fn test_leave_notifies_remaining_members_only() {
        // テスト項目: 退室時の通知対象が残りのメンバーのみになる
        // given (前提条件):
        let registry = create_test_registry();
        let alice = ConnectionId::generate();
        let bob = ConnectionId::generate();
        create_and_fill_room(&registry, &[&alice, &bob]).await;
        let usecase = create_test_usecase(registry);

        // when (操作):
        let outcome = usecase.execute(&alice).await.unwrap();

        // then (期待する結果):
        assert_eq!(outcome.remaining, vec![bob]);
        assert_eq!(outcome.member_count, 1);
        assert!(!outcome.now_empty);
    }

    #[tokio::test]
    async fn test_last_leaver_empties_the_room() {
        // テスト項目: 最後のメンバーの退室で now_empty が立つ
        // given (前提条件):
        let registry = create_test_registry();
        let alice = ConnectionId::generate();
        let summary = create_and_fill_room(&registry, &[&alice]).await;
        let usecase = create_test_usecase(registry.clone());

        // when (操作):
        let outcome = usecase.execute(&alice).await.unwrap();

        // then (期待する結果):
        assert!(outcome.now_empty);
        assert!(outcome.remaining.is_empty());
        assert_eq!(outcome.room_id, summary.id);
        // The room survives until the deferred check runs.
        assert_eq!(registry.lock().await.room_count(), 1);
    }

    #[tokio::test]
    async fn test_double_cleanup_is_noop() {
        // テスト項目: 二重クリーンアップが no-op になり user_left が重複しない
        // given (前提条件):
        let registry = create_test_registry();
        let alice = ConnectionId::generate();
        create_and_fill_room(&registry, &[&alice]).await;
        let usecase = create_test_usecase(registry);

        // when (操作):
        let first = usecase.execute(&alice).await;
        let second = usecase.execute(&alice).await;

        // then (期待する結果):
        assert!(first.is_ok());
        assert_eq!(second.unwrap_err(), RoomError::NotInRoom);
    }

    #[tokio::test]
    async fn test_leave_without_room_fails() {
        // テスト項目: 未参加の接続の退室が NotInRoom になる
        // given (前提条件):
        let registry = create_test_registry();
        let usecase = create_test_usecase(registry);

        // when (操作):
        let result = usecase.execute(&ConnectionId::generate()).await;

        // then (期待する結果):
        assert_eq!(result.unwrap_err(), RoomError::NotInRoom);
    }

    #[tokio::test]
    async fn test_delete_room_if_empty_after_grace() {
        // テスト項目: 空のままのルームが遅延チェックで削除される
        // given (前提条件):
        let registry = create_test_registry();
        let alice = ConnectionId::generate();
        let summary = create_and_fill_room(&registry, &[&alice]).await;
        let usecase = create_test_usecase(registry.clone());
        usecase.execute(&alice).await.unwrap();

        // when (操作):
        let deleted = usecase.delete_room_if_empty(&summary.id).await;

        // then (期待する結果):
        assert!(deleted);
        assert_eq!(registry.lock().await.room_count(), 0);
    }

    #[tokio::test]
    async fn test_delete_room_if_empty_spares_repopulated_room() {
        // テスト項目: 猶予期間中に参加者が入ったルームは削除されない
        // given (前提条件):
        let registry = create_test_registry();
        let alice = ConnectionId::generate();
        let summary = create_and_fill_room(&registry, &[&alice]).await;
        let usecase = create_test_usecase(registry.clone());
        usecase.execute(&alice).await.unwrap();
        {
            let mut reg = registry.lock().await;
            reg.join(&ConnectionId::generate(), &summary.id, None, None)
                .unwrap();
        }

        // when (操作):
        let deleted = usecase.delete_room_if_empty(&summary.id).await;

        // then (期待する結果):
        assert!(!deleted);
        assert_eq!(registry.lock().await.room_count(), 1);
    }
}
