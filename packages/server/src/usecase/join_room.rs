//! UseCase: ルーム参加処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinRoomUseCase::execute() メソッド
//! - 参加ガード（存在チェック、パスワード、定員、二重参加）と参加者スナップショット
//!
//! ### なぜこのテストが必要か
//! - 定員チェックと挿入が一体で行われ、失敗時に状態が変わらないことを保証
//! - user_joined の通知対象（参加者本人を除く）の選定を検証
//!
//! ### どのような状況を想定しているか
//! - 正常系：公開・非公開ルームへの参加
//! - 異常系：誤パスワード、満室、二重参加
//! - エッジケース：最初の参加者（通知対象なし）

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::{
    ConnectionId, JoinOutcome, MessagePusher, RoomError, RoomId, RoomRegistry,
};

/// ルーム参加のユースケース
pub struct JoinRoomUseCase {
    registry: Arc<Mutex<RoomRegistry>>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl JoinRoomUseCase {
    pub fn new(registry: Arc<Mutex<RoomRegistry>>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            registry,
            message_pusher,
        }
    }

    /// Join a connection into a room.
    ///
    /// All guards and the membership insert execute as one critical
    /// section under the registry lock, so concurrent joins cannot race
    /// the capacity check. A connection already in a room is rejected
    /// with `AlreadyInRoom`; it must leave first.
    pub async fn execute(
        &self,
        conn_id: &ConnectionId,
        room_id: &RoomId,
        password: Option<String>,
        display_name: Option<String>,
    ) -> Result<JoinOutcome, RoomError> {
        let mut registry = self.registry.lock().await;
        registry.join(conn_id, room_id, password.as_deref(), display_name)
    }

    /// Broadcast a `user_joined` payload to the members that were already
    /// in the room.
    pub async fn broadcast_user_joined(&self, targets: Vec<ConnectionId>, json: &str) {
        self.message_pusher.broadcast(targets, json).await;
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

    async fn create_room(
        registry: &Arc<Mutex<RoomRegistry>>,
        name: &str,
        is_private: bool,
        password: Option<&str>,
    ) -> RoomSummary {
        let mut reg = registry.lock().await;
        reg.create_room(
            Some(name.to_string()),
            is_private,
            password.map(|p| p.to_string()),
            Timestamp::new(1000),
        )
    }

    fn create_test_usecase(registry: Arc<Mutex<RoomRegistry>>) -> JoinRoomUseCase {
        JoinRoomUseCase::new(registry, Arc::new(WebSocketMessagePusher::new()))
    }

    #[tokio::test]
    async fn test_first_joiner_has_no_broadcast_targets() {
        // テスト項目: 最初の参加者の通知対象が空になる
        // given (前提条件):
        let registry = create_test_registry();
        let summary = create_room(&registry, "Lobby", false, None).await;
        let usecase = create_test_usecase(registry);

        // when (操作):
        let outcome = usecase
            .execute(
                &ConnectionId::generate(),
                &summary.id,
                None,
                Some("alice".to_string()),
            )
            .await
            .unwrap();

        // then (期待する結果):
        assert!(outcome.others.is_empty());
        assert_eq!(outcome.member_count, 1);
        assert_eq!(outcome.occupants.len(), 1);
    }

    #[tokio::test]
    async fn test_join_excludes_joiner_from_targets() {
        // テスト項目: user_joined の通知対象に参加者本人が含まれない
        // given (前提条件):
        let registry = create_test_registry();
        let summary = create_room(&registry, "Lobby", false, None).await;
        let usecase = create_test_usecase(registry);
        let alice = ConnectionId::generate();
        let bob = ConnectionId::generate();
        usecase.execute(&alice, &summary.id, None, None).await.unwrap();

        // when (操作):
        let outcome = usecase.execute(&bob, &summary.id, None, None).await.unwrap();

        // then (期待する結果):
        assert_eq!(outcome.others, vec![alice]);
        assert!(!outcome.others.contains(&bob));
        assert_eq!(outcome.member_count, 2);
    }

    #[tokio::test]
    async fn test_join_private_room_with_wrong_password_mutates_nothing() {
        // テスト項目: 誤パスワードでの参加失敗が状態を変更しない
        // given (前提条件):
        let registry = create_test_registry();
        let summary = create_room(&registry, "Secret", true, Some("secret")).await;
        let usecase = create_test_usecase(registry.clone());

        // when (操作):
        let result = usecase
            .execute(
                &ConnectionId::generate(),
                &summary.id,
                Some("wrong".to_string()),
                None,
            )
            .await;

        // then (期待する結果):
        assert_eq!(result.unwrap_err(), RoomError::WrongPassword);
        let reg = registry.lock().await;
        assert!(reg.room_detail(&summary.id).is_none()); // private: not disclosed
        assert_eq!(reg.public_rooms().len(), 0);
    }

    #[tokio::test]
    async fn test_fifth_join_is_rejected_with_room_full() {
        // テスト項目: 定員 4 のルームへの 5 人目の参加が RoomFull になる
        // given (前提条件):
        let registry = create_test_registry();
        let summary = create_room(&registry, "Lobby", false, None).await;
        let usecase = create_test_usecase(registry.clone());
        for _ in 0..4 {
            usecase
                .execute(&ConnectionId::generate(), &summary.id, None, None)
                .await
                .unwrap();
        }

        // when (操作):
        let result = usecase
            .execute(&ConnectionId::generate(), &summary.id, None, None)
            .await;

        // then (期待する結果):
        assert_eq!(result.unwrap_err(), RoomError::RoomFull(4));
        assert_eq!(registry.lock().await.public_rooms()[0].count, 4);
    }

    #[tokio::test]
    async fn test_concurrent_joins_never_exceed_capacity() {
        // テスト項目: 並行参加でも定員が超過しない
        // given (前提条件):
        let registry = create_test_registry();
        let summary = create_room(&registry, "Lobby", false, None).await;
        let usecase = Arc::new(create_test_usecase(registry.clone()));

        // when (操作):
        let mut handles = Vec::new();
        for _ in 0..16 {
            let usecase = usecase.clone();
            let room_id = summary.id.clone();
            handles.push(tokio::spawn(async move {
                usecase
                    .execute(&ConnectionId::generate(), &room_id, None, None)
                    .await
            }));
        }
        let mut successes = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                successes += 1;
            }
        }

        // then (期待する結果):
        assert_eq!(successes, 4);
        assert_eq!(registry.lock().await.public_rooms()[0].count, 4);
    }
}
