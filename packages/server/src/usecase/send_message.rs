//! UseCase: メッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - 配信対象の選定（送信者自身を含む）、本文の切り詰め、タイムスタンプ付与
//!
//! ### なぜこのテストが必要か
//! - 送信者へのエコーが配信確認として必ず含まれることを保証
//! - 未参加の接続からの送信が状態を変更せず拒否されることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：ルーム内でのメッセージ送信とブロードキャスト
//! - 異常系：未参加の接続からの送信
//! - エッジケース：上限を超える本文、送信者のみが在室している場合

use std::sync::Arc;

use hiroma_shared::time::Clock;
use tokio::sync::Mutex;

use crate::config::ServerConfig;
use crate::domain::{
    ConnectionId, MessagePusher, MessageText, Occupant, RoomError, RoomRegistry,
};

/// A relayed chat message, stamped by the server and ready for fan-out.
#[derive(Debug, Clone)]
pub struct OutboundMessage {
    pub from: Occupant,
    pub text: String,
    /// Server-assigned timestamp (Unix millis)
    pub ts: i64,
    /// Every current member of the room, the sender included
    pub targets: Vec<ConnectionId>,
}

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    registry: Arc<Mutex<RoomRegistry>>,
    message_pusher: Arc<dyn MessagePusher>,
    config: ServerConfig,
    clock: Arc<dyn Clock>,
}

impl SendMessageUseCase {
    pub fn new(
        registry: Arc<Mutex<RoomRegistry>>,
        message_pusher: Arc<dyn MessagePusher>,
        config: ServerConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            registry,
            message_pusher,
            config,
            clock,
        }
    }

    /// Prepare a chat message for relay.
    ///
    /// Fails with `NotInRoom` when the sender has no current room (the
    /// message is dropped, the error goes to the sender only). Otherwise
    /// the text is truncated, stamped with the server time and wrapped
    /// with the sender identity; the targets include the sender, whose
    /// echo is its confirmation that delivery occurred.
    pub async fn execute(
        &self,
        conn_id: &ConnectionId,
        raw_text: String,
    ) -> Result<OutboundMessage, RoomError> {
        let outcome = {
            let registry = self.registry.lock().await;
            registry.relay_targets(conn_id)?
        };

        let text = MessageText::sanitize(raw_text, self.config.max_message_len);
        Ok(OutboundMessage {
            from: outcome.from,
            text: text.into_string(),
            ts: self.clock.now_millis(),
            targets: outcome.targets,
        })
    }

    /// Fan a serialized `message` payload out to the room members.
    pub async fn broadcast_message(&self, targets: Vec<ConnectionId>, json: &str) {
        self.message_pusher.broadcast(targets, json).await;
    }
}
