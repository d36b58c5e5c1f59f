//! Server state shared across handlers.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::domain::MessagePusher;
use crate::usecase::{
    CreateRoomUseCase, JoinRoomUseCase, LeaveRoomUseCase, ListRoomsUseCase, SendMessageUseCase,
};

/// Shared application state
pub struct AppState {
    pub config: ServerConfig,
    /// MessagePusher（メッセージ通知の抽象化）
    pub message_pusher: Arc<dyn MessagePusher>,
    pub create_room_usecase: Arc<CreateRoomUseCase>,
    pub list_rooms_usecase: Arc<ListRoomsUseCase>,
    pub join_room_usecase: Arc<JoinRoomUseCase>,
    pub leave_room_usecase: Arc<LeaveRoomUseCase>,
    pub send_message_usecase: Arc<SendMessageUseCase>,
}
