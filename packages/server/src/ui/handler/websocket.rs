//! WebSocket connection handlers: the per-connection session loop.
//!
//! Each connection gets one session. Inbound frames are handled
//! sequentially by the receive task; outbound frames all travel through
//! the connection's single pusher channel, which keeps delivery FIFO in
//! the order the server issued it.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::domain::{ConnectionId, PusherChannel, RoomError, RoomId};
use crate::infrastructure::dto::websocket::{ClientMessage, ServerMessage};
use crate::ui::state::AppState;

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns the task that drains the connection's pusher channel into the
/// WebSocket sink.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let conn_id = ConnectionId::generate();
    let (tx, rx) = mpsc::unbounded_channel();
    state
        .message_pusher
        .register_client(conn_id.clone(), tx.clone())
        .await;
    tracing::info!("Connection '{}' established", conn_id.as_str());

    let (sender, mut receiver) = socket.split();
    let mut send_task = pusher_loop(rx, sender);

    // Everyone, the new connection included, gets the current public room
    // list whenever the connected population changes.
    broadcast_room_list(&state).await;

    let recv_state = state.clone();
    let recv_conn = conn_id.clone();
    let reply_tx = tx;
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error: {}", e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    dispatch(&recv_state, &recv_conn, &reply_tx, &text).await;
                }
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", recv_conn.as_str());
                    break;
                }
                _ => {}
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // Disconnect cleanup runs the same leave path as an explicit
    // leave_room; a connection that already left makes it a no-op.
    leave_current_room(&state, &conn_id).await;
    state.message_pusher.unregister_client(&conn_id).await;
    broadcast_room_list(&state).await;
    tracing::info!("Connection '{}' closed and cleaned up", conn_id.as_str());
}

/// Decode one inbound frame and route it to its use case.
///
/// Unrecognized tags and structurally invalid bodies never change state;
/// they produce an `error` response to the sender only.
async fn dispatch(
    state: &Arc<AppState>,
    conn_id: &ConnectionId,
    reply_tx: &PusherChannel,
    text: &str,
) {
    let msg = match serde_json::from_str::<ClientMessage>(text) {
        Ok(msg) => msg,
        Err(e) => {
            tracing::warn!("Invalid message from '{}': {}", conn_id.as_str(), e);
            reply(
                reply_tx,
                &ServerMessage::Error {
                    message: "Invalid message format".to_string(),
                },
            );
            return;
        }
    };

    match msg {
        ClientMessage::CreateRoom {
            name,
            is_private,
            password,
        } => {
            let summary = state
                .create_room_usecase
                .execute(name, is_private, password)
                .await;
            reply(
                reply_tx,
                &ServerMessage::CreateRoomSuccess {
                    room: summary.into(),
                },
            );
            broadcast_room_list(state).await;
        }
        ClientMessage::ListRooms => {
            let rooms = state.list_rooms_usecase.public_rooms().await;
            reply(
                reply_tx,
                &ServerMessage::RoomList {
                    rooms: rooms.into_iter().map(Into::into).collect(),
                },
            );
        }
        ClientMessage::JoinRoom {
            id,
            password,
            display_name,
        } => {
            let room_id = RoomId::new(id);
            match state
                .join_room_usecase
                .execute(conn_id, &room_id, password, display_name)
                .await
            {
                Ok(outcome) => {
                    tracing::info!(
                        "Connection '{}' joined room '{}' ({} members)",
                        conn_id.as_str(),
                        outcome.room.id.as_str(),
                        outcome.member_count
                    );
                    let joined = ServerMessage::UserJoined {
                        user: outcome.joiner.into(),
                        count: outcome.member_count,
                    };
                    reply(
                        reply_tx,
                        &ServerMessage::JoinSuccess {
                            room: outcome.room.into(),
                            occupants: outcome.occupants.into_iter().map(Into::into).collect(),
                        },
                    );
                    state
                        .join_room_usecase
                        .broadcast_user_joined(outcome.others, &joined.to_json())
                        .await;
                    broadcast_room_list(state).await;
                }
                Err(e) => {
                    tracing::debug!("Join rejected for '{}': {}", conn_id.as_str(), e);
                    reply(
                        reply_tx,
                        &ServerMessage::JoinError {
                            message: e.to_string(),
                        },
                    );
                }
            }
        }
        ClientMessage::LeaveRoom => {
            if leave_current_room(state, conn_id).await {
                reply(reply_tx, &ServerMessage::LeftRoom);
                broadcast_room_list(state).await;
            } else {
                reply(
                    reply_tx,
                    &ServerMessage::Error {
                        message: RoomError::NotInRoom.to_string(),
                    },
                );
            }
        }
        ClientMessage::Message { text } => {
            match state.send_message_usecase.execute(conn_id, text).await {
                Ok(outbound) => {
                    let msg = ServerMessage::Message {
                        from: outbound.from.into(),
                        text: outbound.text,
                        ts: outbound.ts,
                    };
                    state
                        .send_message_usecase
                        .broadcast_message(outbound.targets, &msg.to_json())
                        .await;
                }
                Err(e) => {
                    reply(
                        reply_tx,
                        &ServerMessage::Error {
                            message: e.to_string(),
                        },
                    );
                }
            }
        }
    }
}

/// Leave the connection's current room, notifying the remaining members
/// and scheduling the deferred deletion check when the room empties.
/// Returns false when the connection was not in a room.
async fn leave_current_room(state: &Arc<AppState>, conn_id: &ConnectionId) -> bool {
    match state.leave_room_usecase.execute(conn_id).await {
        Ok(outcome) => {
            tracing::info!(
                "Connection '{}' left room '{}' ({} members remain)",
                conn_id.as_str(),
                outcome.room_id.as_str(),
                outcome.member_count
            );
            let left = ServerMessage::UserLeft {
                user: outcome.user.into(),
                count: outcome.member_count,
            };
            state
                .leave_room_usecase
                .broadcast_user_left(outcome.remaining, &left.to_json())
                .await;
            if outcome.now_empty {
                schedule_room_cleanup(state.clone(), outcome.room_id);
            }
            true
        }
        Err(_) => false,
    }
}

/// After the grace period, delete the room if it is still empty and
/// refresh the public room list. A join during the window wins.
fn schedule_room_cleanup(state: Arc<AppState>, room_id: RoomId) {
    let grace = state.config.empty_room_grace;
    tokio::spawn(async move {
        tokio::time::sleep(grace).await;
        if state.leave_room_usecase.delete_room_if_empty(&room_id).await {
            tracing::info!(
                "Room '{}' deleted after staying empty through the grace period",
                room_id.as_str()
            );
            broadcast_room_list(&state).await;
        }
    });
}

/// Push the current public room list to every connected client.
async fn broadcast_room_list(state: &Arc<AppState>) {
    let rooms = state.list_rooms_usecase.public_rooms().await;
    let msg = ServerMessage::RoomList {
        rooms: rooms.into_iter().map(Into::into).collect(),
    };
    state.message_pusher.broadcast_all(&msg.to_json()).await;
}

/// Send a response to the originating connection through its own pusher
/// channel. A closed channel means the connection is going away; its
/// session cleans up on its own.
fn reply(reply_tx: &PusherChannel, msg: &ServerMessage) {
    if reply_tx.send(msg.to_json()).is_err() {
        tracing::warn!("Failed to queue reply; connection is closing");
    }
}
