//! WebSocket wire protocol.
//!
//! Inbound payloads decode into [`ClientMessage`], one variant per protocol
//! message, selected by the `type` tag. An unknown tag or a structurally
//! invalid body is a single decode error answered with
//! [`ServerMessage::Error`] and no state change; there is no duck-typed
//! dispatch on partially parsed payloads.

use serde::{Deserialize, Serialize};

/// Client → Server messages.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    CreateRoom {
        name: Option<String>,
        #[serde(default, rename = "isPrivate")]
        is_private: bool,
        password: Option<String>,
    },
    ListRooms,
    JoinRoom {
        id: String,
        password: Option<String>,
        #[serde(rename = "displayName")]
        display_name: Option<String>,
    },
    LeaveRoom,
    Message {
        #[serde(default)]
        text: String,
    },
}

/// Server → Client messages.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    CreateRoomSuccess {
        room: RoomInfoDto,
    },
    RoomList {
        rooms: Vec<PublicRoomDto>,
    },
    JoinSuccess {
        room: RoomRefDto,
        occupants: Vec<UserDto>,
    },
    JoinError {
        message: String,
    },
    UserJoined {
        user: UserDto,
        count: usize,
    },
    UserLeft {
        user: UserDto,
        count: usize,
    },
    LeftRoom,
    Message {
        from: UserDto,
        text: String,
        ts: i64,
    },
    Error {
        message: String,
    },
}

impl ServerMessage {
    /// Serialize for the wire. These enums contain only strings and
    /// numbers, so serialization cannot fail.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("ServerMessage is always serializable")
    }
}

/// Room identity as returned by `create_room_success`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomInfoDto {
    pub id: String,
    pub name: String,
    #[serde(rename = "isPrivate")]
    pub is_private: bool,
}

/// Room reference as carried by `join_success`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomRefDto {
    pub id: String,
    pub name: String,
}

/// One entry of the `room_list` payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublicRoomDto {
    pub id: String,
    pub name: String,
    pub count: usize,
}

/// A user as carried by `join_success`, `user_joined`, `user_left` and
/// `message`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserDto {
    pub id: String,
    #[serde(rename = "displayName")]
    pub display_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_message_join_room_decodes() {
        // テスト項目: join_room ペイロードが正しくデコードされる
        // given (前提条件):
        let json = r#"{"type":"join_room","id":"r1","password":"p","displayName":"alice"}"#;

        // when (操作):
        let msg: ClientMessage = serde_json::from_str(json).unwrap();

        // then (期待する結果):
        assert_eq!(
            msg,
            ClientMessage::JoinRoom {
                id: "r1".to_string(),
                password: Some("p".to_string()),
                display_name: Some("alice".to_string()),
            }
        );
    }

    #[test]
    fn test_client_message_optional_fields_default() {
        // テスト項目: 省略可能なフィールドが既定値で補完される
        // given (前提条件):
        let json = r#"{"type":"create_room"}"#;

        // when (操作):
        let msg: ClientMessage = serde_json::from_str(json).unwrap();

        // then (期待する結果):
        assert_eq!(
            msg,
            ClientMessage::CreateRoom {
                name: None,
                is_private: false,
                password: None,
            }
        );
    }

    #[test]
    fn test_client_message_unit_variants_decode() {
        // テスト項目: フィールドを持たないメッセージがデコードされる
        // given (前提条件):

        // when (操作):
        let list: ClientMessage = serde_json::from_str(r#"{"type":"list_rooms"}"#).unwrap();
        let leave: ClientMessage = serde_json::from_str(r#"{"type":"leave_room"}"#).unwrap();

        // then (期待する結果):
        assert_eq!(list, ClientMessage::ListRooms);
        assert_eq!(leave, ClientMessage::LeaveRoom);
    }

    #[test]
    fn test_client_message_missing_text_coerced_to_empty() {
        // テスト項目: text フィールドが欠けた message が空文字列として扱われる
        // given (前提条件):
        let json = r#"{"type":"message"}"#;

        // when (操作):
        let msg: ClientMessage = serde_json::from_str(json).unwrap();

        // then (期待する結果):
        assert_eq!(
            msg,
            ClientMessage::Message {
                text: String::new()
            }
        );
    }

    #[test]
    fn test_unknown_type_tag_is_an_error() {
        // テスト項目: 未知の type タグがデコードエラーになる
        // given (前提条件):
        let json = r#"{"type":"fly_to_the_moon"}"#;

        // when (操作):
        let result = serde_json::from_str::<ClientMessage>(json);

        // then (期待する結果):
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_type_tag_is_an_error() {
        // テスト項目: type タグのないペイロードがデコードエラーになる
        // given (前提条件):
        let json = r#"{"text":"hello"}"#;

        // when (操作):
        let result = serde_json::from_str::<ClientMessage>(json);

        // then (期待する結果):
        assert!(result.is_err());
    }

    #[test]
    fn test_server_message_uses_snake_case_tags() {
        // テスト項目: サーバーメッセージの type タグが snake_case で出力される
        // given (前提条件):
        let msg = ServerMessage::LeftRoom;

        // when (操作):
        let json = msg.to_json();

        // then (期待する結果):
        assert_eq!(json, r#"{"type":"left_room"}"#);
    }

    #[test]
    fn test_server_message_chat_shape() {
        // テスト項目: message ペイロードが from / text / ts を含む
        // given (前提条件):
        let msg = ServerMessage::Message {
            from: UserDto {
                id: "c1".to_string(),
                display_name: "alice".to_string(),
            },
            text: "hi".to_string(),
            ts: 1000,
        };

        // when (操作):
        let value: serde_json::Value = serde_json::from_str(&msg.to_json()).unwrap();

        // then (期待する結果):
        assert_eq!(value["type"], "message");
        assert_eq!(value["from"]["id"], "c1");
        assert_eq!(value["from"]["displayName"], "alice");
        assert_eq!(value["text"], "hi");
        assert_eq!(value["ts"], 1000);
    }

    #[test]
    fn test_room_list_never_carries_password() {
        // テスト項目: room_list ペイロードにパスワード情報が含まれない
        // given (前提条件):
        let msg = ServerMessage::RoomList {
            rooms: vec![PublicRoomDto {
                id: "r1".to_string(),
                name: "Lobby".to_string(),
                count: 2,
            }],
        };

        // when (操作):
        let json = msg.to_json();

        // then (期待する結果):
        assert!(!json.contains("password"));
        assert!(!json.contains("isPrivate"));
    }
}
