//! Infrastructure layer: WebSocket message pusher and protocol DTOs.

pub mod dto;
pub mod pusher;
