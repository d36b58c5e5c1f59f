//! Data Transfer Objects (DTOs) for the chat server.
//!
//! DTOs are organized by protocol:
//! - `websocket`: the tagged WebSocket message types
//! - `http`: HTTP API response DTOs
//! - `conversion`: Domain Model → DTO conversions

pub mod conversion;
pub mod http;
pub mod websocket;
