//! Room-based broadcast chat server library.
//!
//! Clients connect over WebSocket, create or join named rooms (optionally
//! password-protected and capacity-bounded) and exchange text messages that
//! are fanned out to every member of the room.

// layers
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
