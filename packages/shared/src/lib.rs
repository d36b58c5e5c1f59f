//! Shared utilities for the hiroma chat server and its tests.

pub mod logger;
pub mod time;
