//! CLI command handlers.

pub mod cache;
pub mod config;
pub mod render;
