//! Infrastructure layer - External adapters and implementations
//!
//! This layer contains:
//! - Content packs: file-based loading of pack tables and config
//! - HTTP: health check, static client and the WebSocket route
//! - WebSocket: real-time communication with game clients
//! - Config: Application configuration
//! - State: Shared application state
//! - Session: Room registry and connection fan-out

pub mod config;
pub mod content_pack;
pub mod http;
pub mod session;
pub mod state;
pub mod websocket;
