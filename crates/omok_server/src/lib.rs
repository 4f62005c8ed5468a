//! Omok room host
//!
//! Hosts [`omok_game`] sessions for networked play.
//!
//! # Architecture
//!
//! - **Rooms**: registry of open rooms, each with its own session lock
//! - **Room**: one shared session plus a broadcast channel of room events
//! - **Events**: inbound intents and outbound events as JSON shapes
//! - **HTTP**: axum router exposing join, move, leave and chat
//! - **Config**: TOML file, environment and CLI overrides

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod cli;
mod config;
mod events;
mod http;
mod room;
mod rooms;

// Crate-level exports - CLI and configuration
pub use cli::Cli;
pub use config::{ServerConfig, ServerConfigError};

// Crate-level exports - Wire shapes
pub use events::{
    ChatRequest, CreateRoomRequest, JoinRequest, LeaveRequest, MoveRequest, RoomEvent,
};

// Crate-level exports - Hosting
pub use http::{ApiError, RoomCreated, router};
pub use room::{Room, RoomId};
pub use rooms::{RoomError, RoomManager};
