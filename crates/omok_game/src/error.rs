//! Rejection and configuration error types.
//!
//! Every rejection here is an expected outcome returned as a value. None of
//! them is fatal to the session or the process.

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Why a submitted move was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// Fewer than two players have joined.
    #[display("game not started")]
    NotStarted,

    /// The session already reached a terminal state.
    #[display("game is already over")]
    GameOver,

    /// The mover is not the current player.
    #[display("now is opponent turn")]
    NotYourTurn,

    /// The position lies outside the grid.
    #[display("position is outside the board")]
    OutOfBounds,

    /// Another mark already occupies the position.
    #[display("can't place mark at this point")]
    PositionTaken,
}

/// Why a join was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinError {
    /// The roster already holds two players.
    #[display("room is full")]
    RoomFull,

    /// The identity is already in the roster.
    #[display("player already joined")]
    AlreadyJoined,

    /// The session already reached a terminal state.
    #[display("game is already over")]
    GameOver,
}

/// Invalid session configuration.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reject_reason_serializes_snake_case() {
        let json = serde_json::to_string(&RejectReason::NotYourTurn).unwrap();
        assert_eq!(json, "\"not_your_turn\"");
    }

    #[test]
    fn test_config_error_records_location() {
        let err = ConfigError::new("board width must be positive");
        assert!(err.file.ends_with("error.rs"));
        assert!(err.to_string().contains("board width must be positive"));
    }
}
