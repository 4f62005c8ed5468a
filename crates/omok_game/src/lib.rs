//! Omok game core - authoritative two-player grid game sessions
//!
//! Decides whose turn it is, whether a move is legal, whether the game has
//! ended, and who wins when a player leaves mid-game. Transport, room
//! hosting and accounts live outside this crate.
//!
//! # Architecture
//!
//! - **Board**: append-only record of placed marks on a fixed-width grid
//! - **Roster**: the two seated players in join order
//! - **Rules**: move-bound draw and five-in-a-row line scan
//! - **Session**: the state machine tying them together
//! - **Shared**: per-session lock so concurrent moves are totally ordered
//!
//! # Example
//!
//! ```
//! use omok_game::{GameSession, MoveOutcome, SessionConfig};
//!
//! let mut session = GameSession::new(SessionConfig::five_in_a_row())?;
//! session.join("p1".into(), "Alice")?;
//! session.join("p2".into(), "Bob")?;
//!
//! let outcome = session.submit_move(&"p1".into(), 180);
//! assert!(matches!(outcome, MoveOutcome::Accepted { result: None, .. }));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod board;
mod config;
mod error;
mod roster;
pub mod rules;
mod session;
mod shared;

// Crate-level exports - Board
pub use board::{Board, Mark, Position};

// Crate-level exports - Configuration
pub use config::{MAX_BOARD_WIDTH, SessionConfig, WinVariant};

// Crate-level exports - Errors
pub use error::{ConfigError, JoinError, RejectReason};

// Crate-level exports - Roster
pub use roster::{Player, PlayerId, ROSTER_CAPACITY, Roster};

// Crate-level exports - Session
pub use session::{
    Departure, GameResult, GameSession, MoveOutcome, SessionPhase, SessionSnapshot,
};
pub use shared::SharedSession;
