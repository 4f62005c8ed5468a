//! Inbound intents and outbound room events.
//!
//! Shapes only. Serialization is JSON; the core never sees these types.

use derive_new::new;
use omok_game::{GameResult, Mark, Player, PlayerId, Position, RejectReason, SessionConfig};
use serde::{Deserialize, Serialize};

/// Request to take a seat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, new)]
pub struct JoinRequest {
    /// Identity issued by the transport.
    pub player_id: PlayerId,
    /// Name to show; a guest name is generated when absent or blank.
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Request to place a mark.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, new)]
pub struct MoveRequest {
    /// Mover.
    pub player_id: PlayerId,
    /// Target cell.
    pub position: Position,
}

/// Request to leave the room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, new)]
pub struct LeaveRequest {
    /// Departing player.
    pub player_id: PlayerId,
}

/// Chat line to relay to the room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, new)]
pub struct ChatRequest {
    /// Speaker.
    pub player_id: PlayerId,
    /// Text as typed.
    pub message: String,
}

/// Request to open a room.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRoomRequest {
    /// Room id; generated when absent.
    #[serde(default)]
    pub room_id: Option<String>,
    /// Session parameters; the server default when absent.
    #[serde(default)]
    pub config: Option<SessionConfig>,
}

/// Something that happened in a room, for clients to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RoomEvent {
    /// A player took a seat.
    PlayerJoined {
        /// The new player.
        player: Player,
    },
    /// Current roster after a join.
    RosterUpdated {
        /// Seated players in join order.
        players: Vec<Player>,
    },
    /// A mark was placed.
    MoveAccepted {
        /// The new mark.
        mark: Mark,
    },
    /// A move was refused. Sent to the mover only.
    MoveRejected {
        /// Mover.
        player_id: PlayerId,
        /// Why.
        reason: RejectReason,
    },
    /// The game is decided.
    GameEnded {
        /// Winner or draw.
        result: GameResult,
    },
    /// A player left the room.
    PlayerLeft {
        /// The departed player.
        player: Player,
    },
    /// Chat relayed from a seated player.
    ChatRelayed {
        /// Speaker's display name.
        speaker: String,
        /// Message text.
        text: String,
    },
}

impl RoomEvent {
    /// True for events every room member should see.
    pub fn is_broadcast(&self) -> bool {
        !matches!(self, RoomEvent::MoveRejected { .. })
    }
}
