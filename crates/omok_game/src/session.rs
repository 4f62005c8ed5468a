//! Authoritative game session: roster, turn order, move acceptance and
//! end-of-game resolution.
//!
//! `GameSession` methods take `&mut self`, so a single call is one atomic
//! read-modify-write. Share a session between tasks through
//! [`SharedSession`](crate::SharedSession), which holds the lock for the
//! whole of each call.

use crate::board::{Board, Mark, Position};
use crate::config::{SessionConfig, WinVariant};
use crate::error::{ConfigError, JoinError, RejectReason};
use crate::roster::{Player, PlayerId, Roster};
use crate::rules;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Coarse lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// Fewer than two players seated.
    WaitingForPlayers,
    /// Two players seated, moves accepted.
    InProgress,
    /// Terminal.
    Over,
}

/// How a game ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum GameResult {
    /// A player won by completing a line or by the opponent leaving.
    Winner {
        /// The winning player.
        player: Player,
    },
    /// No winner.
    Draw,
}

impl GameResult {
    /// The winner, absent for a draw.
    pub fn winner(&self) -> Option<&Player> {
        match self {
            GameResult::Winner { player } => Some(player),
            GameResult::Draw => None,
        }
    }
}

/// Result of [`GameSession::submit_move`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MoveOutcome {
    /// The mark was placed. `result` is present only on the move that
    /// ended the game.
    Accepted {
        /// The new mark.
        mark: Mark,
        /// End-of-game result, if this move ended it.
        result: Option<GameResult>,
    },
    /// The move was refused and nothing changed.
    Rejected {
        /// Why.
        reason: RejectReason,
    },
}

impl MoveOutcome {
    /// True for [`MoveOutcome::Accepted`].
    pub fn is_accepted(&self) -> bool {
        matches!(self, MoveOutcome::Accepted { .. })
    }

    /// Rejection reason, if rejected.
    pub fn rejection(&self) -> Option<RejectReason> {
        match self {
            MoveOutcome::Rejected { reason } => Some(*reason),
            MoveOutcome::Accepted { .. } => None,
        }
    }

    /// End-of-game result carried by an accepted move.
    pub fn game_result(&self) -> Option<&GameResult> {
        match self {
            MoveOutcome::Accepted { result, .. } => result.as_ref(),
            MoveOutcome::Rejected { .. } => None,
        }
    }
}

/// A player removed by [`GameSession::leave`].
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct Departure {
    /// The player who left.
    player: Player,
    /// Winner announcement triggered by the departure, if any.
    result: Option<GameResult>,
}

/// Read-only copy of a session's state.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Construction parameters.
    config: SessionConfig,
    /// Lifecycle state.
    phase: SessionPhase,
    /// Number of the next turn slot.
    turn_count: u32,
    /// Player allowed to move now.
    current_player: Option<PlayerId>,
    /// Seated players in join order.
    players: Vec<Player>,
    /// Marks in placement order.
    marks: Vec<Mark>,
    /// End-of-game result, once decided.
    result: Option<GameResult>,
}

/// Game session state machine.
#[derive(Debug, Clone)]
pub struct GameSession {
    config: SessionConfig,
    board: Board,
    roster: Roster,
    turn_count: u32,
    current_player: Option<PlayerId>,
    is_over: bool,
    result: Option<GameResult>,
}

impl GameSession {
    /// Creates an empty session after validating `config`.
    #[instrument]
    pub fn new(config: SessionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        info!(variant = %config.win_variant(), width = config.board_width(), "Creating game session");
        Ok(Self {
            config,
            board: Board::new(*config.board_width()),
            roster: Roster::new(),
            turn_count: 1,
            current_player: None,
            is_over: false,
            result: None,
        })
    }

    /// Construction parameters.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Seated players.
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Number of the next turn slot (starts at 1).
    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    /// Player allowed to move now.
    pub fn current_player(&self) -> Option<&PlayerId> {
        self.current_player.as_ref()
    }

    /// True once the game reached a terminal state.
    pub fn is_over(&self) -> bool {
        self.is_over
    }

    /// End-of-game result. `None` while in progress, and also when the game
    /// ended because the last player left an otherwise empty room.
    pub fn result(&self) -> Option<&GameResult> {
        self.result.as_ref()
    }

    /// Lifecycle state.
    pub fn phase(&self) -> SessionPhase {
        if self.is_over {
            SessionPhase::Over
        } else if self.roster.is_full() {
            SessionPhase::InProgress
        } else {
            SessionPhase::WaitingForPlayers
        }
    }

    /// True iff `id` is the player allowed to move now.
    pub fn is_players_turn(&self, id: &PlayerId) -> bool {
        self.current_player.as_ref() == Some(id)
    }

    /// Seats a player. The first player to join moves first.
    #[instrument(skip(self, display_name), fields(player_id = %id))]
    pub fn join(
        &mut self,
        id: PlayerId,
        display_name: impl Into<String>,
    ) -> Result<Player, JoinError> {
        self.check_join(&id)?;

        // Only the very first join can set the current player; it is never
        // cleared afterwards.
        let is_first = self.current_player.is_none();
        if is_first {
            self.current_player = Some(id.clone());
        }

        let player = Player::new(id, display_name.into(), is_first);
        self.roster.push(player.clone());

        info!(
            display_name = %player.display_name(),
            is_first,
            seated = self.roster.len(),
            "Player joined"
        );
        Ok(player)
    }

    /// Reports whether `id` could be seated now, without seating it.
    pub fn check_join(&self, id: &PlayerId) -> Result<(), JoinError> {
        if self.is_over {
            warn!(player_id = %id, "Join attempted after game over");
            return Err(JoinError::GameOver);
        }
        if self.roster.contains(id) {
            warn!(player_id = %id, "Player already seated");
            return Err(JoinError::AlreadyJoined);
        }
        if self.roster.is_full() {
            warn!(player_id = %id, seated = self.roster.len(), "Room is full");
            return Err(JoinError::RoomFull);
        }
        Ok(())
    }

    /// Removes a player. If the game was still running, the remaining
    /// player (if any) wins and the session ends.
    ///
    /// Returns `None` when `id` is not seated.
    #[instrument(skip(self), fields(player_id = %id))]
    pub fn leave(&mut self, id: &PlayerId) -> Option<Departure> {
        let Some(player) = self.roster.remove(id) else {
            debug!("Leave for unknown player ignored");
            return None;
        };
        info!(display_name = %player.display_name(), "Player left");

        if self.is_over {
            debug!("Game already over, no winner announcement");
            return Some(Departure {
                player,
                result: None,
            });
        }

        self.is_over = true;
        let result = self
            .roster
            .other_than(id)
            .cloned()
            .map(|remaining| GameResult::Winner { player: remaining });

        match &result {
            Some(GameResult::Winner { player: winner }) => {
                info!(winner = %winner.id(), "Remaining player wins by departure");
            }
            _ => {
                info!("Room emptied before a winner could be named");
            }
        }
        self.result = result.clone();

        Some(Departure { player, result })
    }

    /// Validates and applies a move.
    #[instrument(skip(self), fields(player_id = %id, turn = self.turn_count))]
    pub fn submit_move(&mut self, id: &PlayerId, position: Position) -> MoveOutcome {
        if let Err(reason) = self.check_move(id, position) {
            warn!(%reason, "Move rejected");
            return MoveOutcome::Rejected { reason };
        }

        let mark = Mark::new(id.clone(), self.turn_count, position);
        self.board.place(mark.clone());
        self.advance_turn(id);

        let result = self.evaluate(&mark);
        if let Some(result) = &result {
            self.is_over = true;
            self.result = Some(result.clone());
            info!(
                winner = ?result.winner().map(|p| p.id()),
                moves = self.board.len(),
                "Game ended"
            );
        } else {
            info!(next = ?self.current_player, "Move accepted");
        }

        MoveOutcome::Accepted { mark, result }
    }

    /// Copies the current state.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            config: self.config,
            phase: self.phase(),
            turn_count: self.turn_count,
            current_player: self.current_player.clone(),
            players: self.roster.players().to_vec(),
            marks: self.board.marks().to_vec(),
            result: self.result.clone(),
        }
    }

    fn check_move(&self, id: &PlayerId, position: Position) -> Result<(), RejectReason> {
        if !self.roster.is_full() {
            return Err(RejectReason::NotStarted);
        }
        if self.is_over {
            return Err(RejectReason::GameOver);
        }
        if !self.is_players_turn(id) {
            return Err(RejectReason::NotYourTurn);
        }
        if !self.board.contains(position) {
            return Err(RejectReason::OutOfBounds);
        }
        if !self.board.is_position_free(position) {
            return Err(RejectReason::PositionTaken);
        }
        Ok(())
    }

    /// Hands the turn to the other seated player. With a single member the
    /// current player is left unchanged.
    fn advance_turn(&mut self, mover: &PlayerId) {
        self.turn_count += 1;
        if let Some(next) = self.roster.other_than(mover) {
            self.current_player = Some(next.id().clone());
        }
    }

    /// Decides the game from the post-move state. The move bound is checked
    /// before any line scan.
    fn evaluate(&self, mark: &Mark) -> Option<GameResult> {
        if rules::moves_exhausted(&self.config, mark) {
            return Some(GameResult::Draw);
        }
        match self.config.win_variant() {
            WinVariant::OccupancyExhaustion => None,
            WinVariant::FiveInARow => {
                if !rules::completes_line(&self.board, mark, rules::WIN_LENGTH) {
                    return None;
                }
                self.roster
                    .get(mark.placed_by())
                    .cloned()
                    .map(|player| GameResult::Winner { player })
            }
        }
    }
}
