//! Player identities and the insertion-ordered two-seat roster.

use derive_getters::Getters;
use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

/// Maximum number of players seated in one session.
pub const ROSTER_CAPACITY: usize = 2;

/// Opaque identity of a connected player, issued by the transport layer.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    /// Wraps an external identity token.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the raw token.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PlayerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A seated player.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct Player {
    /// Stable session/connection identity.
    id: PlayerId,
    /// Name shown to the other player.
    display_name: String,
    /// True for the player who moves on turn 1.
    is_first: bool,
}

impl Player {
    pub(crate) fn new(id: PlayerId, display_name: String, is_first: bool) -> Self {
        Self {
            id,
            display_name,
            is_first,
        }
    }
}

/// Players in join order.
///
/// Turn rotation and leave resolution are both defined as "the other
/// member", so the order only matters for reporting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roster {
    players: Vec<Player>,
}

impl Roster {
    /// Creates an empty roster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of seated players.
    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// True when nobody is seated.
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// True when both seats are taken.
    pub fn is_full(&self) -> bool {
        self.players.len() >= ROSTER_CAPACITY
    }

    /// True if `id` is seated.
    pub fn contains(&self, id: &PlayerId) -> bool {
        self.get(id).is_some()
    }

    /// Looks up a seated player.
    pub fn get(&self, id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == *id)
    }

    /// First member, in join order, whose identity differs from `id`.
    pub fn other_than(&self, id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id != *id)
    }

    /// All seated players in join order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub(crate) fn push(&mut self, player: Player) {
        self.players.push(player);
    }

    pub(crate) fn remove(&mut self, id: &PlayerId) -> Option<Player> {
        let index = self.players.iter().position(|p| p.id == *id)?;
        Some(self.players.remove(index))
    }
}
