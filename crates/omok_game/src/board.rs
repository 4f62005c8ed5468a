//! Append-only record of placed marks on a fixed-width grid.

use crate::roster::PlayerId;
use derive_getters::Getters;
use derive_new::new;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Row-major cell index.
pub type Position = usize;

/// One placed move. Never mutated or removed once on the board.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Getters, Serialize, Deserialize, new)]
pub struct Mark {
    /// Identity of the player who placed it.
    placed_by: PlayerId,
    /// Turn count at the moment of placement (1-based).
    turn_number: u32,
    /// Cell the mark occupies.
    position: Position,
}

/// Placed marks plus the grid width used to turn positions into coordinates.
///
/// The board trusts its caller: [`Board::place`] does not check occupancy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    width: usize,
    marks: Vec<Mark>,
}

impl Board {
    /// Creates an empty board `width` cells wide and tall.
    pub fn new(width: usize) -> Self {
        Self {
            width,
            marks: Vec::new(),
        }
    }

    /// Grid width.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of cells on the grid, saturating at `usize::MAX`.
    pub fn cell_count(&self) -> usize {
        self.width.saturating_mul(self.width)
    }

    /// True if `position` names a cell on the grid.
    pub fn contains(&self, position: Position) -> bool {
        position < self.cell_count()
    }

    /// Converts a position into `(row, col)`.
    pub fn coordinates(&self, position: Position) -> (usize, usize) {
        (position / self.width, position % self.width)
    }

    /// True iff no mark occupies `position`.
    pub fn is_position_free(&self, position: Position) -> bool {
        self.marks.iter().all(|mark| mark.position != position)
    }

    /// Appends a mark.
    #[instrument(skip(self), fields(position = mark.position, turn = mark.turn_number))]
    pub fn place(&mut self, mark: Mark) {
        debug!(placed_by = %mark.placed_by, "Placing mark");
        self.marks.push(mark);
    }

    /// Mark occupying `position`, if any. Off-grid positions yield `None`.
    pub fn mark_at(&self, position: Position) -> Option<&Mark> {
        if !self.contains(position) {
            return None;
        }
        self.marks.iter().find(|mark| mark.position == position)
    }

    /// Mark at signed grid coordinates. Anything outside `[0, width)` on
    /// either axis yields `None`.
    pub fn mark_at_cell(&self, row: isize, col: isize) -> Option<&Mark> {
        let width = isize::try_from(self.width).ok()?;
        if !(0..width).contains(&row) || !(0..width).contains(&col) {
            return None;
        }
        let position = row.checked_mul(width)?.checked_add(col)?;
        self.mark_at(usize::try_from(position).ok()?)
    }

    /// Marks in placement order.
    pub fn marks(&self) -> &[Mark] {
        &self.marks
    }

    /// Number of marks placed.
    pub fn len(&self) -> usize {
        self.marks.len()
    }

    /// True before the first mark.
    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }
}
