//! Session configuration: grid width, rule variant and move bound.

use crate::error::ConfigError;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Widest grid a session accepts.
pub const MAX_BOARD_WIDTH: usize = 1024;

/// How a game is decided.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum WinVariant {
    /// No line check. The game is a draw once the move bound is reached.
    OccupancyExhaustion,
    /// Five same-owner marks in a straight line win.
    FiveInARow,
}

/// Parameters fixed at session construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Grid width (and height).
    board_width: usize,
    /// Rule variant.
    win_variant: WinVariant,
    /// Move count that forces a draw.
    max_moves: u32,
}

impl SessionConfig {
    /// Creates a configuration without validating it.
    pub fn new(board_width: usize, win_variant: WinVariant, max_moves: u32) -> Self {
        Self {
            board_width,
            win_variant,
            max_moves,
        }
    }

    /// 3×3 slots, draw after nine moves.
    pub fn occupancy_exhaustion() -> Self {
        Self::new(3, WinVariant::OccupancyExhaustion, 9)
    }

    /// 19×19 grid, five in a row, draw after 361 moves.
    pub fn five_in_a_row() -> Self {
        Self::new(19, WinVariant::FiveInARow, 361)
    }

    /// Preset matching a variant.
    pub fn for_variant(variant: WinVariant) -> Self {
        match variant {
            WinVariant::OccupancyExhaustion => Self::occupancy_exhaustion(),
            WinVariant::FiveInARow => Self::five_in_a_row(),
        }
    }

    /// Rejects a zero or oversized width, a zero move bound, or a bound
    /// larger than the grid.
    #[instrument]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.board_width == 0 {
            return Err(ConfigError::new("board_width must be at least 1"));
        }
        if self.board_width > MAX_BOARD_WIDTH {
            return Err(ConfigError::new(format!(
                "board_width {} exceeds the maximum of {}",
                self.board_width, MAX_BOARD_WIDTH
            )));
        }
        if self.max_moves == 0 {
            return Err(ConfigError::new("max_moves must be at least 1"));
        }
        let Some(cells) = self.board_width.checked_mul(self.board_width) else {
            return Err(ConfigError::new(format!(
                "board_width {} overflows the cell count",
                self.board_width
            )));
        };
        if self.max_moves as usize > cells {
            return Err(ConfigError::new(format!(
                "max_moves {} exceeds the {} cells of a {}-wide board",
                self.max_moves, cells, self.board_width
            )));
        }
        debug!("Session config valid");
        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::five_in_a_row()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_presets_are_valid() {
        for variant in WinVariant::iter() {
            assert!(SessionConfig::for_variant(variant).validate().is_ok());
        }
    }

    #[test]
    fn test_rejects_bound_larger_than_grid() {
        let config = SessionConfig::new(3, WinVariant::OccupancyExhaustion, 10);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_oversized_width() {
        let config = SessionConfig::new(1usize << 32, WinVariant::FiveInARow, 361);
        assert!(config.validate().is_err());

        let config = SessionConfig::new(MAX_BOARD_WIDTH + 1, WinVariant::FiveInARow, 361);
        assert!(config.validate().is_err());

        let config = SessionConfig::new(MAX_BOARD_WIDTH, WinVariant::FiveInARow, 361);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_width() {
        let config = SessionConfig::new(0, WinVariant::FiveInARow, 1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_variant_names_round_trip_through_strings() {
        assert_eq!(
            WinVariant::from_str("five-in-a-row").unwrap(),
            WinVariant::FiveInARow
        );
        assert_eq!(
            WinVariant::OccupancyExhaustion.to_string(),
            "occupancy-exhaustion"
        );
    }

    #[test]
    fn test_config_deserializes_kebab_case_variant() {
        let config: SessionConfig = serde_json::from_str(
            r#"{"board_width":3,"win_variant":"occupancy-exhaustion","max_moves":9}"#,
        )
        .unwrap();
        assert_eq!(config, SessionConfig::occupancy_exhaustion());
    }
}
