//! Draw by move exhaustion.

use crate::board::Mark;
use crate::config::SessionConfig;

/// True once the mark just placed used up the last allowed move.
pub fn moves_exhausted(config: &SessionConfig, mark: &Mark) -> bool {
    *mark.turn_number() >= *config.max_moves()
}
