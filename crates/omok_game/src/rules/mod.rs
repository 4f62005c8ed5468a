//! Game-ending rules.
//!
//! Pure functions evaluated against the board after a move has been
//! applied. They only look at the newly placed mark and the lines through
//! it, never the whole board.

pub mod draw;
pub mod win;

pub use draw::moves_exhausted;
pub use win::{WIN_LENGTH, completes_line, line_length};
