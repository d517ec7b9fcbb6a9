//! Game rules for tic-tac-toe.
//!
//! Pure functions over a [`Board`](crate::Board). Both the local game and the
//! on-chain session record delegate to these, so the win predicate exists
//! exactly once.

pub mod draw;
pub mod win;

pub use draw::{is_draw, is_full};
pub use win::{WINNING_LINES, WinningLine, check_winner, winning_line};

use crate::{Board, Player};
use tracing::instrument;

/// Verdict for a board position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Evaluation {
    /// No line completed and empty squares remain.
    Ongoing,
    /// `player` completed `line`.
    Won {
        /// The winning side.
        player: Player,
        /// The first completed line.
        line: WinningLine,
    },
    /// Board full with no completed line.
    Draw,
}

/// Evaluates a board: win first, then draw, otherwise ongoing.
#[instrument(skip(board))]
pub fn evaluate(board: &Board) -> Evaluation {
    if let Some(line) = winning_line(board)
        && let Some(player) = line.owner(board)
    {
        return Evaluation::Won { player, line };
    }
    if is_full(board) {
        Evaluation::Draw
    } else {
        Evaluation::Ongoing
    }
}
