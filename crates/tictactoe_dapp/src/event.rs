//! Board changes reported to the renderer.

use tictactoe_core::{Board, GameStatus, Player, Position, WinningLine, rules};

/// Something visible happened on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardEvent {
    /// A mark was placed and play continues.
    Placed {
        /// Who moved.
        player: Player,
        /// Where.
        position: Position,
    },
    /// The move completed a line.
    Won {
        /// The winner.
        player: Player,
        /// Where the last mark went.
        position: Position,
        /// The completed line.
        line: WinningLine,
    },
    /// The move filled the board without a line.
    Draw {
        /// Where the last mark went.
        position: Position,
    },
}

impl BoardEvent {
    /// Event for `player` marking `position`, given the resulting board and
    /// status.
    pub fn after_move(player: Player, position: Position, board: &Board, status: GameStatus) -> Self {
        match status {
            GameStatus::XWins | GameStatus::OWins => match rules::winning_line(board) {
                Some(line) => BoardEvent::Won {
                    player,
                    position,
                    line,
                },
                None => BoardEvent::Placed { player, position },
            },
            GameStatus::Draw => BoardEvent::Draw { position },
            GameStatus::Ongoing => BoardEvent::Placed { player, position },
        }
    }

    /// Cell the event happened at.
    pub fn position(&self) -> Position {
        match self {
            BoardEvent::Placed { position, .. }
            | BoardEvent::Won { position, .. }
            | BoardEvent::Draw { position } => *position,
        }
    }
}
