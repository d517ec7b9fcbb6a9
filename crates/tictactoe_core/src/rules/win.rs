//! Win detection logic for tic-tac-toe.

use crate::{Board, Player, Position, Square};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// One of the eight fixed triples that wins the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WinningLine([Position; 3]);

impl WinningLine {
    /// The three positions of this line.
    pub fn positions(&self) -> [Position; 3] {
        self.0
    }

    /// The three board indices of this line.
    pub fn indices(&self) -> [usize; 3] {
        self.0.map(Position::to_index)
    }

    /// Whether `pos` lies on this line.
    pub fn contains(&self, pos: Position) -> bool {
        self.0.contains(&pos)
    }

    /// Returns the player holding all three squares, if any.
    pub fn owner(&self, board: &Board) -> Option<Player> {
        let [a, b, c] = self.0;
        let sq = board.get(a);
        match sq {
            Square::Occupied(player) if sq == board.get(b) && sq == board.get(c) => Some(player),
            _ => None,
        }
    }
}

/// Rows, columns, then diagonals.
pub const WINNING_LINES: [WinningLine; 8] = [
    WinningLine([Position::TopLeft, Position::TopCenter, Position::TopRight]),
    WinningLine([Position::MiddleLeft, Position::Center, Position::MiddleRight]),
    WinningLine([
        Position::BottomLeft,
        Position::BottomCenter,
        Position::BottomRight,
    ]),
    WinningLine([Position::TopLeft, Position::MiddleLeft, Position::BottomLeft]),
    WinningLine([Position::TopCenter, Position::Center, Position::BottomCenter]),
    WinningLine([Position::TopRight, Position::MiddleRight, Position::BottomRight]),
    WinningLine([Position::TopLeft, Position::Center, Position::BottomRight]),
    WinningLine([Position::TopRight, Position::Center, Position::BottomLeft]),
];

/// Returns the first completed line on the board.
#[instrument(skip(board))]
pub fn winning_line(board: &Board) -> Option<WinningLine> {
    WINNING_LINES
        .iter()
        .copied()
        .find(|line| line.owner(board).is_some())
}

/// Checks if there is a winner on the board.
///
/// Returns `Some(player)` if the player has three in a row,
/// `None` otherwise.
#[instrument(skip(board))]
pub fn check_winner(board: &Board) -> Option<Player> {
    winning_line(board).and_then(|line| line.owner(board))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_winner_empty_board() {
        let board = Board::new();
        assert_eq!(check_winner(&board), None);
    }

    #[test]
    fn test_winner_top_row() {
        let mut board = Board::new();
        board.set(Position::TopLeft, Square::Occupied(Player::X));
        board.set(Position::TopCenter, Square::Occupied(Player::X));
        board.set(Position::TopRight, Square::Occupied(Player::X));
        assert_eq!(check_winner(&board), Some(Player::X));
    }

    #[test]
    fn test_winner_diagonal() {
        let mut board = Board::new();
        board.set(Position::TopLeft, Square::Occupied(Player::O));
        board.set(Position::Center, Square::Occupied(Player::O));
        board.set(Position::BottomRight, Square::Occupied(Player::O));
        assert_eq!(check_winner(&board), Some(Player::O));
    }

    #[test]
    fn test_no_winner_incomplete() {
        let mut board = Board::new();
        board.set(Position::TopLeft, Square::Occupied(Player::X));
        board.set(Position::TopCenter, Square::Occupied(Player::X));
        assert_eq!(check_winner(&board), None);
    }

    #[test]
    fn test_mixed_line_is_not_a_win() {
        let board: Board = "XXO......".parse().unwrap();
        assert_eq!(check_winner(&board), None);
    }

    #[test]
    fn test_every_line_wins_for_its_owner_only() {
        for line in WINNING_LINES {
            for player in [Player::X, Player::O] {
                let mut board = Board::new();
                for pos in line.positions() {
                    board.set(pos, Square::Occupied(player));
                }
                assert_eq!(check_winner(&board), Some(player));
                assert_ne!(check_winner(&board), Some(player.opponent()));
                assert_eq!(winning_line(&board), Some(line));
            }
        }
    }
}
