//! Core domain types for tic-tac-toe.

use super::position::Position;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Player in the game.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
pub enum Player {
    /// Player X (goes first).
    X,
    /// Player O (goes second).
    O,
}

impl Player {
    /// Returns the opponent player.
    pub fn opponent(self) -> Self {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    /// Integer mark used by the on-chain board encoding.
    pub fn code(self) -> u8 {
        match self {
            Player::X => 1,
            Player::O => 2,
        }
    }
}

/// A square on the tic-tac-toe board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Square {
    /// Empty square.
    Empty,
    /// Square occupied by a player.
    Occupied(Player),
}

impl Square {
    /// Integer encoding: 0 empty, 1 X, 2 O.
    pub fn code(self) -> u8 {
        match self {
            Square::Empty => 0,
            Square::Occupied(player) => player.code(),
        }
    }

    /// Decodes the integer encoding. Unknown codes yield `None`.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Square::Empty),
            1 => Some(Square::Occupied(Player::X)),
            2 => Some(Square::Occupied(Player::O)),
            _ => None,
        }
    }

    /// Text mark: `"X"`, `"O"` or empty.
    pub fn symbol(self) -> &'static str {
        match self {
            Square::Empty => "",
            Square::Occupied(Player::X) => "X",
            Square::Occupied(Player::O) => "O",
        }
    }
}

/// 3x3 tic-tac-toe board.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    /// Squares in row-major order (0-8).
    squares: [Square; 9],
}

impl Board {
    /// Creates a new empty board.
    pub fn new() -> Self {
        Self {
            squares: [Square::Empty; 9],
        }
    }

    /// Gets the square at the given position.
    pub fn get(&self, pos: Position) -> Square {
        self.squares[pos.to_index()]
    }

    /// Sets the square at the given position.
    pub fn set(&mut self, pos: Position, square: Square) {
        self.squares[pos.to_index()] = square;
    }

    /// Checks if a square is empty.
    pub fn is_empty(&self, pos: Position) -> bool {
        self.get(pos) == Square::Empty
    }

    /// Returns all squares as a slice.
    pub fn squares(&self) -> &[Square; 9] {
        &self.squares
    }

    /// Number of squares holding `player`'s mark.
    pub fn count(&self, player: Player) -> usize {
        self.squares
            .iter()
            .filter(|s| **s == Square::Occupied(player))
            .count()
    }

    /// Number of occupied squares.
    pub fn filled(&self) -> usize {
        self.squares.iter().filter(|s| **s != Square::Empty).count()
    }

    /// Builds a board from the integer encoding used by contract views.
    pub fn from_codes(codes: &[u8]) -> Result<Self, BoardParseError> {
        if codes.len() != 9 {
            return Err(BoardParseError::WrongLength(codes.len()));
        }
        let mut board = Self::new();
        for (pos, code) in Position::ALL.iter().zip(codes) {
            let square = Square::from_code(*code).ok_or(BoardParseError::UnknownCode(*code))?;
            board.set(*pos, square);
        }
        Ok(board)
    }

    /// Integer encoding of every square, row-major.
    pub fn to_codes(&self) -> [u8; 9] {
        self.squares.map(Square::code)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// Parses text marks: either nine characters (`"XX.O....."`) or nine
/// comma-separated tokens (`"X,X,X,_,_,_,_,_,_"`, brackets allowed).
/// `_`, `.`, `-` and empty tokens are empty squares.
impl FromStr for Board {
    type Err = BoardParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_start_matches('[').trim_end_matches(']');
        let tokens: Vec<&str> = if trimmed.contains(',') {
            trimmed.split(',').map(str::trim).collect()
        } else {
            trimmed
                .char_indices()
                .filter(|(_, c)| !c.is_whitespace())
                .map(|(i, c)| &trimmed[i..i + c.len_utf8()])
                .collect()
        };

        if tokens.len() != 9 {
            return Err(BoardParseError::WrongLength(tokens.len()));
        }

        let mut board = Self::new();
        for (pos, token) in Position::ALL.iter().zip(tokens) {
            let square = match token {
                "X" | "x" => Square::Occupied(Player::X),
                "O" | "o" => Square::Occupied(Player::O),
                "" | "_" | "." | "-" => Square::Empty,
                other => return Err(BoardParseError::UnknownMark(other.to_string())),
            };
            board.set(*pos, square);
        }
        Ok(board)
    }
}

/// Error decoding a board from text or integer marks.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum BoardParseError {
    /// The input did not contain exactly nine cells.
    #[display("Expected 9 cells, found {}", _0)]
    WrongLength(usize),
    /// A text mark other than X, O or an empty marker.
    #[display("Unknown mark '{}'", _0)]
    UnknownMark(String),
    /// An integer mark other than 0, 1 or 2.
    #[display("Unknown cell code {}", _0)]
    UnknownCode(u8),
}

impl std::error::Error for BoardParseError {}
