//! Keyboard helpers.

use crossterm::event::KeyCode;
use tictactoe_core::Position;

/// Moves cursor based on arrow keys; edges hold.
pub fn move_cursor(cursor: Position, key: KeyCode) -> Position {
    let (row, col) = (cursor.row(), cursor.col());
    let (row, col) = match key {
        KeyCode::Up => (row.saturating_sub(1), col),
        KeyCode::Down => ((row + 1).min(2), col),
        KeyCode::Left => (row, col.saturating_sub(1)),
        KeyCode::Right => (row, (col + 1).min(2)),
        _ => return cursor,
    };
    Position::from_index(row * 3 + col).unwrap_or(cursor)
}

/// Cell for a digit key, `1` top-left through `9` bottom-right.
pub fn digit_position(c: char) -> Option<Position> {
    let digit = c.to_digit(10)?;
    if digit == 0 {
        return None;
    }
    Position::from_index(digit as usize - 1)
}
