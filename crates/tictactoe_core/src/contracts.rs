//! Contract-based validation for tic-tac-toe.
//!
//! Contracts define correctness through preconditions and postconditions:
//! {P} action {Q}.

use super::action::{Move, MoveError};
use super::typestate::GameInProgress;
use super::{Board, Player};
use tracing::{instrument, warn};

/// Preconditions and postconditions for a state transition.
pub trait Contract<S, A> {
    /// Checks preconditions before applying the action.
    fn pre(state: &S, action: &A) -> Result<(), MoveError>;

    /// Checks postconditions after applying the action.
    fn post(before: &S, after: &S) -> Result<(), MoveError>;
}

/// Precondition: The square at the move's position must be empty.
pub struct SquareIsEmpty;

impl SquareIsEmpty {
    /// Fails with [`MoveError::SquareOccupied`] for a taken square.
    #[instrument(skip(game))]
    pub fn check(mov: &Move, game: &GameInProgress) -> Result<(), MoveError> {
        if !game.board().is_empty(mov.position) {
            Err(MoveError::SquareOccupied(mov.position))
        } else {
            Ok(())
        }
    }
}

/// Precondition: It must be the player's turn.
pub struct PlayersTurn;

impl PlayersTurn {
    /// Fails with [`MoveError::WrongPlayer`] when `mov.player` is not to move.
    #[instrument(skip(game))]
    pub fn check(mov: &Move, game: &GameInProgress) -> Result<(), MoveError> {
        if mov.player != game.to_move() {
            Err(MoveError::WrongPlayer(mov.player))
        } else {
            Ok(())
        }
    }
}

/// Composite precondition: square empty and player's turn.
pub struct LegalMove;

impl LegalMove {
    /// Validates all preconditions for a move.
    #[instrument(skip(game))]
    pub fn check(mov: &Move, game: &GameInProgress) -> Result<(), MoveError> {
        SquareIsEmpty::check(mov, game)?;
        PlayersTurn::check(mov, game)?;
        Ok(())
    }
}

/// Contract for move actions.
///
/// Preconditions: square empty, player's turn.
/// Postconditions: marks stay balanced and history matches the board.
pub struct MoveContract;

impl Contract<GameInProgress, Move> for MoveContract {
    fn pre(game: &GameInProgress, action: &Move) -> Result<(), MoveError> {
        LegalMove::check(action, game)
    }

    fn post(before: &GameInProgress, after: &GameInProgress) -> Result<(), MoveError> {
        let mut violations = Vec::new();
        if !BoardConsistent::holds(after.board()) {
            violations.push("X and O counts diverged");
        }
        if !HistoryComplete::holds(after) {
            violations.push("history length differs from filled squares");
        }
        if after.history().len() != before.history().len() + 1 {
            violations.push("move was not appended to history");
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(MoveError::InvariantViolation(format!(
                "Postcondition failed: {}",
                violations.join("; ")
            )))
        }
    }
}

/// Invariant: mark counts differ by at most one.
pub struct BoardConsistent;

impl BoardConsistent {
    /// Returns whether the mark counts are balanced.
    #[instrument(skip(board))]
    pub fn holds(board: &Board) -> bool {
        let x_count = board.count(Player::X);
        let o_count = board.count(Player::O);
        let valid = x_count.abs_diff(o_count) <= 1;
        if !valid {
            warn!(x_count, o_count, "Board consistency violated");
        }
        valid
    }
}

/// Invariant: History length matches filled squares.
pub struct HistoryComplete;

impl HistoryComplete {
    /// Returns whether every mark on the board has a history entry.
    #[instrument(skip(game))]
    pub fn holds(game: &GameInProgress) -> bool {
        let filled = game.board().filled();
        let history_len = game.history().len();

        let valid = filled == history_len;
        if !valid {
            warn!(filled, history_len, "History completeness violated");
        }
        valid
    }
}
