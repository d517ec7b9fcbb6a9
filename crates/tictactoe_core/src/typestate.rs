//! Phase-specific typestate structs for the local game.
//!
//! Each phase is its own type. A finished game has no `make_move`, so
//! "no move after termination" is enforced by the compiler, and a
//! `GameFinished` always carries an outcome.

use super::action::{Move, MoveError};
use super::contracts::{Contract, MoveContract};
use super::phases::Outcome;
use super::rules::{self, Evaluation, WinningLine};
use super::{Board, Player, Position, Square};
use tracing::{debug, instrument};

// ─────────────────────────────────────────────────────────────
//  Setup Phase
// ─────────────────────────────────────────────────────────────

/// Game in setup phase, board always empty.
#[derive(Debug, Clone)]
pub struct GameSetup {
    board: Board,
}

impl GameSetup {
    /// Creates a new game in setup phase.
    pub fn new() -> Self {
        Self {
            board: Board::new(),
        }
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Starts the game with the first player.
    #[instrument(skip(self))]
    pub fn start(self, first_player: Player) -> GameInProgress {
        GameInProgress {
            board: self.board,
            history: Vec::new(),
            to_move: first_player,
        }
    }
}

impl Default for GameSetup {
    fn default() -> Self {
        Self::new()
    }
}

// ─────────────────────────────────────────────────────────────
//  InProgress Phase
// ─────────────────────────────────────────────────────────────

/// Game in progress - can accept moves.
#[derive(Debug, Clone)]
pub struct GameInProgress {
    pub(crate) board: Board,
    pub(crate) history: Vec<Move>,
    pub(crate) to_move: Player,
}

impl GameInProgress {
    /// Makes a move, consuming self and transitioning to the next state.
    ///
    /// Preconditions are always checked; postconditions only in debug builds.
    ///
    /// # Errors
    ///
    /// [`MoveError::SquareOccupied`] or [`MoveError::WrongPlayer`]; the game
    /// is consumed either way, so callers that want to keep playing after a
    /// rejected move should check [`GameInProgress::can_play`] first.
    #[instrument(skip(self), fields(to_move = %self.to_move))]
    pub fn make_move(self, action: Move) -> Result<GameResult, MoveError> {
        MoveContract::pre(&self, &action)?;

        #[cfg(debug_assertions)]
        let before = self.clone();

        let mut game = self;
        game.board
            .set(action.position, Square::Occupied(action.player));
        game.history.push(action);

        #[cfg(debug_assertions)]
        MoveContract::post(&before, &game)?;

        match rules::evaluate(&game.board) {
            Evaluation::Won { player, line } => {
                debug!(winner = %player, "Move completed a line");
                Ok(GameResult::Finished(GameFinished {
                    board: game.board,
                    history: game.history,
                    outcome: Outcome::Winner(player),
                    line: Some(line),
                }))
            }
            Evaluation::Draw => {
                debug!("Board full without a line");
                Ok(GameResult::Finished(GameFinished {
                    board: game.board,
                    history: game.history,
                    outcome: Outcome::Draw,
                    line: None,
                }))
            }
            Evaluation::Ongoing => {
                game.to_move = game.to_move.opponent();
                Ok(GameResult::InProgress(game))
            }
        }
    }

    /// Places the current player's mark at `position`.
    pub fn play(self, position: Position) -> Result<GameResult, MoveError> {
        let player = self.to_move;
        self.make_move(Move::new(player, position))
    }

    /// Whether the current player may play `position`.
    pub fn can_play(&self, position: Position) -> bool {
        self.board.is_empty(position)
    }

    /// Returns the current player to move.
    pub fn to_move(&self) -> Player {
        self.to_move
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns move history.
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// Returns valid positions.
    pub fn valid_moves(&self) -> Vec<Position> {
        Position::valid_moves(&self.board)
    }

    /// Replays moves from initial state.
    #[instrument(skip(moves), fields(count = moves.len()))]
    pub fn replay(moves: &[Move]) -> Result<GameResult, MoveError> {
        let mut game = GameSetup::new().start(Player::X);

        for (i, action) in moves.iter().enumerate() {
            match game.make_move(*action)? {
                GameResult::InProgress(g) => game = g,
                GameResult::Finished(g) if i + 1 == moves.len() => {
                    return Ok(GameResult::Finished(g));
                }
                GameResult::Finished(_) => return Err(MoveError::GameOver),
            }
        }

        Ok(GameResult::InProgress(game))
    }
}

// ─────────────────────────────────────────────────────────────
//  Finished Phase
// ─────────────────────────────────────────────────────────────

/// Game finished - outcome determined.
#[derive(Debug, Clone)]
pub struct GameFinished {
    board: Board,
    history: Vec<Move>,
    outcome: Outcome,
    line: Option<WinningLine>,
}

impl GameFinished {
    /// Returns the outcome.
    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    /// The completed line for a win, `None` for a draw.
    pub fn winning_line(&self) -> Option<WinningLine> {
        self.line
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns move history.
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// Restarts the game (consumes finished, returns setup).
    #[instrument(skip(self))]
    pub fn restart(self) -> GameSetup {
        GameSetup::new()
    }
}

// ─────────────────────────────────────────────────────────────
//  Result Type
// ─────────────────────────────────────────────────────────────

/// Result of making a move.
#[derive(Debug)]
pub enum GameResult {
    /// Game continues.
    InProgress(GameInProgress),
    /// Game finished.
    Finished(GameFinished),
}
