//! Tic-tac-toe rules shared by the local game and the on-chain session flow.
//!
//! # Architecture
//!
//! - **Types**: [`Board`], [`Square`], [`Player`] and the integer encoding
//!   used by contract views (0 empty, 1 X, 2 O)
//! - **Rules**: pure win/draw predicates in [`rules`]
//! - **Typestate**: [`GameSetup`] → [`GameInProgress`] → [`GameFinished`],
//!   where a finished game cannot accept moves
//! - **Session**: [`GameSession`], the record a dApp keeps per game
//!
//! # Example
//!
//! ```
//! use tictactoe_core::{GameResult, GameSetup, Player, Position};
//!
//! let game = GameSetup::new().start(Player::X);
//! let GameResult::InProgress(game) = game.play(Position::Center)? else {
//!     unreachable!("one mark cannot finish a game");
//! };
//! assert_eq!(game.to_move(), Player::O);
//! # Ok::<(), tictactoe_core::MoveError>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod contracts;
mod phases;
mod position;
mod session;
mod types;
mod typestate;

pub mod rules;

// Crate-level exports - Domain types
pub use types::{Board, BoardParseError, Player, Square};

// Crate-level exports - Positions and moves
pub use action::{Move, MoveError};
pub use position::Position;

// Crate-level exports - Local game lifecycle
pub use contracts::{
    BoardConsistent, Contract, HistoryComplete, LegalMove, MoveContract, PlayersTurn,
    SquareIsEmpty,
};
pub use phases::Outcome;
pub use typestate::{GameFinished, GameInProgress, GameResult, GameSetup};

// Crate-level exports - dApp session record
pub use session::{Address, GameSession, GameStatus, Participant};

// Crate-level exports - Rules
pub use rules::{Evaluation, WinningLine};
