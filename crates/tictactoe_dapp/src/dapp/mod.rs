//! The wallet-backed game: connection handling, demo mode, game creation,
//! moves and history.

mod controller;
mod history;

pub use controller::{Connection, DappController};
pub use history::{HistoryEntry, HistoryOutcome, build_history, format_timestamp, opponent_label};
