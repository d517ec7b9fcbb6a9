//! Wallet bridge: the capability trait, its HTTP and demo implementations,
//! and the tic-tac-toe contract codec on top.

mod address;
mod bridge;
mod contract;
mod demo;
mod error;
mod http;
mod link;
mod types;

pub use address::{ADDRESS_LEN, parse_opponent_address};
pub use bridge::{Wallet, WalletBridge};
pub use contract::{COMPUTER_SENTINEL, GameStats, GameSummary, NOBODY_SENTINEL, TicTacToeContract};
pub use demo::{DEMO_ACCOUNT, DEMO_YOUR_GAMES, DemoWallet};
pub use error::{WalletError, WalletErrorKind};
pub use http::HttpWallet;
pub use link::WalletLink;
pub use types::{AccountInfo, ENTRY_FUNCTION_PAYLOAD, EntryFunctionPayload, TransactionResponse, ViewRequest};
