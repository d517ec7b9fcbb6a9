//! Terminal tic-tac-toe with an optional wallet bridge.
//!
//! Two games share the [`tictactoe_core`] rules:
//!
//! - **Local**: [`LocalSession`], two players at one keyboard with a score
//!   persisted to a key-value file
//! - **dApp**: [`DappController`], games recorded through a [`Wallet`]
//!   talking to the `tic_tac_toe` Move module, with a demo mode that needs
//!   no wallet at all
//!
//! Wallet calls never abort a session: failures become transient notices.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod dapp;
mod effects;
mod event;
mod local_game;
mod notice;
mod schedule;
mod storage;
mod wallet;

pub mod cli;
pub mod tui;

// Crate-level exports - Configuration
pub use config::{
    AppConfig, ConfigError, DEFAULT_MODULE_ADDRESS, ENV_MODULE_ADDRESS, ENV_STORAGE,
    ENV_WALLET_URL, TimingConfig,
};

// Crate-level exports - Sessions
pub use dapp::{
    Connection, DappController, HistoryEntry, HistoryOutcome, build_history, format_timestamp,
    opponent_label,
};
pub use event::BoardEvent;
pub use local_game::LocalSession;

// Crate-level exports - Notices and timers
pub use notice::{Notice, NoticeBoard, NoticeKind};
pub use schedule::Timeline;

// Crate-level exports - Persistence
pub use storage::{
    FileStore, KeyValueStore, MemoryStore, SCORE_O_KEY, SCORE_X_KEY, Score, ScoreStore,
    StorageError,
};

// Crate-level exports - Wallet bridge
pub use wallet::{
    ADDRESS_LEN, AccountInfo, COMPUTER_SENTINEL, DEMO_ACCOUNT, DEMO_YOUR_GAMES, DemoWallet, ENTRY_FUNCTION_PAYLOAD,
    EntryFunctionPayload, GameStats, GameSummary, HttpWallet, NOBODY_SENTINEL, TicTacToeContract,
    TransactionResponse, ViewRequest, Wallet, WalletBridge, WalletError, WalletErrorKind,
    WalletLink, parse_opponent_address,
};

// Crate-level exports - Effects
pub use effects::{CELEBRATION_PALETTE, GRAVITY, Particle, ParticleField, ParticleKind, hsl};
