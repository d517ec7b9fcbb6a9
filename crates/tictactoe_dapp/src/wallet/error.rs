//! Wallet error types.

use derive_more::{Display, Error};
use tracing::{error, instrument};

/// What went wrong talking to the wallet.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum WalletErrorKind {
    /// No wallet is installed or configured.
    #[display("No wallet available")]
    Unavailable,
    /// An operation needs a connected account.
    #[display("Wallet not connected")]
    NotConnected,
    /// The wallet refused the request.
    #[display("Wallet rejected request: {}", _0)]
    Rejected(String),
    /// The request never produced a response.
    #[display("Wallet transport failed: {}", _0)]
    Transport(String),
    /// The wallet answered with a non-success status.
    #[display("Wallet returned status {}: {}", status, body)]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
    },
    /// The response could not be decoded.
    #[display("Could not decode wallet response: {}", _0)]
    Decode(String),
}

/// Wallet error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Wallet error: {} at {}:{}", kind, file, line)]
pub struct WalletError {
    /// Error category.
    pub kind: WalletErrorKind,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl WalletError {
    /// Creates a new wallet error with caller location tracking.
    #[track_caller]
    #[instrument]
    pub fn new(kind: WalletErrorKind) -> Self {
        let loc = std::panic::Location::caller();
        error!(error_kind = %kind, "Wallet error created");
        Self {
            kind,
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// The error category.
    pub fn kind(&self) -> &WalletErrorKind {
        &self.kind
    }
}

impl From<WalletErrorKind> for WalletError {
    #[track_caller]
    fn from(kind: WalletErrorKind) -> Self {
        Self::new(kind)
    }
}

impl From<reqwest::Error> for WalletError {
    #[track_caller]
    fn from(err: reqwest::Error) -> Self {
        Self::new(WalletErrorKind::Transport(err.to_string()))
    }
}

impl From<serde_json::Error> for WalletError {
    #[track_caller]
    fn from(err: serde_json::Error) -> Self {
        Self::new(WalletErrorKind::Decode(err.to_string()))
    }
}
