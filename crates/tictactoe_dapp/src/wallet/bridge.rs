//! Wallet capability trait.

use super::{AccountInfo, EntryFunctionPayload, HttpWallet, TransactionResponse, ViewRequest, WalletError};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, instrument};

/// Operations an external wallet offers. Every call may fail; callers treat
/// failures as non-fatal.
#[async_trait::async_trait]
pub trait Wallet: Send + Sync + std::fmt::Debug {
    /// Asks the wallet to connect and returns the account.
    async fn connect(&self) -> Result<AccountInfo, WalletError>;

    /// The already-connected account, if any.
    async fn account(&self) -> Result<Option<AccountInfo>, WalletError>;

    /// Disconnects the current account.
    async fn disconnect(&self) -> Result<(), WalletError>;

    /// Signs and submits an entry-function transaction.
    async fn sign_and_submit_transaction(
        &self,
        payload: &EntryFunctionPayload,
    ) -> Result<TransactionResponse, WalletError>;

    /// Runs a read-only view function and returns its result values.
    async fn view(&self, request: &ViewRequest) -> Result<Vec<Value>, WalletError>;

    /// Display name of the wallet.
    fn name(&self) -> &str;
}

/// Whether a wallet was supplied to the application.
#[derive(Debug, Clone)]
pub enum WalletBridge {
    /// A wallet is present.
    Available(Arc<dyn Wallet>),
    /// No wallet installed.
    Unavailable,
}

impl WalletBridge {
    /// Bridge around `wallet`.
    pub fn available(wallet: impl Wallet + 'static) -> Self {
        Self::Available(Arc::new(wallet))
    }

    /// HTTP wallet at `url`, or no wallet when `url` is `None`.
    #[instrument]
    pub fn from_url(url: Option<&str>) -> Self {
        match url {
            Some(url) => {
                let bridge = Self::available(HttpWallet::new(url));
                info!(url, wallet = bridge.name().unwrap_or_default(), "Using wallet bridge");
                bridge
            }
            None => {
                info!("No wallet configured");
                Self::Unavailable
            }
        }
    }

    /// The wallet, when present.
    pub fn wallet(&self) -> Option<&Arc<dyn Wallet>> {
        match self {
            Self::Available(wallet) => Some(wallet),
            Self::Unavailable => None,
        }
    }

    /// Whether a wallet is present.
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }

    /// Display name of the wallet, when present.
    pub fn name(&self) -> Option<&str> {
        self.wallet().map(|wallet| wallet.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wallet::DemoWallet;

    #[test]
    fn test_bridge_reports_wallet_name() {
        assert_eq!(WalletBridge::available(DemoWallet::new(0)).name(), Some("Demo wallet"));
        assert_eq!(
            WalletBridge::from_url(Some("http://127.0.0.1:9")).name(),
            Some("HTTP wallet bridge")
        );
        assert_eq!(WalletBridge::from_url(None).name(), None);
    }
}
