//! Connection state shared by both game controllers.

use super::{
    AccountInfo, EntryFunctionPayload, TicTacToeContract, TransactionResponse, ViewRequest, Wallet,
    WalletBridge, WalletError, WalletErrorKind,
};
use serde_json::Value;
use std::sync::Arc;
use tictactoe_core::Address;
use tracing::{debug, info, instrument};

/// A wallet bridge, the contract it talks to, and the connected account.
#[derive(Debug, Clone)]
pub struct WalletLink {
    bridge: WalletBridge,
    contract: TicTacToeContract,
    account: Option<AccountInfo>,
}

impl WalletLink {
    /// Disconnected link over `bridge`.
    pub fn new(bridge: WalletBridge, contract: TicTacToeContract) -> Self {
        Self {
            bridge,
            contract,
            account: None,
        }
    }

    /// The bridge.
    pub fn bridge(&self) -> &WalletBridge {
        &self.bridge
    }

    /// The contract codec.
    pub fn contract(&self) -> &TicTacToeContract {
        &self.contract
    }

    /// Connected account.
    pub fn account(&self) -> Option<&AccountInfo> {
        self.account.as_ref()
    }

    /// Whether an account is connected.
    pub fn is_connected(&self) -> bool {
        self.account.is_some()
    }

    /// Game registry: the connected account's address.
    pub fn registry(&self) -> Option<&Address> {
        self.account.as_ref().map(|a| &a.address)
    }

    /// Swaps the bridge, keeping the account.
    pub fn replace_bridge(&mut self, bridge: WalletBridge) {
        debug!(wallet = bridge.name().unwrap_or("none"), "Replacing wallet bridge");
        self.bridge = bridge;
    }

    /// Records `account` as connected without asking the wallet.
    pub fn set_account(&mut self, account: Option<AccountInfo>) {
        self.account = account;
    }

    fn wallet(&self) -> Result<&Arc<dyn Wallet>, WalletError> {
        self.bridge
            .wallet()
            .ok_or_else(|| WalletError::new(WalletErrorKind::Unavailable))
    }

    /// Picks up an account the wallet already has connected.
    #[instrument(skip(self))]
    pub async fn restore(&mut self) -> Result<Option<AccountInfo>, WalletError> {
        let account = self.wallet()?.account().await?;
        if let Some(account) = &account {
            info!(address = %account.address, "Restored existing wallet connection");
        }
        self.account = account.clone();
        Ok(account)
    }

    /// Asks the wallet to connect.
    #[instrument(skip(self))]
    pub async fn connect(&mut self) -> Result<AccountInfo, WalletError> {
        let account = self.wallet()?.connect().await?;
        info!(address = %account.address, "Wallet connected");
        self.account = Some(account.clone());
        Ok(account)
    }

    /// Disconnects; the account is cleared only when the wallet agrees.
    #[instrument(skip(self))]
    pub async fn disconnect(&mut self) -> Result<(), WalletError> {
        if let Some(wallet) = self.bridge.wallet() {
            wallet.disconnect().await?;
        }
        self.account = None;
        info!("Wallet link disconnected");
        Ok(())
    }

    /// Submits `payload` for the connected account.
    #[instrument(skip(self, payload), fields(function = %payload.function_name()))]
    pub async fn submit(
        &self,
        payload: &EntryFunctionPayload,
    ) -> Result<TransactionResponse, WalletError> {
        if !self.is_connected() {
            return Err(WalletError::new(WalletErrorKind::NotConnected));
        }
        self.wallet()?.sign_and_submit_transaction(payload).await
    }

    /// Runs `request` and decodes the result with `decode`.
    #[instrument(skip(self, request, decode), fields(function = %request.function_name()))]
    pub async fn view<T>(
        &self,
        request: &ViewRequest,
        decode: impl FnOnce(&[Value]) -> Result<T, WalletError>,
    ) -> Result<T, WalletError> {
        let values = self.wallet()?.view(request).await?;
        decode(&values)
    }
}
