//! Wallet reached through a local HTTP bridge.
//!
//! The bridge exposes the browser wallet's API as JSON endpoints:
//! `POST /connect`, `GET /account`, `POST /disconnect`,
//! `POST /transactions` and `POST /view`.

use super::{
    AccountInfo, EntryFunctionPayload, TransactionResponse, ViewRequest, Wallet, WalletError,
    WalletErrorKind,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, info, instrument};

/// HTTP-backed [`Wallet`].
#[derive(Debug, Clone)]
pub struct HttpWallet {
    base_url: String,
    client: reqwest::Client,
}

impl HttpWallet {
    /// Wallet bridge at `base_url`.
    #[instrument(skip(base_url), fields(base_url = %base_url.as_ref()))]
    pub fn new(base_url: impl AsRef<str>) -> Self {
        let base_url = base_url.as_ref().trim_end_matches('/').to_string();
        debug!("Creating HTTP wallet");
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Reads the response body and decodes it, mapping non-success
    /// statuses to [`WalletErrorKind::Status`]. 401/403 mean the user
    /// rejected the request.
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, WalletError> {
        let status = response.status();
        let body = response.text().await?;

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            error!(status = %status, body = %body, "Wallet rejected request");
            return Err(WalletError::new(WalletErrorKind::Rejected(body)));
        }
        if !status.is_success() {
            error!(status = %status, body = %body, "Wallet bridge error");
            return Err(WalletError::new(WalletErrorKind::Status {
                status: status.as_u16(),
                body,
            }));
        }

        serde_json::from_str(&body).map_err(|e| {
            error!(error = %e, body = %body, "Failed to parse wallet response");
            WalletError::from(e)
        })
    }
}

#[async_trait::async_trait]
impl Wallet for HttpWallet {
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn connect(&self) -> Result<AccountInfo, WalletError> {
        debug!("Requesting wallet connection");
        let response = self.client.post(self.url("/connect")).send().await?;
        let account: AccountInfo = Self::decode(response).await?;
        info!(address = %account.address, "Wallet connected");
        Ok(account)
    }

    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn account(&self) -> Result<Option<AccountInfo>, WalletError> {
        let response = self.client.get(self.url("/account")).send().await?;
        Self::decode(response).await
    }

    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn disconnect(&self) -> Result<(), WalletError> {
        let response = self.client.post(self.url("/disconnect")).send().await?;
        let _: Value = Self::decode(response).await?;
        info!("Wallet disconnected");
        Ok(())
    }

    #[instrument(skip(self, payload), fields(function = %payload.function_name()))]
    async fn sign_and_submit_transaction(
        &self,
        payload: &EntryFunctionPayload,
    ) -> Result<TransactionResponse, WalletError> {
        debug!(arguments = ?payload.arguments, "Submitting transaction");
        let response = self
            .client
            .post(self.url("/transactions"))
            .json(payload)
            .send()
            .await?;
        let tx: TransactionResponse = Self::decode(response).await?;
        info!(hash = %tx.hash, "Transaction submitted");
        Ok(tx)
    }

    #[instrument(skip(self, request), fields(function = %request.function_name()))]
    async fn view(&self, request: &ViewRequest) -> Result<Vec<Value>, WalletError> {
        let response = self
            .client
            .post(self.url("/view"))
            .json(request)
            .send()
            .await?;
        Self::decode(response).await
    }

    fn name(&self) -> &str {
        "HTTP wallet bridge"
    }
}
