//! Wire types exchanged with the wallet.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tictactoe_core::Address;

/// `type` tag of every entry-function payload.
pub const ENTRY_FUNCTION_PAYLOAD: &str = "entry_function_payload";

/// A connected account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfo {
    /// Account address.
    pub address: Address,
    /// Public key, when the wallet reports one.
    #[serde(default, alias = "publicKey", skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,
}

impl AccountInfo {
    /// Account with only an address.
    pub fn new(address: Address) -> Self {
        Self {
            address,
            public_key: None,
        }
    }
}

/// Transaction payload calling a Move entry function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryFunctionPayload {
    /// Always [`ENTRY_FUNCTION_PAYLOAD`].
    #[serde(rename = "type")]
    pub payload_type: String,
    /// Fully qualified function, `<module>::tic_tac_toe::<name>`.
    pub function: String,
    /// Generic type arguments (unused by this contract).
    pub type_arguments: Vec<String>,
    /// Positional arguments.
    pub arguments: Vec<Value>,
}

impl EntryFunctionPayload {
    /// Payload calling `function` with `arguments`.
    pub fn new(function: impl Into<String>, arguments: Vec<Value>) -> Self {
        Self {
            payload_type: ENTRY_FUNCTION_PAYLOAD.to_string(),
            function: function.into(),
            type_arguments: Vec::new(),
            arguments,
        }
    }

    /// Final `::` segment of the function path.
    pub fn function_name(&self) -> &str {
        self.function.rsplit("::").next().unwrap_or(&self.function)
    }
}

/// Read-only view call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewRequest {
    /// Fully qualified view function.
    pub function: String,
    /// Generic type arguments (unused by this contract).
    pub type_arguments: Vec<String>,
    /// Positional arguments.
    pub arguments: Vec<Value>,
}

impl ViewRequest {
    /// View of `function` with `arguments`.
    pub fn new(function: impl Into<String>, arguments: Vec<Value>) -> Self {
        Self {
            function: function.into(),
            type_arguments: Vec::new(),
            arguments,
        }
    }

    /// Final `::` segment of the function path.
    pub fn function_name(&self) -> &str {
        self.function.rsplit("::").next().unwrap_or(&self.function)
    }
}

/// Result of a submitted transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionResponse {
    /// Transaction hash.
    pub hash: String,
}
