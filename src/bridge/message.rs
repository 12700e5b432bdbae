//! # Bridge Wire Types
//!
//! Message shapes exchanged between the isolated UI surface and the in-page
//! relay. The JSON produced here is the compatibility contract with the
//! relay endpoint; field and tag names must not change.

use crate::config::contract::{CONTRACT_ADDRESS, MODULE_NAME};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Opaque ledger identity of the connected wallet account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub address: String,
}

/// A read-only query against remote contract state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewRequest {
    /// Fully-qualified function: `<address>::<module>::<fn>`
    pub function: String,
    pub type_arguments: Vec<String>,
    pub arguments: Vec<Value>,
}

/// A state-changing remote contract invocation requiring a signed submission.
/// Immutable once built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRequest {
    /// Fully-qualified entry function: `<address>::<module>::<fn>`
    pub function: String,
    pub type_arguments: Vec<String>,
    pub arguments: Vec<Value>,
}

/// Coordinates of the remote piggy-bank contract
#[derive(Debug, Clone)]
pub struct ContractRef {
    address: String,
    module: String,
}

impl ContractRef {
    pub fn new(address: impl Into<String>, module: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            module: module.into(),
        }
    }

    /// Fully-qualified name for a function in this contract module
    pub fn function(&self, name: &str) -> String {
        format!("{}::{}::{}", self.address, self.module, name)
    }

    /// Build a read-only query payload
    pub fn view(&self, name: &str, arguments: Vec<Value>) -> ViewRequest {
        ViewRequest {
            function: self.function(name),
            type_arguments: Vec::new(),
            arguments,
        }
    }

    /// Build a mutating entry-function payload
    pub fn entry(&self, name: &str, arguments: Vec<Value>) -> TransactionRequest {
        TransactionRequest {
            function: self.function(name),
            type_arguments: Vec::new(),
            arguments,
        }
    }
}

impl Default for ContractRef {
    fn default() -> Self {
        Self::new(CONTRACT_ADDRESS, MODULE_NAME)
    }
}

/// The operation a bridge message asks the relay to perform
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BridgeCall {
    IsConnected,
    GetAccount,
    Connect,
    View(ViewRequest),
    SignAndSubmit(TransactionRequest),
}

/// A single request ferried across the bridge. Created per call, consumed
/// once, discarded. The `id` correlates the reply envelope with the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeMessage {
    pub id: u64,
    #[serde(flatten)]
    pub call: BridgeCall,
}

/// Normalized success/error reply from the relay
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    pub id: u64,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connected: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<Account>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Envelope {
    fn ok(id: u64) -> Self {
        Self {
            id,
            success: true,
            response: None,
            connected: None,
            account: None,
            error: None,
        }
    }

    /// Successful reply carrying a generic response value
    pub fn ok_response(id: u64, response: Value) -> Self {
        Self {
            response: Some(response),
            ..Self::ok(id)
        }
    }

    /// Successful reply to an IS_CONNECTED probe
    pub fn ok_connected(id: u64, connected: bool) -> Self {
        Self {
            connected: Some(connected),
            ..Self::ok(id)
        }
    }

    /// Successful reply carrying the active account
    pub fn ok_account(id: u64, account: Account) -> Self {
        Self {
            account: Some(account),
            ..Self::ok(id)
        }
    }

    /// Failure reply with the capability's error text
    pub fn failure(id: u64, error: impl Into<String>) -> Self {
        Self {
            id,
            success: false,
            response: None,
            connected: None,
            account: None,
            error: Some(error.into()),
        }
    }

    /// Convert a `success: false` envelope into a capability error.
    /// Delivery succeeded, so this is the relay reporting a thrown call.
    pub fn require_success(self) -> crate::error::BridgeResult<Envelope> {
        if self.success {
            Ok(self)
        } else {
            Err(crate::error::BridgeError::capability(
                self.error
                    .unwrap_or_else(|| "An unknown error occurred.".to_string()),
            ))
        }
    }
}
