//! # View Query Service
//!
//! Read-only queries against the remote piggy-bank contract, issued through
//! the bridge. Results come back as positional JSON tuples whose field order
//! is a compatibility contract with the remote module.

use crate::bridge::{BridgeCall, ContractRef, MessageChannel};
use crate::config::contract::NOT_EXISTS_MARKER;
use crate::error::{QueryError, QueryResult};
use log::debug;
use serde_json::Value;
use std::sync::Arc;

/// Raw account state as returned by `get_piggy_bank_info`.
///
/// Amounts are in the fixed-point ledger unit, timestamps in epoch seconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountInfo {
    pub balance: u64,
    pub goal: u64,
    pub created_at: u64,
    pub last_deposit: u64,
    pub is_locked: bool,
    pub unlock_time: u64,
    pub deposit_count: u64,
}

impl AccountInfo {
    /// Interpret the positional result tuple:
    /// `(balance, goal, created_at, last_deposit, is_locked, unlock_time,
    /// deposit_count)`. The order must never change.
    pub fn from_tuple(tuple: &[Value]) -> QueryResult<Self> {
        if tuple.len() < 7 {
            return Err(QueryError::failed(format!(
                "account info tuple has {} fields, expected 7",
                tuple.len()
            )));
        }
        Ok(Self {
            balance: parse_u64(&tuple[0], "balance")?,
            goal: parse_u64(&tuple[1], "goal")?,
            created_at: parse_u64(&tuple[2], "created_at")?,
            last_deposit: parse_u64(&tuple[3], "last_deposit")?,
            is_locked: parse_bool(&tuple[4], "is_locked")?,
            unlock_time: parse_u64(&tuple[5], "unlock_time")?,
            deposit_count: parse_u64(&tuple[6], "deposit_count")?,
        })
    }
}

/// The ledger API serializes u64 values as decimal strings; accept both
/// forms.
fn parse_u64(value: &Value, field: &str) -> QueryResult<u64> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| QueryError::failed(format!("{} is not a u64: {}", field, n))),
        Value::String(s) => s
            .parse::<u64>()
            .map_err(|_| QueryError::failed(format!("{} is not a u64: {:?}", field, s))),
        other => Err(QueryError::failed(format!(
            "{} has unexpected type: {}",
            field, other
        ))),
    }
}

fn parse_bool(value: &Value, field: &str) -> QueryResult<bool> {
    value
        .as_bool()
        .ok_or_else(|| QueryError::failed(format!("{} is not a bool: {}", field, value)))
}

/// Read-only query front-end over the bridge channel
pub struct ViewQueryService {
    channel: Arc<MessageChannel>,
    contract: ContractRef,
}

impl ViewQueryService {
    pub fn new(channel: Arc<MessageChannel>, contract: ContractRef) -> Self {
        Self { channel, contract }
    }

    /// Check whether a piggy bank exists for the address.
    ///
    /// Any failure — delivery, capability, malformed result — reads as
    /// absence. The screen selection built on top of this must always land
    /// on one of the two screens, so the error is logged and swallowed.
    pub async fn exists_account(&self, address: &str) -> bool {
        let request = self
            .contract
            .view("piggy_bank_exists", vec![Value::String(address.to_string())]);
        match self.channel.send(BridgeCall::View(request)).await {
            Ok(envelope) if envelope.success => envelope
                .response
                .as_ref()
                .and_then(|r| r.as_array())
                .and_then(|tuple| tuple.first())
                .and_then(|v| v.as_bool())
                .unwrap_or(false),
            Ok(envelope) => {
                debug!(
                    "existence check failed, treating as absent: {}",
                    envelope.error.as_deref().unwrap_or("no error text")
                );
                false
            }
            Err(err) => {
                debug!("existence check unreachable, treating as absent: {}", err);
                false
            }
        }
    }

    /// Fetch the raw account-info tuple for the address
    pub async fn fetch_account_info(&self, address: &str) -> QueryResult<AccountInfo> {
        let request = self.contract.view(
            "get_piggy_bank_info",
            vec![Value::String(address.to_string())],
        );
        let envelope = self.channel.send(BridgeCall::View(request)).await?;
        if !envelope.success {
            let error = envelope
                .error
                .unwrap_or_else(|| "An unknown error occurred.".to_string());
            if error.contains(NOT_EXISTS_MARKER) {
                return Err(QueryError::AccountAbsent);
            }
            return Err(QueryError::failed(error));
        }
        let tuple = envelope
            .response
            .as_ref()
            .and_then(|r| r.as_array())
            .ok_or_else(|| QueryError::failed("account info result is not a tuple"))?;
        AccountInfo::from_tuple(tuple)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::message::{Account, TransactionRequest, ViewRequest};
    use crate::bridge::{pair, WalletCapability};
    use anyhow::{anyhow, Result};
    use serde_json::json;

    fn info_tuple() -> Vec<Value> {
        vec![
            json!("250000000"),
            json!("1000000000"),
            json!(1_700_000_000u64),
            json!("1700000500"),
            json!(true),
            json!("1700864000"),
            json!(3),
        ]
    }

    #[test]
    fn test_tuple_parsing_accepts_numbers_and_strings() {
        let info = AccountInfo::from_tuple(&info_tuple()).unwrap();
        assert_eq!(info.balance, 250_000_000);
        assert_eq!(info.goal, 1_000_000_000);
        assert_eq!(info.created_at, 1_700_000_000);
        assert_eq!(info.last_deposit, 1_700_000_500);
        assert!(info.is_locked);
        assert_eq!(info.unlock_time, 1_700_864_000);
        assert_eq!(info.deposit_count, 3);
    }

    #[test]
    fn test_short_tuple_is_a_query_failure() {
        let err = AccountInfo::from_tuple(&[json!("1"), json!("2")]).unwrap_err();
        assert!(err.to_string().contains("expected 7"));
    }

    /// Capability whose view behavior is scripted per test
    struct ScriptedWallet {
        exists: Result<bool, String>,
        info: Result<Vec<Value>, String>,
    }

    impl WalletCapability for ScriptedWallet {
        async fn is_connected(&self) -> Result<bool> {
            Ok(true)
        }

        async fn account(&self) -> Result<Account> {
            Ok(Account {
                address: "0xtest".to_string(),
            })
        }

        async fn connect(&self) -> Result<Account> {
            self.account().await
        }

        async fn view(&self, request: &ViewRequest) -> Result<Vec<Value>> {
            if request.function.ends_with("::piggy_bank_exists") {
                self.exists
                    .clone()
                    .map(|b| vec![json!(b)])
                    .map_err(|e| anyhow!(e))
            } else {
                self.info.clone().map_err(|e| anyhow!(e))
            }
        }

        async fn sign_and_submit(&self, _request: &TransactionRequest) -> Result<Value> {
            Err(anyhow!("not under test"))
        }
    }

    fn service(wallet: ScriptedWallet) -> ViewQueryService {
        ViewQueryService::new(
            Arc::new(pair(wallet)),
            ContractRef::new("0xabc", "piggy_bank"),
        )
    }

    #[tokio::test]
    async fn test_exists_account_true_and_false() {
        let svc = service(ScriptedWallet {
            exists: Ok(true),
            info: Ok(info_tuple()),
        });
        assert!(svc.exists_account("0xtest").await);

        let svc = service(ScriptedWallet {
            exists: Ok(false),
            info: Ok(info_tuple()),
        });
        assert!(!svc.exists_account("0xtest").await);
    }

    #[tokio::test]
    async fn test_exists_account_swallows_capability_errors() {
        let svc = service(ScriptedWallet {
            exists: Err("node unreachable".to_string()),
            info: Ok(info_tuple()),
        });
        assert!(!svc.exists_account("0xtest").await);
    }

    #[tokio::test]
    async fn test_exists_account_swallows_dead_bridge() {
        let (req_tx, req_rx) = tokio::sync::mpsc::unbounded_channel();
        let (_rep_tx, rep_rx) = tokio::sync::mpsc::unbounded_channel();
        drop(req_rx);
        let channel = MessageChannel::connect(req_tx, rep_rx);
        let svc = ViewQueryService::new(Arc::new(channel), ContractRef::default());
        assert!(!svc.exists_account("0xtest").await);
    }

    #[tokio::test]
    async fn test_fetch_info_maps_not_exists_to_absent() {
        let svc = service(ScriptedWallet {
            exists: Ok(false),
            info: Err("Move abort: E_PIGGY_BANK_NOT_EXISTS".to_string()),
        });
        let err = svc.fetch_account_info("0xtest").await.unwrap_err();
        assert!(err.is_absent());
    }

    #[tokio::test]
    async fn test_fetch_info_other_errors_are_failures() {
        let svc = service(ScriptedWallet {
            exists: Ok(true),
            info: Err("node unreachable".to_string()),
        });
        let err = svc.fetch_account_info("0xtest").await.unwrap_err();
        assert!(!err.is_absent());
        assert!(err.to_string().contains("node unreachable"));
    }

    #[tokio::test]
    async fn test_fetch_info_parses_full_tuple() {
        let svc = service(ScriptedWallet {
            exists: Ok(true),
            info: Ok(info_tuple()),
        });
        let info = svc.fetch_account_info("0xtest").await.unwrap();
        assert_eq!(info.deposit_count, 3);
    }
}
