//! # Bridge Relay
//!
//! The in-page half of the bridge. Runs colocated with the wallet capability,
//! receives typed requests from the UI surface, invokes the corresponding
//! capability operation, and replies with a normalized success/error
//! envelope. Every capability failure is caught and reported; a request must
//! never go unanswered, or the caller's pending future would hang forever.

use crate::bridge::message::{
    Account, BridgeCall, BridgeMessage, Envelope, TransactionRequest, ViewRequest,
};
use anyhow::Result;
use log::{debug, info};
use serde_json::Value;
use std::future::Future;
use tokio::sync::mpsc;

/// The wallet capability injected into the visited page.
///
/// This is the foreign seam: implementations wrap whatever the page exposes,
/// so errors cross it as `anyhow::Error` and are flattened to text in the
/// reply envelope.
pub trait WalletCapability: Send + Sync + 'static {
    /// Query whether the wallet currently has an authorized connection
    fn is_connected(&self) -> impl Future<Output = Result<bool>> + Send;

    /// Query the active account; fails when not connected
    fn account(&self) -> impl Future<Output = Result<Account>> + Send;

    /// Request a connection; may prompt the user, who may decline
    fn connect(&self) -> impl Future<Output = Result<Account>> + Send;

    /// Execute a read-only query and return its result tuple
    fn view(&self, request: &ViewRequest) -> impl Future<Output = Result<Vec<Value>>> + Send;

    /// Sign and submit a transaction, returning the submission receipt.
    /// Resolves on acceptance, not on-ledger finality.
    fn sign_and_submit(
        &self,
        request: &TransactionRequest,
    ) -> impl Future<Output = Result<Value>> + Send;
}

/// Relay loop wrapping a wallet capability
pub struct BridgeRelay<W> {
    capability: W,
}

impl<W: WalletCapability> BridgeRelay<W> {
    pub fn new(capability: W) -> Self {
        Self { capability }
    }

    /// Serve requests until the inbound stream closes.
    ///
    /// Requests are handled one at a time in arrival order; each gets
    /// exactly one reply envelope.
    pub async fn serve(
        self,
        mut inbound: mpsc::UnboundedReceiver<BridgeMessage>,
        outbound: mpsc::UnboundedSender<Envelope>,
    ) {
        while let Some(message) = inbound.recv().await {
            let reply = self.handle(message).await;
            if outbound.send(reply).is_err() {
                // Caller endpoint gone; nothing left to serve
                break;
            }
        }
        info!("bridge relay shutting down");
    }

    async fn handle(&self, message: BridgeMessage) -> Envelope {
        let id = message.id;
        debug!("relay handling {:?}", message.call);
        let result = match &message.call {
            BridgeCall::IsConnected => self
                .capability
                .is_connected()
                .await
                .map(|connected| Envelope::ok_connected(id, connected)),
            BridgeCall::GetAccount => self
                .capability
                .account()
                .await
                .map(|account| Envelope::ok_account(id, account)),
            BridgeCall::Connect => self.capability.connect().await.map(|account| {
                Envelope::ok_response(id, serde_json::json!(account))
            }),
            BridgeCall::View(request) => self
                .capability
                .view(request)
                .await
                .map(|tuple| Envelope::ok_response(id, Value::Array(tuple))),
            BridgeCall::SignAndSubmit(request) => self
                .capability
                .sign_and_submit(request)
                .await
                .map(|receipt| Envelope::ok_response(id, receipt)),
        };
        result.unwrap_or_else(|error| Envelope::failure(id, error.to_string()))
    }
}

/// Wire a channel/relay pair over in-process streams and spawn the relay.
///
/// This is how the demo binary and tests stand up a working bridge; in the
/// extension the two halves sit in different contexts and the streams are
/// the runtime messaging primitive.
pub fn pair<W: WalletCapability>(capability: W) -> super::MessageChannel {
    let (req_tx, req_rx) = mpsc::unbounded_channel();
    let (rep_tx, rep_rx) = mpsc::unbounded_channel();
    tokio::spawn(BridgeRelay::new(capability).serve(req_rx, rep_tx));
    super::MessageChannel::connect(req_tx, rep_rx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::message::ContractRef;
    use anyhow::anyhow;
    use serde_json::json;

    /// Capability that answers connection probes and rejects everything else
    struct StubWallet {
        connected: bool,
    }

    impl WalletCapability for StubWallet {
        async fn is_connected(&self) -> Result<bool> {
            Ok(self.connected)
        }

        async fn account(&self) -> Result<Account> {
            if self.connected {
                Ok(Account {
                    address: "0xstub".to_string(),
                })
            } else {
                Err(anyhow!("Wallet is not connected"))
            }
        }

        async fn connect(&self) -> Result<Account> {
            Err(anyhow!("User rejected the request"))
        }

        async fn view(&self, _request: &ViewRequest) -> Result<Vec<Value>> {
            Ok(vec![json!(true)])
        }

        async fn sign_and_submit(&self, _request: &TransactionRequest) -> Result<Value> {
            Err(anyhow!("Simulation error"))
        }
    }

    #[tokio::test]
    async fn test_relay_answers_each_message_type() {
        let channel = pair(StubWallet { connected: true });
        let contract = ContractRef::new("0xabc", "piggy_bank");

        let envelope = channel.send(BridgeCall::IsConnected).await.unwrap();
        assert_eq!(envelope.connected, Some(true));

        let envelope = channel.send(BridgeCall::GetAccount).await.unwrap();
        assert_eq!(envelope.account.unwrap().address, "0xstub");

        let view = contract.view("piggy_bank_exists", vec![json!("0xstub")]);
        let envelope = channel.send(BridgeCall::View(view)).await.unwrap();
        assert_eq!(envelope.response, Some(json!([true])));
    }

    #[tokio::test]
    async fn test_capability_errors_become_failure_envelopes() {
        let channel = pair(StubWallet { connected: false });
        let contract = ContractRef::new("0xabc", "piggy_bank");

        let envelope = channel.send(BridgeCall::Connect).await.unwrap();
        assert!(!envelope.success);
        assert_eq!(envelope.error.as_deref(), Some("User rejected the request"));

        // The relay survives the failure and keeps serving
        let tx = contract.entry("deposit", vec![json!("100")]);
        let envelope = channel.send(BridgeCall::SignAndSubmit(tx)).await.unwrap();
        assert!(!envelope.success);
        assert_eq!(envelope.error.as_deref(), Some("Simulation error"));

        let envelope = channel.send(BridgeCall::IsConnected).await.unwrap();
        assert_eq!(envelope.connected, Some(false));
    }
}
