//! # Bridge Module
//!
//! Cross-context request/response plumbing between the isolated UI surface
//! and the wallet capability injected into the visited page.
//!
//! ## Components
//!
//! - **Message**: wire types for requests and reply envelopes
//! - **Channel**: caller-side one-shot send with correlation-id dispatch
//! - **Relay**: in-page loop invoking the wallet capability

pub mod channel;
pub mod message;
pub mod relay;

pub use channel::MessageChannel;
pub use message::{
    Account, BridgeCall, BridgeMessage, ContractRef, Envelope, TransactionRequest, ViewRequest,
};
pub use relay::{pair, BridgeRelay, WalletCapability};
