//! # Gullak: Piggy-Bank Savings Client
//!
//! Client library for a time-locked on-chain piggy bank. An isolated UI
//! surface talks to the wallet capability injected into the visited page
//! through a bridge relay, and the resulting ledger state is derived into a
//! savings dashboard with goals, progress, and lock countdowns.

pub mod app;
pub mod bridge;
pub mod config;
pub mod demo;
pub mod error;
pub mod flow;
pub mod presenter;
pub mod services;
pub mod session;
pub mod status;
pub mod units;

// Re-export commonly used types
pub use app::{App, Screen};
pub use bridge::{Account, BridgeRelay, ContractRef, MessageChannel, WalletCapability};
pub use flow::{Action, FlowOutcome, Refresh, RefreshScheduler, TransactionFlow};
pub use presenter::{present, DashboardState};
pub use services::{AccountInfo, ViewQueryService};
pub use session::Session;
pub use status::StatusNotifier;
