//! # UI State Machine
//!
//! Selects among the three mutually exclusive screens — disconnected,
//! create, dashboard — from connection and account-existence facts, and
//! applies deferred refreshes after transactions. All remote facts are
//! rebuilt from the ledger on every derivation; only the session and the
//! current screen persist between calls.

use crate::bridge::{Account, BridgeCall, ContractRef, MessageChannel};
use crate::error::QueryError;
use crate::flow::{Action, ApprovalPrompt, FlowOutcome, Refresh, RefreshScheduler, TransactionFlow};
use crate::presenter::{present, DashboardState};
use crate::services::ViewQueryService;
use crate::session::Session;
use crate::status::StatusNotifier;
use log::warn;
use std::sync::Arc;

/// The screen currently shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Disconnected,
    CreatePrompt,
    Dashboard,
}

/// Top-level controller for the UI surface
pub struct App<S: RefreshScheduler, P: ApprovalPrompt> {
    channel: Arc<MessageChannel>,
    views: ViewQueryService,
    flow: TransactionFlow<S, P>,
    status: StatusNotifier,
    session: Option<Session>,
    screen: Screen,
    dashboard: Option<DashboardState>,
}

impl<S: RefreshScheduler, P: ApprovalPrompt> App<S, P> {
    pub fn new(
        channel: Arc<MessageChannel>,
        contract: ContractRef,
        scheduler: S,
        prompt: P,
        status: StatusNotifier,
    ) -> Self {
        let views = ViewQueryService::new(Arc::clone(&channel), contract.clone());
        let flow = TransactionFlow::new(
            Arc::clone(&channel),
            contract,
            status.clone(),
            scheduler,
            prompt,
        );
        Self {
            channel,
            views,
            flow,
            status,
            session: None,
            screen: Screen::Disconnected,
            dashboard: None,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn dashboard(&self) -> Option<&DashboardState> {
        self.dashboard.as_ref()
    }

    pub fn status(&self) -> &StatusNotifier {
        &self.status
    }

    /// Derive the initial screen at startup. A wallet that was already
    /// authorized reconnects silently; anything else lands on the
    /// disconnected screen without surfacing an error.
    pub async fn init(&mut self) {
        let connected = self
            .channel
            .send(BridgeCall::IsConnected)
            .await
            .and_then(|envelope| envelope.require_success());
        match connected {
            Ok(envelope) if envelope.connected == Some(true) => {
                let account = self
                    .channel
                    .send(BridgeCall::GetAccount)
                    .await
                    .and_then(|envelope| envelope.require_success());
                match account {
                    Ok(envelope) => match envelope.account {
                        Some(account) => {
                            self.session = Some(Session::new(account));
                            self.render().await;
                        }
                        None => {
                            warn!("GET_ACCOUNT reply carried no account");
                            self.screen = Screen::Disconnected;
                        }
                    },
                    Err(err) => {
                        warn!("startup account query failed: {}", err);
                        self.screen = Screen::Disconnected;
                    }
                }
            }
            Ok(_) => self.screen = Screen::Disconnected,
            Err(err) => {
                warn!("startup connection probe failed: {}", err);
                self.screen = Screen::Disconnected;
            }
        }
    }

    /// Request a wallet connection; the wallet may prompt the user
    pub async fn connect(&mut self) {
        let result = self
            .channel
            .send(BridgeCall::Connect)
            .await
            .and_then(|envelope| envelope.require_success());
        match result {
            Ok(envelope) => {
                let account = envelope
                    .response
                    .and_then(|value| serde_json::from_value::<Account>(value).ok());
                match account {
                    Some(account) => {
                        self.session = Some(Session::new(account));
                        self.render().await;
                    }
                    None => {
                        self.status
                            .error("Wallet connected but returned no account.")
                            .await;
                    }
                }
            }
            Err(err) => self.status.error(err.to_string()).await,
        }
    }

    /// Drop the session and return to the disconnected screen
    pub fn disconnect(&mut self) {
        self.session = None;
        self.dashboard = None;
        self.screen = Screen::Disconnected;
    }

    /// Full screen re-derivation: existence check, then either the
    /// dashboard (refreshed) or the create prompt.
    pub async fn render(&mut self) {
        let Some(address) = self.session.as_ref().map(|s| s.address().to_string()) else {
            self.screen = Screen::Disconnected;
            self.dashboard = None;
            return;
        };
        if self.views.exists_account(&address).await {
            self.screen = Screen::Dashboard;
            self.refresh_dashboard().await;
        } else {
            self.screen = Screen::CreatePrompt;
            self.dashboard = None;
        }
    }

    /// Re-derive the dashboard from a fresh account-info query. Discovering
    /// that the account no longer exists routes back to the create prompt;
    /// other failures surface as status and leave the screen unchanged.
    pub async fn refresh_dashboard(&mut self) {
        let Some(address) = self.session.as_ref().map(|s| s.address().to_string()) else {
            return;
        };
        match self.views.fetch_account_info(&address).await {
            Ok(info) => {
                self.dashboard = Some(present(&info, epoch_now()));
            }
            Err(QueryError::AccountAbsent) => {
                self.screen = Screen::CreatePrompt;
                self.dashboard = None;
            }
            Err(err) => {
                warn!("dashboard refresh failed: {}", err);
                self.status.error(err.to_string()).await;
            }
        }
    }

    /// Submit a user-initiated action through the transaction flow
    pub async fn submit(&mut self, action: Action) -> FlowOutcome {
        self.flow.submit(action).await
    }

    /// Apply a deferred refresh scheduled by the transaction flow
    pub async fn handle_refresh(&mut self, refresh: Refresh) {
        match refresh {
            Refresh::Full => self.render().await,
            Refresh::Dashboard => self.refresh_dashboard().await,
        }
    }
}

/// Current wall-clock time in epoch seconds
fn epoch_now() -> u64 {
    chrono::Utc::now().timestamp().max(0) as u64
}
