//! # Transaction Flow Controller
//!
//! Drives user-initiated mutating operations through submission, optimistic
//! success assumption, and a deferred refresh. The relay only confirms that
//! signing and submission succeeded, not that the ledger finalized the
//! transaction, so the controller assumes success and schedules a refresh
//! after a fixed delay through the [`RefreshScheduler`] seam.

use crate::bridge::{BridgeCall, ContractRef, MessageChannel, TransactionRequest};
use crate::config::timing::{REFRESH_DELAY, SECONDS_PER_DAY};
use crate::error::{FlowError, FlowResult};
use crate::status::StatusNotifier;
use crate::units::to_raw;
use log::debug;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// What a deferred refresh should re-derive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refresh {
    /// Re-run the dashboard derivation only
    Dashboard,
    /// Re-run screen selection from scratch (the account may be gone)
    Full,
}

/// Seam for scheduling the post-submission refresh.
///
/// The optimistic fixed-delay behavior lives behind this trait so a
/// finality-polling implementation can replace it without touching the
/// state machine.
pub trait RefreshScheduler: Send + Sync {
    fn schedule(&self, delay: Duration, refresh: Refresh);
}

/// Scheduler that delivers refreshes over a channel after a timer
pub struct TokioRefreshScheduler {
    tx: mpsc::UnboundedSender<Refresh>,
}

impl TokioRefreshScheduler {
    /// Returns the scheduler and the stream of due refreshes
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Refresh>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl RefreshScheduler for TokioRefreshScheduler {
    fn schedule(&self, delay: Duration, refresh: Refresh) {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Receiver gone means the UI surface was torn down
            let _ = tx.send(refresh);
        });
    }
}

/// Seam for the confirmation dialog shown before destructive actions
pub trait ApprovalPrompt: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

/// Prompt that approves everything; used by the demo and tests
pub struct AutoApprove;

impl ApprovalPrompt for AutoApprove {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

impl ApprovalPrompt for Box<dyn ApprovalPrompt> {
    fn confirm(&self, prompt: &str) -> bool {
        (**self).confirm(prompt)
    }
}

/// A user-initiated mutating operation. Display amounts are in the decimal
/// unit; conversion to raw units happens when the request is built.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Create { goal_display: f64, lock_days: u64 },
    Deposit { amount: f64 },
    Withdraw { amount: f64 },
    Break,
    EmergencyWithdrawAll,
}

impl Action {
    /// Confirmation prompt for destructive, irreversible actions
    pub fn confirmation_prompt(&self) -> Option<&'static str> {
        match self {
            Action::Break => Some(
                "Are you sure? This will withdraw all funds and close your piggy bank permanently.",
            ),
            Action::EmergencyWithdrawAll => Some(
                "Are you sure? This will withdraw all funds immediately, ignoring any time-lock.",
            ),
            _ => None,
        }
    }

    /// Whether a successful submission removes the account, requiring a
    /// full screen re-derivation instead of a dashboard refresh
    pub fn closes_account(&self) -> bool {
        matches!(self, Action::Break)
    }

    /// Transient status shown on optimistic success
    pub fn success_message(&self) -> &'static str {
        match self {
            Action::Create { .. } => "Piggy bank created! 🎉",
            Action::Deposit { .. } => "Deposit successful!",
            Action::Withdraw { .. } => "Withdrawal successful!",
            Action::Break => "Piggy bank broken! All funds returned.",
            Action::EmergencyWithdrawAll => "Emergency withdrawal successful!",
        }
    }

    /// Validate locally and build the entry-function request.
    ///
    /// Non-positive amounts are rejected here, before the channel is ever
    /// contacted. Raw amounts travel as decimal strings.
    pub fn build_request(&self, contract: &ContractRef) -> FlowResult<TransactionRequest> {
        let request = match self {
            Action::Create {
                goal_display,
                lock_days,
            } => {
                let goal_raw = positive_raw(*goal_display, "Please enter a valid goal amount.")?;
                contract.entry(
                    "create_piggy_bank",
                    vec![
                        Value::String(goal_raw.to_string()),
                        Value::String((lock_days * SECONDS_PER_DAY).to_string()),
                    ],
                )
            }
            Action::Deposit { amount } => {
                let raw = positive_raw(*amount, "Invalid deposit amount.")?;
                contract.entry("deposit", vec![Value::String(raw.to_string())])
            }
            Action::Withdraw { amount } => {
                let raw = positive_raw(*amount, "Invalid withdrawal amount.")?;
                contract.entry("withdraw", vec![Value::String(raw.to_string())])
            }
            Action::Break => contract.entry("break_piggy_bank", Vec::new()),
            Action::EmergencyWithdrawAll => contract.entry("emergency_withdraw_all", Vec::new()),
        };
        Ok(request)
    }
}

fn positive_raw(display: f64, message: &str) -> FlowResult<u64> {
    if !(display > 0.0) {
        return Err(FlowError::validation(message));
    }
    let raw = to_raw(display);
    if raw == 0 {
        return Err(FlowError::validation(message));
    }
    Ok(raw)
}

/// Lifecycle of one user-initiated action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    Idle,
    AwaitingApproval,
    OptimisticSuccess,
    Failed,
}

/// How a submission attempt ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowOutcome {
    /// Submitted and optimistically assumed successful; refresh scheduled
    Submitted,
    /// The user declined the confirmation prompt; nothing was sent
    Declined,
    /// Validation or submission failed; error surfaced as status
    Rejected,
}

/// State machine driving mutating calls over the bridge
pub struct TransactionFlow<S: RefreshScheduler, P: ApprovalPrompt> {
    channel: Arc<MessageChannel>,
    contract: ContractRef,
    status: StatusNotifier,
    scheduler: S,
    prompt: P,
    state: FlowState,
}

impl<S: RefreshScheduler, P: ApprovalPrompt> TransactionFlow<S, P> {
    pub fn new(
        channel: Arc<MessageChannel>,
        contract: ContractRef,
        status: StatusNotifier,
        scheduler: S,
        prompt: P,
    ) -> Self {
        Self {
            channel,
            contract,
            status,
            scheduler,
            prompt,
            state: FlowState::Idle,
        }
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    /// Run one action through the submission lifecycle.
    ///
    /// At most one action is in flight at a time; the `&mut self` receiver
    /// makes callers serialize.
    pub async fn submit(&mut self, action: Action) -> FlowOutcome {
        if let Some(prompt) = action.confirmation_prompt() {
            if !self.prompt.confirm(prompt) {
                debug!("{:?} declined at confirmation", action);
                return FlowOutcome::Declined;
            }
        }

        let request = match action.build_request(&self.contract) {
            Ok(request) => request,
            Err(err) => {
                self.status.error(err.to_string()).await;
                return FlowOutcome::Rejected;
            }
        };

        self.state = FlowState::AwaitingApproval;
        self.status.info("Please approve in your wallet...").await;

        let outcome = self
            .channel
            .send(BridgeCall::SignAndSubmit(request))
            .await
            .and_then(|envelope| envelope.require_success());

        match outcome {
            Ok(_receipt) => {
                self.state = FlowState::OptimisticSuccess;
                self.status.info(action.success_message()).await;
                let refresh = if action.closes_account() {
                    Refresh::Full
                } else {
                    Refresh::Dashboard
                };
                self.scheduler.schedule(REFRESH_DELAY, refresh);
                self.state = FlowState::Idle;
                FlowOutcome::Submitted
            }
            Err(err) => {
                self.state = FlowState::Failed;
                self.status.error(err.to_string()).await;
                self.state = FlowState::Idle;
                FlowOutcome::Rejected
            }
        }
    }
}
