//! # Scripted Demo
//!
//! A simulated wallet capability backed by an in-memory piggy-bank ledger,
//! and a scripted end-to-end session that exercises the whole client:
//! connect, create, deposit, a withdrawal blocked by the time-lock, unlock,
//! withdraw, and finally breaking the bank.
//!
//! The simulation raises the same abort markers as the remote contract, so
//! error routing behaves exactly as it does against the live ledger.

use crate::bridge::{pair, Account, ContractRef, TransactionRequest, ViewRequest, WalletCapability};
use crate::flow::{Action, ApprovalPrompt, FlowOutcome, TokioRefreshScheduler};
use crate::services::AccountInfo;
use crate::status::StatusNotifier;
use crate::{App, Screen};
use anyhow::{anyhow, Result};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Demo account address used by the simulated wallet
pub const DEMO_ADDRESS: &str = "0x5aver5aver5aver5aver5aver5aver5aver5aver";

struct Inner {
    account: Account,
    connected: AtomicBool,
    decline_connect: AtomicBool,
    decline_sign: AtomicBool,
    submissions: AtomicU64,
    bank: Mutex<Option<AccountInfo>>,
}

/// In-memory wallet capability with piggy-bank ledger semantics.
///
/// Cloning shares the underlying state, so a test or demo can keep a handle
/// for inspection after moving a clone into the relay.
#[derive(Clone)]
pub struct SimulatedWallet {
    inner: Arc<Inner>,
}

impl SimulatedWallet {
    pub fn new(address: &str) -> Self {
        Self {
            inner: Arc::new(Inner {
                account: Account {
                    address: address.to_string(),
                },
                connected: AtomicBool::new(false),
                decline_connect: AtomicBool::new(false),
                decline_sign: AtomicBool::new(false),
                submissions: AtomicU64::new(0),
                bank: Mutex::new(None),
            }),
        }
    }

    /// Start with the wallet already authorized, as after a prior session
    pub fn pre_connected(self) -> Self {
        self.inner.connected.store(true, Ordering::SeqCst);
        self
    }

    /// Make the simulated user decline connection prompts
    pub fn declining_connect(self) -> Self {
        self.inner.decline_connect.store(true, Ordering::SeqCst);
        self
    }

    /// Make the simulated user decline signing prompts
    pub fn declining_sign(self) -> Self {
        self.inner.decline_sign.store(true, Ordering::SeqCst);
        self
    }

    /// How many SIGN_AND_SUBMIT calls reached the capability
    pub fn submissions(&self) -> u64 {
        self.inner.submissions.load(Ordering::SeqCst)
    }

    /// Simulate the passage of time past the lock by expiring it on the
    /// ledger record
    pub async fn expire_lock(&self) {
        if let Some(bank) = self.inner.bank.lock().await.as_mut() {
            bank.unlock_time = 0;
        }
    }

    fn now() -> u64 {
        chrono::Utc::now().timestamp().max(0) as u64
    }

    fn receipt(&self) -> Value {
        let n = self.inner.submissions.load(Ordering::SeqCst);
        json!({ "hash": format!("0x{:064x}", n) })
    }
}

/// The ledger API returns u64 values as decimal strings
fn info_tuple(bank: &AccountInfo) -> Vec<Value> {
    vec![
        json!(bank.balance.to_string()),
        json!(bank.goal.to_string()),
        json!(bank.created_at.to_string()),
        json!(bank.last_deposit.to_string()),
        json!(bank.is_locked),
        json!(bank.unlock_time.to_string()),
        json!(bank.deposit_count.to_string()),
    ]
}

fn function_name(function: &str) -> &str {
    function.rsplit("::").next().unwrap_or(function)
}

fn arg_u64(request: &TransactionRequest, index: usize) -> Result<u64> {
    let value = request
        .arguments
        .get(index)
        .ok_or_else(|| anyhow!("missing argument {}", index))?;
    match value {
        Value::String(s) => Ok(s.parse()?),
        Value::Number(n) => n.as_u64().ok_or_else(|| anyhow!("argument {} not a u64", index)),
        other => Err(anyhow!("argument {} has unexpected type: {}", index, other)),
    }
}

impl WalletCapability for SimulatedWallet {
    async fn is_connected(&self) -> Result<bool> {
        Ok(self.inner.connected.load(Ordering::SeqCst))
    }

    async fn account(&self) -> Result<Account> {
        if self.inner.connected.load(Ordering::SeqCst) {
            Ok(self.inner.account.clone())
        } else {
            Err(anyhow!("Wallet is not connected"))
        }
    }

    async fn connect(&self) -> Result<Account> {
        if self.inner.decline_connect.load(Ordering::SeqCst) {
            return Err(anyhow!("User rejected the request"));
        }
        self.inner.connected.store(true, Ordering::SeqCst);
        Ok(self.inner.account.clone())
    }

    async fn view(&self, request: &ViewRequest) -> Result<Vec<Value>> {
        let bank = self.inner.bank.lock().await;
        match function_name(&request.function) {
            "piggy_bank_exists" => Ok(vec![json!(bank.is_some())]),
            "get_piggy_bank_info" => bank
                .as_ref()
                .map(info_tuple)
                .ok_or_else(|| anyhow!("Move abort: E_PIGGY_BANK_NOT_EXISTS")),
            other => Err(anyhow!("unknown view function: {}", other)),
        }
    }

    async fn sign_and_submit(&self, request: &TransactionRequest) -> Result<Value> {
        self.inner.submissions.fetch_add(1, Ordering::SeqCst);
        if self.inner.decline_sign.load(Ordering::SeqCst) {
            return Err(anyhow!("User rejected the request"));
        }
        if !self.inner.connected.load(Ordering::SeqCst) {
            return Err(anyhow!("Wallet is not connected"));
        }

        let now = Self::now();
        let mut bank = self.inner.bank.lock().await;
        match function_name(&request.function) {
            "create_piggy_bank" => {
                if bank.is_some() {
                    return Err(anyhow!("Move abort: E_PIGGY_BANK_ALREADY_EXISTS"));
                }
                let goal = arg_u64(request, 0)?;
                let lock_seconds = arg_u64(request, 1)?;
                *bank = Some(AccountInfo {
                    balance: 0,
                    goal,
                    created_at: now,
                    last_deposit: 0,
                    is_locked: lock_seconds > 0,
                    unlock_time: now + lock_seconds,
                    deposit_count: 0,
                });
            }
            "deposit" => {
                let amount = arg_u64(request, 0)?;
                let bank = bank
                    .as_mut()
                    .ok_or_else(|| anyhow!("Move abort: E_PIGGY_BANK_NOT_EXISTS"))?;
                if amount == 0 {
                    return Err(anyhow!("Move abort: E_INVALID_AMOUNT"));
                }
                bank.balance += amount;
                bank.last_deposit = now;
                bank.deposit_count += 1;
            }
            "withdraw" => {
                let amount = arg_u64(request, 0)?;
                let bank = bank
                    .as_mut()
                    .ok_or_else(|| anyhow!("Move abort: E_PIGGY_BANK_NOT_EXISTS"))?;
                if bank.is_locked && now < bank.unlock_time {
                    return Err(anyhow!("Move abort: E_STILL_LOCKED"));
                }
                if amount > bank.balance {
                    return Err(anyhow!("Move abort: E_INSUFFICIENT_BALANCE"));
                }
                bank.balance -= amount;
            }
            "break_piggy_bank" => {
                let current = bank
                    .as_ref()
                    .ok_or_else(|| anyhow!("Move abort: E_PIGGY_BANK_NOT_EXISTS"))?;
                if current.is_locked && now < current.unlock_time {
                    return Err(anyhow!("Move abort: E_STILL_LOCKED"));
                }
                *bank = None;
            }
            "emergency_withdraw_all" => {
                // The emergency path ignores the time-lock but keeps the bank
                let bank = bank
                    .as_mut()
                    .ok_or_else(|| anyhow!("Move abort: E_PIGGY_BANK_NOT_EXISTS"))?;
                bank.balance = 0;
            }
            other => return Err(anyhow!("unknown entry function: {}", other)),
        }
        Ok(self.receipt())
    }
}

async fn show<S, P>(app: &App<S, P>)
where
    S: crate::flow::RefreshScheduler,
    P: ApprovalPrompt,
{
    match app.screen() {
        Screen::Disconnected => println!("🔌 [disconnected] connect a wallet to begin"),
        Screen::CreatePrompt => {
            let banner = app.session().map(|s| s.banner()).unwrap_or_default();
            println!("🐷 [create] {} — no piggy bank yet", banner);
        }
        Screen::Dashboard => {
            let banner = app.session().map(|s| s.banner()).unwrap_or_default();
            println!("📊 [dashboard] {}", banner);
            if let Some(dashboard) = app.dashboard() {
                println!("    {}", dashboard.balance_text());
                println!("    {} ({:.0}%)", dashboard.goal_text(), dashboard.progress_percent);
                match dashboard.lock_text() {
                    Some(lock) => println!("    {} — withdraw/break disabled", lock),
                    None => println!("    🔓 Unlocked — withdraw/break enabled"),
                }
            }
        }
    }
    if let Some(status) = app.status().current().await {
        println!("    💬 {}", status.text);
    }
}

/// Run the scripted end-to-end session against the simulated wallet.
/// The prompt decides how destructive-action confirmations are answered.
pub async fn run_demo(prompt: Box<dyn ApprovalPrompt>) -> Result<()> {
    let wallet = SimulatedWallet::new(DEMO_ADDRESS);
    let ledger = wallet.clone();

    let channel = Arc::new(pair(wallet));
    let (scheduler, mut refreshes) = TokioRefreshScheduler::new();
    let mut app = App::new(
        channel,
        ContractRef::default(),
        scheduler,
        prompt,
        StatusNotifier::new(),
    );

    println!("— startup —");
    app.init().await;
    show(&app).await;

    println!("— connect —");
    app.connect().await;
    show(&app).await;

    println!("— create: goal 10 APT, 7-day lock —");
    app.submit(Action::Create {
        goal_display: 10.0,
        lock_days: 7,
    })
    .await;
    if let Some(refresh) = refreshes.recv().await {
        app.handle_refresh(refresh).await;
    }
    app.render().await;
    show(&app).await;

    println!("— deposit 2.5 APT —");
    app.submit(Action::Deposit { amount: 2.5 }).await;
    if let Some(refresh) = refreshes.recv().await {
        app.handle_refresh(refresh).await;
    }
    show(&app).await;

    println!("— withdraw 1 APT while locked —");
    app.submit(Action::Withdraw { amount: 1.0 }).await;
    show(&app).await;

    println!("— seven days later —");
    ledger.expire_lock().await;
    app.refresh_dashboard().await;
    show(&app).await;

    println!("— withdraw 1 APT —");
    app.submit(Action::Withdraw { amount: 1.0 }).await;
    if let Some(refresh) = refreshes.recv().await {
        app.handle_refresh(refresh).await;
    }
    show(&app).await;

    println!("— break the piggy bank —");
    if app.submit(Action::Break).await == FlowOutcome::Submitted {
        if let Some(refresh) = refreshes.recv().await {
            app.handle_refresh(refresh).await;
        }
    } else {
        println!("    (break declined, piggy bank kept)");
    }
    show(&app).await;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::BridgeCall;

    #[tokio::test]
    async fn test_simulated_ledger_lifecycle() {
        let wallet = SimulatedWallet::new("0xtest").pre_connected();
        let contract = ContractRef::default();

        let create = contract.entry(
            "create_piggy_bank",
            vec![json!("1000000000"), json!("604800")],
        );
        wallet.sign_and_submit(&create).await.unwrap();

        let deposit = contract.entry("deposit", vec![json!("250000000")]);
        wallet.sign_and_submit(&deposit).await.unwrap();

        let withdraw = contract.entry("withdraw", vec![json!("100000000")]);
        let err = wallet.sign_and_submit(&withdraw).await.unwrap_err();
        assert!(err.to_string().contains("E_STILL_LOCKED"));

        wallet.expire_lock().await;
        wallet.sign_and_submit(&withdraw).await.unwrap();

        let info = contract.view("get_piggy_bank_info", vec![json!("0xtest")]);
        let tuple = wallet.view(&info).await.unwrap();
        let parsed = AccountInfo::from_tuple(&tuple).unwrap();
        assert_eq!(parsed.balance, 150_000_000);
        assert_eq!(parsed.deposit_count, 1);

        let brk = contract.entry("break_piggy_bank", vec![]);
        wallet.sign_and_submit(&brk).await.unwrap();
        let exists = contract.view("piggy_bank_exists", vec![json!("0xtest")]);
        assert_eq!(wallet.view(&exists).await.unwrap(), vec![json!(false)]);
    }

    #[tokio::test]
    async fn test_emergency_withdraw_ignores_lock_and_keeps_bank() {
        let wallet = SimulatedWallet::new("0xtest").pre_connected();
        let contract = ContractRef::default();

        wallet
            .sign_and_submit(&contract.entry(
                "create_piggy_bank",
                vec![json!("1000000000"), json!("604800")],
            ))
            .await
            .unwrap();
        wallet
            .sign_and_submit(&contract.entry("deposit", vec![json!("500000000")]))
            .await
            .unwrap();

        wallet
            .sign_and_submit(&contract.entry("emergency_withdraw_all", vec![]))
            .await
            .unwrap();

        let tuple = wallet
            .view(&contract.view("get_piggy_bank_info", vec![json!("0xtest")]))
            .await
            .unwrap();
        let parsed = AccountInfo::from_tuple(&tuple).unwrap();
        assert_eq!(parsed.balance, 0);
        assert!(parsed.is_locked);
    }

    #[tokio::test]
    async fn test_relay_pair_end_to_end() {
        let wallet = SimulatedWallet::new("0xtest");
        let channel = pair(wallet.clone());

        let envelope = channel.send(BridgeCall::IsConnected).await.unwrap();
        assert_eq!(envelope.connected, Some(false));

        let envelope = channel.send(BridgeCall::Connect).await.unwrap();
        assert!(envelope.success);

        let envelope = channel.send(BridgeCall::GetAccount).await.unwrap();
        assert_eq!(envelope.account.unwrap().address, "0xtest");
        assert_eq!(wallet.submissions(), 0);
    }
}
