//! Per-wallet execution of the selected action.
//!
//! Every step logs and returns its outcome; nothing here aborts a sequence.

use alloy::primitives::utils::format_ether;
use alloy::primitives::{Address, U256};
use tracing::{error, info, warn};

use crate::actions::types::{Action, Pipeline, RunPlan, SkipReason, StepOutcome, StepStatus};
use crate::blockchain::contracts::MAX_APPROVAL;
use crate::blockchain::{BlockchainResult, Ledger, TxIntent, TxReceipt, Wallet};
use crate::observability::metrics;
use crate::rewards::{Rewards, TransactionReport};

/// Report type the rewards service assigns to wrap transactions.
const WRAP_REPORT_TYPE: u8 = 2;

/// Whether `balance` covers `required` plus `gas_price * gas_units`.
///
/// Equality proceeds. An overflowing total is never covered.
pub fn is_balance_sufficient(balance: U256, required: U256, gas_price: u128, gas_units: u64) -> bool {
    let gas_fee = U256::from(gas_price) * U256::from(gas_units);
    match required.checked_add(gas_fee) {
        Some(total) => balance >= total,
        None => false,
    }
}

/// Runs action sequences against an injected ledger and rewards service.
pub struct ActionExecutor<L, R> {
    ledger: L,
    rewards: R,
    pipeline: Pipeline,
}

impl<L: Ledger, R: Rewards> ActionExecutor<L, R> {
    pub fn new(ledger: L, rewards: R, pipeline: Pipeline) -> Self {
        Self {
            ledger,
            rewards,
            pipeline,
        }
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn rewards(&self) -> &R {
        &self.rewards
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Run the plan's action for one wallet, returning every step outcome in order.
    pub async fn execute(&self, wallet: &Wallet, plan: &RunPlan) -> Vec<StepOutcome> {
        match plan.action {
            Action::ConvertNativeToWrapped => vec![self.convert_native(wallet, plan.native_amount).await],
            Action::WrapToTarget => self.wrap_to_target(wallet, plan.repeat_count).await,
            Action::UnwrapAll => vec![self.unwrap_all(wallet).await],
            Action::ClaimDailyReward => vec![self.claim_daily_reward(wallet).await],
            Action::RunAll => self.run_all(wallet, plan.repeat_count).await,
        }
    }

    /// Deposit `amount` of native coin into the native wrapper.
    pub async fn convert_native(&self, wallet: &Wallet, amount: U256) -> StepOutcome {
        let p = &self.pipeline;
        info!(
            "Converting {} {} to {}",
            format_ether(amount),
            p.native_symbol,
            p.source_symbol
        );

        let intent = TxIntent::deposit(p.native_wrapper, amount);
        if let Some(reason) = self.check_balance(wallet.address(), amount, &intent).await {
            return self.skipped(intent.label, reason);
        }
        self.submit_and_log(wallet, intent).await.0
    }

    /// `repeat` wrap iterations, each preceded by an allowance check.
    pub async fn wrap_to_target(&self, wallet: &Wallet, repeat: u32) -> Vec<StepOutcome> {
        let p = &self.pipeline;
        let mut outcomes = Vec::new();

        for i in 1..=repeat {
            outcomes.push(self.ensure_allowance(wallet).await);

            let intent = TxIntent::wrap(p.target, p.wrap_amount, wallet.address());
            if let Some(reason) = self.check_balance(wallet.address(), p.wrap_amount, &intent).await {
                outcomes.push(self.skipped(intent.label, reason));
                continue;
            }

            info!("Executing transaction {} of {}", i, repeat);
            info!(
                "Converting {} {} to {}",
                format_ether(p.wrap_amount),
                p.source_symbol,
                p.target_symbol
            );
            let (outcome, receipt) = self.submit_and_log(wallet, intent).await;
            if let Some(receipt) = receipt {
                self.report_wrap(wallet.address(), &receipt).await;
            }
            outcomes.push(outcome);
        }

        outcomes
    }

    /// Approve `MAX_APPROVAL` for the spender unless the allowance already
    /// covers the wrap amount.
    async fn ensure_allowance(&self, wallet: &Wallet) -> StepOutcome {
        let p = &self.pipeline;
        let allowance = match self
            .ledger
            .allowance(p.source_token, wallet.address(), p.spender)
            .await
        {
            Ok(a) => a,
            Err(e) => {
                error!(error = %e, "Error checking allowance");
                return StepOutcome::new("approve", StepStatus::Failed(e.to_string()));
            }
        };

        if allowance >= p.wrap_amount {
            info!("Sufficient {} allowance available", p.source_symbol);
            return self.skipped("approve", SkipReason::AllowanceSufficient);
        }

        info!("Approving {} for spender {}", p.source_symbol, p.spender);
        let intent = TxIntent::approve(p.source_token, p.spender, MAX_APPROVAL);
        self.submit_and_log(wallet, intent).await.0
    }

    /// Unwrap the wallet's whole target-wrapper balance.
    pub async fn unwrap_all(&self, wallet: &Wallet) -> StepOutcome {
        let p = &self.pipeline;
        let balance = match self.ledger.token_balance(p.target, wallet.address()).await {
            Ok(b) => b,
            Err(e) => {
                error!(error = %e, "Error reading {} balance", p.target_symbol);
                return StepOutcome::new("unwrap", StepStatus::Failed(e.to_string()));
            }
        };

        if balance.is_zero() {
            info!("No {} balance to unwrap. Skipping.", p.target_symbol);
            return self.skipped("unwrap", SkipReason::NothingToUnwrap);
        }

        info!(
            "Unwrapping {} {} to {}",
            format_ether(balance),
            p.target_symbol,
            p.source_symbol
        );
        let intent = TxIntent::unwrap(p.target, balance, wallet.address());
        // Unwrapping costs no native value, only gas.
        if let Some(reason) = self.check_balance(wallet.address(), U256::ZERO, &intent).await {
            return self.skipped(intent.label, reason);
        }
        self.submit_and_log(wallet, intent).await.0
    }

    /// Daily check-in with the rewards service.
    pub async fn claim_daily_reward(&self, wallet: &Wallet) -> StepOutcome {
        match self.rewards.check_in(wallet.address()).await {
            Ok(()) => {
                info!("Claim daily points success!");
                StepOutcome::new("check_in", StepStatus::Completed)
            }
            Err(e) => {
                error!(error = %e, "Error claiming daily reward");
                StepOutcome::new("check_in", StepStatus::Failed(e.to_string()))
            }
        }
    }

    /// Wrap, unwrap and check-in, in that order, whatever each one returns.
    pub async fn run_all(&self, wallet: &Wallet, repeat: u32) -> Vec<StepOutcome> {
        let mut outcomes = self.wrap_to_target(wallet, repeat).await;
        outcomes.push(self.unwrap_all(wallet).await);
        outcomes.push(self.claim_daily_reward(wallet).await);
        outcomes
    }

    /// `None` when `owner` can pay `required` plus the intent's gas budget.
    async fn check_balance(&self, owner: Address, required: U256, intent: &TxIntent) -> Option<SkipReason> {
        let (balance, gas_price) = match self.read_balance_and_gas(owner).await {
            Ok(v) => v,
            Err(e) => {
                error!(error = %e, step = intent.label, "Error checking balance");
                return Some(SkipReason::BalanceUnavailable);
            }
        };

        if is_balance_sufficient(balance, required, gas_price, intent.gas_limit) {
            None
        } else {
            warn!(
                balance = %format_ether(balance),
                step = intent.label,
                "Insufficient balance or gas fee. Skipping transaction."
            );
            Some(SkipReason::InsufficientBalance)
        }
    }

    async fn read_balance_and_gas(&self, owner: Address) -> BlockchainResult<(U256, u128)> {
        let balance = self.ledger.native_balance(owner).await?;
        let gas_price = self.ledger.gas_price().await?;
        Ok((balance, gas_price))
    }

    fn skipped(&self, step: &'static str, reason: SkipReason) -> StepOutcome {
        metrics::record_step_skipped(step, reason.as_str());
        StepOutcome::new(step, StepStatus::Skipped(reason))
    }

    async fn submit_and_log(&self, wallet: &Wallet, intent: TxIntent) -> (StepOutcome, Option<TxReceipt>) {
        let result = self.ledger.submit(wallet, &intent).await;
        metrics::record_transaction(intent.label, result.is_ok());

        match result {
            Ok(receipt) => {
                info!(tx_hash = %receipt.tx_hash, "{} transaction confirmed", intent.label);
                (
                    StepOutcome::new(intent.label, StepStatus::Submitted(receipt.tx_hash)),
                    Some(receipt),
                )
            }
            Err(e) => {
                error!(error = %e, "Error in {} transaction", intent.label);
                (StepOutcome::new(intent.label, StepStatus::Failed(e.to_string())), None)
            }
        }
    }

    /// Build the verification report for a mined wrap.
    pub fn wrap_report(&self, owner: Address, receipt: &TxReceipt) -> TransactionReport {
        let p = &self.pipeline;
        let amount = p.wrap_amount.to_string();
        TransactionReport {
            blockchain_id: p.chain_id,
            from_amount: amount.clone(),
            from_token_address: p.source_token.to_string(),
            from_token_symbol: p.source_symbol.clone(),
            gas_fee_amount: receipt.gas_fee().to_string(),
            gas_fee_token_address: Address::ZERO.to_string(),
            gas_fee_token_symbol: p.native_symbol.clone(),
            hash: receipt.tx_hash.to_string(),
            to_amount: amount,
            to_token_address: p.target.to_string(),
            to_token_symbol: p.target_symbol.clone(),
            kind: WRAP_REPORT_TYPE,
            wallet_address: owner.to_string(),
        }
    }

    async fn report_wrap(&self, owner: Address, receipt: &TxReceipt) {
        let report = self.wrap_report(owner, receipt);
        match self.rewards.report_transaction(&report).await {
            Ok(v) => info!(
                id = %v.id,
                points = v.points_amount,
                "Verification status: {}{}",
                v.status,
                if v.status == 201 { " (OK)" } else { "" }
            ),
            Err(e) => error!(error = %e, "Error verifying transaction"),
        }
    }
}
