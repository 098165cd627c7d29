//! Cycle loop: keys → wallets → onboarding, action, points → countdown.

use alloy::primitives::Address;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::actions::{ActionExecutor, RunPlan, StepOutcome};
use crate::blockchain::{Ledger, Wallet};
use crate::keys::load_keys;
use crate::orchestrator::{RunError, RunResult};
use crate::rewards::{ReferralOutcome, Rewards};

/// What happened for one wallet in a cycle.
#[derive(Debug, Clone)]
pub struct WalletReport {
    /// 1-based position in the key file.
    pub number: usize,
    pub address: Address,
    pub onboarded: bool,
    pub steps: Vec<StepOutcome>,
    /// Verified points, when the lookup succeeded.
    pub points: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct CycleSummary {
    pub run_id: Uuid,
    pub wallets: Vec<WalletReport>,
    /// Keys that did not yield a wallet.
    pub rejected_keys: usize,
}

/// Drives the executor over every wallet, once or on a restart loop.
pub struct Orchestrator<L, R> {
    executor: ActionExecutor<L, R>,
    key_file: PathBuf,
    referral_code: String,
    restart_delay_secs: u64,
}

impl<L: Ledger, R: Rewards> Orchestrator<L, R> {
    pub fn new(
        executor: ActionExecutor<L, R>,
        key_file: impl Into<PathBuf>,
        referral_code: impl Into<String>,
        restart_delay_secs: u64,
    ) -> Self {
        Self {
            executor,
            key_file: key_file.into(),
            referral_code: referral_code.into(),
            restart_delay_secs,
        }
    }

    pub fn executor(&self) -> &ActionExecutor<L, R> {
        &self.executor
    }

    /// Run cycles until auto-restart is off or `max_cycles` is reached.
    ///
    /// `on_tick` receives the seconds left after each countdown second.
    /// Returns the number of cycles run.
    pub async fn run<F>(&self, plan: &RunPlan, max_cycles: Option<u64>, mut on_tick: F) -> RunResult<u64>
    where
        F: FnMut(u64),
    {
        let mut cycles = 0u64;
        loop {
            let summary = self.run_cycle(plan).await?;
            cycles += 1;
            info!(
                run_id = %summary.run_id,
                wallets = summary.wallets.len(),
                rejected_keys = summary.rejected_keys,
                "Cycle complete"
            );

            if !plan.auto_restart || max_cycles.is_some_and(|max| cycles >= max) {
                return Ok(cycles);
            }
            self.countdown(&mut on_tick).await;
        }
    }

    /// One pass over every key in the key file.
    pub async fn run_cycle(&self, plan: &RunPlan) -> RunResult<CycleSummary> {
        let run_id = Uuid::new_v4();
        let span = info_span!("cycle", %run_id, action = %plan.action);

        async move {
            let keys = load_keys(&self.key_file)?;
            let chain_id = self.executor.pipeline().chain_id;
            let mut summary = CycleSummary {
                run_id,
                wallets: Vec::with_capacity(keys.len()),
                rejected_keys: 0,
            };

            for (index, key) in keys.iter().enumerate() {
                let number = index + 1;
                let wallet = match Wallet::from_private_key(key, chain_id) {
                    Ok(w) => w,
                    Err(e) => {
                        error!(wallet = number, error = %e, "Skipping key");
                        summary.rejected_keys += 1;
                        continue;
                    }
                };

                let span = info_span!("wallet", wallet = number, address = %wallet.address());
                let report = self.process_wallet(number, &wallet, plan).instrument(span).await;
                summary.wallets.push(report);
            }

            Ok::<_, RunError>(summary)
        }
        .instrument(span)
        .await
    }

    async fn process_wallet(&self, number: usize, wallet: &Wallet, plan: &RunPlan) -> WalletReport {
        info!("Processing transactions for account {}", wallet.address());

        // With auto-restart only the first wallet of a cycle is onboarded.
        let onboarded = !plan.auto_restart || number == 1;
        if onboarded {
            self.onboard(wallet.address()).await;
        }

        let steps = self.executor.execute(wallet, plan).await;

        let points = match self.executor.rewards().points(wallet.address()).await {
            Ok(points) => {
                info!("Verified points: {}", points);
                Some(points)
            }
            Err(e) => {
                error!(error = %e, "Error fetching verified points");
                None
            }
        };

        WalletReport {
            number,
            address: wallet.address(),
            onboarded,
            steps,
            points,
        }
    }

    /// Identity check, referral registration and one-time reward. Best effort.
    async fn onboard(&self, address: Address) {
        let rewards = self.executor.rewards();

        if let Err(e) = rewards.verify_identity(address).await {
            warn!(error = %e, "Identity check failed");
        }

        match rewards.register_referral(address, &self.referral_code).await {
            Ok(ReferralOutcome::Registered) => {
                info!(code = %self.referral_code, "Wallet registered with referral code")
            }
            Ok(ReferralOutcome::AlreadyReferred) => info!("Wallet already referred"),
            Err(e) => error!(error = %e, "Error registering referral"),
        }

        match rewards.claim_one_time_reward(address).await {
            Ok(()) => info!("One-time reward claimed"),
            Err(e) => warn!(error = %e, "One-time reward claim failed"),
        }
    }

    /// Waits at least one second between cycles.
    async fn countdown<F: FnMut(u64)>(&self, on_tick: &mut F) {
        let delay = self.restart_delay_secs.max(1);
        info!("Auto-restarting in {} seconds...", delay);
        for remaining in (0..delay).rev() {
            tokio::time::sleep(Duration::from_secs(1)).await;
            on_tick(remaining);
        }
    }
}
