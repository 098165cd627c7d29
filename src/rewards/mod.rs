//! Rewards service integration.
//!
//! # Data Flow
//! ```text
//! executor / orchestrator
//!     → Rewards trait (check-in, referral, one-time reward, verification, points)
//!     → client.rs (reqwest + deadline race)
//!     → types.rs (status/body classified into ReferralOutcome / RewardsError)
//! ```
//!
//! # Design Decisions
//! - Error payloads are inspected here only; callers match on enum variants
//! - Requests are never retried

pub mod client;
pub mod headers;
pub mod types;

use alloy::primitives::Address;
use async_trait::async_trait;

pub use client::RewardsClient;
pub use types::{ReferralOutcome, RewardsError, RewardsResult, TransactionReport, Verification};

/// Calls the bot makes against the rewards service.
#[async_trait]
pub trait Rewards: Send + Sync {
    /// Identity lookup performed by the web app before onboarding.
    async fn verify_identity(&self, address: Address) -> RewardsResult<()>;

    /// Register `address` under a referral code.
    async fn register_referral(&self, address: Address, code: &str) -> RewardsResult<ReferralOutcome>;

    /// Claim the one-time onboarding reward.
    async fn claim_one_time_reward(&self, address: Address) -> RewardsResult<()>;

    /// Daily check-in.
    async fn check_in(&self, address: Address) -> RewardsResult<()>;

    /// Report a mined wrap transaction for point verification.
    async fn report_transaction(&self, report: &TransactionReport) -> RewardsResult<Verification>;

    /// Verified (not pending) points of `address`.
    async fn points(&self, address: Address) -> RewardsResult<f64>;
}
