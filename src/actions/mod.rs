//! Action execution subsystem.
//!
//! # Data Flow
//! ```text
//! RunPlan (action, repeat count, amount)
//!     → executor.rs (balance check → TxIntent → Ledger::submit)
//!     → Rewards (wrap verification, daily check-in)
//!     → StepOutcome per step
//! ```
//!
//! # Design Decisions
//! - Steps never propagate errors; failures become `StepStatus::Failed`
//! - No retries; a failed step is logged and the sequence moves on

pub mod executor;
pub mod types;

pub use executor::{is_balance_sufficient, ActionExecutor};
pub use types::{Action, InvalidAction, Pipeline, RunPlan, SkipReason, StepOutcome, StepStatus};
