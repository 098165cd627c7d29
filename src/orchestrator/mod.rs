//! Run orchestration.
//!
//! # Data Flow
//! ```text
//! CLI flags / prompts
//!     → prompt.rs (RunPlan, validated once)
//!     → runner.rs (load keys → per-wallet onboarding, action, points)
//!     → countdown → next cycle (auto-restart only)
//! ```
//!
//! # Design Decisions
//! - Invalid input is fatal; there is no re-prompt
//! - Keys are re-read at the start of every cycle

pub mod prompt;
pub mod runner;

pub use prompt::{collect_plan, PlanPreset, Prompter, StdinPrompter};
pub use runner::{CycleSummary, Orchestrator, WalletReport};

use crate::actions::InvalidAction;
use crate::config::ConfigError;
use crate::keys::KeyError;

/// Errors that end the run.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("{0}")]
    InvalidInput(String),

    #[error(transparent)]
    Keys(#[from] KeyError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<InvalidAction> for RunError {
    fn from(e: InvalidAction) -> Self {
        RunError::InvalidInput(e.to_string())
    }
}

pub type RunResult<T> = Result<T, RunError>;
