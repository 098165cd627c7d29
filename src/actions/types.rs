//! Action selection, run plan and step outcomes.

use alloy::primitives::{Address, TxHash, U256};
use std::fmt;
use std::str::FromStr;

use crate::blockchain::types::parse_amount;
use crate::config::validation::ValidationError;
use crate::config::{BotConfig, ConfigError};

/// The five user-selectable action sequences, menu numbers 1..=5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    ConvertNativeToWrapped,
    WrapToTarget,
    UnwrapAll,
    ClaimDailyReward,
    RunAll,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::ConvertNativeToWrapped,
        Action::WrapToTarget,
        Action::UnwrapAll,
        Action::ClaimDailyReward,
        Action::RunAll,
    ];

    pub fn menu_number(self) -> u8 {
        match self {
            Action::ConvertNativeToWrapped => 1,
            Action::WrapToTarget => 2,
            Action::UnwrapAll => 3,
            Action::ClaimDailyReward => 4,
            Action::RunAll => 5,
        }
    }

    /// Menu line text, using the pipeline's token symbols.
    pub fn menu_label(self, pipeline: &Pipeline) -> String {
        match self {
            Action::ConvertNativeToWrapped => {
                format!("Convert {} to {}", pipeline.native_symbol, pipeline.source_symbol)
            }
            Action::WrapToTarget => {
                format!("Wrap {} to {}", pipeline.source_symbol, pipeline.target_symbol)
            }
            Action::UnwrapAll => format!("Unwrap all {}", pipeline.target_symbol),
            Action::ClaimDailyReward => "Claim Daily Reward".to_string(),
            Action::RunAll => "Execute options 2, 3, and 4 sequentially".to_string(),
        }
    }

    /// Whether the action needs a native amount (convert only).
    pub fn needs_amount(self) -> bool {
        matches!(self, Action::ConvertNativeToWrapped)
    }

    /// Whether the action needs a repeat count (wrap and run-all).
    pub fn needs_repeat_count(self) -> bool {
        matches!(self, Action::WrapToTarget | Action::RunAll)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::ConvertNativeToWrapped => "convert",
            Action::WrapToTarget => "wrap",
            Action::UnwrapAll => "unwrap",
            Action::ClaimDailyReward => "claim",
            Action::RunAll => "run-all",
        };
        f.write_str(name)
    }
}

/// Menu input that is not one of 1..=5.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid choice '{0}'. Please enter \"1\", \"2\", \"3\", \"4\", or \"5\".")]
pub struct InvalidAction(pub String);

impl FromStr for Action {
    type Err = InvalidAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let choice = s.trim();
        Action::ALL
            .into_iter()
            .find(|action| choice == action.menu_number().to_string())
            .ok_or_else(|| InvalidAction(choice.to_string()))
    }
}

/// Parameters fixed for a whole process run, across all cycles and wallets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPlan {
    pub action: Action,
    /// Wrap iterations per wallet (wrap and run-all).
    pub repeat_count: u32,
    /// Native amount in wei (convert).
    pub native_amount: U256,
    pub auto_restart: bool,
}

impl RunPlan {
    pub fn new(action: Action) -> Self {
        Self {
            action,
            repeat_count: 1,
            native_amount: U256::ZERO,
            auto_restart: false,
        }
    }
}

/// Resolved addresses and symbols of the wrap pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipeline {
    pub chain_id: u64,
    pub native_wrapper: Address,
    pub source_token: Address,
    pub spender: Address,
    pub target: Address,
    pub native_symbol: String,
    pub source_symbol: String,
    pub target_symbol: String,
    /// Fixed amount moved by every `wrap`, in wei.
    pub wrap_amount: U256,
}

impl Pipeline {
    pub fn from_config(config: &BotConfig) -> Result<Self, ConfigError> {
        let contracts = &config.contracts;
        let mut errors = Vec::new();

        let mut address = |field: &str, value: &str| match value.parse::<Address>() {
            Ok(a) => a,
            Err(_) => {
                errors.push(ValidationError::new(field, format!("invalid address '{}'", value)));
                Address::ZERO
            }
        };
        let native_wrapper = address("contracts.native_wrapper", &contracts.native_wrapper);
        let source_token = address("contracts.source_token", &contracts.source_token);
        let spender = address("contracts.spender", &contracts.spender);
        let target = address("contracts.target", &contracts.target);

        let wrap_amount = parse_amount(&config.run.amount_to_wrap).unwrap_or_else(|e| {
            errors.push(ValidationError::new("run.amount_to_wrap", e));
            U256::ZERO
        });

        if !errors.is_empty() {
            return Err(ConfigError::Validation(errors));
        }

        Ok(Self {
            chain_id: config.chain.chain_id,
            native_wrapper,
            source_token,
            spender,
            target,
            native_symbol: contracts.native_symbol.clone(),
            source_symbol: contracts.source_symbol.clone(),
            target_symbol: contracts.target_symbol.clone(),
            wrap_amount,
        })
    }
}

/// Why a step did not submit anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Native balance below required amount plus estimated gas.
    InsufficientBalance,
    /// Balance or gas price could not be read.
    BalanceUnavailable,
    /// Existing allowance already covers the wrap amount.
    AllowanceSufficient,
    /// Nothing wrapped to unwrap.
    NothingToUnwrap,
}

impl SkipReason {
    pub fn as_str(self) -> &'static str {
        match self {
            SkipReason::InsufficientBalance => "insufficient_balance",
            SkipReason::BalanceUnavailable => "balance_unavailable",
            SkipReason::AllowanceSufficient => "allowance_sufficient",
            SkipReason::NothingToUnwrap => "nothing_to_unwrap",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepStatus {
    /// A transaction was mined.
    Submitted(TxHash),
    /// An off-chain call succeeded.
    Completed,
    Skipped(SkipReason),
    Failed(String),
}

/// What happened in one step of an action sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    /// Step name: "deposit", "approve", "wrap", "unwrap" or "check_in".
    pub step: &'static str,
    pub status: StepStatus,
}

impl StepOutcome {
    pub fn new(step: &'static str, status: StepStatus) -> Self {
        Self { step, status }
    }

    pub fn is_submitted(&self) -> bool {
        matches!(self.status, StepStatus::Submitted(_))
    }
}
