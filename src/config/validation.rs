//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check that URLs and contract addresses parse
//! - Validate value ranges (timeouts > 0, amount > 0, multiplier >= 1)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: BotConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use alloy::primitives::Address;

use crate::blockchain::types::parse_amount;
use crate::config::schema::BotConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: String,
    /// What is wrong with it.
    pub message: String,
}

impl ValidationError {
    pub(crate) fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &BotConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_url(&mut errors, "chain.rpc_url", &config.chain.rpc_url);
    for url in &config.chain.failover_urls {
        check_url(&mut errors, "chain.failover_urls", url);
    }
    if config.chain.rpc_timeout_secs == 0 {
        errors.push(ValidationError::new("chain.rpc_timeout_secs", "must be greater than 0"));
    }
    if config.chain.receipt_timeout_secs == 0 {
        errors.push(ValidationError::new("chain.receipt_timeout_secs", "must be greater than 0"));
    }
    if config.chain.receipt_poll_interval_ms == 0 {
        errors.push(ValidationError::new("chain.receipt_poll_interval_ms", "must be greater than 0"));
    }
    let multiplier = config.chain.gas_price_multiplier;
    if multiplier.is_nan() || multiplier < 1.0 {
        errors.push(ValidationError::new("chain.gas_price_multiplier", "must be at least 1.0"));
    }

    let contracts = &config.contracts;
    check_address(&mut errors, "contracts.native_wrapper", &contracts.native_wrapper);
    check_address(&mut errors, "contracts.source_token", &contracts.source_token);
    check_address(&mut errors, "contracts.spender", &contracts.spender);
    check_address(&mut errors, "contracts.target", &contracts.target);

    check_url(&mut errors, "rewards.base_url", &config.rewards.base_url);
    check_url(&mut errors, "rewards.identity_url", &config.rewards.identity_url);
    if config.rewards.request_timeout_secs == 0 {
        errors.push(ValidationError::new("rewards.request_timeout_secs", "must be greater than 0"));
    }

    if let Err(e) = parse_amount(&config.run.amount_to_wrap) {
        errors.push(ValidationError::new("run.amount_to_wrap", e));
    }
    if config.run.auto_restart_delay_secs == 0 {
        errors.push(ValidationError::new("run.auto_restart_delay_secs", "must be at least 1 second"));
    }
    if config.run.key_file.trim().is_empty() {
        errors.push(ValidationError::new("run.key_file", "must not be empty"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_url(errors: &mut Vec<ValidationError>, field: &str, value: &str) {
    if let Err(e) = url::Url::parse(value) {
        errors.push(ValidationError::new(field, format!("invalid URL '{}': {}", value, e)));
    }
}

fn check_address(errors: &mut Vec<ValidationError>, field: &str, value: &str) {
    if value.parse::<Address>().is_err() {
        errors.push(ValidationError::new(field, format!("invalid address '{}'", value)));
    }
}
