//! Chain-specific types and error definitions.

use alloy::primitives::utils::parse_ether;
use alloy::primitives::{Address, Bytes, TxHash, U256};
use thiserror::Error;

pub use crate::config::schema::ChainConfig;

/// Chain ID type for strong typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(pub u64);

/// Errors that can occur during blockchain operations.
#[derive(Debug, Error)]
pub enum BlockchainError {
    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// No receipt appeared within the receipt deadline.
    #[error("Transaction {tx_hash} not confirmed after {secs} seconds")]
    ConfirmationTimeout { tx_hash: TxHash, secs: u64 },

    /// Transaction was reverted on-chain.
    #[error("Transaction reverted: {0}")]
    Reverted(TxHash),

    /// Invalid private key format or signing error.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// Gas price exceeded maximum allowed.
    #[error("Gas price {current_gwei} gwei exceeds maximum {max_gwei} gwei")]
    GasPriceTooHigh { current_gwei: u64, max_gwei: u64 },

    /// Nonce management error.
    #[error("Nonce error: {0}")]
    Nonce(String),

    /// Chain configuration mismatch.
    #[error("Chain ID mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: u64, actual: u64 },

    /// Contract return data could not be decoded.
    #[error("Contract error: {0}")]
    Contract(String),
}

/// Result type for blockchain operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;

/// A pending contract call: built per step, submitted once, then dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxIntent {
    /// Short name used in logs and metrics ("approve", "wrap", ...).
    pub label: &'static str,
    /// Contract receiving the call.
    pub to: Address,
    /// ABI-encoded call data.
    pub data: Bytes,
    /// Native value attached to the call.
    pub value: U256,
    /// Fixed gas limit for this kind of call.
    pub gas_limit: u64,
}

/// The parts of a mined receipt the bot cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxReceipt {
    pub tx_hash: TxHash,
    pub gas_used: u64,
    pub effective_gas_price: u128,
}

impl TxReceipt {
    /// Gas fee actually paid, in wei.
    pub fn gas_fee(&self) -> U256 {
        U256::from(self.gas_used) * U256::from(self.effective_gas_price)
    }
}

/// Parse a positive decimal amount in ether units into wei.
pub fn parse_amount(value: &str) -> Result<U256, String> {
    let value = value.trim();
    if value.starts_with('-') {
        return Err("must be positive".to_string());
    }
    let amount = parse_ether(value).map_err(|e| format!("invalid amount '{}': {}", value, e))?;
    if amount.is_zero() {
        return Err("must be positive".to_string());
    }
    Ok(amount)
}
