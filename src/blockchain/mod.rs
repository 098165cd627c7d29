//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! key file line
//!     → wallet.rs (key parsing, signing)
//!     → contracts.rs (ABI encoding of deposit/approve/wrap/unwrap)
//!     → transaction.rs (build, sign, broadcast, receipt)
//!     → client.rs (RPC connection with timeouts and failover)
//!
//! ledger.rs exposes the whole stack to the executor as one trait.
//! ```
//!
//! # Security Constraints
//! - Never log private keys or sensitive data
//! - All RPC calls have configurable timeouts

pub mod client;
pub mod contracts;
pub mod ledger;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use client::BlockchainClient;
pub use ledger::{ChainLedger, Ledger};
pub use types::{BlockchainError, BlockchainResult, ChainId, TxIntent, TxReceipt};
pub use wallet::Wallet;
