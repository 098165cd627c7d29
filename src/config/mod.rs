//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (read & deserialize, defaults fill gaps)
//!     → validation.rs (semantic checks)
//!     → BotConfig (validated, immutable)
//!     → Pipeline / BlockchainClient / RewardsClient built from it
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; a restart cycle reuses it unchanged
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_or_default, ConfigError};
pub use schema::BotConfig;
pub use schema::ChainConfig;
pub use schema::ContractsConfig;
pub use schema::ObservabilityConfig;
pub use schema::RewardsConfig;
pub use schema::RunConfig;
