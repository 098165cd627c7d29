//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the bot.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the bot.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct BotConfig {
    /// JSON-RPC connection and gas settings.
    pub chain: ChainConfig,

    /// Contract addresses and token symbols of the wrap pipeline.
    pub contracts: ContractsConfig,

    /// Rewards service endpoints.
    pub rewards: RewardsConfig,

    /// Per-run parameters (wrap amount, restart delay, key file).
    pub run: RunConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Blockchain connection configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ChainConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Failover JSON-RPC endpoint URLs, tried in order for reads.
    pub failover_urls: Vec<String>,

    /// Chain ID used for EIP-155 signing and transaction reports.
    pub chain_id: u64,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// Maximum time to wait for a receipt after broadcast.
    pub receipt_timeout_secs: u64,

    /// Receipt polling interval in milliseconds.
    pub receipt_poll_interval_ms: u64,

    /// Blocks on top of the inclusion block before a receipt is accepted.
    pub confirmation_blocks: u32,

    /// Gas price multiplier (1.0 = node price, 1.2 = 20% buffer).
    pub gas_price_multiplier: f64,

    /// Maximum gas price in gwei (protection against spikes).
    pub max_gas_price_gwei: u64,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            rpc_url: "https://polygon-rpc.com".to_string(),
            failover_urls: Vec::new(),
            chain_id: 137,
            rpc_timeout_secs: 10,
            receipt_timeout_secs: 120,
            receipt_poll_interval_ms: 2000,
            confirmation_blocks: 0,
            gas_price_multiplier: 1.0,
            max_gas_price_gwei: 2000,
        }
    }
}

/// Contract addresses taking part in the wrap pipeline.
///
/// `source_token` is the ERC-20 approved to `spender` and wrapped into
/// `target`. On the plain Polygon route it is the native wrapper itself;
/// the stable-token route points it at a different token and uses the
/// target wrapper as spender.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ContractsConfig {
    /// Wrapped-native contract exposing `deposit()`.
    pub native_wrapper: String,

    /// ERC-20 token spent by `wrap`.
    pub source_token: String,

    /// Symbol of `source_token` as reported to the rewards service.
    pub source_symbol: String,

    /// Address allowed to move `source_token`.
    pub spender: String,

    /// Target wrapper contract exposing `wrap`/`unwrap`/`balanceOf`.
    pub target: String,

    /// Symbol of the target wrapper token.
    pub target_symbol: String,

    /// Symbol of the chain's native coin (gas token).
    pub native_symbol: String,
}

impl Default for ContractsConfig {
    fn default() -> Self {
        Self {
            native_wrapper: "0x0d500B1d8E8eF31E21C99d1Db9A6444d3ADf1270".to_string(),
            source_token: "0x0d500B1d8E8eF31E21C99d1Db9A6444d3ADf1270".to_string(),
            source_symbol: "WPOL".to_string(),
            spender: "0x000000000022D473030F116dDEE9F6B43aC78BA3".to_string(),
            target: "0x1Cd0cd01c8C902AdAb3430ae04b9ea32CB309CF1".to_string(),
            target_symbol: "tPOL".to_string(),
            native_symbol: "POL".to_string(),
        }
    }
}

/// Rewards service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RewardsConfig {
    /// Base URL of the rewards API (no trailing slash needed).
    pub base_url: String,

    /// Identity lookup endpoint; the wallet address is appended.
    pub identity_url: String,

    /// Project ID sent with identity lookups.
    pub identity_project_id: String,

    /// Referral code registered for every onboarded wallet.
    pub referral_code: String,

    /// Origin/Referer presented to the rewards API.
    pub app_origin: String,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for RewardsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.tea-fi.com".to_string(),
            identity_url: "https://rpc.walletconnect.org/v1/identity".to_string(),
            identity_project_id: "c4c07616f2ce534e3f61779c51f3d3aa".to_string(),
            referral_code: "qaikt6".to_string(),
            app_origin: "https://app.tea-fi.com".to_string(),
            request_timeout_secs: 10,
        }
    }
}

/// Run parameters.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RunConfig {
    /// Amount wrapped per transaction, in ether units (e.g. "0.01").
    pub amount_to_wrap: String,

    /// Delay before an auto-restart cycle, in seconds.
    pub auto_restart_delay_secs: u64,

    /// File holding one private key per line.
    pub key_file: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            amount_to_wrap: "0.01".to_string(),
            auto_restart_delay_secs: 3600,
            key_file: "priv.txt".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
