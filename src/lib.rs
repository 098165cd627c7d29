//! Multi-wallet wrap/unwrap bot for an on-chain points program.

pub mod actions;
pub mod blockchain;
pub mod config;
pub mod inspect;
pub mod keys;
pub mod observability;
pub mod orchestrator;
pub mod rewards;

pub use actions::{ActionExecutor, Pipeline, RunPlan};
pub use config::schema::BotConfig;
pub use orchestrator::Orchestrator;
