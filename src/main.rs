//! Wrap points bot
//!
//! Runs one selected action for every wallet in a key file, against a
//! wrapped-token contract pair and its rewards service.
//!
//! # Architecture Overview
//!
//! ```text
//!   CLI flags / prompts ──▶ RunPlan
//!                              │
//!   key file ──▶ keys ──▶ orchestrator ──(per wallet)──▶ actions::ActionExecutor
//!                              │                               │          │
//!                              │                               ▼          ▼
//!                              │                       blockchain    rewards
//!                              │                       (Ledger)      (Rewards)
//!                              ▼                       JSON-RPC      HTTPS API
//!                    countdown → next cycle
//!                    (auto-restart)
//!
//!   config (TOML) and observability (tracing, Prometheus) cut across all of it.
//! ```

use clap::Parser;
use std::io::Write;
use std::path::PathBuf;

use wrap_points_bot::actions::{ActionExecutor, Pipeline};
use wrap_points_bot::blockchain::{BlockchainClient, ChainLedger};
use wrap_points_bot::config::load_or_default;
use wrap_points_bot::observability::{logging, metrics};
use wrap_points_bot::orchestrator::{collect_plan, Orchestrator, PlanPreset, StdinPrompter};
use wrap_points_bot::rewards::RewardsClient;

#[derive(Parser)]
#[command(name = "wrap-points-bot")]
#[command(about = "Run wrap/unwrap and rewards actions for every wallet in a key file", long_about = None)]
struct Cli {
    /// TOML config file; built-in defaults when missing
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Key file, overriding `run.key_file`
    #[arg(short, long)]
    keys: Option<PathBuf>,

    /// Action number (1-5); prompted when absent
    #[arg(short, long)]
    action: Option<String>,

    /// Wrap transactions per wallet (actions 2 and 5)
    #[arg(short, long)]
    repeat: Option<String>,

    /// Native amount to convert, in ether (action 1)
    #[arg(long)]
    amount: Option<String>,

    /// Restart after every cycle (y/n)
    #[arg(long)]
    auto_restart: Option<String>,

    /// Stop after this many cycles
    #[arg(long)]
    cycles: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_or_default(&cli.config)?;
    logging::init_logging(&config.observability.log_level);

    tracing::info!("wrap-points-bot v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        rpc_url = %config.chain.rpc_url,
        chain_id = config.chain.chain_id,
        rewards = %config.rewards.base_url,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let pipeline = Pipeline::from_config(&config)?;

    let preset = PlanPreset {
        auto_restart: cli.auto_restart,
        action: cli.action,
        amount: cli.amount,
        repeat: cli.repeat,
    };
    let plan = collect_plan(&mut StdinPrompter, &preset, &pipeline)?;

    let client = BlockchainClient::new(config.chain.clone())?;
    if let Err(e) = client.verify_chain_id().await {
        tracing::warn!(error = %e, "Chain ID check failed");
    }
    let ledger = ChainLedger::new(client);
    let rewards = RewardsClient::new(&config.rewards)?;

    let key_file = cli.keys.unwrap_or_else(|| PathBuf::from(&config.run.key_file));
    let orchestrator = Orchestrator::new(
        ActionExecutor::new(ledger, rewards, pipeline),
        key_file,
        config.rewards.referral_code.clone(),
        config.run.auto_restart_delay_secs,
    );

    let cycles = orchestrator
        .run(&plan, cli.cycles, |remaining| {
            print!("\rAuto-restarting in {} seconds...", remaining);
            if let Err(e) = std::io::stdout().flush() {
                tracing::debug!(error = %e, "Failed to flush countdown line");
            }
            if remaining == 0 {
                println!();
            }
        })
        .await?;

    tracing::info!(cycles, "All accounts processed");
    Ok(())
}
