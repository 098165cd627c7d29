use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;

use wrap_points_bot::actions::Pipeline;
use wrap_points_bot::blockchain::{BlockchainClient, ChainLedger};
use wrap_points_bot::config::load_or_default;
use wrap_points_bot::inspect;
use wrap_points_bot::keys::load_keys;
use wrap_points_bot::rewards::RewardsClient;

#[derive(Parser)]
#[command(name = "bot-cli")]
#[command(about = "Read-only inspection of the bot's wallets", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    #[arg(short, long)]
    keys: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List wallet addresses derived from the key file
    Addresses,
    /// Native, source token and target balances per wallet
    Balances,
    /// Verified rewards points per wallet
    Points,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_or_default(&cli.config)?;
    let pipeline = Pipeline::from_config(&config)?;

    let key_file = cli.keys.unwrap_or_else(|| PathBuf::from(&config.run.key_file));
    let keys = load_keys(&key_file)?;

    let rows: Vec<Value> = match cli.command {
        Commands::Addresses => inspect::address_rows(&keys, pipeline.chain_id),
        Commands::Balances => {
            let ledger = ChainLedger::new(BlockchainClient::new(config.chain.clone())?);
            inspect::balance_rows(&ledger, &pipeline, &keys).await
        }
        Commands::Points => {
            let rewards = RewardsClient::new(&config.rewards)?;
            inspect::points_rows(&rewards, pipeline.chain_id, &keys).await
        }
    };

    println!("{}", serde_json::to_string_pretty(&rows)?);
    Ok(())
}
