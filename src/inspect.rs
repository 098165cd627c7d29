//! Read-only per-wallet rows for the inspection CLI.
//!
//! Wallet numbers are 1-based positions in the key list, so a key that fails
//! to derive keeps its number and shows up as an `error` row. Read failures
//! are reported inline in the row instead of aborting the listing.

use alloy::primitives::utils::format_ether;
use serde_json::{json, Map, Value};
use tracing::error;

use crate::actions::Pipeline;
use crate::blockchain::{BlockchainResult, Ledger, Wallet};
use crate::rewards::Rewards;

fn derive(keys: &[String], chain_id: u64) -> Vec<(usize, Result<Wallet, Value>)> {
    keys.iter()
        .enumerate()
        .map(|(index, key)| {
            let number = index + 1;
            let wallet = Wallet::from_private_key(key, chain_id).map_err(|e| {
                error!(wallet = number, error = %e, "Skipping key");
                json!({ "wallet": number, "error": e.to_string() })
            });
            (number, wallet)
        })
        .collect()
}

pub fn address_rows(keys: &[String], chain_id: u64) -> Vec<Value> {
    derive(keys, chain_id)
        .into_iter()
        .map(|(number, wallet)| match wallet {
            Ok(w) => json!({ "wallet": number, "address": w.address().to_string() }),
            Err(row) => row,
        })
        .collect()
}

/// Native, source and target balances keyed by their symbols.
pub async fn balance_rows<L: Ledger>(ledger: &L, pipeline: &Pipeline, keys: &[String]) -> Vec<Value> {
    let mut rows = Vec::with_capacity(keys.len());
    for (number, wallet) in derive(keys, pipeline.chain_id) {
        let wallet = match wallet {
            Ok(w) => w,
            Err(row) => {
                rows.push(row);
                continue;
            }
        };

        let mut row = Map::new();
        row.insert("wallet".into(), json!(number));
        row.insert("address".into(), json!(wallet.address().to_string()));
        match read_balances(ledger, pipeline, &wallet).await {
            Ok(balances) => {
                for (symbol, amount) in balances {
                    row.insert(symbol, json!(amount));
                }
            }
            Err(e) => {
                error!(wallet = number, error = %e, "Error reading balances");
                row.insert("error".into(), json!(e.to_string()));
            }
        }
        rows.push(Value::Object(row));
    }
    rows
}

async fn read_balances<L: Ledger>(
    ledger: &L,
    pipeline: &Pipeline,
    wallet: &Wallet,
) -> BlockchainResult<Vec<(String, String)>> {
    let owner = wallet.address();
    let native = ledger.native_balance(owner).await?;
    let source = ledger.token_balance(pipeline.source_token, owner).await?;
    let target = ledger.token_balance(pipeline.target, owner).await?;
    Ok(vec![
        (pipeline.native_symbol.clone(), format_ether(native)),
        (pipeline.source_symbol.clone(), format_ether(source)),
        (pipeline.target_symbol.clone(), format_ether(target)),
    ])
}

pub async fn points_rows<R: Rewards>(rewards: &R, chain_id: u64, keys: &[String]) -> Vec<Value> {
    let mut rows = Vec::with_capacity(keys.len());
    for (number, wallet) in derive(keys, chain_id) {
        let wallet = match wallet {
            Ok(w) => w,
            Err(row) => {
                rows.push(row);
                continue;
            }
        };

        let points = match rewards.points(wallet.address()).await {
            Ok(p) => json!(p),
            Err(e) => json!({ "error": e.to_string() }),
        };
        rows.push(json!({ "wallet": number, "address": wallet.address().to_string(), "points": points }));
    }
    rows
}
