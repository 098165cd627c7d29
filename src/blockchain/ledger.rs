//! The ledger boundary used by the action executor.
//!
//! `ChainLedger` is the JSON-RPC implementation; tests substitute in-memory
//! fakes.

use alloy::primitives::{Address, U256};
use async_trait::async_trait;

use crate::blockchain::client::BlockchainClient;
use crate::blockchain::contracts::{allowance_call, balance_of_call, decode_uint};
use crate::blockchain::transaction::TxBuilder;
use crate::blockchain::types::{BlockchainResult, TxIntent, TxReceipt};
use crate::blockchain::wallet::Wallet;

/// Reads and writes the executor needs from the chain.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Native coin balance of `owner`, in wei.
    async fn native_balance(&self, owner: Address) -> BlockchainResult<U256>;

    /// Current gas price, in wei.
    async fn gas_price(&self) -> BlockchainResult<u128>;

    /// ERC-20 allowance granted by `owner` to `spender` on `token`.
    async fn allowance(&self, token: Address, owner: Address, spender: Address) -> BlockchainResult<U256>;

    /// ERC-20 balance of `owner` on `token`.
    async fn token_balance(&self, token: Address, owner: Address) -> BlockchainResult<U256>;

    /// Sign `intent` with `wallet`, broadcast it and wait for the receipt.
    async fn submit(&self, wallet: &Wallet, intent: &TxIntent) -> BlockchainResult<TxReceipt>;
}

/// Ledger backed by a JSON-RPC endpoint.
#[derive(Debug, Clone)]
pub struct ChainLedger {
    client: BlockchainClient,
    builder: TxBuilder,
}

impl ChainLedger {
    pub fn new(client: BlockchainClient) -> Self {
        let builder = TxBuilder::new(client.clone());
        Self { client, builder }
    }
}

#[async_trait]
impl Ledger for ChainLedger {
    async fn native_balance(&self, owner: Address) -> BlockchainResult<U256> {
        self.client.get_balance(owner).await
    }

    async fn gas_price(&self) -> BlockchainResult<u128> {
        self.client.get_gas_price().await
    }

    async fn allowance(&self, token: Address, owner: Address, spender: Address) -> BlockchainResult<U256> {
        let output = self.client.call(token, allowance_call(owner, spender)).await?;
        decode_uint(&output)
    }

    async fn token_balance(&self, token: Address, owner: Address) -> BlockchainResult<U256> {
        let output = self.client.call(token, balance_of_call(owner)).await?;
        decode_uint(&output)
    }

    async fn submit(&self, wallet: &Wallet, intent: &TxIntent) -> BlockchainResult<TxReceipt> {
        self.builder.submit(wallet, intent).await
    }
}
