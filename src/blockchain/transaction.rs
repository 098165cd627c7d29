//! Transaction building, signing, and receipt monitoring.
//!
//! # Responsibilities
//! - Build legacy transactions with fixed gas limits
//! - Sign and broadcast transactions
//! - Poll for the receipt and reject reverted transactions

use alloy::network::TransactionBuilder;
use alloy::primitives::TxHash;
use alloy::rpc::types::TransactionRequest;
use std::time::Duration;
use tokio::time::{interval, timeout};

use crate::blockchain::client::BlockchainClient;
use crate::blockchain::types::{BlockchainError, BlockchainResult, TxIntent, TxReceipt};
use crate::blockchain::wallet::Wallet;

/// Transaction builder bound to one RPC client.
#[derive(Debug, Clone)]
pub struct TxBuilder {
    client: BlockchainClient,
}

impl TxBuilder {
    /// Create a new transaction builder.
    pub fn new(client: BlockchainClient) -> Self {
        Self { client }
    }

    /// Build a transaction request for `intent`, signed later by `wallet`.
    pub async fn build(&self, wallet: &Wallet, intent: &TxIntent) -> BlockchainResult<TransactionRequest> {
        // Get current nonce from chain and sync wallet
        let chain_nonce = self.client.get_transaction_count(wallet.address()).await?;
        wallet.set_nonce(chain_nonce);

        // Get gas price
        let gas_price = self.client.get_gas_price().await?;
        let gas_price_gwei = gas_price / 1_000_000_000;

        // Check against max gas price
        let config = self.client.config();
        if gas_price_gwei > config.max_gas_price_gwei as u128 {
            return Err(BlockchainError::GasPriceTooHigh {
                current_gwei: gas_price_gwei as u64,
                max_gwei: config.max_gas_price_gwei,
            });
        }

        let adjusted_gas_price = (gas_price as f64 * config.gas_price_multiplier) as u128;

        let nonce = wallet.get_and_increment_nonce();

        let tx = TransactionRequest::default()
            .with_from(wallet.address())
            .with_to(intent.to)
            .with_value(intent.value)
            .with_input(intent.data.clone())
            .with_nonce(nonce)
            .with_gas_price(adjusted_gas_price)
            .with_chain_id(wallet.chain_id())
            .with_gas_limit(intent.gas_limit);

        Ok(tx)
    }

    /// Build, sign and broadcast `intent`, then wait for its receipt.
    pub async fn submit(&self, wallet: &Wallet, intent: &TxIntent) -> BlockchainResult<TxReceipt> {
        let request = self.build(wallet, intent).await?;
        let envelope = wallet.sign_transaction(request).await?;
        let tx_hash = self.client.send_transaction(envelope).await?;

        tracing::debug!(tx_hash = %tx_hash, label = intent.label, "Transaction broadcast");

        let config = self.client.config();
        self.wait_for_receipt(
            tx_hash,
            config.receipt_timeout_secs,
            Duration::from_millis(config.receipt_poll_interval_ms),
        )
        .await
    }

    /// Wait for a transaction to be mined with the configured confirmation depth.
    ///
    /// # Arguments
    /// * `tx_hash` - Transaction hash to monitor
    /// * `timeout_secs` - Maximum time to wait for the receipt
    /// * `poll_interval` - Delay between receipt queries
    pub async fn wait_for_receipt(
        &self,
        tx_hash: TxHash,
        timeout_secs: u64,
        poll_interval: Duration,
    ) -> BlockchainResult<TxReceipt> {
        let required_confirmations = self.client.confirmation_blocks();

        let result = timeout(Duration::from_secs(timeout_secs), async {
            let mut ticker = interval(poll_interval);

            loop {
                ticker.tick().await;

                let receipt = match self.client.get_transaction_receipt(tx_hash).await {
                    Ok(Some(r)) => r,
                    Ok(None) => {
                        tracing::debug!(tx_hash = %tx_hash, "Transaction pending");
                        continue;
                    }
                    Err(e) => {
                        tracing::debug!(tx_hash = %tx_hash, error = %e, "Receipt query failed, polling again");
                        continue;
                    }
                };

                if !receipt.status() {
                    return Err(BlockchainError::Reverted(tx_hash));
                }

                if required_confirmations > 0 {
                    let current_block = self.client.get_block_number().await?;
                    let tx_block = receipt.block_number.unwrap_or(current_block);
                    let confirmations = current_block.saturating_sub(tx_block) as u32;

                    if confirmations < required_confirmations {
                        tracing::debug!(
                            tx_hash = %tx_hash,
                            confirmations = confirmations,
                            required = required_confirmations,
                            "Waiting for confirmations"
                        );
                        continue;
                    }
                }

                return Ok(TxReceipt {
                    tx_hash: receipt.transaction_hash,
                    gas_used: receipt.gas_used,
                    effective_gas_price: receipt.effective_gas_price,
                });
            }
        })
        .await;

        match result {
            Ok(receipt) => receipt,
            Err(_) => Err(BlockchainError::ConfirmationTimeout {
                tx_hash,
                secs: timeout_secs,
            }),
        }
    }
}
