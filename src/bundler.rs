//! Ordered multi-transaction bundles
//!
//! A bundle is a list of raw calls sent one after another from a single
//! signer. Each call is confirmed before the next one is signed. The first
//! failure aborts the rest; calls that already landed are not rolled back.

use crate::gateway::GatewayError;
use crate::wallet::TradingWallet;
use crate::{Error, Result};
use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, TxHash, U256};
use alloy::rpc::types::TransactionRequest;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Gas limit used when an entry does not declare one
pub const DEFAULT_BUNDLE_GAS_LIMIT: u64 = 500_000;

fn default_gas_limit() -> u64 {
    DEFAULT_BUNDLE_GAS_LIMIT
}

/// One call in a bundle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleTransaction {
    /// Target address, checked by [`TransactionBundler::validate`]
    pub to: String,
    #[serde(default)]
    pub data: Bytes,
    #[serde(default)]
    pub value: U256,
    #[serde(default = "default_gas_limit")]
    pub gas_limit: u64,
}

impl BundleTransaction {
    pub fn new(to: impl Into<String>, data: Bytes) -> Self {
        Self {
            to: to.into(),
            data,
            value: U256::ZERO,
            gas_limit: DEFAULT_BUNDLE_GAS_LIMIT,
        }
    }

    pub fn with_value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }

    pub fn with_gas_limit(mut self, gas_limit: u64) -> Self {
        self.gas_limit = gas_limit;
        self
    }

    fn target(&self) -> Option<Address> {
        self.to.trim().parse().ok()
    }

    fn request(&self, to: Address, gas_price: u128) -> TransactionRequest {
        TransactionRequest::default()
            .with_to(to)
            .with_input(self.data.clone())
            .with_value(self.value)
            .with_gas_limit(self.gas_limit)
            .with_gas_price(gas_price)
    }
}

/// Load a JSON array of bundle entries
pub fn load_bundle(path: &Path) -> Result<Vec<BundleTransaction>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
    Ok(serde_json::from_str(&content)?)
}

/// Signs and submits raw transactions
#[async_trait]
pub trait TransactionSender: Send + Sync {
    fn address(&self) -> Address;

    /// Submit and wait for one confirmation
    async fn send_and_confirm(&self, tx: TransactionRequest) -> std::result::Result<TxHash, GatewayError>;

    async fn estimate_gas(&self, tx: TransactionRequest) -> std::result::Result<u64, GatewayError>;
}

#[async_trait]
impl TransactionSender for TradingWallet {
    fn address(&self) -> Address {
        TradingWallet::address(self)
    }

    async fn send_and_confirm(&self, tx: TransactionRequest) -> std::result::Result<TxHash, GatewayError> {
        TradingWallet::send_and_confirm(self, tx).await
    }

    async fn estimate_gas(&self, tx: TransactionRequest) -> std::result::Result<u64, GatewayError> {
        TradingWallet::estimate_gas(self, tx).await
    }
}

pub struct TransactionBundler<'a, S: TransactionSender + ?Sized> {
    sender: &'a S,
    gas_price: u128,
}

impl<'a, S: TransactionSender + ?Sized> TransactionBundler<'a, S> {
    pub fn new(sender: &'a S, gas_price: u128) -> Self {
        Self { sender, gas_price }
    }

    /// Reject empty bundles and malformed targets
    ///
    /// Empty calldata is allowed (plain value transfer) but logged.
    pub fn validate(&self, txs: &[BundleTransaction]) -> Result<()> {
        if txs.is_empty() {
            return Err(Error::InvalidArgument("Bundle is empty".to_string()));
        }

        for (index, tx) in txs.iter().enumerate() {
            if tx.target().is_none() {
                return Err(Error::InvalidArgument(format!(
                    "Bundle entry {} has an invalid target address: {:?}",
                    index, tx.to
                )));
            }
            if tx.data.is_empty() {
                tracing::warn!(index, to = %tx.to, "Bundle entry has empty calldata");
            }
        }

        Ok(())
    }

    /// Sum of per-entry estimates
    ///
    /// An entry whose estimate fails contributes its declared gas limit.
    pub async fn estimate_gas(&self, txs: &[BundleTransaction]) -> u64 {
        let mut total: u64 = 0;

        for (index, tx) in txs.iter().enumerate() {
            let estimate = match tx.target() {
                Some(to) => self
                    .sender
                    .estimate_gas(tx.request(to, self.gas_price))
                    .await
                    .map_err(|e| e.to_string()),
                None => Err("invalid target address".to_string()),
            };

            let gas = estimate.unwrap_or_else(|reason| {
                tracing::warn!(
                    index,
                    reason = %reason,
                    fallback = tx.gas_limit,
                    "Gas estimation failed, using declared limit"
                );
                tx.gas_limit
            });
            total = total.saturating_add(gas);
        }

        total
    }

    /// Submit every entry in order, each confirmed before the next
    pub async fn execute(&self, txs: &[BundleTransaction]) -> Result<Vec<TxHash>> {
        self.validate(txs)?;

        tracing::info!(
            sender = %self.sender.address(),
            transactions = txs.len(),
            "Executing bundle"
        );

        let mut hashes = Vec::with_capacity(txs.len());
        for (index, tx) in txs.iter().enumerate() {
            let to = tx.target().ok_or_else(|| Error::BundleFailed {
                index,
                reason: format!("invalid target address {:?}", tx.to),
            })?;

            match self.sender.send_and_confirm(tx.request(to, self.gas_price)).await {
                Ok(hash) => {
                    tracing::info!(index, tx = %hash, "Bundle transaction confirmed");
                    hashes.push(hash);
                }
                Err(e) => {
                    tracing::error!(
                        index,
                        completed = hashes.len(),
                        error = %e,
                        "Bundle transaction failed, aborting remaining entries"
                    );
                    return Err(Error::BundleFailed {
                        index,
                        reason: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(transactions = hashes.len(), "Bundle executed");
        Ok(hashes)
    }
}
