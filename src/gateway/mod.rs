//! Exchange gateways
//!
//! One trait, two venues: the four.meme bonding curve and the PancakeSwap
//! V2 router. Both speak the same ERC-20 approve/allowance/balance calls and
//! differ only in how they quote and swap.

mod amm;
mod bonding_curve;
mod erc20;

pub use amm::AmmGateway;
pub use bonding_curve::{token_address_from_logs, BondingCurveGateway, TokenMetadata};
pub use erc20::{token_info, TokenInfo};

use crate::wallet::TradingWallet;
use alloy::hex;
use alloy::network::Ethereum;
use alloy::primitives::{Address, TxHash, U256};
use alloy::providers::PendingTransactionBuilder;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Seconds added to "now" for AMM swap deadlines
pub const SWAP_DEADLINE_SECS: u64 = 600;

/// Trading venue for a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Venue {
    BondingCurve,
    Amm,
}

impl Venue {
    pub fn name(&self) -> &'static str {
        match self {
            Venue::BondingCurve => "four.meme bonding curve",
            Venue::Amm => "PancakeSwap",
        }
    }
}

impl std::fmt::Display for Venue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Error type for venue calls
#[derive(Debug, Clone, thiserror::Error)]
pub enum GatewayError {
    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("execution reverted: {0}")]
    Reverted(String),

    #[error("transaction {0} reverted on-chain")]
    FailedOnChain(TxHash),

    #[error("unexpected response: {0}")]
    Decode(String),
}

impl GatewayError {
    /// Classify a provider or contract error
    pub fn from_rpc(err: impl std::fmt::Display) -> Self {
        let message = err.to_string();
        if message.contains("execution reverted") {
            GatewayError::Reverted(parse_revert_reason(&message))
        } else {
            GatewayError::Rpc(message)
        }
    }
}

/// Gas settings attached to every state-changing call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GasSettings {
    /// Legacy gas price in wei
    pub gas_price: u128,
    pub gas_limit: u64,
}

/// Venue operations used by the trade executor
///
/// `unit_price` quotes one whole token (10^18 units) in base currency and is
/// what venue detection probes.
#[async_trait]
pub trait ExchangeGateway: Send + Sync {
    fn venue(&self) -> Venue;

    /// Contract that pulls tokens on sells and therefore needs an allowance
    fn spender(&self) -> Address;

    async fn unit_price(&self, token: Address, wallet: &TradingWallet) -> Result<U256, GatewayError>;

    /// Expected tokens out for `amount_in` wei
    async fn quote_buy(
        &self,
        token: Address,
        amount_in: U256,
        wallet: &TradingWallet,
    ) -> Result<U256, GatewayError>;

    /// Expected wei out for `amount_in` tokens
    async fn quote_sell(
        &self,
        token: Address,
        amount_in: U256,
        wallet: &TradingWallet,
    ) -> Result<U256, GatewayError>;

    async fn buy(
        &self,
        token: Address,
        amount_in: U256,
        min_out: U256,
        wallet: &TradingWallet,
    ) -> Result<TxHash, GatewayError>;

    async fn sell(
        &self,
        token: Address,
        amount_in: U256,
        min_out: U256,
        wallet: &TradingWallet,
    ) -> Result<TxHash, GatewayError>;

    async fn token_balance(
        &self,
        token: Address,
        wallet: &TradingWallet,
    ) -> Result<U256, GatewayError> {
        erc20::balance_of(token, wallet).await
    }

    /// Allowance granted by `wallet` to [`ExchangeGateway::spender`]
    async fn allowance(&self, token: Address, wallet: &TradingWallet) -> Result<U256, GatewayError> {
        erc20::allowance(token, self.spender(), wallet).await
    }

    async fn approve(
        &self,
        token: Address,
        amount: U256,
        wallet: &TradingWallet,
    ) -> Result<TxHash, GatewayError>;
}

/// Wait for one confirmation and check the receipt status
pub async fn confirm(pending: PendingTransactionBuilder<Ethereum>) -> Result<TxHash, GatewayError> {
    let tx_hash = *pending.tx_hash();
    tracing::debug!(tx = %tx_hash, "Transaction sent, waiting for confirmation");

    let receipt = pending
        .with_required_confirmations(1)
        .get_receipt()
        .await
        .map_err(GatewayError::from_rpc)?;

    if !receipt.status() {
        return Err(GatewayError::FailedOnChain(tx_hash));
    }
    Ok(tx_hash)
}

/// Unix deadline for AMM swaps
pub(crate) fn swap_deadline() -> U256 {
    let now = chrono::Utc::now().timestamp().max(0) as u64;
    U256::from(now + SWAP_DEADLINE_SECS)
}

/// Parse revert reason from RPC error message
///
/// Falls back to the full message when no reason can be extracted.
fn parse_revert_reason(error: &str) -> String {
    const REVERTED: &str = "execution reverted";

    if let Some(start) = error.find("revert: ") {
        let reason = &error[start + 8..];
        let reason = reason.split('"').next().unwrap_or(reason).trim();
        if !reason.is_empty() {
            return reason.to_string();
        }
    }

    if let Some(start) = error.find("0x08c379a0") {
        // Error(string) selector
        let hex_data = &error[start..];
        let end = hex_data
            .find(|c: char| !c.is_ascii_hexdigit() && c != 'x')
            .unwrap_or(hex_data.len());
        let data = &hex_data[..end];
        if data.len() > 138 {
            if let Ok(decoded) = hex::decode(&data[138..]) {
                let filtered: Vec<u8> = decoded.into_iter().filter(|&b| b != 0).collect();
                if let Ok(s) = String::from_utf8(filtered) {
                    return s;
                }
            }
        }
    }

    if let Some(start) = error.find(REVERTED) {
        let reason = error[start + REVERTED.len()..]
            .trim_start_matches(':')
            .split(", data:")
            .next()
            .unwrap_or_default()
            .trim()
            .trim_matches('"');
        if !reason.is_empty() {
            return reason.to_string();
        }
    }

    error.to_string()
}
