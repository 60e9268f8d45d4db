//! ERC-20 calls shared by both venues

use super::{confirm, GasSettings, GatewayError};
use crate::contracts::IERC20;
use crate::wallet::TradingWallet;
use alloy::primitives::{Address, TxHash, U256};
use serde::Serialize;

/// Basic token metadata
#[derive(Debug, Clone, Serialize)]
pub struct TokenInfo {
    pub address: Address,
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub total_supply: U256,
}

pub(super) async fn balance_of(token: Address, wallet: &TradingWallet) -> Result<U256, GatewayError> {
    IERC20::new(token, wallet.provider())
        .balanceOf(wallet.address())
        .call()
        .await
        .map_err(GatewayError::from_rpc)
}

pub(super) async fn allowance(
    token: Address,
    spender: Address,
    wallet: &TradingWallet,
) -> Result<U256, GatewayError> {
    IERC20::new(token, wallet.provider())
        .allowance(wallet.address(), spender)
        .call()
        .await
        .map_err(GatewayError::from_rpc)
}

pub(super) async fn approve(
    token: Address,
    spender: Address,
    amount: U256,
    gas: GasSettings,
    wallet: &TradingWallet,
) -> Result<TxHash, GatewayError> {
    let pending = IERC20::new(token, wallet.provider())
        .approve(spender, amount)
        .gas(gas.gas_limit)
        .gas_price(gas.gas_price)
        .send()
        .await
        .map_err(GatewayError::from_rpc)?;
    let tx_hash = confirm(pending).await?;
    tracing::info!(token = %token, spender = %spender, tx = %tx_hash, "Token approved");
    Ok(tx_hash)
}

/// Fetch name, symbol, decimals and total supply
pub async fn token_info(token: Address, wallet: &TradingWallet) -> Result<TokenInfo, GatewayError> {
    let erc20 = IERC20::new(token, wallet.provider());

    let name = erc20.name().call().await.map_err(GatewayError::from_rpc)?;
    let symbol = erc20.symbol().call().await.map_err(GatewayError::from_rpc)?;
    let decimals = erc20.decimals().call().await.map_err(GatewayError::from_rpc)?;
    let total_supply = erc20
        .totalSupply()
        .call()
        .await
        .map_err(GatewayError::from_rpc)?;

    Ok(TokenInfo {
        address: token,
        name,
        symbol,
        decimals,
        total_supply,
    })
}
