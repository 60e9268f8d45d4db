//! four.meme bonding-curve venue
//!
//! The factory both launches tokens and sells/buys them along the curve
//! until they graduate to PancakeSwap.

use super::{confirm, erc20, ExchangeGateway, GasSettings, GatewayError, Venue};
use crate::contracts::IFourMemeFactory;
use crate::units::BASE_DECIMALS;
use crate::wallet::TradingWallet;
use alloy::primitives::{Address, Log, TxHash, U256};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Metadata submitted when launching a token
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub name: String,
    pub symbol: String,
    pub description: String,
    pub logo_url: Option<String>,
    pub twitter: Option<String>,
    pub telegram: Option<String>,
    pub website: Option<String>,
}

pub struct BondingCurveGateway {
    factory: Address,
    gas: GasSettings,
}

impl BondingCurveGateway {
    pub fn new(factory: Address, gas: GasSettings) -> Self {
        Self { factory, gas }
    }

    pub fn factory(&self) -> Address {
        self.factory
    }

    /// Create a token and return `(creation tx, token address)`
    pub async fn create_token(
        &self,
        metadata: &TokenMetadata,
        wallet: &TradingWallet,
    ) -> Result<(TxHash, Address), GatewayError> {
        let pending = IFourMemeFactory::new(self.factory, wallet.provider())
            .createToken(
                metadata.name.clone(),
                metadata.symbol.clone(),
                metadata.description.clone(),
                metadata.logo_url.clone().unwrap_or_default(),
            )
            .gas(self.gas.gas_limit)
            .gas_price(self.gas.gas_price)
            .send()
            .await
            .map_err(GatewayError::from_rpc)?;

        let tx_hash = *pending.tx_hash();
        tracing::info!(tx = %tx_hash, "Token creation transaction sent");

        let receipt = pending.get_receipt().await.map_err(GatewayError::from_rpc)?;
        if !receipt.status() {
            return Err(GatewayError::FailedOnChain(tx_hash));
        }

        let token = token_address_from_logs(
            receipt.inner.logs().iter().map(|log| &log.inner),
            self.factory,
        )
        .ok_or_else(|| {
            GatewayError::Decode("no token address in creation receipt logs".to_string())
        })?;

        Ok((tx_hash, token))
    }
}

/// Locate the created token in a factory receipt
///
/// The first log carrying an indexed topic is assumed to hold the token in
/// topic 1. Otherwise the first log emitted by a contract other than the
/// factory is taken to be the token itself.
pub fn token_address_from_logs<'a>(
    logs: impl IntoIterator<Item = &'a Log>,
    factory: Address,
) -> Option<Address> {
    let logs: Vec<&Log> = logs.into_iter().collect();

    if let Some(log) = logs.iter().find(|log| log.data.topics().len() > 1) {
        return Some(Address::from_word(log.data.topics()[1]));
    }

    logs.iter()
        .map(|log| log.address)
        .find(|address| *address != factory)
}

#[async_trait]
impl ExchangeGateway for BondingCurveGateway {
    fn venue(&self) -> Venue {
        Venue::BondingCurve
    }

    fn spender(&self) -> Address {
        self.factory
    }

    async fn unit_price(&self, token: Address, wallet: &TradingWallet) -> Result<U256, GatewayError> {
        let one_token = U256::from(10u64).pow(U256::from(BASE_DECIMALS));
        self.quote_sell(token, one_token, wallet).await
    }

    async fn quote_buy(
        &self,
        token: Address,
        amount_in: U256,
        wallet: &TradingWallet,
    ) -> Result<U256, GatewayError> {
        IFourMemeFactory::new(self.factory, wallet.provider())
            .getBuyQuote(token, amount_in)
            .call()
            .await
            .map_err(GatewayError::from_rpc)
    }

    async fn quote_sell(
        &self,
        token: Address,
        amount_in: U256,
        wallet: &TradingWallet,
    ) -> Result<U256, GatewayError> {
        IFourMemeFactory::new(self.factory, wallet.provider())
            .getSellQuote(token, amount_in)
            .call()
            .await
            .map_err(GatewayError::from_rpc)
    }

    async fn buy(
        &self,
        token: Address,
        amount_in: U256,
        min_out: U256,
        wallet: &TradingWallet,
    ) -> Result<TxHash, GatewayError> {
        let pending = IFourMemeFactory::new(self.factory, wallet.provider())
            .buy(token, min_out)
            .value(amount_in)
            .gas(self.gas.gas_limit)
            .gas_price(self.gas.gas_price)
            .send()
            .await
            .map_err(GatewayError::from_rpc)?;
        confirm(pending).await
    }

    async fn sell(
        &self,
        token: Address,
        amount_in: U256,
        min_out: U256,
        wallet: &TradingWallet,
    ) -> Result<TxHash, GatewayError> {
        let pending = IFourMemeFactory::new(self.factory, wallet.provider())
            .sell(token, amount_in, min_out)
            .gas(self.gas.gas_limit)
            .gas_price(self.gas.gas_price)
            .send()
            .await
            .map_err(GatewayError::from_rpc)?;
        confirm(pending).await
    }

    async fn approve(
        &self,
        token: Address,
        amount: U256,
        wallet: &TradingWallet,
    ) -> Result<TxHash, GatewayError> {
        erc20::approve(token, self.factory, amount, self.gas, wallet).await
    }
}
