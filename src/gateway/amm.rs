//! PancakeSwap V2 router venue
//!
//! Used for tokens that have graduated from the bonding curve into a pool.
//! Buys route `[WBNB, token]`, sells route `[token, WBNB]`.

use super::{confirm, erc20, swap_deadline, ExchangeGateway, GasSettings, GatewayError, Venue};
use crate::contracts::IPancakeRouter;
use crate::units::BASE_DECIMALS;
use crate::wallet::TradingWallet;
use alloy::primitives::{Address, TxHash, U256};
use async_trait::async_trait;

pub struct AmmGateway {
    router: Address,
    wbnb: Address,
    gas: GasSettings,
}

impl AmmGateway {
    pub fn new(router: Address, wbnb: Address, gas: GasSettings) -> Self {
        Self { router, wbnb, gas }
    }

    async fn amount_out(
        &self,
        amount_in: U256,
        path: Vec<Address>,
        wallet: &TradingWallet,
    ) -> Result<U256, GatewayError> {
        let amounts = IPancakeRouter::new(self.router, wallet.provider())
            .getAmountsOut(amount_in, path)
            .call()
            .await
            .map_err(GatewayError::from_rpc)?;

        amounts
            .last()
            .copied()
            .ok_or_else(|| GatewayError::Decode("getAmountsOut returned no amounts".to_string()))
    }
}

#[async_trait]
impl ExchangeGateway for AmmGateway {
    fn venue(&self) -> Venue {
        Venue::Amm
    }

    fn spender(&self) -> Address {
        self.router
    }

    async fn unit_price(&self, token: Address, wallet: &TradingWallet) -> Result<U256, GatewayError> {
        let one_token = U256::from(10u64).pow(U256::from(BASE_DECIMALS));
        self.amount_out(one_token, vec![token, self.wbnb], wallet).await
    }

    async fn quote_buy(
        &self,
        token: Address,
        amount_in: U256,
        wallet: &TradingWallet,
    ) -> Result<U256, GatewayError> {
        self.amount_out(amount_in, vec![self.wbnb, token], wallet).await
    }

    async fn quote_sell(
        &self,
        token: Address,
        amount_in: U256,
        wallet: &TradingWallet,
    ) -> Result<U256, GatewayError> {
        self.amount_out(amount_in, vec![token, self.wbnb], wallet).await
    }

    async fn buy(
        &self,
        token: Address,
        amount_in: U256,
        min_out: U256,
        wallet: &TradingWallet,
    ) -> Result<TxHash, GatewayError> {
        let pending = IPancakeRouter::new(self.router, wallet.provider())
            .swapExactETHForTokens(min_out, vec![self.wbnb, token], wallet.address(), swap_deadline())
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
        let pending = IPancakeRouter::new(self.router, wallet.provider())
            .swapExactTokensForETH(
                amount_in,
                min_out,
                vec![token, self.wbnb],
                wallet.address(),
                swap_deadline(),
            )
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
        erc20::approve(token, self.router, amount, self.gas, wallet).await
    }
}
