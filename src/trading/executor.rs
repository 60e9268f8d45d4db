//! Single slippage-bounded trade through one venue

use super::sampling::sell_amount;
use super::{Quote, Side, SkipReason, TradeOutcome, TradeResult};
use crate::gateway::{ExchangeGateway, Venue};
use crate::units::{self, format_units, short, BASE_DECIMALS};
use crate::wallet::TradingWallet;
use crate::{Error, Result};
use alloy::primitives::{Address, U256};
use rust_decimal::Decimal;
use std::sync::Arc;

pub struct TradeExecutor {
    gateway: Arc<dyn ExchangeGateway>,
    slippage_tolerance: u8,
}

impl TradeExecutor {
    pub fn new(gateway: Arc<dyn ExchangeGateway>, slippage_tolerance: u8) -> Self {
        Self {
            gateway,
            slippage_tolerance,
        }
    }

    pub fn venue(&self) -> Venue {
        self.gateway.venue()
    }

    /// Buy `token` with `amount` BNB
    ///
    /// Digits beyond 18 decimals are truncated.
    pub async fn buy(
        &self,
        token: Address,
        amount: Decimal,
        wallet: &TradingWallet,
    ) -> Result<TradeResult> {
        let amount_in = units::to_wei(amount)?;
        let fail = || Error::trade_failed(self.venue(), Side::Buy);

        let expected = self
            .gateway
            .quote_buy(token, amount_in, wallet)
            .await
            .map_err(fail())?;
        let quote = Quote::new(expected, self.slippage_tolerance);

        let tx_hash = self
            .gateway
            .buy(token, amount_in, quote.min_out, wallet)
            .await
            .map_err(fail())?;

        tracing::info!(
            venue = %self.venue(),
            wallet = %short(&wallet.address(), 10),
            "BUY {} BNB of {} | tx {}",
            amount,
            short(&token, 10),
            short(&tx_hash, 18),
        );

        Ok(TradeResult {
            side: Side::Buy,
            token,
            wallet: wallet.address(),
            amount_in,
            quoted_out: quote.expected_out,
            tx_hash,
        })
    }

    /// Sell `percentage` percent of the wallet's token balance
    ///
    /// An empty balance or an amount that truncates to zero is a no-op, not
    /// an error.
    pub async fn sell(
        &self,
        token: Address,
        percentage: u8,
        wallet: &TradingWallet,
    ) -> Result<TradeOutcome> {
        let balance = self
            .gateway
            .token_balance(token, wallet)
            .await
            .map_err(Error::trade_failed(self.venue(), Side::Sell))?;

        if balance.is_zero() {
            tracing::debug!(wallet = %wallet.address(), token = %token, "Nothing to sell");
            return Ok(TradeOutcome::Skipped(SkipReason::NothingToSell));
        }

        let amount = sell_amount(balance, percentage);
        if amount.is_zero() {
            tracing::debug!(
                wallet = %wallet.address(),
                token = %token,
                balance = %balance,
                percentage,
                "Sell amount truncates to zero"
            );
            return Ok(TradeOutcome::Skipped(SkipReason::DustAmount));
        }

        self.sell_exact(token, amount, wallet)
            .await
            .map(TradeOutcome::Executed)
    }

    /// Sell exactly `amount` token units
    ///
    /// The venue spender is approved for exactly `amount` when the current
    /// allowance is short of it.
    pub async fn sell_exact(
        &self,
        token: Address,
        amount: U256,
        wallet: &TradingWallet,
    ) -> Result<TradeResult> {
        let fail = || Error::trade_failed(self.venue(), Side::Sell);

        let allowance = self
            .gateway
            .allowance(token, wallet)
            .await
            .map_err(fail())?;
        if allowance < amount {
            tracing::debug!(token = %token, spender = %self.gateway.spender(), "Approving token");
            self.gateway
                .approve(token, amount, wallet)
                .await
                .map_err(fail())?;
        }

        let expected = self
            .gateway
            .quote_sell(token, amount, wallet)
            .await
            .map_err(fail())?;
        let quote = Quote::new(expected, self.slippage_tolerance);

        let tx_hash = self
            .gateway
            .sell(token, amount, quote.min_out, wallet)
            .await
            .map_err(fail())?;

        tracing::info!(
            venue = %self.venue(),
            wallet = %short(&wallet.address(), 10),
            "SELL {} of {} | tx {}",
            format_units(amount, BASE_DECIMALS),
            short(&token, 10),
            short(&tx_hash, 18),
        );

        Ok(TradeResult {
            side: Side::Sell,
            token,
            wallet: wallet.address(),
            amount_in: amount,
            quoted_out: quote.expected_out,
            tx_hash,
        })
    }
}
