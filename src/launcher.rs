//! Token launch on the bonding curve

use crate::config::Config;
use crate::gateway::{token_info, BondingCurveGateway, GasSettings, TokenInfo, TokenMetadata};
use crate::trading::{TradeExecutor, TradeResult};
use crate::wallet::TradingWallet;
use crate::{Error, Result};
use alloy::primitives::{Address, TxHash};
use rust_decimal::Decimal;
use std::sync::Arc;

/// What a launch produced
///
/// The token exists once `creation_tx` is confirmed; the initial buy and the
/// metadata read are best-effort on top of that.
#[derive(Debug, Clone)]
pub struct LaunchReport {
    pub token: Address,
    pub creation_tx: TxHash,
    pub initial_buy: Option<TradeResult>,
    pub info: Option<TokenInfo>,
}

pub struct TokenLauncher {
    curve: Arc<BondingCurveGateway>,
    slippage_tolerance: u8,
    initial_buy: Decimal,
}

impl TokenLauncher {
    pub fn new(curve: Arc<BondingCurveGateway>, slippage_tolerance: u8, initial_buy: Decimal) -> Self {
        Self {
            curve,
            slippage_tolerance,
            initial_buy,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let factory = config.contracts.four_meme_factory.ok_or_else(|| {
            Error::Initialization(format!(
                "{} is not set; token creation needs the bonding-curve factory",
                crate::config::env_vars::FOURMEME_FACTORY_ADDRESS
            ))
        })?;
        let gas = GasSettings {
            gas_price: config.gas.gas_price_wei()?,
            gas_limit: config.gas.gas_limit,
        };

        Ok(Self::new(
            Arc::new(BondingCurveGateway::new(factory, gas)),
            config.trading.slippage_tolerance,
            config.trading.initial_buy_amount,
        ))
    }

    pub fn initial_buy(&self) -> Decimal {
        self.initial_buy
    }

    /// Create the token, make the initial buy and read back its metadata
    pub async fn launch(&self, metadata: &TokenMetadata, wallet: &TradingWallet) -> Result<LaunchReport> {
        validate_metadata(metadata)?;

        tracing::info!(
            name = %metadata.name,
            symbol = %metadata.symbol,
            creator = %wallet.address(),
            "Creating token"
        );

        let (creation_tx, token) = self
            .curve
            .create_token(metadata, wallet)
            .await
            .map_err(|e| Error::TokenCreation(e.to_string()))?;

        tracing::info!(token = %token, tx = %creation_tx, "Token created");

        let initial_buy = if self.initial_buy > Decimal::ZERO {
            let executor = TradeExecutor::new(self.curve.clone(), self.slippage_tolerance);
            match executor.buy(token, self.initial_buy, wallet).await {
                Ok(trade) => Some(trade),
                Err(e) => {
                    tracing::warn!(token = %token, error = %e, "Initial buy failed");
                    None
                }
            }
        } else {
            None
        };

        let info = match token_info(token, wallet).await {
            Ok(info) => Some(info),
            Err(e) => {
                tracing::warn!(token = %token, error = %e, "Could not read token info");
                None
            }
        };

        Ok(LaunchReport {
            token,
            creation_tx,
            initial_buy,
            info,
        })
    }
}

fn validate_metadata(metadata: &TokenMetadata) -> Result<()> {
    if metadata.name.trim().is_empty() {
        return Err(Error::InvalidArgument("Token name is required".to_string()));
    }
    if metadata.symbol.trim().is_empty() {
        return Err(Error::InvalidArgument("Token symbol is required".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wallet::testing::test_wallet;
    use rust_decimal_macros::dec;

    #[test]
    fn requires_factory() {
        let err = TokenLauncher::from_config(&Config::default()).err().unwrap();
        assert!(matches!(err, Error::Initialization(msg) if msg.contains("FOURMEME_FACTORY_ADDRESS")));
    }

    #[test]
    fn takes_initial_buy_from_config() {
        let mut config = Config::default();
        config.contracts.four_meme_factory = Some(Address::repeat_byte(0xfa));
        config.trading.initial_buy_amount = dec!(0.25);

        let launcher = TokenLauncher::from_config(&config).unwrap();
        assert_eq!(launcher.initial_buy(), dec!(0.25));
    }

    #[tokio::test]
    async fn rejects_blank_name_or_symbol_before_sending() {
        let launcher = TokenLauncher::new(
            Arc::new(BondingCurveGateway::new(
                Address::repeat_byte(0xfa),
                GasSettings {
                    gas_price: 1,
                    gas_limit: 1,
                },
            )),
            10,
            dec!(0.1),
        );
        let wallet = test_wallet(0);

        let metadata = TokenMetadata {
            name: " ".to_string(),
            symbol: "PEPE".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            launcher.launch(&metadata, &wallet).await,
            Err(Error::InvalidArgument(_))
        ));

        let metadata = TokenMetadata {
            name: "Pepe".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            launcher.launch(&metadata, &wallet).await,
            Err(Error::InvalidArgument(_))
        ));
    }
}
