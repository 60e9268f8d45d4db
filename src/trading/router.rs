//! Venue detection and gateway selection

use crate::config::Config;
use crate::gateway::{AmmGateway, BondingCurveGateway, ExchangeGateway, GasSettings, Venue};
use crate::wallet::TradingWallet;
use crate::{Error, Result};
use alloy::primitives::{Address, U256};
use std::collections::HashMap;
use std::sync::Arc;

/// Routes trades to the AMM when the token has a priced pool, otherwise to
/// the bonding curve
///
/// Detection runs once per token and is cached for the lifetime of the
/// router. A token that graduates to the AMM mid-session keeps trading on
/// the bonding curve until a new router (new session) is built.
pub struct VenueRouter {
    amm: Arc<dyn ExchangeGateway>,
    bonding_curve: Option<Arc<dyn ExchangeGateway>>,
    detected: HashMap<Address, Venue>,
}

impl VenueRouter {
    pub fn new(
        amm: Arc<dyn ExchangeGateway>,
        bonding_curve: Option<Arc<dyn ExchangeGateway>>,
    ) -> Self {
        Self {
            amm,
            bonding_curve,
            detected: HashMap::new(),
        }
    }

    /// Build both venues from the configured contract addresses
    pub fn from_config(config: &Config) -> Result<Self> {
        let gas = GasSettings {
            gas_price: config.gas.gas_price_wei()?,
            gas_limit: config.gas.gas_limit,
        };

        let amm = Arc::new(AmmGateway::new(
            config.contracts.pancakeswap_router,
            config.contracts.wbnb,
            gas,
        ));
        let bonding_curve = config
            .contracts
            .four_meme_factory
            .map(|factory| Arc::new(BondingCurveGateway::new(factory, gas)) as Arc<dyn ExchangeGateway>);

        Ok(Self::new(amm, bonding_curve))
    }

    /// Venue for `token`, probing the AMM on first use
    ///
    /// A strictly positive price for one whole token selects the AMM. A zero
    /// price or any error (no pair, no liquidity, RPC failure) selects the
    /// bonding curve.
    pub async fn detect(&mut self, token: Address, wallet: &TradingWallet) -> Venue {
        if let Some(venue) = self.detected.get(&token) {
            return *venue;
        }

        let venue = match self.amm.unit_price(token, wallet).await {
            Ok(price) if price > U256::ZERO => {
                tracing::info!(token = %token, price = %price, "Token has AMM liquidity");
                Venue::Amm
            }
            Ok(_) => {
                tracing::info!(token = %token, "AMM quotes zero, using bonding curve");
                Venue::BondingCurve
            }
            Err(e) => {
                tracing::info!(token = %token, reason = %e, "No AMM liquidity, using bonding curve");
                Venue::BondingCurve
            }
        };

        self.detected.insert(token, venue);
        venue
    }

    /// Previously detected venue, without touching the chain
    pub fn cached(&self, token: Address) -> Option<Venue> {
        self.detected.get(&token).copied()
    }

    pub fn gateway(&self, venue: Venue) -> Result<Arc<dyn ExchangeGateway>> {
        match venue {
            Venue::Amm => Ok(Arc::clone(&self.amm)),
            Venue::BondingCurve => self.bonding_curve.clone().ok_or_else(|| {
                Error::Initialization(
                    "No venue liquidity detectable: token has no AMM pool and no bonding-curve factory is configured"
                        .to_string(),
                )
            }),
        }
    }

    /// Detect and return the gateway for `token`
    pub async fn resolve(
        &mut self,
        token: Address,
        wallet: &TradingWallet,
    ) -> Result<Arc<dyn ExchangeGateway>> {
        let venue = self.detect(token, wallet).await;
        self.gateway(venue)
    }
}
