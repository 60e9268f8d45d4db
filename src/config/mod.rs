//! Configuration for the volume booster
//!
//! Settings come from the environment (a `.env` file is loaded by the CLI)
//! or from a JSON file. Private keys are never part of the serialized
//! config; they are loaded separately into [`KeyMaterial`].

pub mod rpc;

use crate::units;
use crate::{Error, Result};
use alloy::primitives::{address, Address};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

pub use rpc::RpcConfig;

/// Environment variable names
pub mod env_vars {
    pub const RPC_URL: &str = "RPC_URL";
    pub const CHAIN_ID: &str = "CHAIN_ID";
    pub const PRIVATE_KEYS: &str = "PRIVATE_KEYS";

    pub const FOURMEME_FACTORY_ADDRESS: &str = "FOURMEME_FACTORY_ADDRESS";
    pub const PANCAKESWAP_ROUTER: &str = "PANCAKESWAP_ROUTER";
    pub const PANCAKESWAP_FACTORY: &str = "PANCAKESWAP_FACTORY";
    pub const WBNB_ADDRESS: &str = "WBNB_ADDRESS";

    pub const MIN_BUY_AMOUNT: &str = "MIN_BUY_AMOUNT";
    pub const MAX_BUY_AMOUNT: &str = "MAX_BUY_AMOUNT";
    pub const MIN_SELL_PERCENTAGE: &str = "MIN_SELL_PERCENTAGE";
    pub const MAX_SELL_PERCENTAGE: &str = "MAX_SELL_PERCENTAGE";
    pub const MIN_INTERVAL: &str = "MIN_INTERVAL";
    pub const MAX_INTERVAL: &str = "MAX_INTERVAL";

    pub const INITIAL_BUY_AMOUNT: &str = "INITIAL_BUY_AMOUNT";
    pub const GAS_PRICE: &str = "GAS_PRICE";
    pub const GAS_LIMIT: &str = "GAS_LIMIT";

    pub const MAX_RETRIES: &str = "MAX_RETRIES";
    pub const SLIPPAGE_TOLERANCE: &str = "SLIPPAGE_TOLERANCE";
}

/// Well-known BNB Chain contract addresses
pub mod defaults {
    use super::*;

    pub const PANCAKESWAP_ROUTER: Address = address!("10ed43c718714eb63d5aa57b78b54704e256024e");
    pub const PANCAKESWAP_FACTORY: Address = address!("ca143ce32fe78f1f7019d7d551a6402fc5350c73");
    pub const WBNB: Address = address!("bb4cdb9cbd36b01bd1cbaebf2de08d9173bc095c");
}

/// Venue contract addresses
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContractAddresses {
    /// four.meme bonding-curve factory (unset until deployed/known)
    #[serde(default)]
    pub four_meme_factory: Option<Address>,
    pub pancakeswap_router: Address,
    pub pancakeswap_factory: Address,
    /// Wrapped base currency used as the AMM path endpoint
    pub wbnb: Address,
}

impl Default for ContractAddresses {
    fn default() -> Self {
        Self {
            four_meme_factory: None,
            pancakeswap_router: defaults::PANCAKESWAP_ROUTER,
            pancakeswap_factory: defaults::PANCAKESWAP_FACTORY,
            wbnb: defaults::WBNB,
        }
    }
}

/// Inclusive range of buy amounts in base currency (BNB)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BuyRange {
    pub min: Decimal,
    pub max: Decimal,
}

/// Inclusive range of whole sell percentages
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PercentRange {
    pub min: u8,
    pub max: u8,
}

/// Inclusive range of inter-trade delays in milliseconds
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct IntervalRange {
    pub min_ms: u64,
    pub max_ms: u64,
}

/// Volume loop settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TradingConfig {
    pub buy_amount: BuyRange,
    pub sell_percentage: PercentRange,
    pub interval: IntervalRange,
    /// Slippage tolerance in whole percent (0-100)
    pub slippage_tolerance: u8,
    /// Initial buy made right after a token launch (BNB)
    pub initial_buy_amount: Decimal,
    /// Loaded and reported, but trade failures only use the fixed loop delay
    pub max_retries: u32,
}

impl Default for TradingConfig {
    fn default() -> Self {
        Self {
            buy_amount: BuyRange {
                min: dec!(0.001),
                max: dec!(0.01),
            },
            sell_percentage: PercentRange { min: 50, max: 100 },
            interval: IntervalRange {
                min_ms: 10_000,
                max_ms: 30_000,
            },
            slippage_tolerance: 10,
            initial_buy_amount: dec!(0.1),
            max_retries: 3,
        }
    }
}

/// Gas settings applied to every state-changing call
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GasConfig {
    /// Legacy gas price in gwei
    pub gas_price_gwei: Decimal,
    pub gas_limit: u64,
}

impl GasConfig {
    /// Gas price in wei
    pub fn gas_price_wei(&self) -> Result<u128> {
        let wei = units::to_base_units(self.gas_price_gwei, 9)?;
        u128::try_from(wei)
            .map_err(|_| Error::Config(format!("Gas price {} gwei too large", self.gas_price_gwei)))
    }
}

impl Default for GasConfig {
    fn default() -> Self {
        Self {
            gas_price_gwei: dec!(5),
            gas_limit: 500_000,
        }
    }
}

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// RPC endpoint; falls back to a public endpoint for `chain_id`
    #[serde(default)]
    pub rpc_url: Option<String>,
    pub chain_id: u64,
    #[serde(default)]
    pub contracts: ContractAddresses,
    #[serde(default)]
    pub trading: TradingConfig,
    #[serde(default)]
    pub gas: GasConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_url: None,
            chain_id: rpc::chains::BSC,
            contracts: ContractAddresses::default(),
            trading: TradingConfig::default(),
            gas: GasConfig::default(),
        }
    }
}

impl Config {
    /// Load from process environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load from a JSON config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load using an arbitrary variable lookup; unset variables keep their defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        use env_vars::*;

        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Config::default();

        let four_meme_factory = match get(FOURMEME_FACTORY_ADDRESS) {
            // The sample .env ships with a "0x..." placeholder
            Some(raw) if raw == "0x..." => None,
            Some(raw) => Some(parse_var::<Address>(FOURMEME_FACTORY_ADDRESS, &raw)?),
            None => None,
        };

        let config = Self {
            rpc_url: get(RPC_URL),
            chain_id: parse_or(&get, CHAIN_ID, defaults.chain_id)?,
            contracts: ContractAddresses {
                four_meme_factory,
                pancakeswap_router: parse_or(
                    &get,
                    PANCAKESWAP_ROUTER,
                    defaults.contracts.pancakeswap_router,
                )?,
                pancakeswap_factory: parse_or(
                    &get,
                    PANCAKESWAP_FACTORY,
                    defaults.contracts.pancakeswap_factory,
                )?,
                wbnb: parse_or(&get, WBNB_ADDRESS, defaults.contracts.wbnb)?,
            },
            trading: TradingConfig {
                buy_amount: BuyRange {
                    min: parse_or(&get, MIN_BUY_AMOUNT, defaults.trading.buy_amount.min)?,
                    max: parse_or(&get, MAX_BUY_AMOUNT, defaults.trading.buy_amount.max)?,
                },
                sell_percentage: PercentRange {
                    min: parse_or(&get, MIN_SELL_PERCENTAGE, defaults.trading.sell_percentage.min)?,
                    max: parse_or(&get, MAX_SELL_PERCENTAGE, defaults.trading.sell_percentage.max)?,
                },
                interval: IntervalRange {
                    min_ms: parse_or(&get, MIN_INTERVAL, defaults.trading.interval.min_ms)?,
                    max_ms: parse_or(&get, MAX_INTERVAL, defaults.trading.interval.max_ms)?,
                },
                slippage_tolerance: parse_or(
                    &get,
                    SLIPPAGE_TOLERANCE,
                    defaults.trading.slippage_tolerance,
                )?,
                initial_buy_amount: parse_or(
                    &get,
                    INITIAL_BUY_AMOUNT,
                    defaults.trading.initial_buy_amount,
                )?,
                max_retries: parse_or(&get, MAX_RETRIES, defaults.trading.max_retries)?,
            },
            gas: GasConfig {
                gas_price_gwei: parse_or(&get, GAS_PRICE, defaults.gas.gas_price_gwei)?,
                gas_limit: parse_or(&get, GAS_LIMIT, defaults.gas.gas_limit)?,
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Check ranges and bounds
    pub fn validate(&self) -> Result<()> {
        let t = &self.trading;

        if t.buy_amount.min <= Decimal::ZERO {
            return Err(Error::Config(format!(
                "Minimum buy amount must be positive, got {}",
                t.buy_amount.min
            )));
        }
        if t.buy_amount.min > t.buy_amount.max {
            return Err(Error::Config(format!(
                "Buy range is inverted: {} > {}",
                t.buy_amount.min, t.buy_amount.max
            )));
        }
        if t.sell_percentage.max > 100 || t.sell_percentage.min > t.sell_percentage.max {
            return Err(Error::Config(format!(
                "Sell percentage range {}-{} must satisfy min <= max <= 100",
                t.sell_percentage.min, t.sell_percentage.max
            )));
        }
        if t.interval.min_ms > t.interval.max_ms {
            return Err(Error::Config(format!(
                "Interval range is inverted: {}ms > {}ms",
                t.interval.min_ms, t.interval.max_ms
            )));
        }
        if t.slippage_tolerance > 100 {
            return Err(Error::Config(format!(
                "Slippage tolerance must be 0-100, got {}",
                t.slippage_tolerance
            )));
        }
        if t.initial_buy_amount < Decimal::ZERO {
            return Err(Error::Config("Initial buy amount cannot be negative".to_string()));
        }
        if self.gas.gas_limit == 0 {
            return Err(Error::Config("Gas limit must be positive".to_string()));
        }
        self.gas.gas_price_wei()?;

        Ok(())
    }

    /// Resolve the RPC endpoint
    pub fn rpc(&self) -> Result<RpcConfig> {
        RpcConfig::resolve(self.rpc_url.as_deref(), self.chain_id)
    }
}

fn parse_var<T>(name: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse::<T>()
        .map_err(|e| Error::Config(format!("Invalid {}={}: {}", name, raw, e)))
}

fn parse_or<T, G>(get: &G, name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(name) {
        Some(raw) => parse_var(name, &raw),
        None => Ok(default),
    }
}

/// Signing key material, kept out of [`Config`] so it is never serialized
pub struct KeyMaterial {
    keys: Vec<SecretString>,
}

impl KeyMaterial {
    /// Load comma-separated hex keys from `PRIVATE_KEYS`
    pub fn from_env() -> Result<Self> {
        let raw = std::env::var(env_vars::PRIVATE_KEYS).unwrap_or_default();
        Self::parse(&raw)
    }

    /// Parse a comma-separated key list
    pub fn parse(raw: &str) -> Result<Self> {
        let keys: Vec<SecretString> = raw
            .split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(|k| SecretString::from(k.to_string()))
            .collect();

        if keys.is_empty() {
            return Err(Error::Initialization(format!(
                "No private keys provided in {} env variable",
                env_vars::PRIVATE_KEYS
            )));
        }

        Ok(Self { keys })
    }

    pub fn keys(&self) -> &[SecretString] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl std::fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("keys", &format!("[{} REDACTED]", self.keys.len()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_match_documented_values() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.chain_id, 56);
        assert_eq!(config.trading.buy_amount.min, dec!(0.001));
        assert_eq!(config.trading.buy_amount.max, dec!(0.01));
        assert_eq!(config.trading.sell_percentage, PercentRange { min: 50, max: 100 });
        assert_eq!(config.trading.slippage_tolerance, 10);
        assert_eq!(config.trading.max_retries, 3);
        assert_eq!(config.gas.gas_limit, 500_000);
        assert!(config.contracts.four_meme_factory.is_none());
        assert_eq!(config.contracts.wbnb, defaults::WBNB);
    }

    #[test]
    fn env_overrides_are_parsed() {
        let config = Config::from_lookup(lookup(&[
            (env_vars::MIN_BUY_AMOUNT, "0.01"),
            (env_vars::MAX_BUY_AMOUNT, "0.02"),
            (env_vars::MIN_SELL_PERCENTAGE, "10"),
            (env_vars::MAX_SELL_PERCENTAGE, "40"),
            (env_vars::SLIPPAGE_TOLERANCE, "15"),
            (
                env_vars::FOURMEME_FACTORY_ADDRESS,
                "0x5c952063c7fc8610ffdb798152d69f0b9550762b",
            ),
            (env_vars::GAS_PRICE, "3"),
        ]))
        .unwrap();

        assert_eq!(config.trading.buy_amount.min, dec!(0.01));
        assert_eq!(config.trading.buy_amount.max, dec!(0.02));
        assert_eq!(config.trading.sell_percentage, PercentRange { min: 10, max: 40 });
        assert_eq!(config.trading.slippage_tolerance, 15);
        assert!(config.contracts.four_meme_factory.is_some());
        assert_eq!(config.gas.gas_price_wei().unwrap(), 3_000_000_000);
    }

    #[test]
    fn placeholder_factory_is_treated_as_unset() {
        let config =
            Config::from_lookup(lookup(&[(env_vars::FOURMEME_FACTORY_ADDRESS, "0x...")])).unwrap();
        assert!(config.contracts.four_meme_factory.is_none());
    }

    #[test]
    fn invalid_values_are_config_errors() {
        let err = Config::from_lookup(lookup(&[(env_vars::GAS_LIMIT, "lots")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let err = Config::from_lookup(lookup(&[(env_vars::SLIPPAGE_TOLERANCE, "101")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let err = Config::from_lookup(lookup(&[
            (env_vars::MIN_BUY_AMOUNT, "0.5"),
            (env_vars::MAX_BUY_AMOUNT, "0.1"),
        ]))
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn config_file_round_trips_through_serde() {
        let mut config = Config::default();
        config.rpc_url = Some("http://localhost:8545".to_string());
        config.trading.slippage_tolerance = 5;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", serde_json::to_string(&config).unwrap()).unwrap();

        let loaded = Config::from_file(file.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn partial_config_file_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "chain_id": 97 }}"#).unwrap();

        let loaded = Config::from_file(file.path()).unwrap();
        assert_eq!(loaded.chain_id, 97);
        assert_eq!(loaded.trading, TradingConfig::default());
    }

    #[test]
    fn key_material_requires_at_least_one_key() {
        assert!(matches!(
            KeyMaterial::parse(" , ,"),
            Err(Error::Initialization(_))
        ));

        let keys = KeyMaterial::parse("0xabc, 0xdef").unwrap();
        assert_eq!(keys.len(), 2);
        assert!(!format!("{:?}", keys).contains("abc"));
    }
}
