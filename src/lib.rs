//! Token Volume Booster
//!
//! Generates trading activity for a BNB Chain token from a pool of wallets:
//! - Detects whether the token trades on the four.meme bonding curve or on
//!   PancakeSwap V2
//! - Runs a randomized buy/sell loop with slippage-bounded trades
//! - Launches new tokens on the bonding curve
//! - Executes ordered transaction bundles from a single signer
//!
//! # Security Model
//!
//! - Private keys are held as `SecretString` until they are moved into
//!   alloy's signer and are never logged or serialized
//! - Every state-changing call carries the configured gas limit and price

pub mod bundler;
pub mod config;
pub mod contracts;
pub mod gateway;
pub mod launcher;
pub mod report;
pub mod trading;
pub mod units;
pub mod wallet;

mod error;

// Re-export commonly used types
pub use bundler::{BundleTransaction, TransactionBundler, TransactionSender};
pub use config::{Config, KeyMaterial, RpcConfig};
pub use error::{Error, Result};
pub use gateway::{ExchangeGateway, TokenMetadata, Venue};
pub use launcher::{LaunchReport, TokenLauncher};
pub use trading::{SessionHandle, TradeExecutor, VenueRouter, VolumeSession, VolumeStats};
pub use wallet::{TradingWallet, WalletPool};
