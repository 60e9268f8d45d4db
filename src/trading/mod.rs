//! Trading orchestration
//!
//! [`VenueRouter`] picks the venue once per session, [`TradeExecutor`] runs a
//! single slippage-bounded trade through it, and [`VolumeSession`] drives the
//! randomized buy/sell loop while [`StatsAggregator`] keeps the tally.

mod executor;
mod quote;
mod router;
pub mod sampling;
mod scheduler;
mod stats;

pub use executor::TradeExecutor;
pub use quote::Quote;
pub use router::VenueRouter;
pub use scheduler::{SessionHandle, SessionState, VolumeSession, FAILURE_BACKOFF};
pub use stats::{StatsAggregator, VolumeStats};

use alloy::primitives::{Address, TxHash, U256};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Buy => f.write_str("BUY"),
            Side::Sell => f.write_str("SELL"),
        }
    }
}

/// A confirmed trade
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeResult {
    pub side: Side,
    pub token: Address,
    pub wallet: Address,
    /// Wei spent for buys, token units sold for sells
    pub amount_in: U256,
    /// Quoted output the trade was bounded against
    pub quoted_out: U256,
    pub tx_hash: TxHash,
}

/// Why a trade was not attempted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The wallet holds none of the token
    NothingToSell,
    /// The chosen percentage of the balance truncates to zero
    DustAmount,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::NothingToSell => f.write_str("no token balance"),
            SkipReason::DustAmount => f.write_str("sell amount rounds to zero"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TradeOutcome {
    Executed(TradeResult),
    Skipped(SkipReason),
}

impl TradeOutcome {
    pub fn executed(&self) -> Option<&TradeResult> {
        match self {
            TradeOutcome::Executed(result) => Some(result),
            TradeOutcome::Skipped(_) => None,
        }
    }
}
