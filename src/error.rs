//! Error types for the volume booster

use crate::gateway::{GatewayError, Venue};
use crate::trading::Side;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Initialization failed: {0}")]
    Initialization(String),

    #[error("Chain unavailable: {0}")]
    ChainUnavailable(String),

    #[error("{side} on {venue} failed: {source}")]
    TradeFailed {
        venue: Venue,
        side: Side,
        #[source]
        source: GatewayError,
    },

    #[error("Bundle failed at entry {index}: {reason}")]
    BundleFailed { index: usize, reason: String },

    #[error("Wallet index {index} out of range (pool size {size})")]
    OutOfRange { index: usize, size: usize },

    #[error("Wallet error: {0}")]
    Wallet(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Token creation failed: {0}")]
    TokenCreation(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Wrap a gateway failure for the given venue and side.
    pub fn trade_failed(venue: Venue, side: Side) -> impl FnOnce(GatewayError) -> Self {
        move |source| Error::TradeFailed {
            venue,
            side,
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
