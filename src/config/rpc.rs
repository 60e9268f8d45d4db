//! RPC endpoint configuration
//!
//! Resolution order:
//! 1. `RPC_URL` from the environment or the config file
//! 2. A public endpoint for the configured chain (rate limited, for testing only)
//!
//! # Examples
//!
//! ```bash
//! # Private endpoint (recommended)
//! export RPC_URL="https://bsc-mainnet.nodereal.io/v1/YOUR_KEY"
//! export CHAIN_ID=56
//!
//! # No RPC_URL - falls back to the public BSC dataseed
//! ```

use crate::{Error, Result};

/// Chain ID constants
pub mod chains {
    pub const BSC: u64 = 56;
    pub const BSC_TESTNET: u64 = 97;
}

/// Public RPC endpoints (rate limited, for testing only)
mod public_rpcs {
    pub const BSC: &str = "https://bsc-dataseed1.binance.org/";
    pub const BSC_TESTNET: &str = "https://data-seed-prebsc-1-s1.binance.org:8545/";
}

/// Resolved RPC endpoint for a single chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcConfig {
    url: String,
    chain_id: u64,
}

impl RpcConfig {
    /// Resolve the endpoint for `chain_id`, preferring an explicit URL
    pub fn resolve(explicit: Option<&str>, chain_id: u64) -> Result<Self> {
        if let Some(url) = explicit.map(str::trim).filter(|u| !u.is_empty()) {
            tracing::debug!(chain_id, "Using configured RPC URL");
            return Ok(Self::with_url(url, chain_id));
        }

        let fallback = Self::public_rpc(chain_id).ok_or_else(|| {
            Error::Config(format!(
                "No RPC_URL configured and no public endpoint known for chain {}",
                chain_id
            ))
        })?;

        tracing::warn!(
            chain_id,
            url = fallback,
            "No RPC_URL configured, using public RPC (rate limited)"
        );
        Ok(Self::with_url(fallback, chain_id))
    }

    /// Create with an explicit RPC URL
    pub fn with_url(url: impl Into<String>, chain_id: u64) -> Self {
        Self {
            url: url.into(),
            chain_id,
        }
    }

    fn public_rpc(chain_id: u64) -> Option<&'static str> {
        match chain_id {
            chains::BSC => Some(public_rpcs::BSC),
            chains::BSC_TESTNET => Some(public_rpcs::BSC_TESTNET),
            _ => None,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Parse the endpoint for use with alloy providers
    pub fn parsed_url(&self) -> Result<url::Url> {
        self.url
            .parse()
            .map_err(|e| Error::Config(format!("Invalid RPC URL {}: {}", self.url, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_url_wins() {
        let rpc = RpcConfig::resolve(Some("https://custom.rpc"), chains::BSC).unwrap();
        assert_eq!(rpc.url(), "https://custom.rpc");
        assert_eq!(rpc.chain_id(), chains::BSC);
    }

    #[test]
    fn public_rpc_fallbacks() {
        let rpc = RpcConfig::resolve(None, chains::BSC).unwrap();
        assert_eq!(rpc.url(), public_rpcs::BSC);

        let rpc = RpcConfig::resolve(Some("   "), chains::BSC_TESTNET).unwrap();
        assert_eq!(rpc.url(), public_rpcs::BSC_TESTNET);
    }

    #[test]
    fn unknown_chain_without_url_is_rejected() {
        let err = RpcConfig::resolve(None, 999).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn parsed_url_rejects_garbage() {
        assert!(RpcConfig::with_url("not a url", 56).parsed_url().is_err());
        assert!(RpcConfig::with_url("http://localhost:8545", 56)
            .parsed_url()
            .is_ok());
    }
}
