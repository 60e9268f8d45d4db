//! Signing wallet bound to a chain connection
//!
//! SECURITY: the private key only lives inside alloy's `PrivateKeySigner`,
//! which is moved into the provider's wallet filler. It is never serialized
//! or logged.

use crate::gateway::{self, GatewayError};
use crate::{Error, Result};
use alloy::network::EthereumWallet;
use alloy::primitives::{Address, TxHash, U256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use alloy::signers::local::PrivateKeySigner;
use secrecy::{ExposeSecret, SecretString};

/// A signing identity with its own provider
pub struct TradingWallet {
    /// Public address (safe to expose)
    address: Address,
    /// Provider that signs with this wallet's key
    provider: DynProvider,
}

impl TradingWallet {
    /// Create a wallet from a hex-encoded private key
    pub fn from_hex(key_hex: &str, rpc_url: url::Url) -> Result<Self> {
        let key_hex = key_hex.trim();
        let key_hex = key_hex.strip_prefix("0x").unwrap_or(key_hex);

        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| Error::Wallet(format!("Invalid private key: {}", e)))?;

        let address = signer.address();
        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer))
            .connect_http(rpc_url)
            .erased();

        Ok(Self { address, provider })
    }

    /// Create a wallet from secret key material
    pub fn from_secret(key: &SecretString, rpc_url: url::Url) -> Result<Self> {
        Self::from_hex(key.expose_secret(), rpc_url)
    }

    /// Get the public address
    pub fn address(&self) -> Address {
        self.address
    }

    /// Get the address as a checksummed string
    pub fn address_string(&self) -> String {
        self.address.to_checksum(None)
    }

    /// Signing provider for contract calls
    pub fn provider(&self) -> &DynProvider {
        &self.provider
    }

    /// Native (BNB) balance in wei
    pub async fn native_balance(&self) -> Result<U256> {
        self.provider
            .get_balance(self.address)
            .await
            .map_err(|e| Error::ChainUnavailable(format!("balance of {}: {}", self.address, e)))
    }

    /// Sign, submit and wait for one confirmation
    pub async fn send_and_confirm(
        &self,
        tx: TransactionRequest,
    ) -> std::result::Result<TxHash, GatewayError> {
        let pending = self
            .provider
            .send_transaction(tx.from(self.address))
            .await
            .map_err(GatewayError::from_rpc)?;
        gateway::confirm(pending).await
    }

    /// Estimate gas for a request sent from this wallet
    pub async fn estimate_gas(
        &self,
        tx: TransactionRequest,
    ) -> std::result::Result<u64, GatewayError> {
        self.provider
            .estimate_gas(tx.from(self.address))
            .await
            .map_err(GatewayError::from_rpc)
    }
}

// Implement Debug manually to avoid exposing the signer
impl std::fmt::Debug for TradingWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TradingWallet")
            .field("address", &self.address)
            .field("signer", &"[REDACTED]")
            .finish()
    }
}
