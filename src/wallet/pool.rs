//! Fixed pool of trading wallets

use super::TradingWallet;
use crate::config::{KeyMaterial, RpcConfig};
use crate::{Error, Result};
use alloy::primitives::{Address, U256};
use rand::Rng;

/// Ordered, non-empty set of signing identities
///
/// Built once at startup and never mutated, so indices are stable for the
/// lifetime of the process.
#[derive(Debug)]
pub struct WalletPool {
    wallets: Vec<TradingWallet>,
}

impl WalletPool {
    /// Create a pool from already constructed wallets
    pub fn new(wallets: Vec<TradingWallet>) -> Result<Self> {
        if wallets.is_empty() {
            return Err(Error::Initialization("No valid wallets loaded".to_string()));
        }
        Ok(Self { wallets })
    }

    /// Load every key, skipping (and logging) keys that fail to parse
    pub fn from_keys(keys: &KeyMaterial, rpc: &RpcConfig) -> Result<Self> {
        let url = rpc.parsed_url()?;
        let mut wallets = Vec::with_capacity(keys.len());

        for (position, key) in keys.keys().iter().enumerate() {
            match TradingWallet::from_secret(key, url.clone()) {
                Ok(wallet) => {
                    tracing::info!(address = %wallet.address(), "Wallet loaded");
                    wallets.push(wallet);
                }
                Err(e) => {
                    tracing::error!(position, error = %e, "Failed to load wallet from private key");
                }
            }
        }

        Self::new(wallets)
    }

    pub fn len(&self) -> usize {
        self.wallets.len()
    }

    /// Always false once constructed
    pub fn is_empty(&self) -> bool {
        self.wallets.is_empty()
    }

    /// Wallet at `index`
    pub fn get(&self, index: usize) -> Result<&TradingWallet> {
        self.wallets.get(index).ok_or(Error::OutOfRange {
            index,
            size: self.wallets.len(),
        })
    }

    /// Uniformly random wallet from the process-wide RNG
    pub fn random(&self) -> &TradingWallet {
        self.random_with(&mut rand::thread_rng())
    }

    /// Uniformly random wallet from a caller-supplied RNG
    pub fn random_with<R: Rng + ?Sized>(&self, rng: &mut R) -> &TradingWallet {
        &self.wallets[rng.gen_range(0..self.wallets.len())]
    }

    /// All wallets in load order
    pub fn all(&self) -> &[TradingWallet] {
        &self.wallets
    }

    /// Native balance of the wallet at `index`
    pub async fn balance_of(&self, index: usize) -> Result<U256> {
        self.get(index)?.native_balance().await
    }

    /// Native balances of every wallet, in pool order
    pub async fn balances_all(&self) -> Result<Vec<(Address, U256)>> {
        let mut balances = Vec::with_capacity(self.wallets.len());
        for wallet in &self.wallets {
            balances.push((wallet.address(), wallet.native_balance().await?));
        }
        Ok(balances)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wallet::testing::{test_pool, TEST_KEYS};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn empty_pool_is_an_initialization_error() {
        assert!(matches!(
            WalletPool::new(Vec::new()),
            Err(Error::Initialization(_))
        ));
    }

    #[test]
    fn get_checks_bounds() {
        let pool = test_pool(3);
        assert_eq!(pool.len(), 3);
        assert_eq!(pool.get(0).unwrap().address(), pool.all()[0].address());
        assert!(pool.get(2).is_ok());

        match pool.get(3) {
            Err(Error::OutOfRange { index, size }) => {
                assert_eq!(index, 3);
                assert_eq!(size, 3);
            }
            other => panic!("expected OutOfRange, got {:?}", other),
        }
    }

    #[test]
    fn random_selection_covers_pool() {
        let pool = test_pool(3);
        let mut rng = StdRng::seed_from_u64(7);
        let seen: HashSet<Address> = (0..200)
            .map(|_| pool.random_with(&mut rng).address())
            .collect();
        assert_eq!(seen.len(), 3);

        let any = pool.random().address();
        assert!(pool.all().iter().any(|w| w.address() == any));
    }

    #[test]
    fn from_keys_skips_invalid_entries() {
        let raw = format!("{},garbage,{}", TEST_KEYS[0], TEST_KEYS[1]);
        let keys = KeyMaterial::parse(&raw).unwrap();
        let rpc = RpcConfig::with_url("http://localhost:8545", 56);

        let pool = WalletPool::from_keys(&keys, &rpc).unwrap();
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn from_keys_with_only_invalid_entries_fails() {
        let keys = KeyMaterial::parse("garbage").unwrap();
        let rpc = RpcConfig::with_url("http://localhost:8545", 56);

        assert!(matches!(
            WalletPool::from_keys(&keys, &rpc),
            Err(Error::Initialization(_))
        ));
    }

    /// Pool whose provider points at a closed local port
    fn unreachable_pool() -> WalletPool {
        let url: url::Url = "http://127.0.0.1:1".parse().unwrap();
        let wallets = TEST_KEYS[..2]
            .iter()
            .map(|key| TradingWallet::from_hex(key, url.clone()).unwrap())
            .collect();
        WalletPool::new(wallets).unwrap()
    }

    #[tokio::test]
    async fn balance_of_checks_bounds_before_querying() {
        let pool = unreachable_pool();
        assert!(matches!(
            pool.balance_of(2).await,
            Err(Error::OutOfRange { index: 2, size: 2 })
        ));
    }

    #[tokio::test]
    async fn balances_on_unreachable_chain_are_chain_unavailable() {
        let pool = unreachable_pool();

        assert!(matches!(
            pool.balance_of(0).await,
            Err(Error::ChainUnavailable(_))
        ));
        assert!(matches!(
            pool.balances_all().await,
            Err(Error::ChainUnavailable(_))
        ));
    }
}
