//! Wallet management
//!
//! Private keys are loaded once into [`TradingWallet`]s and grouped into a
//! [`WalletPool`]. Keys never leave alloy's signer.

mod pool;
mod signer;

pub use pool::WalletPool;
pub use signer::TradingWallet;

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Well-known development keys (DO NOT use in production!)
    pub const TEST_KEYS: [&str; 3] = [
        "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80",
        "0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d",
        "0x5de4111afa1a4b94908f83103eb1f1706367c2e68ca870fc3fb9a804cdab365a",
    ];

    pub fn local_url() -> url::Url {
        "http://localhost:8545".parse().unwrap()
    }

    pub fn test_wallet(index: usize) -> TradingWallet {
        TradingWallet::from_hex(TEST_KEYS[index], local_url()).unwrap()
    }

    pub fn test_pool(size: usize) -> WalletPool {
        WalletPool::new((0..size).map(test_wallet).collect()).unwrap()
    }
}
