//! Slippage-bounded quotes

use alloy::primitives::U256;

/// Expected output and the minimum accepted after slippage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quote {
    pub expected_out: U256,
    pub min_out: U256,
}

impl Quote {
    /// `min_out = expected_out * (100 - tolerance) / 100`, truncated
    ///
    /// Tolerances above 100 are clamped to 100.
    pub fn new(expected_out: U256, tolerance_percent: u8) -> Self {
        let tolerance = tolerance_percent.min(100);
        let min_out = expected_out * U256::from(100 - tolerance) / U256::from(100);
        Self {
            expected_out,
            min_out,
        }
    }
}
