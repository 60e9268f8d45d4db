//! Conversions between decimal amounts and on-chain integer units

use crate::{Error, Result};
use alloy::primitives::U256;
use rust_decimal::{Decimal, RoundingStrategy};

/// Decimals of the base currency (BNB) and of bonding-curve tokens
pub const BASE_DECIMALS: u32 = 18;

/// Convert a decimal amount to integer units, truncating extra precision
pub fn to_base_units(amount: Decimal, decimals: u32) -> Result<U256> {
    if amount < Decimal::ZERO {
        return Err(Error::InvalidArgument(format!(
            "Amount cannot be negative: {}",
            amount
        )));
    }

    let truncated = amount.round_dp_with_strategy(decimals, RoundingStrategy::ToZero);
    let mantissa = u128::try_from(truncated.mantissa())
        .map_err(|_| Error::InvalidArgument(format!("Amount out of range: {}", amount)))?;
    let shift = decimals - truncated.scale();

    Ok(U256::from(mantissa) * U256::from(10u64).pow(U256::from(shift)))
}

/// Convert a base-currency amount to wei
pub fn to_wei(amount: Decimal) -> Result<U256> {
    to_base_units(amount, BASE_DECIMALS)
}

/// Convert integer units back to a decimal, if it fits in a `Decimal`
pub fn from_base_units(value: U256, decimals: u32) -> Option<Decimal> {
    let raw = i128::try_from(u128::try_from(value).ok()?).ok()?;
    Decimal::try_from_i128_with_scale(raw, decimals)
        .ok()
        .map(|d| d.normalize())
}

/// Convert wei to a base-currency decimal
pub fn from_wei(value: U256) -> Option<Decimal> {
    from_base_units(value, BASE_DECIMALS)
}

/// Format a U256 value with decimals
pub fn format_units(value: U256, decimals: u32) -> String {
    if value.is_zero() {
        return "0".to_string();
    }

    let divisor = U256::from(10).pow(U256::from(decimals));
    let whole = value / divisor;
    let remainder = value % divisor;

    if remainder.is_zero() {
        return whole.to_string();
    }

    let remainder_str = format!("{:0>width$}", remainder, width = decimals as usize);
    let trimmed = remainder_str.trim_end_matches('0');
    format!("{}.{}", whole, trimmed)
}

/// Shorten an address or hash for log lines (`0x12345678...`)
pub fn short(value: &impl std::fmt::Display, len: usize) -> String {
    let s = value.to_string();
    if s.len() <= len {
        return s;
    }
    format!("{}...", &s[..len])
}
