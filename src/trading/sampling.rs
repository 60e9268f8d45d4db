//! Random draws for trade side, size and spacing

use super::Side;
use crate::config::{BuyRange, IntervalRange, PercentRange};
use alloy::primitives::U256;
use rand::Rng;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::time::Duration;

/// Probability of choosing a buy, biased toward buy pressure
pub const BUY_PROBABILITY: f64 = 0.6;

/// Decimal places kept for drawn buy amounts
const BUY_AMOUNT_SCALE: u32 = 9;

pub fn draw_side<R: Rng + ?Sized>(rng: &mut R) -> Side {
    if rng.gen_bool(BUY_PROBABILITY) {
        Side::Buy
    } else {
        Side::Sell
    }
}

/// Uniform amount in `[min, max]` at nano-BNB resolution
pub fn draw_buy_amount<R: Rng + ?Sized>(range: &BuyRange, rng: &mut R) -> Decimal {
    let factor = Decimal::from(10u64.pow(BUY_AMOUNT_SCALE));
    // Round inward so every draw stays inside the configured bounds
    let low = (range.min * factor)
        .round_dp_with_strategy(0, RoundingStrategy::ToPositiveInfinity)
        .to_i64();
    let high = (range.max * factor)
        .round_dp_with_strategy(0, RoundingStrategy::ToNegativeInfinity)
        .to_i64();

    match (low, high) {
        (Some(low), Some(high)) if low <= high => {
            Decimal::new(rng.gen_range(low..=high), BUY_AMOUNT_SCALE).normalize()
        }
        _ => range.min,
    }
}

/// Uniform whole percentage in `[min, max]`
pub fn draw_sell_percentage<R: Rng + ?Sized>(range: &PercentRange, rng: &mut R) -> u8 {
    rng.gen_range(range.min..=range.max.max(range.min))
}

/// Uniform delay in `[min_ms, max_ms]`
pub fn draw_interval<R: Rng + ?Sized>(range: &IntervalRange, rng: &mut R) -> Duration {
    Duration::from_millis(rng.gen_range(range.min_ms..=range.max_ms.max(range.min_ms)))
}

/// `balance * percentage / 100`, truncated
pub fn sell_amount(balance: U256, percentage: u8) -> U256 {
    balance * U256::from(percentage) / U256::from(100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rust_decimal_macros::dec;

    #[test]
    fn buy_draws_stay_in_range() {
        let range = BuyRange {
            min: dec!(0.01),
            max: dec!(0.02),
        };
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..100 {
            let amount = draw_buy_amount(&range, &mut rng);
            assert!(amount >= dec!(0.01) && amount <= dec!(0.02), "{}", amount);
        }
    }

    #[test]
    fn buy_draws_with_degenerate_or_fine_ranges() {
        let mut rng = StdRng::seed_from_u64(1);

        let fixed = BuyRange {
            min: dec!(0.05),
            max: dec!(0.05),
        };
        assert_eq!(draw_buy_amount(&fixed, &mut rng), dec!(0.05));

        // Narrower than the draw resolution
        let tiny = BuyRange {
            min: dec!(0.0000000001),
            max: dec!(0.0000000002),
        };
        assert_eq!(draw_buy_amount(&tiny, &mut rng), dec!(0.0000000001));
    }

    #[test]
    fn sell_percentages_stay_in_range() {
        let range = PercentRange { min: 25, max: 75 };
        let mut rng = StdRng::seed_from_u64(9);

        let draws: Vec<u8> = (0..500).map(|_| draw_sell_percentage(&range, &mut rng)).collect();
        assert!(draws.iter().all(|p| (25..=75).contains(p)));
        assert!(draws.contains(&25));
        assert!(draws.contains(&75));
    }

    #[test]
    fn intervals_stay_in_range() {
        let range = IntervalRange {
            min_ms: 10_000,
            max_ms: 30_000,
        };
        let mut rng = StdRng::seed_from_u64(3);

        for _ in 0..200 {
            let delay = draw_interval(&range, &mut rng);
            assert!(delay >= Duration::from_secs(10) && delay <= Duration::from_secs(30));
        }
    }

    #[test]
    fn side_is_biased_toward_buys() {
        let mut rng = StdRng::seed_from_u64(11);
        let buys = (0..10_000)
            .filter(|_| draw_side(&mut rng) == Side::Buy)
            .count();
        assert!((5_700..=6_300).contains(&buys), "buys = {}", buys);
    }

    #[test]
    fn sell_amount_truncates() {
        assert_eq!(sell_amount(U256::from(1000), 37), U256::from(370));
        assert_eq!(sell_amount(U256::from(2), 10), U256::ZERO);
        assert_eq!(sell_amount(U256::from(999), 100), U256::from(999));
    }
}
