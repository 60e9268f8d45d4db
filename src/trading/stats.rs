//! Session statistics

use super::{Side, TradeResult};
use crate::units;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

/// Trade counts and base-currency totals for one session
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VolumeStats {
    pub total_trades: u64,
    /// BNB spent on buys
    pub total_volume: Decimal,
    pub buys: u64,
    pub sells: u64,
    /// Quoted BNB proceeds of sells minus BNB spent on buys, gas excluded
    pub profit_loss: Decimal,
    pub started_at: Option<DateTime<Utc>>,
    pub last_trade_at: Option<DateTime<Utc>>,
}

/// Single-writer accumulator owned by the running session
#[derive(Debug, Default)]
pub struct StatsAggregator {
    stats: VolumeStats,
}

impl StatsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_started(&mut self) {
        self.stats.started_at = Some(Utc::now());
    }

    /// Record a confirmed trade
    pub fn record(&mut self, trade: &TradeResult) {
        let stats = &mut self.stats;
        stats.total_trades += 1;
        stats.last_trade_at = Some(Utc::now());

        match trade.side {
            Side::Buy => {
                stats.buys += 1;
                let spent = units::from_wei(trade.amount_in).unwrap_or_default();
                stats.total_volume += spent;
                stats.profit_loss -= spent;
            }
            Side::Sell => {
                stats.sells += 1;
                stats.profit_loss += units::from_wei(trade.quoted_out).unwrap_or_default();
            }
        }
    }

    /// Copy of the current totals
    pub fn snapshot(&self) -> VolumeStats {
        self.stats.clone()
    }

    pub fn reset(&mut self) {
        self.stats = VolumeStats::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{Address, TxHash, U256};
    use rust_decimal_macros::dec;

    fn trade(side: Side, amount_in: U256, quoted_out: U256) -> TradeResult {
        TradeResult {
            side,
            token: Address::ZERO,
            wallet: Address::ZERO,
            amount_in,
            quoted_out,
            tx_hash: TxHash::ZERO,
        }
    }

    fn wei(amount: rust_decimal::Decimal) -> U256 {
        units::to_wei(amount).unwrap()
    }

    #[test]
    fn counts_volume_and_profit_loss() {
        let mut stats = StatsAggregator::new();
        stats.record(&trade(Side::Buy, wei(dec!(0.5)), U256::from(1_000)));
        stats.record(&trade(Side::Buy, wei(dec!(0.25)), U256::from(1_000)));
        stats.record(&trade(Side::Sell, U256::from(500), wei(dec!(0.3))));

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.total_trades, 3);
        assert_eq!(snapshot.buys, 2);
        assert_eq!(snapshot.sells, 1);
        assert_eq!(snapshot.total_trades, snapshot.buys + snapshot.sells);
        assert_eq!(snapshot.total_volume, dec!(0.75));
        assert_eq!(snapshot.profit_loss, dec!(-0.45));
        assert!(snapshot.last_trade_at.is_some());
    }

    #[test]
    fn snapshot_is_a_copy() {
        let mut stats = StatsAggregator::new();
        let before = stats.snapshot();
        stats.record(&trade(Side::Buy, wei(dec!(1)), U256::ZERO));

        assert_eq!(before.total_trades, 0);
        assert_eq!(stats.snapshot().total_trades, 1);
    }

    #[test]
    fn reset_zeroes_everything() {
        let mut stats = StatsAggregator::new();
        stats.mark_started();
        stats.record(&trade(Side::Sell, U256::from(1), wei(dec!(2))));
        stats.reset();

        assert_eq!(stats.snapshot(), VolumeStats::default());
    }
}
