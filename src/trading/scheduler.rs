//! Randomized volume loop
//!
//! A [`VolumeSession`] runs one cycle at a time on the calling task: pick a
//! wallet, pick a side, trade, record, sleep. Stopping is cooperative and is
//! only observed at the top of a cycle, so an in-flight trade always runs to
//! confirmation.

use super::sampling::{draw_buy_amount, draw_interval, draw_sell_percentage, draw_side};
use super::{Side, StatsAggregator, TradeExecutor, TradeOutcome, VenueRouter, VolumeStats};
use crate::config::TradingConfig;
use crate::units::short;
use crate::wallet::WalletPool;
use crate::{Error, Result};
use alloy::primitives::Address;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

/// Extra delay after a failed trade, before the regular interval
pub const FAILURE_BACKOFF: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SessionState {
    Idle = 0,
    Running = 1,
    Stopping = 2,
    Stopped = 3,
}

impl SessionState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => SessionState::Idle,
            1 => SessionState::Running,
            2 => SessionState::Stopping,
            _ => SessionState::Stopped,
        }
    }
}

#[derive(Debug)]
struct ControlState {
    state: AtomicU8,
    stop_requested: AtomicBool,
}

/// Cloneable stop control for a running session
///
/// Safe to hand to a signal handler: it only flips flags and never touches
/// wallets or statistics.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    inner: Arc<ControlState>,
}

impl SessionHandle {
    fn new() -> Self {
        Self {
            inner: Arc::new(ControlState {
                state: AtomicU8::new(SessionState::Idle as u8),
                stop_requested: AtomicBool::new(false),
            }),
        }
    }

    /// Ask the session to stop at the next cycle boundary
    pub fn stop(&self) {
        self.inner.stop_requested.store(true, Ordering::SeqCst);
        let _ = self.inner.state.compare_exchange(
            SessionState::Running as u8,
            SessionState::Stopping as u8,
            Ordering::SeqCst,
            Ordering::SeqCst,
        );
    }

    pub fn state(&self) -> SessionState {
        SessionState::from_u8(self.inner.state.load(Ordering::SeqCst))
    }

    pub fn stop_requested(&self) -> bool {
        self.inner.stop_requested.load(Ordering::SeqCst)
    }

    fn start(&self) -> bool {
        self.inner
            .state
            .compare_exchange(
                SessionState::Idle as u8,
                SessionState::Running as u8,
                Ordering::SeqCst,
                Ordering::SeqCst,
            )
            .is_ok()
    }

    fn finish(&self) {
        self.inner
            .state
            .store(SessionState::Stopped as u8, Ordering::SeqCst);
    }
}

/// State of one volume-boosting run
pub struct VolumeSession {
    id: Uuid,
    wallets: Arc<WalletPool>,
    router: VenueRouter,
    trading: TradingConfig,
    stats: StatsAggregator,
    rng: StdRng,
    handle: SessionHandle,
    cycles: u64,
}

impl VolumeSession {
    pub fn new(wallets: Arc<WalletPool>, router: VenueRouter, trading: TradingConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            wallets,
            router,
            trading,
            stats: StatsAggregator::new(),
            rng: StdRng::from_entropy(),
            handle: SessionHandle::new(),
            cycles: 0,
        }
    }

    /// Use a deterministic RNG for wallet, side, amount and delay draws
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn handle(&self) -> SessionHandle {
        self.handle.clone()
    }

    pub fn state(&self) -> SessionState {
        self.handle.state()
    }

    pub fn stop(&self) {
        self.handle.stop();
    }

    pub fn stats(&self) -> VolumeStats {
        self.stats.snapshot()
    }

    pub fn reset_stats(&mut self) {
        self.stats.reset();
    }

    /// Cycles started so far, including skipped and failed ones
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Trade `token` until stopped or until `duration` has elapsed
    ///
    /// Fails only before the first cycle: when the session was already run,
    /// or when no venue can trade the token.
    pub async fn run(&mut self, token: Address, duration: Option<Duration>) -> Result<VolumeStats> {
        if !self.handle.start() {
            return Err(Error::InvalidArgument(format!(
                "Session {} cannot be started from state {:?}",
                self.id,
                self.handle.state()
            )));
        }

        let span = tracing::info_span!("volume_session", session = %self.id, token = %short(&token, 10));
        let result = self.run_cycles(token, duration).instrument(span).await;

        self.handle.finish();
        result
    }

    async fn run_cycles(&mut self, token: Address, duration: Option<Duration>) -> Result<VolumeStats> {
        let wallets = Arc::clone(&self.wallets);

        let gateway = self.router.resolve(token, wallets.get(0)?).await?;
        let executor = TradeExecutor::new(gateway, self.trading.slippage_tolerance);

        tracing::info!(
            venue = %executor.venue(),
            wallets = wallets.len(),
            duration_secs = duration.map(|d| d.as_secs()),
            "Starting volume boost"
        );

        let started = Instant::now();
        self.stats.mark_started();

        loop {
            if self.handle.stop_requested() {
                tracing::info!("Stop requested");
                break;
            }
            if duration.is_some_and(|d| started.elapsed() >= d) {
                tracing::info!("Session duration reached");
                break;
            }
            self.cycles += 1;

            let wallet = wallets.random_with(&mut self.rng);
            let side = draw_side(&mut self.rng);

            let outcome = match side {
                Side::Buy => {
                    let amount = draw_buy_amount(&self.trading.buy_amount, &mut self.rng);
                    executor
                        .buy(token, amount, wallet)
                        .await
                        .map(TradeOutcome::Executed)
                }
                Side::Sell => {
                    let percentage = draw_sell_percentage(&self.trading.sell_percentage, &mut self.rng);
                    executor.sell(token, percentage, wallet).await
                }
            };

            match outcome {
                Ok(TradeOutcome::Executed(trade)) => self.stats.record(&trade),
                Ok(TradeOutcome::Skipped(reason)) => {
                    tracing::debug!(wallet = %wallet.address(), %reason, "Trade skipped");
                }
                Err(e) => {
                    tracing::error!(
                        venue = %executor.venue(),
                        %side,
                        wallet = %wallet.address(),
                        error = %e,
                        "Trade failed"
                    );
                    tokio::time::sleep(FAILURE_BACKOFF).await;
                }
            }

            let delay = draw_interval(&self.trading.interval, &mut self.rng);
            tracing::debug!(delay_ms = delay.as_millis() as u64, "Waiting for next trade");
            tokio::time::sleep(delay).await;
        }

        let stats = self.stats.snapshot();
        tracing::info!(
            cycles = self.cycles,
            trades = stats.total_trades,
            buys = stats.buys,
            sells = stats.sells,
            volume = %stats.total_volume,
            profit_loss = %stats.profit_loss,
            "Volume boost finished"
        );
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IntervalRange;
    use crate::gateway::testing::MockGateway;
    use crate::gateway::{ExchangeGateway, Venue};
    use crate::wallet::testing::test_pool;
    use alloy::primitives::U256;

    const TOKEN: Address = Address::repeat_byte(0x70);

    fn fixed_interval(ms: u64) -> TradingConfig {
        TradingConfig {
            interval: IntervalRange {
                min_ms: ms,
                max_ms: ms,
            },
            ..TradingConfig::default()
        }
    }

    /// Session whose token has no AMM pool and trades on a mock bonding curve
    fn session(trading: TradingConfig) -> (Arc<MockGateway>, VolumeSession) {
        let amm = Arc::new(MockGateway::new(Venue::Amm));
        let curve = Arc::new(MockGateway::new(Venue::BondingCurve));
        let router = VenueRouter::new(amm, Some(Arc::clone(&curve) as Arc<dyn ExchangeGateway>));
        let session = VolumeSession::new(Arc::new(test_pool(3)), router, trading).with_seed(7);
        (curve, session)
    }

    #[tokio::test(start_paused = true)]
    async fn duration_bounds_the_number_of_cycles() {
        let (_, mut session) = session(fixed_interval(10_000));

        session.run(TOKEN, Some(Duration::from_secs(60))).await.unwrap();

        assert_eq!(session.cycles(), 6);
        assert_eq!(session.state(), SessionState::Stopped);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_duration_runs_no_cycles() {
        let (curve, mut session) = session(fixed_interval(10_000));

        let stats = session.run(TOKEN, Some(Duration::ZERO)).await.unwrap();

        assert_eq!(session.cycles(), 0);
        assert_eq!(stats.total_trades, 0);
        assert!(curve.state.lock().unwrap().buys.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn stop_before_start_exits_immediately() {
        let (_, mut session) = session(fixed_interval(10_000));
        session.stop();
        assert_eq!(session.state(), SessionState::Idle);

        session.run(TOKEN, None).await.unwrap();

        assert_eq!(session.cycles(), 0);
        assert_eq!(session.state(), SessionState::Stopped);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_is_observed_at_the_next_cycle() {
        let (_, mut session) = session(fixed_interval(10_000));
        let handle = session.handle();

        let stopper = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(25)).await;
            handle.stop();
            handle.state()
        });

        session.run(TOKEN, None).await.unwrap();

        assert_eq!(stopper.await.unwrap(), SessionState::Stopping);
        assert_eq!(session.cycles(), 3);
        assert_eq!(session.state(), SessionState::Stopped);
    }

    #[tokio::test(start_paused = true)]
    async fn counters_match_successful_trades() {
        let (curve, mut session) = session(fixed_interval(1_000));

        let stats = session.run(TOKEN, Some(Duration::from_secs(100))).await.unwrap();

        let state = curve.state.lock().unwrap();
        assert_eq!(session.cycles(), 100);
        assert_eq!(stats.buys, state.buys.len() as u64);
        assert_eq!(stats.sells, state.sells.len() as u64);
        assert_eq!(stats.total_trades, stats.buys + stats.sells);
        assert!(stats.buys > 0);
        // Early sells from wallets that never bought are skipped, not counted
        assert!(stats.total_trades <= session.cycles());
    }

    #[tokio::test(start_paused = true)]
    async fn failures_back_off_before_the_interval() {
        let (curve, mut session) = session(fixed_interval(10_000));
        {
            let mut state = curve.state.lock().unwrap();
            state.fail_buys = true;
            state.fail_balance = true;
        }

        let stats = session.run(TOKEN, Some(Duration::from_secs(60))).await.unwrap();

        // Each failed cycle takes 5 s + 10 s
        assert_eq!(session.cycles(), 4);
        assert_eq!(stats.total_trades, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn amm_is_used_when_priced() {
        let amm = Arc::new(MockGateway::new(Venue::Amm).with_unit_price(Some(U256::from(5))));
        let router = VenueRouter::new(Arc::clone(&amm) as Arc<dyn ExchangeGateway>, None);
        let mut session =
            VolumeSession::new(Arc::new(test_pool(1)), router, fixed_interval(10_000)).with_seed(1);

        let stats = session.run(TOKEN, Some(Duration::from_secs(30))).await.unwrap();

        let state = amm.state.lock().unwrap();
        assert_eq!(state.price_calls, 1);
        assert_eq!(stats.total_trades, (state.buys.len() + state.sells.len()) as u64);
    }

    #[tokio::test(start_paused = true)]
    async fn venue_is_detected_with_the_first_wallet() {
        let amm = Arc::new(MockGateway::new(Venue::Amm).with_unit_price(Some(U256::from(5))));
        let router = VenueRouter::new(Arc::clone(&amm) as Arc<dyn ExchangeGateway>, None);
        let pool = Arc::new(test_pool(3));
        let first = pool.all()[0].address();
        let mut session = VolumeSession::new(pool, router, fixed_interval(10_000)).with_seed(3);

        session.run(TOKEN, Some(Duration::ZERO)).await.unwrap();

        assert_eq!(amm.state.lock().unwrap().priced_by, vec![first]);
    }

    #[tokio::test]
    async fn missing_factory_fails_and_cannot_restart() {
        let amm = Arc::new(MockGateway::new(Venue::Amm));
        let router = VenueRouter::new(amm, None);
        let mut session = VolumeSession::new(Arc::new(test_pool(1)), router, fixed_interval(10));

        let err = session.run(TOKEN, None).await.unwrap_err();
        assert!(matches!(err, Error::Initialization(_)));
        assert_eq!(session.state(), SessionState::Stopped);

        assert!(matches!(
            session.run(TOKEN, None).await,
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn sessions_get_distinct_ids() {
        let (_, a) = session(TradingConfig::default());
        let (_, b) = session(TradingConfig::default());
        assert_ne!(a.id(), b.id());
    }
}
