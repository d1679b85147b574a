//! Periodic background refresh of account info and buy quotes

use crate::{coordinator::Coordinator, store::Store};
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Runs an async task on a fixed interval in the background
///
/// A tick that comes due while the previous run is still in flight is
/// skipped, so runs never overlap.
pub struct Heartbeater {
    name: &'static str,
    perform_immediately_on_start: bool,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl Heartbeater {
    pub fn new(name: &'static str, perform_immediately_on_start: bool) -> Self {
        Self {
            name,
            perform_immediately_on_start,
            handle: Mutex::new(None),
        }
    }

    /// Starts the background task; does nothing if already running
    ///
    /// # Arguments
    /// * `period` - Time between runs, must be non-zero
    /// * `task` - Produces the future to run on each tick
    pub fn start<F, Fut>(&self, period: Duration, task: F)
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        if period.is_zero() {
            tracing::warn!(heartbeat = self.name, "Refusing to start heartbeat with a zero period");
            return;
        }

        let mut handle = match self.handle.lock() {
            Ok(handle) => handle,
            Err(poisoned) => poisoned.into_inner(),
        };
        if handle.as_ref().is_some_and(|h| !h.is_finished()) {
            tracing::warn!(heartbeat = self.name, "Heartbeat already running");
            return;
        }

        let name = self.name;
        let first_tick = if self.perform_immediately_on_start {
            Instant::now()
        } else {
            Instant::now() + period
        };

        *handle = Some(tokio::spawn(async move {
            tracing::info!(heartbeat = name, period_ms = period.as_millis() as u64, "Starting heartbeat");

            let mut ticker = interval_at(first_tick, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                task().await;
            }
        }));
    }

    /// Stops the background task
    pub fn stop(&self) {
        let handle = match self.handle.lock() {
            Ok(mut handle) => handle.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        if let Some(handle) = handle {
            tracing::info!(heartbeat = self.name, "Stopping heartbeat");
            handle.abort();
        }
    }

    pub fn is_running(&self) -> bool {
        match self.handle.lock() {
            Ok(handle) => handle.as_ref().is_some_and(|h| !h.is_finished()),
            Err(_) => false,
        }
    }
}

impl Drop for Heartbeater {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Heartbeat that polls the wallet for account changes
pub fn account_heartbeat(
    coordinator: Coordinator,
    store: Arc<Store>,
    period: Duration,
    perform_immediately_on_start: bool,
) -> Heartbeater {
    let heartbeater = Heartbeater::new("account", perform_immediately_on_start);
    heartbeater.start(period, move || {
        let coordinator = coordinator.clone();
        let store = store.clone();
        async move {
            let state = store.state().await;
            coordinator
                .fetch_account_info(&state.provider_state, false, false)
                .await;
        }
    });
    heartbeater
}

/// Heartbeat that keeps the latest buy quote fresh
pub fn buy_quote_heartbeat(
    coordinator: Coordinator,
    store: Arc<Store>,
    period: Duration,
    perform_immediately_on_start: bool,
) -> Heartbeater {
    let heartbeater = Heartbeater::new("buy_quote", perform_immediately_on_start);
    heartbeater.start(period, move || {
        let coordinator = coordinator.clone();
        let store = store.clone();
        async move {
            let state = store.state().await;
            coordinator.fetch_current_buy_quote(&state, false).await;
        }
    });
    heartbeater
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::Action;
    use crate::error_flasher::ErrorFlasher;
    use crate::provider::{
        mock::{provider_state, MockAssetBuyer, MockPriceProvider, MockWallet},
        WalletCapabilities,
    };
    use crate::state::State;
    use crate::types::{Account, AssetMetaDataMap, Network};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test(start_paused = true)]
    async fn test_runs_periodically_until_stopped() {
        let runs = Arc::new(AtomicUsize::new(0));
        let heartbeater = Heartbeater::new("test", true);

        let counter = runs.clone();
        heartbeater.start(Duration::from_secs(5), move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });
        assert!(heartbeater.is_running());

        tokio::time::sleep(Duration::from_millis(10_500)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 3);

        heartbeater.stop();
        tokio::time::sleep(Duration::from_secs(20)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 3);
        assert!(!heartbeater.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_delayed_start_and_double_start() {
        let runs = Arc::new(AtomicUsize::new(0));
        let heartbeater = Heartbeater::new("test", false);

        for _ in 0..2 {
            let counter = runs.clone();
            heartbeater.start(Duration::from_secs(5), move || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                }
            });
        }

        tokio::time::sleep(Duration::from_secs(4)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_period_does_not_start() {
        let runs = Arc::new(AtomicUsize::new(0));
        let heartbeater = Heartbeater::new("test", true);

        let counter = runs.clone();
        heartbeater.start(Duration::ZERO, move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });

        assert!(!heartbeater.is_running());
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_account_heartbeat_updates_store() {
        let wallet = Arc::new(MockWallet::new(WalletCapabilities::standard()));
        wallet.set_addresses(&["0xabc"]);
        wallet.set_balance("0xabc", 9);
        let buyer = Arc::new(MockAssetBuyer::new());

        let store = Store::start(State::new(
            Network::Mainnet,
            provider_state(wallet.clone(), buyer),
            AssetMetaDataMap::new(),
        ));
        let mut applied = store.subscribe();
        let coordinator = Coordinator::new(
            Arc::new(MockPriceProvider::with_price(1.0)),
            Arc::new(ErrorFlasher::default()),
            store.dispatcher(),
        );

        let heartbeater = account_heartbeat(coordinator, store.clone(), Duration::from_secs(60), true);

        assert_eq!(
            applied.recv().await.unwrap(),
            Action::set_account_state_ready("0xabc")
        );
        assert_eq!(
            applied.recv().await.unwrap(),
            Action::update_account_eth_balance("0xabc", 9)
        );
        heartbeater.stop();

        assert_eq!(
            store.state().await.provider_state.account,
            Account::Ready {
                address: "0xabc".to_string(),
                eth_balance_in_wei: Some(9),
            }
        );
    }
}
