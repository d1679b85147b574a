//! Wiring of providers, store, coordinators and heartbeats for one widget session

use crate::{
    config::SyncConfig,
    coordinator::Coordinator,
    error::ProviderError,
    error_flasher::ErrorFlasher,
    heartbeat::{account_heartbeat, buy_quote_heartbeat, Heartbeater},
    provider::{AssetBuyer, ChainClient, PriceProvider, ProviderState, WalletProvider},
    providers::{CoinbaseProvider, JsonRpcWallet},
    state::State,
    store::Store,
    types::AssetMetaDataMap,
};
use std::sync::Arc;

/// A running widget session
///
/// Owns the store and keeps the account and buy quote heartbeats alive
/// until dropped or stopped.
pub struct SyncSession {
    store: Arc<Store>,
    coordinator: Coordinator,
    account_heartbeat: Heartbeater,
    buy_quote_heartbeat: Heartbeater,
}

impl SyncSession {
    /// Starts a session against the Coinbase price feed and a JSON-RPC wallet
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(
        config: &SyncConfig,
        asset_buyer: Arc<dyn AssetBuyer>,
        asset_meta_data_map: AssetMetaDataMap,
    ) -> Result<Self, ProviderError> {
        let price_provider = Arc::new(CoinbaseProvider::with_url(
            &config.price_api_url,
            config.request_timeout,
        )?);
        let wallet = Arc::new(JsonRpcWallet::with_timeout(
            &config.rpc_url,
            config.request_timeout,
        )?);

        Ok(Self::with_providers(
            config,
            price_provider,
            wallet.clone(),
            wallet,
            asset_buyer,
            asset_meta_data_map,
        ))
    }

    /// Starts a session with custom providers
    pub fn with_providers(
        config: &SyncConfig,
        price_provider: Arc<dyn PriceProvider>,
        wallet: Arc<dyn WalletProvider>,
        chain: Arc<dyn ChainClient>,
        asset_buyer: Arc<dyn AssetBuyer>,
        asset_meta_data_map: AssetMetaDataMap,
    ) -> Self {
        let provider_state = ProviderState::new(wallet, chain, asset_buyer);
        let store = Store::start(State::new(
            config.network,
            provider_state,
            asset_meta_data_map,
        ));
        let error_flasher = Arc::new(ErrorFlasher::new(config.error_flash_duration));
        let coordinator = Coordinator::new(price_provider, error_flasher, store.dispatcher());

        tracing::info!(
            network = ?config.network,
            rpc_url = %config.rpc_url,
            "Starting widget sync session"
        );

        let account_heartbeat = account_heartbeat(
            coordinator.clone(),
            store.clone(),
            config.account_heartbeat_interval,
            false,
        );
        let buy_quote_heartbeat = buy_quote_heartbeat(
            coordinator.clone(),
            store.clone(),
            config.buy_quote_heartbeat_interval,
            false,
        );

        Self {
            store,
            coordinator,
            account_heartbeat,
            buy_quote_heartbeat,
        }
    }

    /// Runs the initial fetches: price, available assets and account
    ///
    /// The account fetch shows the loading state and attempts an unlock.
    pub async fn initialize(&self) {
        let state = self.store.state().await;
        tokio::join!(
            self.coordinator.fetch_eth_price(),
            self.coordinator.fetch_available_assets(&state),
            self.coordinator
                .fetch_account_info(&state.provider_state, true, true),
        );
    }

    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    pub fn coordinator(&self) -> &Coordinator {
        &self.coordinator
    }

    /// Stops both heartbeats; the store stays readable
    pub fn stop(&self) {
        self.account_heartbeat.stop();
        self.buy_quote_heartbeat.stop();
    }
}
