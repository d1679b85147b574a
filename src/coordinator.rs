//! Fetch-then-dispatch coordinators
//!
//! Each entry point fetches from an external provider and turns the outcome
//! into actions. Failures never reach the caller: they become an error flash
//! plus a fallback value, a silent state transition, or nothing at all.
//!
//! ```text
//! fetch_eth_price          -> UPDATE_ETH_USD_PRICE (0 on failure, with flash)
//! fetch_available_assets   -> SET_AVAILABLE_ASSETS ([] on failure, with flash)
//! fetch_account_info       -> SET_ACCOUNT_STATE_* ─spawn─> fetch_account_balance
//! fetch_account_balance    -> UPDATE_ACCOUNT_ETH_BALANCE (nothing on failure)
//! fetch_current_buy_quote  -> QuoteUpdater (when the quote preconditions hold)
//! ```

use crate::{
    actions::Action,
    assets::create_assets_from_asset_datas,
    constants::{ERROR_FETCHING_ETH_PRICE, ERROR_NO_ASSETS, ETH_USD_PRICE_ZERO},
    error_flasher::ErrorFlasher,
    provider::{PriceProvider, ProviderState},
    quote_updater::{BuyQuoteUpdater, QuoteUpdater},
    state::State,
    store::DispatchHandle,
    types::{Account, AssetProxyId, OrderProcessState},
};
use std::sync::Arc;

/// Async coordinators for the widget state
///
/// Cheap to clone; clones share the same collaborators.
#[derive(Clone)]
pub struct Coordinator {
    price_provider: Arc<dyn PriceProvider>,
    quote_updater: Arc<dyn QuoteUpdater>,
    error_flasher: Arc<ErrorFlasher>,
    dispatch: DispatchHandle,
}

impl Coordinator {
    /// Creates coordinators using the default quote updater
    pub fn new(
        price_provider: Arc<dyn PriceProvider>,
        error_flasher: Arc<ErrorFlasher>,
        dispatch: DispatchHandle,
    ) -> Self {
        let quote_updater = Arc::new(BuyQuoteUpdater::new(error_flasher.clone()));
        Self::with_quote_updater(price_provider, quote_updater, error_flasher, dispatch)
    }

    /// Creates coordinators with a custom quote updater
    pub fn with_quote_updater(
        price_provider: Arc<dyn PriceProvider>,
        quote_updater: Arc<dyn QuoteUpdater>,
        error_flasher: Arc<ErrorFlasher>,
        dispatch: DispatchHandle,
    ) -> Self {
        Self {
            price_provider,
            quote_updater,
            error_flasher,
            dispatch,
        }
    }

    /// Returns the dispatch handle the coordinators write to
    pub fn dispatcher(&self) -> &DispatchHandle {
        &self.dispatch
    }

    /// Fetches the ETH/USD price
    ///
    /// On failure flashes an error and dispatches a zero price so the price
    /// is never left undefined.
    pub async fn fetch_eth_price(&self) {
        match self.price_provider.fetch_eth_usd_price().await {
            Ok(price) => {
                tracing::debug!(
                    price_usd = price,
                    provider = self.price_provider.provider_name(),
                    "Fetched ETH/USD price"
                );
                self.dispatch.dispatch(Action::update_eth_usd_price(price));
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    provider = self.price_provider.provider_name(),
                    "Failed to fetch ETH/USD price"
                );
                self.error_flasher
                    .flash_new_error_message(&self.dispatch, ERROR_FETCHING_ETH_PRICE);
                self.dispatch
                    .dispatch(Action::update_eth_usd_price(ETH_USD_PRICE_ZERO));
            }
        }
    }

    /// Fetches the buyable assets for the current network
    ///
    /// On failure flashes an error and dispatches an empty list.
    pub async fn fetch_available_assets(&self, state: &State) {
        let asset_buyer = &state.provider_state.asset_buyer;
        match asset_buyer.get_available_asset_datas().await {
            Ok(asset_datas) => {
                let assets = create_assets_from_asset_datas(
                    &asset_datas,
                    &state.asset_meta_data_map,
                    state.network,
                );
                tracing::debug!(
                    asset_datas = asset_datas.len(),
                    assets = assets.len(),
                    "Fetched available assets"
                );
                self.dispatch.dispatch(Action::set_available_assets(assets));
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch available assets");
                self.error_flasher
                    .flash_new_error_message(&self.dispatch, ERROR_NO_ASSETS);
                self.dispatch.dispatch(Action::set_available_assets(Vec::new()));
            }
        }
    }

    /// Refreshes the account status from the wallet
    ///
    /// When an address is found, a balance fetch for it is spawned and not
    /// awaited: its dispatch may land before or after this call returns.
    ///
    /// # Arguments
    /// * `provider_state` - Wallet connection to query
    /// * `should_attempt_unlock` - Ask a gated wallet for access
    /// * `should_set_to_loading` - Show the loading state while querying
    pub async fn fetch_account_info(
        &self,
        provider_state: &ProviderState,
        should_attempt_unlock: bool,
        should_set_to_loading: bool,
    ) {
        if should_set_to_loading && !provider_state.account.is_loading() {
            self.dispatch.dispatch(Action::SetAccountStateLoading);
        }

        let use_gated_access =
            should_attempt_unlock && provider_state.provider.capabilities().gated_enumeration;
        let available_addresses = if use_gated_access {
            provider_state.provider.request_access().await
        } else {
            provider_state.chain.list_addresses().await
        };

        let available_addresses = match available_addresses {
            Ok(addresses) => addresses,
            Err(e) => {
                tracing::debug!(
                    error = %e,
                    gated = use_gated_access,
                    provider = %provider_state.name,
                    "Could not enumerate addresses, account locked"
                );
                self.dispatch.dispatch(Action::SetAccountStateLocked);
                return;
            }
        };

        match available_addresses.into_iter().next() {
            Some(active_address) => {
                self.dispatch
                    .dispatch(Action::set_account_state_ready(active_address.clone()));

                let ready_state = provider_state.with_account(Account::ready(active_address));
                let this = self.clone();
                tokio::spawn(async move {
                    this.fetch_account_balance(&ready_state).await;
                });
            }
            None => {
                tracing::debug!(provider = %provider_state.name, "No addresses available, account locked");
                self.dispatch.dispatch(Action::SetAccountStateLocked);
            }
        }
    }

    /// Fetches the ETH balance of the current account
    ///
    /// Failures leave the stored balance untouched and dispatch nothing.
    /// Account readiness is not checked; an account without an address has
    /// nothing to query.
    pub async fn fetch_account_balance(&self, provider_state: &ProviderState) {
        let Some(address) = provider_state.account.address() else {
            tracing::debug!(account = ?provider_state.account, "No address to fetch balance for");
            return;
        };

        match provider_state.chain.get_balance_in_wei(address).await {
            Ok(eth_balance_in_wei) => {
                tracing::debug!(address = %address, eth_balance_in_wei, "Fetched account balance");
                self.dispatch
                    .dispatch(Action::update_account_eth_balance(address, eth_balance_in_wei));
            }
            Err(e) => {
                tracing::debug!(address = %address, error = %e, "Failed to fetch balance, keeping previous");
            }
        }
    }

    /// Refreshes the buy quote for the selected asset and amount
    ///
    /// Does nothing unless an amount and an ERC20 asset are selected and no
    /// order is in progress.
    pub async fn fetch_current_buy_quote(&self, state: &State, should_set_pending: bool) {
        let (Some(amount), Some(asset)) = (state.selected_asset_amount, &state.selected_asset)
        else {
            return;
        };
        if state.buy_order_state.process_state != OrderProcessState::None
            || asset.asset_proxy_id() != AssetProxyId::ERC20
        {
            return;
        }

        self.quote_updater
            .update_buy_quote(
                state.provider_state.asset_buyer.clone(),
                self.dispatch.clone(),
                asset.clone(),
                amount,
                should_set_pending,
                state.affiliate_info.clone(),
            )
            .await;
    }
}
