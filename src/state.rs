//! Widget state and the reducer that applies actions to it

use crate::{
    actions::Action,
    provider::ProviderState,
    quote_updater::to_base_unit_amount,
    types::{
        Account, AffiliateInfo, Asset, AssetMetaDataMap, AsyncProcessState, BuyOrderState,
        BuyQuote, DisplayStatus, Network, UnitAmount,
    },
};

/// Complete widget state held by the store
#[derive(Debug, Clone)]
pub struct State {
    pub network: Network,
    pub provider_state: ProviderState,
    pub asset_meta_data_map: AssetMetaDataMap,
    /// `None` until the asset list has been fetched once
    pub available_assets: Option<Vec<Asset>>,
    pub selected_asset: Option<Asset>,
    pub selected_asset_amount: Option<UnitAmount>,
    pub buy_order_state: BuyOrderState,
    pub eth_usd_price: Option<f64>,
    pub latest_buy_quote: Option<BuyQuote>,
    pub quote_request_state: AsyncProcessState,
    pub latest_error_message: Option<String>,
    pub latest_error_display_status: DisplayStatus,
    pub affiliate_info: Option<AffiliateInfo>,
}

impl State {
    /// Creates the initial state for a session
    pub fn new(
        network: Network,
        provider_state: ProviderState,
        asset_meta_data_map: AssetMetaDataMap,
    ) -> Self {
        Self {
            network,
            provider_state,
            asset_meta_data_map,
            available_assets: None,
            selected_asset: None,
            selected_asset_amount: None,
            buy_order_state: BuyOrderState::none(),
            eth_usd_price: None,
            latest_buy_quote: None,
            quote_request_state: AsyncProcessState::None,
            latest_error_message: None,
            latest_error_display_status: DisplayStatus::Hidden,
            affiliate_info: None,
        }
    }

    pub fn with_affiliate_info(mut self, affiliate_info: AffiliateInfo) -> Self {
        self.affiliate_info = Some(affiliate_info);
        self
    }
}

/// Applies one action to the state
pub fn reduce(state: &mut State, action: &Action) {
    match action {
        Action::UpdateEthUsdPrice(price) => state.eth_usd_price = Some(*price),
        Action::SetAvailableAssets(assets) => state.available_assets = Some(assets.clone()),
        Action::SetAccountStateLoading => state.provider_state.account = Account::Loading,
        Action::SetAccountStateLocked => state.provider_state.account = Account::Locked,
        Action::SetAccountStateReady(address) => {
            // Keep a known balance when the active address did not change
            if state.provider_state.account.address() != Some(address.as_str()) {
                state.provider_state.account = Account::ready(address.clone());
            }
        }
        Action::UpdateAccountEthBalance {
            address,
            eth_balance_in_wei,
        } => match &mut state.provider_state.account {
            Account::Ready {
                address: current,
                eth_balance_in_wei: balance,
            } if current == address => *balance = Some(*eth_balance_in_wei),
            _ => {
                tracing::debug!(address = %address, "Dropping balance update for inactive account");
            }
        },
        Action::UpdateSelectedAsset(asset) => state.selected_asset = Some(asset.clone()),
        Action::UpdateSelectedAssetAmount(amount) => state.selected_asset_amount = *amount,
        Action::UpdateBuyOrderState(buy_order_state) => {
            state.buy_order_state = buy_order_state.clone()
        }
        Action::SetQuoteRequestStatePending => {
            state.quote_request_state = AsyncProcessState::Pending
        }
        Action::SetQuoteRequestStateFailure => {
            state.quote_request_state = AsyncProcessState::Failure
        }
        Action::UpdateLatestBuyQuote(quote) => {
            if quote_matches_selection(state, quote) {
                state.latest_buy_quote = Some(quote.clone());
                state.quote_request_state = AsyncProcessState::Success;
            } else {
                tracing::debug!(
                    asset_data = %quote.asset_data,
                    amount = quote.asset_buy_amount,
                    "Dropping quote for a stale selection"
                );
            }
        }
        Action::SetErrorMessage(message) => {
            state.latest_error_message = Some(message.clone());
            state.latest_error_display_status = DisplayStatus::Present;
        }
        Action::HideError => state.latest_error_display_status = DisplayStatus::Hidden,
    }
}

/// Whether a quote was computed for the currently selected asset and amount
///
/// Quote fetches race with selection changes; only a quote for the current
/// selection may land in the state.
fn quote_matches_selection(state: &State, quote: &BuyQuote) -> bool {
    let (Some(asset), Some(amount)) = (&state.selected_asset, state.selected_asset_amount) else {
        return false;
    };
    asset.asset_data == quote.asset_data
        && to_base_unit_amount(amount, asset.decimals().unwrap_or(0))
            .is_ok_and(|base_units| base_units == quote.asset_buy_amount)
}
