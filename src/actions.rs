//! State transitions submitted to the store
//!
//! Actions are plain data: they carry no behavior and are applied exactly
//! once by the store's reducer.

use crate::types::{Asset, BuyOrderState, BuyQuote, UnitAmount};
use serde::{Deserialize, Serialize};

/// A single state transition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    /// New ETH/USD price; zero when the feed is unavailable
    UpdateEthUsdPrice(f64),
    /// Replaces the list of buyable assets
    SetAvailableAssets(Vec<Asset>),
    SetAccountStateLoading,
    SetAccountStateLocked,
    /// Account is ready with the given active address
    SetAccountStateReady(String),
    UpdateAccountEthBalance {
        address: String,
        #[serde(with = "crate::types::wei")]
        eth_balance_in_wei: u128,
    },
    UpdateSelectedAsset(Asset),
    UpdateSelectedAssetAmount(Option<UnitAmount>),
    UpdateBuyOrderState(BuyOrderState),
    SetQuoteRequestStatePending,
    SetQuoteRequestStateFailure,
    UpdateLatestBuyQuote(BuyQuote),
    /// Shows a transient error message
    SetErrorMessage(String),
    HideError,
}

impl Action {
    pub fn update_eth_usd_price(price: f64) -> Self {
        Action::UpdateEthUsdPrice(price)
    }

    pub fn set_available_assets(assets: Vec<Asset>) -> Self {
        Action::SetAvailableAssets(assets)
    }

    pub fn set_account_state_ready(address: impl Into<String>) -> Self {
        Action::SetAccountStateReady(address.into())
    }

    pub fn update_account_eth_balance(address: impl Into<String>, eth_balance_in_wei: u128) -> Self {
        Action::UpdateAccountEthBalance {
            address: address.into(),
            eth_balance_in_wei,
        }
    }

    pub fn set_error_message(message: impl Into<String>) -> Self {
        Action::SetErrorMessage(message.into())
    }

    /// Get the action type as string
    pub fn kind(&self) -> &'static str {
        match self {
            Action::UpdateEthUsdPrice(_) => "UPDATE_ETH_USD_PRICE",
            Action::SetAvailableAssets(_) => "SET_AVAILABLE_ASSETS",
            Action::SetAccountStateLoading => "SET_ACCOUNT_STATE_LOADING",
            Action::SetAccountStateLocked => "SET_ACCOUNT_STATE_LOCKED",
            Action::SetAccountStateReady(_) => "SET_ACCOUNT_STATE_READY",
            Action::UpdateAccountEthBalance { .. } => "UPDATE_ACCOUNT_ETH_BALANCE",
            Action::UpdateSelectedAsset(_) => "UPDATE_SELECTED_ASSET",
            Action::UpdateSelectedAssetAmount(_) => "UPDATE_SELECTED_ASSET_AMOUNT",
            Action::UpdateBuyOrderState(_) => "UPDATE_BUY_ORDER_STATE",
            Action::SetQuoteRequestStatePending => "SET_QUOTE_REQUEST_STATE_PENDING",
            Action::SetQuoteRequestStateFailure => "SET_QUOTE_REQUEST_STATE_FAILURE",
            Action::UpdateLatestBuyQuote(_) => "UPDATE_LATEST_BUY_QUOTE",
            Action::SetErrorMessage(_) => "SET_ERROR_MESSAGE",
            Action::HideError => "HIDE_ERROR",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::UpdateEthUsdPrice(price) => write!(f, "{} ${:.2}", self.kind(), price),
            Action::SetAvailableAssets(assets) => write!(f, "{} ({})", self.kind(), assets.len()),
            Action::SetAccountStateReady(address) => write!(f, "{} {}", self.kind(), address),
            Action::UpdateAccountEthBalance { address, .. } => {
                write!(f, "{} {}", self.kind(), address)
            }
            Action::SetErrorMessage(message) => write!(f, "{} {:?}", self.kind(), message),
            _ => f.write_str(self.kind()),
        }
    }
}
