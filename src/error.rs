//! Error types for the widget state synchronization layer
//!
//! None of these ever escape a coordinator: they are logged and turned into
//! a fallback state or an error flash.

use thiserror::Error;

/// Errors that can occur when talking to an external provider
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Network request failed
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// Invalid response from provider
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Provider API error
    #[error("Provider API error: {0}")]
    ApiError(String),

    /// JSON-RPC error returned by the wallet provider
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// The user (or the provider) refused access to the accounts
    #[error("Permission denied: {0}")]
    PermissionDenied(String),
}

impl ProviderError {
    /// Creates an InvalidResponse error
    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// Creates a PermissionDenied error
    pub fn permission_denied(msg: impl Into<String>) -> Self {
        Self::PermissionDenied(msg.into())
    }
}

/// Errors reported by the quote computation client
#[derive(Debug, Error)]
pub enum QuoteError {
    /// Not enough orders to fill the requested asset amount
    #[error("Insufficient asset liquidity")]
    InsufficientAssetLiquidity,

    /// Not enough ZRX orders to cover fees
    #[error("Insufficient ZRX liquidity")]
    InsufficientZrxLiquidity,

    /// The order source (standard relayer API) failed
    #[error("Standard relayer API error: {0}")]
    StandardRelayerApi(String),

    /// The requested amount cannot be expressed in base units
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Underlying provider failure
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl QuoteError {
    /// Message flashed to the user for this error
    ///
    /// `symbol` is the formatted symbol of the asset being quoted.
    pub fn user_message(&self, symbol: &str) -> String {
        use crate::constants::{
            ERROR_GENERIC, ERROR_INVALID_AMOUNT, ERROR_NOT_ENOUGH_ZRX, ERROR_NO_ORDERS,
        };

        match self {
            QuoteError::InsufficientAssetLiquidity => format!("Not enough {} available", symbol),
            QuoteError::InsufficientZrxLiquidity => ERROR_NOT_ENOUGH_ZRX.to_string(),
            QuoteError::StandardRelayerApi(_) => ERROR_NO_ORDERS.to_string(),
            QuoteError::InvalidAmount(_) => ERROR_INVALID_AMOUNT.to_string(),
            QuoteError::Provider(_) => ERROR_GENERIC.to_string(),
        }
    }
}
