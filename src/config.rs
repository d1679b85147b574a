//! Runtime configuration
//!
//! Defaults come from `constants`; `SyncConfig::from_env` applies overrides
//! from `INSTANT_*` environment variables.

use crate::{
    constants::{
        ACCOUNT_HEARTBEAT_INTERVAL, BUY_QUOTE_HEARTBEAT_INTERVAL, COINBASE_ETH_USD_PRICE_URL,
        DEFAULT_RPC_URL, ERROR_FLASH_DURATION, REQUEST_TIMEOUT_SECS,
    },
    types::Network,
};
use std::time::Duration;

/// Configuration for the providers and background tasks
#[derive(Debug, Clone, PartialEq)]
pub struct SyncConfig {
    pub network: Network,
    pub price_api_url: String,
    pub rpc_url: String,
    pub request_timeout: Duration,
    pub error_flash_duration: Duration,
    pub account_heartbeat_interval: Duration,
    pub buy_quote_heartbeat_interval: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            network: Network::Mainnet,
            price_api_url: COINBASE_ETH_USD_PRICE_URL.to_string(),
            rpc_url: DEFAULT_RPC_URL.to_string(),
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            error_flash_duration: ERROR_FLASH_DURATION,
            account_heartbeat_interval: ACCOUNT_HEARTBEAT_INTERVAL,
            buy_quote_heartbeat_interval: BUY_QUOTE_HEARTBEAT_INTERVAL,
        }
    }
}

impl SyncConfig {
    /// Builds a config from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable lookup
    ///
    /// Unparseable values are logged and replaced by the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(url) = lookup("INSTANT_PRICE_API_URL") {
            config.price_api_url = url;
        }
        if let Some(url) = lookup("INSTANT_RPC_URL") {
            config.rpc_url = url;
        }
        if let Some(raw) = lookup("INSTANT_NETWORK_ID") {
            match raw.parse::<u64>().ok().and_then(Network::from_chain_id) {
                Some(network) => config.network = network,
                None => tracing::warn!(value = %raw, "Unsupported INSTANT_NETWORK_ID, using mainnet"),
            }
        }
        if let Some(raw) = lookup("INSTANT_REQUEST_TIMEOUT_SECS") {
            match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => config.request_timeout = Duration::from_secs(secs),
                _ => tracing::warn!(
                    value = %raw,
                    default_secs = REQUEST_TIMEOUT_SECS,
                    "Invalid INSTANT_REQUEST_TIMEOUT_SECS, using default"
                ),
            }
        }

        config
    }
}
