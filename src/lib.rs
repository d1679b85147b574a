//! # Widget State Sync
//!
//! Asynchronous state synchronization for a token purchase widget: fetches
//! the ETH/USD price, the buyable assets, the wallet account and its balance,
//! and buy quotes, and dispatches the results into an in-memory store.
//!
//! ## Usage
//!
//! ```no_run
//! use instant_sync::{Coordinator, ErrorFlasher, Store, State};
//! use instant_sync::providers::{CoinbaseProvider, JsonRpcWallet};
//! use instant_sync::provider::{AssetBuyer, ProviderState};
//! use instant_sync::types::{AssetMetaDataMap, Network};
//! use std::sync::Arc;
//!
//! # async fn example(asset_buyer: Arc<dyn AssetBuyer>) -> Result<(), Box<dyn std::error::Error>> {
//! let wallet = Arc::new(JsonRpcWallet::new("http://127.0.0.1:8545")?.with_gated_access());
//! let provider_state = ProviderState::new(wallet.clone(), wallet, asset_buyer);
//! let store = Store::start(State::new(Network::Mainnet, provider_state, AssetMetaDataMap::new()));
//!
//! let coordinator = Coordinator::new(
//!     Arc::new(CoinbaseProvider::new()?),
//!     Arc::new(ErrorFlasher::default()),
//!     store.dispatcher(),
//! );
//!
//! coordinator.fetch_eth_price().await;
//! let state = store.state().await;
//! coordinator.fetch_account_info(&state.provider_state, true, true).await;
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Coordinators never return errors. Each failure path ends in exactly one of:
//!
//! - an error flash plus a fallback value (price `0`, empty asset list)
//! - a silent transition (account `Locked`)
//! - nothing at all (balance fetch failures keep the previous balance)
//!
//! ## Ordering
//!
//! The store applies actions one at a time in dispatch order. Within one
//! coordinator call dispatches happen in program order; across calls nothing
//! is ordered. The balance fetch spawned by `fetch_account_info` is not
//! awaited and may complete after the call returns.

pub mod actions;
pub mod assets;
pub mod config;
pub mod constants;
pub mod coordinator;
pub mod error;
pub mod error_flasher;
pub mod heartbeat;
pub mod provider;
pub mod providers;
pub mod quote_updater;
pub mod session;
pub mod state;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use actions::Action;
pub use config::SyncConfig;
pub use coordinator::Coordinator;
pub use error::{ProviderError, QuoteError};
pub use error_flasher::ErrorFlasher;
pub use session::SyncSession;
pub use state::State;
pub use store::{Dispatch, DispatchHandle, Store};
pub use types::{Account, Asset, AssetProxyId, BuyOrderState, OrderProcessState};
