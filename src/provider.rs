//! Provider abstractions for the external collaborators of the widget
//!
//! Price feed, wallet and quote computation are all consumed through these
//! traits; concrete HTTP clients live in `providers`.

use crate::{
    error::{ProviderError, QuoteError},
    types::{Account, BuyQuote},
};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

/// Trait for ETH/USD price feeds
#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Fetches the current ETH price in USD
    ///
    /// # Returns
    /// The price of one ETH in USD, or an error if the fetch fails
    async fn fetch_eth_usd_price(&self) -> Result<f64, ProviderError>;

    /// Returns the name of this provider
    fn provider_name(&self) -> &'static str;
}

/// Read access to the chain: address enumeration and balances
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Lists the addresses the wallet currently exposes
    ///
    /// A locked wallet returns an empty list rather than an error.
    ///
    /// # Returns
    /// Addresses in wallet order; the first one is the active account
    async fn list_addresses(&self) -> Result<Vec<String>, ProviderError>;

    /// Fetches the ETH balance of an address, in wei
    ///
    /// # Arguments
    /// * `address` - Hex address to query
    ///
    /// # Returns
    /// The balance in wei, or an error if the query fails
    async fn get_balance_in_wei(&self, address: &str) -> Result<u128, ProviderError>;
}

/// Ways a wallet provider can hand out its addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WalletCapabilities {
    /// The provider hides addresses until the user grants access
    /// (privacy mode), see `WalletProvider::request_access`
    pub gated_enumeration: bool,
}

impl WalletCapabilities {
    /// Only the standard address enumeration is available
    pub fn standard() -> Self {
        Self {
            gated_enumeration: false,
        }
    }

    /// Addresses may be requested through a user-approved access request
    pub fn gated() -> Self {
        Self {
            gated_enumeration: true,
        }
    }
}

/// The connected wallet provider
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Declares which enumeration operations this provider supports
    fn capabilities(&self) -> WalletCapabilities;

    /// Asks the user to grant access to their addresses
    ///
    /// Only called when `capabilities().gated_enumeration` is set.
    ///
    /// # Returns
    /// The granted addresses, or `ProviderError::PermissionDenied` when the
    /// user refuses
    async fn request_access(&self) -> Result<Vec<String>, ProviderError> {
        Err(ProviderError::permission_denied(
            "provider does not support access requests",
        ))
    }

    /// Returns the name of this provider
    fn provider_name(&self) -> &str;
}

/// Quote computation client
#[async_trait]
pub trait AssetBuyer: Send + Sync {
    /// Lists the asset data of every asset that can be bought
    ///
    /// # Returns
    /// Hex-encoded asset data in the order the buyer reports them
    async fn get_available_asset_datas(&self) -> Result<Vec<String>, ProviderError>;

    /// Computes a quote for buying `asset_buy_amount` base units of an asset
    ///
    /// # Arguments
    /// * `asset_data` - Asset data of the asset to buy
    /// * `asset_buy_amount` - Amount to buy, in base units
    /// * `fee_percentage` - Affiliate fee as a fraction, if any
    ///
    /// # Returns
    /// The quote, or a `QuoteError` describing why none is available
    async fn get_buy_quote(
        &self,
        asset_data: &str,
        asset_buy_amount: u128,
        fee_percentage: Option<f64>,
    ) -> Result<BuyQuote, QuoteError>;
}

/// Current wallet connection
#[derive(Clone)]
pub struct ProviderState {
    /// Display name of the provider
    pub name: String,
    /// Account status
    pub account: Account,
    /// Connected provider handle
    pub provider: Arc<dyn WalletProvider>,
    /// Client used for address enumeration and balance queries
    pub chain: Arc<dyn ChainClient>,
    /// Client used for asset discovery and quotes
    pub asset_buyer: Arc<dyn AssetBuyer>,
}

impl ProviderState {
    /// Creates a provider state with the account still loading
    pub fn new(
        provider: Arc<dyn WalletProvider>,
        chain: Arc<dyn ChainClient>,
        asset_buyer: Arc<dyn AssetBuyer>,
    ) -> Self {
        Self {
            name: provider.provider_name().to_string(),
            account: Account::Loading,
            provider,
            chain,
            asset_buyer,
        }
    }

    /// Same provider with a different account status
    pub fn with_account(&self, account: Account) -> Self {
        Self {
            account,
            ..self.clone()
        }
    }
}

impl fmt::Debug for ProviderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderState")
            .field("name", &self.name)
            .field("account", &self.account)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use crate::types::BuyQuoteInfo;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Mock price feed
    pub struct MockPriceProvider {
        response: Mutex<Result<f64, String>>,
        call_count: Mutex<usize>,
    }

    impl MockPriceProvider {
        pub fn with_price(price: f64) -> Self {
            Self {
                response: Mutex::new(Ok(price)),
                call_count: Mutex::new(0),
            }
        }

        pub fn failing(message: &str) -> Self {
            Self {
                response: Mutex::new(Err(message.to_string())),
                call_count: Mutex::new(0),
            }
        }

        pub fn call_count(&self) -> usize {
            *self.call_count.lock().unwrap()
        }
    }

    #[async_trait]
    impl PriceProvider for MockPriceProvider {
        async fn fetch_eth_usd_price(&self) -> Result<f64, ProviderError> {
            *self.call_count.lock().unwrap() += 1;
            self.response
                .lock()
                .unwrap()
                .clone()
                .map_err(ProviderError::ApiError)
        }

        fn provider_name(&self) -> &'static str {
            "mock"
        }
    }

    /// Mock wallet implementing both the provider and the chain client
    pub struct MockWallet {
        capabilities: WalletCapabilities,
        addresses: Mutex<Result<Vec<String>, String>>,
        gated_addresses: Mutex<Result<Vec<String>, String>>,
        balances: Mutex<HashMap<String, u128>>,
        list_calls: Mutex<usize>,
        access_requests: Mutex<usize>,
        balance_calls: Mutex<Vec<String>>,
    }

    impl MockWallet {
        pub fn new(capabilities: WalletCapabilities) -> Self {
            Self {
                capabilities,
                addresses: Mutex::new(Ok(Vec::new())),
                gated_addresses: Mutex::new(Ok(Vec::new())),
                balances: Mutex::new(HashMap::new()),
                list_calls: Mutex::new(0),
                access_requests: Mutex::new(0),
                balance_calls: Mutex::new(Vec::new()),
            }
        }

        pub fn set_addresses(&self, addresses: &[&str]) {
            *self.addresses.lock().unwrap() =
                Ok(addresses.iter().map(|a| a.to_string()).collect());
        }

        pub fn set_addresses_error(&self, message: &str) {
            *self.addresses.lock().unwrap() = Err(message.to_string());
        }

        pub fn set_gated_addresses(&self, addresses: &[&str]) {
            *self.gated_addresses.lock().unwrap() =
                Ok(addresses.iter().map(|a| a.to_string()).collect());
        }

        pub fn set_gated_error(&self, message: &str) {
            *self.gated_addresses.lock().unwrap() = Err(message.to_string());
        }

        pub fn set_balance(&self, address: &str, wei: u128) {
            self.balances
                .lock()
                .unwrap()
                .insert(address.to_string(), wei);
        }

        pub fn list_calls(&self) -> usize {
            *self.list_calls.lock().unwrap()
        }

        pub fn access_requests(&self) -> usize {
            *self.access_requests.lock().unwrap()
        }

        pub fn balance_calls(&self) -> Vec<String> {
            self.balance_calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ChainClient for MockWallet {
        async fn list_addresses(&self) -> Result<Vec<String>, ProviderError> {
            *self.list_calls.lock().unwrap() += 1;
            self.addresses.lock().unwrap().clone().map_err(|message| {
                ProviderError::Rpc {
                    code: -32000,
                    message,
                }
            })
        }

        async fn get_balance_in_wei(&self, address: &str) -> Result<u128, ProviderError> {
            self.balance_calls
                .lock()
                .unwrap()
                .push(address.to_string());
            self.balances
                .lock()
                .unwrap()
                .get(address)
                .copied()
                .ok_or_else(|| ProviderError::ApiError(format!("no balance for {}", address)))
        }
    }

    #[async_trait]
    impl WalletProvider for MockWallet {
        fn capabilities(&self) -> WalletCapabilities {
            self.capabilities
        }

        async fn request_access(&self) -> Result<Vec<String>, ProviderError> {
            *self.access_requests.lock().unwrap() += 1;
            self.gated_addresses
                .lock()
                .unwrap()
                .clone()
                .map_err(ProviderError::PermissionDenied)
        }

        fn provider_name(&self) -> &str {
            "mock-wallet"
        }
    }

    type QuoteFn = Box<dyn Fn() -> Result<BuyQuote, QuoteError> + Send + Sync>;

    /// Mock quote computation client
    pub struct MockAssetBuyer {
        asset_datas: Mutex<Result<Vec<String>, String>>,
        quote: Mutex<QuoteFn>,
        quote_requests: Mutex<Vec<(String, u128, Option<f64>)>>,
    }

    impl Default for MockAssetBuyer {
        fn default() -> Self {
            Self::new()
        }
    }

    impl MockAssetBuyer {
        pub fn new() -> Self {
            Self {
                asset_datas: Mutex::new(Ok(Vec::new())),
                quote: Mutex::new(Box::new(|| {
                    Err(QuoteError::StandardRelayerApi("no quote scripted".into()))
                })),
                quote_requests: Mutex::new(Vec::new()),
            }
        }

        pub fn set_asset_datas(&self, asset_datas: &[&str]) {
            *self.asset_datas.lock().unwrap() =
                Ok(asset_datas.iter().map(|a| a.to_string()).collect());
        }

        pub fn set_asset_datas_error(&self, message: &str) {
            *self.asset_datas.lock().unwrap() = Err(message.to_string());
        }

        pub fn set_quote(&self, quote: impl Fn() -> Result<BuyQuote, QuoteError> + Send + Sync + 'static) {
            *self.quote.lock().unwrap() = Box::new(quote);
        }

        pub fn quote_requests(&self) -> Vec<(String, u128, Option<f64>)> {
            self.quote_requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl AssetBuyer for MockAssetBuyer {
        async fn get_available_asset_datas(&self) -> Result<Vec<String>, ProviderError> {
            self.asset_datas
                .lock()
                .unwrap()
                .clone()
                .map_err(ProviderError::ApiError)
        }

        async fn get_buy_quote(
            &self,
            asset_data: &str,
            asset_buy_amount: u128,
            fee_percentage: Option<f64>,
        ) -> Result<BuyQuote, QuoteError> {
            self.quote_requests.lock().unwrap().push((
                asset_data.to_string(),
                asset_buy_amount,
                fee_percentage,
            ));
            (*self.quote.lock().unwrap())()
        }
    }

    /// A quote for `amount` base units of `asset_data`
    pub fn sample_quote(asset_data: &str, amount: u128) -> BuyQuote {
        let info = BuyQuoteInfo {
            asset_eth_amount: 1_000_000_000_000_000,
            fee_eth_amount: 0,
            total_eth_amount: 1_000_000_000_000_000,
        };
        BuyQuote {
            asset_data: asset_data.to_string(),
            asset_buy_amount: amount,
            fee_percentage: None,
            best_case_quote_info: info.clone(),
            worst_case_quote_info: info,
        }
    }

    /// Provider state wired to fresh mocks, account loading
    pub fn provider_state(wallet: Arc<MockWallet>, buyer: Arc<MockAssetBuyer>) -> ProviderState {
        ProviderState::new(wallet.clone(), wallet, buyer)
    }
}
