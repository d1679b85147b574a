//! Constants for the widget state synchronization layer
//!
//! Defaults for everything configurable live here; `SyncConfig` reads
//! overrides from the environment on top of these.

use std::time::Duration;

/// Coinbase API endpoint for the ETH/USD buy price
pub const COINBASE_ETH_USD_PRICE_URL: &str = "https://api.coinbase.com/v2/prices/ETH-USD/buy";

/// Default JSON-RPC endpoint for the wallet provider
pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8545";

/// HTTP request timeout when talking to providers (in seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// User agent for HTTP requests
pub const USER_AGENT: &str = "instant-sync/0.1.0";

/// How long a flashed error message stays visible
pub const ERROR_FLASH_DURATION: Duration = Duration::from_millis(7000);

/// How often the account heartbeat polls the wallet
pub const ACCOUNT_HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);

/// How often the buy quote heartbeat refreshes the latest quote
pub const BUY_QUOTE_HEARTBEAT_INTERVAL: Duration = Duration::from_secs(15);

/// Sentinel price dispatched when the price feed is unavailable
pub const ETH_USD_PRICE_ZERO: f64 = 0.0;

/// EIP-1193 error code for a user rejecting an access request
pub const USER_REJECTED_REQUEST_CODE: i64 = 4001;

/// User-facing error messages
pub const ERROR_FETCHING_ETH_PRICE: &str = "Error fetching ETH/USD price";
pub const ERROR_NO_ASSETS: &str = "Could not find any assets";
pub const ERROR_NO_ORDERS: &str = "Could not find any orders";
pub const ERROR_NOT_ENOUGH_ZRX: &str = "Not enough ZRX available";
pub const ERROR_INVALID_AMOUNT: &str = "Invalid amount";
pub const ERROR_GENERIC: &str = "Something went wrong";

/// Asset data of ERC20 tokens whose testnet deployment maps to a mainnet one,
/// as `(kovan, mainnet)` pairs. Meta data is always keyed by mainnet asset data.
pub const KOVAN_TO_MAINNET_ASSET_DATA: &[(&str, &str)] = &[
    // ZRX
    (
        "0xf47261b00000000000000000000000002002d3812f58e35f0ea1ffbf80a75a38c32175fa",
        "0xf47261b0000000000000000000000000e41d2489571d322189246dafa5ebde1f4699f498",
    ),
    // WETH
    (
        "0xf47261b0000000000000000000000000d0a1e359811322d97991e03f863a0c30c2cf029c",
        "0xf47261b0000000000000000000000000c02aaa39b223fe8d0a0e5c4f27ead9083c756cc2",
    ),
];
