//! Types for the widget state

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Ethereum networks the widget can run against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// Ethereum mainnet
    Mainnet,
    /// Kovan testnet
    Kovan,
}

impl Network {
    /// Get the chain id of this network
    pub fn chain_id(&self) -> u64 {
        match self {
            Network::Mainnet => 1,
            Network::Kovan => 42,
        }
    }

    /// Look up a network from its chain id
    pub fn from_chain_id(chain_id: u64) -> Option<Self> {
        match chain_id {
            1 => Some(Network::Mainnet),
            42 => Some(Network::Kovan),
            _ => None,
        }
    }
}

/// Token standard of an asset, identified by its asset proxy id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetProxyId {
    #[serde(rename = "0xf47261b0")]
    ERC20,
    #[serde(rename = "0x02571792")]
    ERC721,
}

impl AssetProxyId {
    /// Get the hex proxy id
    pub fn as_hex(&self) -> &'static str {
        match self {
            AssetProxyId::ERC20 => "0xf47261b0",
            AssetProxyId::ERC721 => "0x02571792",
        }
    }
}

/// Display and decoding information for an asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "assetProxyId")]
pub enum AssetMetaData {
    #[serde(rename = "0xf47261b0", rename_all = "camelCase")]
    ERC20 {
        symbol: String,
        decimals: u32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        primary_color: Option<String>,
    },
    #[serde(rename = "0x02571792", rename_all = "camelCase")]
    ERC721 {
        name: String,
        representation_url: String,
    },
}

impl AssetMetaData {
    /// Get the proxy id of this asset
    pub fn asset_proxy_id(&self) -> AssetProxyId {
        match self {
            AssetMetaData::ERC20 { .. } => AssetProxyId::ERC20,
            AssetMetaData::ERC721 { .. } => AssetProxyId::ERC721,
        }
    }
}

/// Meta data keyed by (lower-cased, mainnet) asset data
pub type AssetMetaDataMap = HashMap<String, AssetMetaData>;

/// A tradable asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    /// Hex-encoded asset data, lower-cased
    pub asset_data: String,
    /// Meta data the asset was created from
    pub meta_data: AssetMetaData,
}

impl Asset {
    /// Get the proxy id of this asset
    pub fn asset_proxy_id(&self) -> AssetProxyId {
        self.meta_data.asset_proxy_id()
    }

    /// Number of decimals for ERC20 assets
    pub fn decimals(&self) -> Option<u32> {
        match &self.meta_data {
            AssetMetaData::ERC20 { decimals, .. } => Some(*decimals),
            AssetMetaData::ERC721 { .. } => None,
        }
    }

    /// Best human-readable name for the asset
    pub fn display_name(&self) -> String {
        match &self.meta_data {
            AssetMetaData::ERC20 { name: Some(name), .. } => name.clone(),
            AssetMetaData::ERC20 { symbol, .. } => symbol.to_uppercase(),
            AssetMetaData::ERC721 { name, .. } => name.clone(),
        }
    }

    /// Short symbol for buttons and messages
    ///
    /// Symbols longer than five characters are cut to three and suffixed
    /// with an ellipsis.
    pub fn formatted_symbol(&self) -> String {
        match &self.meta_data {
            AssetMetaData::ERC20 { symbol, .. } => {
                if symbol.chars().count() <= 5 {
                    symbol.to_uppercase()
                } else {
                    let head: String = symbol.chars().take(3).collect();
                    format!("{}…", head.to_uppercase())
                }
            }
            AssetMetaData::ERC721 { name, .. } => name.clone(),
        }
    }
}

/// Wallet account status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum Account {
    /// Waiting for the provider to answer
    Loading,
    /// No address is available (locked wallet or access refused)
    Locked,
    /// An address is available
    #[serde(rename_all = "camelCase")]
    Ready {
        address: String,
        #[serde(default, with = "wei::option")]
        eth_balance_in_wei: Option<u128>,
    },
}

impl Account {
    /// Creates a ready account without a known balance
    pub fn ready(address: impl Into<String>) -> Self {
        Self::Ready {
            address: address.into(),
            eth_balance_in_wei: None,
        }
    }

    /// Address of the account, if ready
    pub fn address(&self) -> Option<&str> {
        match self {
            Account::Ready { address, .. } => Some(address.as_str()),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Account::Loading)
    }
}

/// Progress of a buy order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderProcessState {
    None,
    Validating,
    Processing,
    Success,
    Failure,
}

/// Buy order state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyOrderState {
    pub process_state: OrderProcessState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
}

impl BuyOrderState {
    /// State with no order in flight
    pub fn none() -> Self {
        Self {
            process_state: OrderProcessState::None,
            tx_hash: None,
        }
    }

    pub fn with_process_state(process_state: OrderProcessState) -> Self {
        Self {
            process_state,
            tx_hash: None,
        }
    }
}

impl Default for BuyOrderState {
    fn default() -> Self {
        Self::none()
    }
}

/// State of an async request such as a quote fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AsyncProcessState {
    #[default]
    None,
    Pending,
    Success,
    Failure,
}

/// Whether the latest error message is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayStatus {
    Present,
    #[default]
    Hidden,
}

/// Affiliate fee settings passed along with quote requests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AffiliateInfo {
    pub fee_recipient: String,
    /// Fee as a fraction of the order value (0.01 = 1%)
    pub fee_percentage: f64,
}

/// ETH cost breakdown for one end of a quote
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyQuoteInfo {
    #[serde(with = "wei")]
    pub asset_eth_amount: u128,
    #[serde(with = "wei")]
    pub fee_eth_amount: u128,
    #[serde(with = "wei")]
    pub total_eth_amount: u128,
}

/// A priced buy order proposal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyQuote {
    pub asset_data: String,
    /// Amount of the asset to buy, in base units
    #[serde(with = "wei")]
    pub asset_buy_amount: u128,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee_percentage: Option<f64>,
    pub best_case_quote_info: BuyQuoteInfo,
    pub worst_case_quote_info: BuyQuoteInfo,
}

/// Unit amount of an asset as entered by the user
pub type UnitAmount = Decimal;

/// Serde helpers for `u128` base-unit amounts, written as decimal strings
///
/// Tagged enums buffer their content before deserializing it and that buffer
/// has no `u128` support, so these amounts never travel as JSON numbers.
/// Small integers are still accepted on input.
pub mod wei {
    use serde::{de, Deserializer, Serializer};
    use std::fmt;

    pub fn serialize<S: Serializer>(value: &u128, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u128, D::Error> {
        deserializer.deserialize_any(WeiVisitor)
    }

    struct WeiVisitor;

    impl<'de> de::Visitor<'de> for WeiVisitor {
        type Value = u128;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("an unsigned integer as a decimal string")
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<u128, E> {
            Ok(u128::from(value))
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<u128, E> {
            value
                .parse()
                .map_err(|_| E::invalid_value(de::Unexpected::Str(value), &self))
        }
    }

    /// Same encoding for optional amounts, `None` as null
    pub mod option {
        use serde::{de, Deserializer, Serializer};
        use std::fmt;

        pub fn serialize<S: Serializer>(
            value: &Option<u128>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(value) => serializer.collect_str(value),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<u128>, D::Error> {
            deserializer.deserialize_option(OptionVisitor)
        }

        struct OptionVisitor;

        impl<'de> de::Visitor<'de> for OptionVisitor {
            type Value = Option<u128>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an optional unsigned integer as a decimal string")
            }

            fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(None)
            }

            fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(None)
            }

            fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
                super::deserialize(deserializer).map(Some)
            }
        }
    }
}
