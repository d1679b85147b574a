//! JSON-RPC wallet provider implementation
//!
//! Talks to an Ethereum node or wallet bridge over HTTP. `eth_accounts` and
//! `eth_getBalance` back the chain client; `eth_requestAccounts` backs the
//! gated access request when enabled.

use crate::{
    constants::{REQUEST_TIMEOUT_SECS, USER_AGENT, USER_REJECTED_REQUEST_CODE},
    error::ProviderError,
    provider::{ChainClient, WalletCapabilities, WalletProvider},
};
use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// Parses a hex quantity such as `0x1bc16d674ec80000`
fn parse_hex_quantity(quantity: &str) -> Result<u128, ProviderError> {
    let digits = quantity
        .strip_prefix("0x")
        .ok_or_else(|| ProviderError::invalid_response(format!("Not a hex quantity: {}", quantity)))?;
    if digits.is_empty() {
        return Err(ProviderError::invalid_response("Empty hex quantity"));
    }
    u128::from_str_radix(digits, 16).map_err(|e| {
        ProviderError::invalid_response(format!("Invalid hex quantity {}: {}", quantity, e))
    })
}

/// Wallet provider speaking JSON-RPC 2.0 over HTTP
pub struct JsonRpcWallet {
    client: Client,
    url: String,
    capabilities: WalletCapabilities,
    next_id: AtomicU64,
}

impl JsonRpcWallet {
    /// Creates a wallet with standard enumeration only
    pub fn new(url: impl Into<String>) -> Result<Self, ProviderError> {
        Self::with_timeout(url, Duration::from_secs(REQUEST_TIMEOUT_SECS))
    }

    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(ProviderError::NetworkError)?;

        Ok(Self {
            client,
            url: url.into(),
            capabilities: WalletCapabilities::standard(),
            next_id: AtomicU64::new(1),
        })
    }

    /// Enables `eth_requestAccounts` for unlock attempts
    pub fn with_gated_access(mut self) -> Self {
        self.capabilities = WalletCapabilities::gated();
        self
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T, ProviderError> {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };
        tracing::debug!(method, url = %self.url, "Sending JSON-RPC request");

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(ProviderError::NetworkError)?;

        if response.status().as_u16() == 429 {
            return Err(ProviderError::RateLimitExceeded);
        }

        if !response.status().is_success() {
            return Err(ProviderError::ApiError(format!(
                "HTTP {}: {}",
                response.status(),
                response.text().await.unwrap_or_default()
            )));
        }

        let body = response.text().await.map_err(ProviderError::NetworkError)?;
        parse_rpc_response(method, &body)
    }
}

/// Extracts the result of a JSON-RPC response body
fn parse_rpc_response<T: DeserializeOwned>(method: &str, body: &str) -> Result<T, ProviderError> {
    let response: RpcResponse<T> = serde_json::from_str(body).map_err(|e| {
        ProviderError::invalid_response(format!(
            "Failed to parse {} response: {}. Response: {}",
            method, e, body
        ))
    })?;

    if let Some(error) = response.error {
        return Err(ProviderError::Rpc {
            code: error.code,
            message: error.message,
        });
    }

    response
        .result
        .ok_or_else(|| ProviderError::invalid_response(format!("{} returned no result", method)))
}

#[async_trait]
impl ChainClient for JsonRpcWallet {
    async fn list_addresses(&self) -> Result<Vec<String>, ProviderError> {
        self.call("eth_accounts", json!([])).await
    }

    async fn get_balance_in_wei(&self, address: &str) -> Result<u128, ProviderError> {
        let quantity: String = self
            .call("eth_getBalance", json!([address, "latest"]))
            .await?;
        parse_hex_quantity(&quantity)
    }
}

#[async_trait]
impl WalletProvider for JsonRpcWallet {
    fn capabilities(&self) -> WalletCapabilities {
        self.capabilities
    }

    async fn request_access(&self) -> Result<Vec<String>, ProviderError> {
        match self.call("eth_requestAccounts", json!([])).await {
            Err(ProviderError::Rpc { code, message }) if code == USER_REJECTED_REQUEST_CODE => {
                Err(ProviderError::PermissionDenied(message))
            }
            other => other,
        }
    }

    fn provider_name(&self) -> &str {
        "json-rpc"
    }
}
