//! Coinbase ETH/USD price provider implementation

use crate::{
    constants::{COINBASE_ETH_USD_PRICE_URL, REQUEST_TIMEOUT_SECS, USER_AGENT},
    error::ProviderError,
    provider::PriceProvider,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// Coinbase API response for price queries
#[derive(Debug, Deserialize)]
struct CoinbaseResponse {
    data: CoinbasePrice,
}

#[derive(Debug, Deserialize)]
struct CoinbasePrice {
    /// Decimal string, e.g. "2034.12"
    amount: String,
}

/// Parses a Coinbase price response body into a USD price
fn parse_response(body: &str) -> Result<f64, ProviderError> {
    let response: CoinbaseResponse = serde_json::from_str(body).map_err(|e| {
        ProviderError::invalid_response(format!(
            "Failed to parse Coinbase response: {}. Response: {}",
            e, body
        ))
    })?;

    response.data.amount.parse::<f64>().map_err(|e| {
        ProviderError::invalid_response(format!(
            "Invalid price amount {:?}: {}",
            response.data.amount, e
        ))
    })
}

/// Coinbase price provider
pub struct CoinbaseProvider {
    client: Client,
    url: String,
}

impl CoinbaseProvider {
    /// Creates a new Coinbase provider against the public API
    pub fn new() -> Result<Self, ProviderError> {
        Self::with_url(
            COINBASE_ETH_USD_PRICE_URL,
            Duration::from_secs(REQUEST_TIMEOUT_SECS),
        )
    }

    /// Creates a provider against a custom price endpoint
    pub fn with_url(url: impl Into<String>, timeout: Duration) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(ProviderError::NetworkError)?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

impl Default for CoinbaseProvider {
    fn default() -> Self {
        Self::new().expect("Failed to create Coinbase provider")
    }
}

#[async_trait]
impl PriceProvider for CoinbaseProvider {
    async fn fetch_eth_usd_price(&self) -> Result<f64, ProviderError> {
        tracing::debug!(url = %self.url, "Fetching ETH/USD price from Coinbase");

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(ProviderError::NetworkError)?;

        // Check for rate limiting
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
        parse_response(&body)
    }

    fn provider_name(&self) -> &'static str {
        "coinbase"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_response() {
        let body = r#"{"data":{"base":"ETH","currency":"USD","amount":"2034.12"}}"#;
        assert_eq!(parse_response(body).unwrap(), 2034.12);
    }

    #[test]
    fn test_parse_response_rejects_bad_amount() {
        let body = r#"{"data":{"base":"ETH","currency":"USD","amount":"n/a"}}"#;
        assert!(matches!(
            parse_response(body),
            Err(ProviderError::InvalidResponse(_))
        ));
        assert!(parse_response(r#"{"errors":[]}"#).is_err());
    }
}
