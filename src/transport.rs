//! Transport abstraction for issuing requests to the upstream API

use crate::{constants::USER_AGENT, error::ProviderError};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;

/// A single GET request against the upstream API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    /// Path relative to the base URL, starting with `/`
    pub path: String,
    /// Query parameters in the order they are sent
    pub query: Vec<(&'static str, String)>,
    /// Per-request timeout
    pub timeout: Duration,
}

impl ApiRequest {
    pub fn new(path: impl Into<String>, timeout: Duration) -> Self {
        Self {
            path: path.into(),
            query: Vec::new(),
            timeout,
        }
    }

    /// Appends a query parameter
    pub fn param(mut self, key: &'static str, value: impl ToString) -> Self {
        self.query.push((key, value.to_string()));
        self
    }

    /// Returns the value of a query parameter, if present
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Trait for upstream transports
///
/// Implementations perform exactly one request per call; retrying and
/// throttling happen above this layer.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Performs the request and returns the decoded JSON body
    ///
    /// # Errors
    /// * `RateLimitExceeded` for HTTP 429
    /// * `ApiError` for any other non-success status
    /// * `Timeout` when `request.timeout` elapses
    /// * `InvalidResponse` when the body is not JSON
    async fn get(&self, request: &ApiRequest) -> Result<Value, ProviderError>;

    /// Returns the name of this transport
    fn transport_name(&self) -> &'static str;
}

/// reqwest-backed transport for the CoinGecko REST API
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    /// Creates a transport for the given base URL
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderError> {
        let base_url: String = base_url.into();
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(ProviderError::NetworkError)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Full URL for a request path
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, request: &ApiRequest) -> Result<Value, ProviderError> {
        let url = self.url(&request.path);
        tracing::debug!(url = %url, query = ?request.query, "Requesting CoinGecko");

        let response = self
            .client
            .get(&url)
            .query(&request.query)
            .timeout(request.timeout)
            .send()
            .await
            .map_err(ProviderError::from_reqwest)?;

        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimitExceeded);
        }

        if !status.is_success() {
            return Err(ProviderError::from_status(
                status.as_u16(),
                response.text().await.unwrap_or_default(),
            ));
        }

        let body = response.text().await.map_err(ProviderError::from_reqwest)?;

        serde_json::from_str(&body).map_err(|e| {
            ProviderError::InvalidResponse(format!(
                "Failed to parse CoinGecko response: {}. Response: {}",
                e, body
            ))
        })
    }

    fn transport_name(&self) -> &'static str {
        "coingecko"
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let request = ApiRequest::new("/simple/price", Duration::from_secs(10))
            .param("ids", "bitcoin")
            .param("vs_currencies", "usd");

        assert_eq!(request.query_value("ids"), Some("bitcoin"));
        assert_eq!(request.query_value("vs_currencies"), Some("usd"));
        assert_eq!(request.query_value("from"), None);
    }

    #[test]
    fn test_base_url_normalization() {
        let transport = HttpTransport::new("http://localhost:8080/api/v3/").unwrap();
        assert_eq!(
            transport.url("/coins/bitcoin"),
            "http://localhost:8080/api/v3/coins/bitcoin"
        );
    }

    #[tokio::test]
    async fn test_mock_repeats_last_reply() {
        let mock = mock::MockTransport::new();
        mock.push(mock::MockReply::Status(429));
        mock.push_json(serde_json::json!({ "ok": true }));

        let request = ApiRequest::new("/ping", Duration::from_secs(1));
        assert!(mock.get(&request).await.unwrap_err().is_rate_limited());
        assert!(mock.get(&request).await.is_ok());
        assert!(mock.get(&request).await.is_ok());
        assert_eq!(mock.call_count(), 3);
    }
}
