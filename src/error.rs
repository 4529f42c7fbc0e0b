//! Error types for the CoinGecko price client

use crate::types::Endpoint;
use thiserror::Error;

/// Errors that can occur when talking to the upstream API
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Network request failed
    #[error("Network error: {0}")]
    NetworkError(reqwest::Error),

    /// Timeout waiting for response
    #[error("Request timeout")]
    Timeout,

    /// Upstream answered with HTTP 429
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Every attempt was answered with HTTP 429
    #[error("Rate limit exceeded on all {attempts} attempts")]
    RateLimitRetriesExhausted { attempts: u32 },

    /// Non-success HTTP status other than 429
    #[error("Provider API error: HTTP {status}: {body}")]
    ApiError { status: u16, body: String },

    /// Payload does not have the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ProviderError {
    /// Converts a reqwest error, separating timeouts from other network failures
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::NetworkError(err)
        }
    }

    /// Maps a non-success HTTP status to an error
    pub fn from_status(status: u16, body: impl Into<String>) -> Self {
        if status == 429 {
            Self::RateLimitExceeded
        } else {
            Self::ApiError {
                status,
                body: body.into(),
            }
        }
    }

    /// Creates an InvalidResponse error
    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// True if upstream throttled the request
    pub fn is_rate_limited(&self) -> bool {
        matches!(
            self,
            Self::RateLimitExceeded | Self::RateLimitRetriesExhausted { .. }
        )
    }

    /// True if another attempt might succeed
    ///
    /// A malformed payload will not fix itself, so it is never retried.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::InvalidResponse(_))
    }
}

/// User-facing errors returned by the endpoint functions
///
/// Messages are fixed; upstream detail is logged, never embedded here.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PriceError {
    #[error("Rate limit exceeded. Please wait a moment and try again.")]
    RateLimited,

    #[error("Request timeout. Please check your connection and try again.")]
    Timeout,

    #[error("Invalid {what} received")]
    InvalidData { what: &'static str },

    #[error("Failed to fetch {what}. Please try again later.")]
    FetchFailed { what: &'static str },
}

impl PriceError {
    /// Maps an upstream failure of `endpoint` to its user-facing category
    pub fn classify(endpoint: Endpoint, error: &ProviderError) -> Self {
        if error.is_rate_limited() {
            return Self::RateLimited;
        }

        match error {
            ProviderError::Timeout if endpoint.reports_timeouts() => Self::Timeout,
            ProviderError::InvalidResponse(_) => match endpoint.validated_payload() {
                Some(what) => Self::InvalidData { what },
                None => Self::fetch_failed(endpoint),
            },
            _ => Self::fetch_failed(endpoint),
        }
    }

    /// Creates a FetchFailed error for an endpoint
    pub fn fetch_failed(endpoint: Endpoint) -> Self {
        Self::FetchFailed {
            what: endpoint.label(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert!(ProviderError::from_status(429, "").is_rate_limited());
        assert!(matches!(
            ProviderError::from_status(503, "unavailable"),
            ProviderError::ApiError { status: 503, .. }
        ));
    }

    #[test]
    fn test_retryable() {
        assert!(ProviderError::Timeout.is_retryable());
        assert!(ProviderError::RateLimitExceeded.is_retryable());
        assert!(!ProviderError::invalid_response("missing prices").is_retryable());
    }

    #[test]
    fn test_rate_limit_messages() {
        let exhausted = ProviderError::RateLimitRetriesExhausted { attempts: 3 };
        for endpoint in Endpoint::all() {
            let err = PriceError::classify(*endpoint, &exhausted);
            assert_eq!(err, PriceError::RateLimited);
            assert_eq!(
                err.to_string(),
                "Rate limit exceeded. Please wait a moment and try again."
            );
        }
    }

    #[test]
    fn test_timeout_only_reported_for_price_endpoints() {
        let timeout = ProviderError::Timeout;
        assert_eq!(
            PriceError::classify(Endpoint::CurrentPrice, &timeout),
            PriceError::Timeout
        );
        assert_eq!(
            PriceError::classify(Endpoint::HistoricalData, &timeout),
            PriceError::Timeout
        );
        assert_eq!(
            PriceError::classify(Endpoint::TokenInfo, &timeout).to_string(),
            "Failed to fetch token info. Please try again later."
        );
    }

    #[test]
    fn test_invalid_shape_messages() {
        let invalid = ProviderError::invalid_response("bitcoin.usd missing");
        assert_eq!(
            PriceError::classify(Endpoint::CurrentPrice, &invalid).to_string(),
            "Invalid price data received"
        );
        assert_eq!(
            PriceError::classify(Endpoint::HistoricalData, &invalid).to_string(),
            "Invalid historical data received"
        );
        assert_eq!(
            PriceError::classify(Endpoint::TokenInfo, &invalid),
            PriceError::fetch_failed(Endpoint::TokenInfo)
        );
    }

    #[test]
    fn test_detail_not_exposed() {
        let err = ProviderError::from_status(500, "internal stack trace");
        let user = PriceError::classify(Endpoint::CurrentPrice, &err);
        assert_eq!(
            user.to_string(),
            "Failed to fetch current price. Please try again later."
        );
    }
}
