//! CoinGecko client
//!
//! Exposes the three endpoint calls. Each one goes through the retry helper
//! and the client's rate limiter, then validates and maps the payload.

use crate::{
    config::ClientConfig,
    constants::{COINS_ENDPOINT, SIMPLE_PRICE_ENDPOINT, VS_CURRENCY},
    error::{PriceError, ProviderError},
    metrics::{ClientMetrics, MetricsCollector, Outcome},
    rate_limiter::RateLimiter,
    response::{parse_market_chart, parse_simple_price, parse_token_info},
    retry::retry,
    transport::{ApiRequest, HttpTransport, Transport},
    types::{Endpoint, HistoryWindow, PricePoint, TokenInfo},
};
use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::OnceCell;

static GLOBAL_CLIENT: OnceCell<Arc<CoinGeckoClient>> = OnceCell::const_new();

/// Rate-limited CoinGecko client
///
/// # Example
/// ```no_run
/// use coingecko_price_client::CoinGeckoClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = CoinGeckoClient::new()?;
/// let price = client.get_current_price("bitcoin").await?;
/// println!("BTC: ${:.2}", price);
/// # Ok(())
/// # }
/// ```
pub struct CoinGeckoClient {
    transport: Arc<dyn Transport>,
    limiter: Arc<RateLimiter>,
    metrics: Arc<MetricsCollector>,
    config: ClientConfig,
}

impl CoinGeckoClient {
    /// Returns the process-wide client, creating it on first use
    ///
    /// All callers of `global()` share one rate limiter.
    pub async fn global() -> Result<Arc<Self>, ProviderError> {
        GLOBAL_CLIENT
            .get_or_try_init(|| async { Self::new().map(Arc::new) })
            .await
            .cloned()
    }

    /// Creates a client for the public CoinGecko API with default settings
    pub fn new() -> Result<Self, ProviderError> {
        Self::with_config(ClientConfig::default())
    }

    /// Creates an HTTP-backed client with custom settings
    pub fn with_config(config: ClientConfig) -> Result<Self, ProviderError> {
        let transport = Arc::new(HttpTransport::new(config.base_url.clone())?);
        Ok(Self::with_transport(transport, config))
    }

    /// Creates a client on top of a custom transport
    ///
    /// The client gets its own limiter and metrics collector; replace them
    /// with [`with_limiter`](Self::with_limiter) and
    /// [`with_metrics`](Self::with_metrics).
    pub fn with_transport(transport: Arc<dyn Transport>, config: ClientConfig) -> Self {
        let limiter = Arc::new(RateLimiter::new(config.min_request_interval));

        Self {
            transport,
            limiter,
            metrics: Arc::new(MetricsCollector::new()),
            config,
        }
    }

    /// Uses `limiter` instead of the client's own
    pub fn with_limiter(mut self, limiter: Arc<RateLimiter>) -> Self {
        self.limiter = limiter;
        self
    }

    /// Reports calls to `metrics` instead of the client's own collector
    pub fn with_metrics(mut self, metrics: Arc<MetricsCollector>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn limiter(&self) -> Arc<RateLimiter> {
        self.limiter.clone()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Returns the name of the underlying transport
    pub fn transport_name(&self) -> &'static str {
        self.transport.transport_name()
    }

    /// Gets per-endpoint latency, success and throttling metrics
    pub async fn metrics(&self) -> ClientMetrics {
        self.metrics.snapshot().await
    }

    /// Gets the current USD price of a token
    ///
    /// # Errors
    /// `PriceError::InvalidData` if upstream has no USD price for `token_id`.
    pub async fn get_current_price(&self, token_id: &str) -> Result<f64, PriceError> {
        let request = ApiRequest::new(SIMPLE_PRICE_ENDPOINT, self.config.request_timeout)
            .param("ids", token_id)
            .param("vs_currencies", VS_CURRENCY);

        self.fetch(Endpoint::CurrentPrice, token_id, request, |body| {
            parse_simple_price(&body, token_id)
        })
        .await
    }

    /// Gets the USD price series for the trailing window (7 days by default)
    ///
    /// Points are returned in upstream order, which is chronological.
    pub async fn get_historical_data(&self, token_id: &str) -> Result<Vec<PricePoint>, PriceError> {
        let window = HistoryWindow::trailing_days(Utc::now(), self.config.history_days);
        let path = format!("{}/{}/market_chart/range", COINS_ENDPOINT, token_id);
        let request = ApiRequest::new(path, self.config.history_timeout)
            .param("vs_currency", VS_CURRENCY)
            .param("from", window.from)
            .param("to", window.to);

        self.fetch(Endpoint::HistoricalData, token_id, request, parse_market_chart)
            .await
    }

    /// Gets id, uppercased symbol, name and small logo URL of a token
    pub async fn get_token_info(&self, token_id: &str) -> Result<TokenInfo, PriceError> {
        let path = format!("{}/{}", COINS_ENDPOINT, token_id);
        let request = ApiRequest::new(path, self.config.request_timeout);

        self.fetch(Endpoint::TokenInfo, token_id, request, parse_token_info)
            .await
    }

    /// Runs one request through retry and throttling, then maps the payload
    async fn fetch<T, P>(
        &self,
        endpoint: Endpoint,
        token_id: &str,
        request: ApiRequest,
        parse: P,
    ) -> Result<T, PriceError>
    where
        P: FnOnce(Value) -> Result<T, ProviderError>,
    {
        let start = Instant::now();
        let transport = &self.transport;
        let request = &request;

        let result = retry(&self.limiter, &self.config.retry, || transport.get(request))
            .await
            .and_then(parse);

        let elapsed = start.elapsed();
        self.metrics
            .record(endpoint, elapsed, Outcome::of(&result))
            .await;

        match result {
            Ok(value) => {
                tracing::debug!(
                    endpoint = endpoint.label(),
                    token_id = token_id,
                    latency_ms = elapsed.as_millis() as u64,
                    "Successfully fetched {}",
                    endpoint
                );
                Ok(value)
            }
            Err(e) => {
                tracing::error!(
                    endpoint = endpoint.label(),
                    token_id = token_id,
                    error = %e,
                    "Error fetching {}",
                    endpoint
                );
                Err(PriceError::classify(endpoint, &e))
            }
        }
    }
}
