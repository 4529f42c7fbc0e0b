//! # CoinGecko Price Client
//!
//! Fetches current USD prices, trailing 7-day price history and token
//! metadata from the public CoinGecko API.
//!
//! Every request is spaced at least 1.2 seconds after the previous one and
//! retried with backoff. A 429 backs off exponentially, up to 10 seconds.
//! Any other failure backs off linearly. Failures reach the caller as a
//! [`PriceError`] with a fixed, user-readable message. The upstream detail is
//! logged through `tracing`.
//!
//! ## Usage
//!
//! ```no_run
//! use coingecko_price_client::{CoinGeckoClient, TokenDescriptor};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = CoinGeckoClient::new()?;
//!
//! for token in TokenDescriptor::all() {
//!     let price = client.get_current_price(token.id).await?;
//!     println!("{}: ${:.2}", token.symbol, price);
//! }
//!
//! let history = client.get_historical_data("bitcoin").await?;
//! let info = client.get_token_info("bitcoin").await?;
//! println!("{} ({}): {} points", info.name, info.symbol, history.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! CoinGeckoClient::get_*
//!     ↓
//! retry (bounded attempts, backoff)
//!     ↓
//! RateLimiter::acquire (1.2s spacing)
//!     ↓
//! Transport (HttpTransport → CoinGecko REST)
//!     ↓
//! response validation → PricePoint / TokenInfo / f64
//! ```

pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod metrics;
pub mod rate_limiter;
pub mod response;
pub mod retry;
pub mod transport;
pub mod types;

// Re-export commonly used types
pub use client::CoinGeckoClient;
pub use config::ClientConfig;
pub use constants::AVAILABLE_TOKENS;
pub use error::{PriceError, ProviderError};
pub use metrics::{ClientMetrics, EndpointMetrics, MetricsCollector};
pub use rate_limiter::RateLimiter;
pub use retry::{retry, RetryPolicy};
pub use transport::{ApiRequest, HttpTransport, Transport};
pub use types::{Endpoint, PricePoint, TokenDescriptor, TokenInfo};
