//! Constants for the CoinGecko price client
//!
//! All defaults are centralized here. There is no config file and no
//! environment lookup; `ClientConfig::default()` is built from these values.

use crate::types::TokenDescriptor;

/// CoinGecko API base URL
pub const COINGECKO_API_URL: &str = "https://api.coingecko.com/api/v3";

/// Simple price lookup endpoint
pub const SIMPLE_PRICE_ENDPOINT: &str = "/simple/price";

/// Prefix for per-coin endpoints (`/coins/{id}`, `/coins/{id}/market_chart/range`)
pub const COINS_ENDPOINT: &str = "/coins";

/// Quote currency for every request
pub const VS_CURRENCY: &str = "usd";

/// Minimum spacing between the starts of two upstream requests (in milliseconds)
pub const MIN_REQUEST_INTERVAL_MS: u64 = 1200;

/// Maximum number of attempts per endpoint call
pub const MAX_RETRY_ATTEMPTS: u32 = 3;

/// Base delay for the exponential backoff applied after a 429 (in milliseconds)
pub const RATE_LIMIT_BACKOFF_BASE_MS: u64 = 1000;

/// Upper bound for the 429 backoff (in milliseconds)
pub const MAX_RATE_LIMIT_BACKOFF_MS: u64 = 10_000;

/// Linear step for the backoff applied after any other failure (in milliseconds)
pub const FAILURE_BACKOFF_STEP_MS: u64 = 1000;

/// Timeout for simple price and token info requests (in seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Timeout for market chart requests (in seconds)
pub const HISTORY_REQUEST_TIMEOUT_SECS: u64 = 15;

/// Length of the historical window (in days)
pub const HISTORY_WINDOW_DAYS: i64 = 7;

/// User agent for HTTP requests
pub const USER_AGENT: &str = "coingecko-price-client/0.1.0";

/// Tokens offered for selection in the UI
pub const AVAILABLE_TOKENS: &[TokenDescriptor] = &[
    TokenDescriptor::new("bitcoin", "BTC", "Bitcoin"),
    TokenDescriptor::new("ethereum", "ETH", "Ethereum"),
    TokenDescriptor::new("solana", "SOL", "Solana"),
    TokenDescriptor::new("cardano", "ADA", "Cardano"),
    TokenDescriptor::new("polkadot", "DOT", "Polkadot"),
    TokenDescriptor::new("chainlink", "LINK", "Chainlink"),
    TokenDescriptor::new("polygon", "MATIC", "Polygon"),
    TokenDescriptor::new("avalanche-2", "AVAX", "Avalanche"),
    TokenDescriptor::new("binancecoin", "BNB", "BNB"),
    TokenDescriptor::new("ripple", "XRP", "XRP"),
];
