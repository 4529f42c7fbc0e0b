//! Types for the CoinGecko price client

use crate::constants::AVAILABLE_TOKENS;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::{Deserialize, Serialize};

/// A token offered in the static catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TokenDescriptor {
    /// CoinGecko id (e.g. "bitcoin")
    pub id: &'static str,
    /// Ticker symbol
    pub symbol: &'static str,
    /// Display name
    pub name: &'static str,
}

impl TokenDescriptor {
    /// Creates a catalog entry
    pub const fn new(id: &'static str, symbol: &'static str, name: &'static str) -> Self {
        Self { id, symbol, name }
    }

    /// Get all catalog entries
    pub fn all() -> &'static [TokenDescriptor] {
        AVAILABLE_TOKENS
    }

    /// Looks up a catalog entry by its CoinGecko id
    pub fn find(id: &str) -> Option<&'static TokenDescriptor> {
        AVAILABLE_TOKENS.iter().find(|token| token.id == id)
    }

    /// Looks up a catalog entry by symbol, ignoring case
    pub fn find_by_symbol(symbol: &str) -> Option<&'static TokenDescriptor> {
        AVAILABLE_TOKENS
            .iter()
            .find(|token| token.symbol.eq_ignore_ascii_case(symbol))
    }
}

/// One point of a historical price series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// ISO-8601 timestamp with millisecond precision
    pub x: String,
    /// Price in USD
    pub y: f64,
}

/// Token metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInfo {
    pub id: String,
    /// Uppercased ticker symbol
    pub symbol: String,
    pub name: String,
    /// Small logo URL
    pub image: String,
}

/// The upstream operations exposed by the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Endpoint {
    CurrentPrice,
    HistoricalData,
    TokenInfo,
}

impl Endpoint {
    /// Human readable name used in user-facing messages
    pub fn label(&self) -> &'static str {
        match self {
            Endpoint::CurrentPrice => "current price",
            Endpoint::HistoricalData => "historical data",
            Endpoint::TokenInfo => "token info",
        }
    }

    /// Name of the payload checked for shape, if this endpoint validates one
    ///
    /// Token info has no explicit validation; a malformed payload there is
    /// reported as a generic fetch failure.
    pub fn validated_payload(&self) -> Option<&'static str> {
        match self {
            Endpoint::CurrentPrice => Some("price data"),
            Endpoint::HistoricalData => Some("historical data"),
            Endpoint::TokenInfo => None,
        }
    }

    /// Whether timeouts get their own user-facing message
    pub fn reports_timeouts(&self) -> bool {
        !matches!(self, Endpoint::TokenInfo)
    }

    /// Get all endpoints
    pub fn all() -> &'static [Endpoint] {
        &[
            Endpoint::CurrentPrice,
            Endpoint::HistoricalData,
            Endpoint::TokenInfo,
        ]
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A `[from, to]` range in unix seconds for market chart requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryWindow {
    pub from: i64,
    pub to: i64,
}

impl HistoryWindow {
    /// Window covering the `days` days that end at `now`
    pub fn trailing_days(now: DateTime<Utc>, days: i64) -> Self {
        let to = now.timestamp();
        let from = to - ChronoDuration::days(days).num_seconds();
        Self { from, to }
    }
}
