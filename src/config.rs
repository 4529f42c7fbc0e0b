//! Per-client settings
//!
//! `ClientConfig::default()` reproduces the constants in `constants.rs`;
//! override individual fields to point at another host or tune timing.

use crate::{
    constants::{
        COINGECKO_API_URL, HISTORY_REQUEST_TIMEOUT_SECS, HISTORY_WINDOW_DAYS,
        MIN_REQUEST_INTERVAL_MS, REQUEST_TIMEOUT_SECS,
    },
    retry::RetryPolicy,
};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API base URL, without trailing slash
    pub base_url: String,
    /// Timeout for simple price and token info requests
    pub request_timeout: Duration,
    /// Timeout for market chart requests
    pub history_timeout: Duration,
    /// Length of the historical window in days
    pub history_days: i64,
    /// Minimum spacing between request starts
    pub min_request_interval: Duration,
    pub retry: RetryPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: COINGECKO_API_URL.to_string(),
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            history_timeout: Duration::from_secs(HISTORY_REQUEST_TIMEOUT_SECS),
            history_days: HISTORY_WINDOW_DAYS,
            min_request_interval: Duration::from_millis(MIN_REQUEST_INTERVAL_MS),
            retry: RetryPolicy::default(),
        }
    }
}
