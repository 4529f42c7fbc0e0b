//! Request metrics collection and reporting
//!
//! Tracks latency percentiles, success rates and throttling per endpoint.

use crate::{error::ProviderError, types::Endpoint};
use std::collections::{HashMap, VecDeque};
use std::time::Duration;
use tokio::sync::Mutex;

/// Maximum number of samples to keep per endpoint
const MAX_SAMPLES: usize = 100;

/// How an endpoint call ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    RateLimited,
    Failed,
}

impl Outcome {
    /// Outcome of a finished endpoint call
    pub fn of<T>(result: &Result<T, ProviderError>) -> Self {
        match result {
            Ok(_) => Outcome::Success,
            Err(e) if e.is_rate_limited() => Outcome::RateLimited,
            Err(_) => Outcome::Failed,
        }
    }
}

/// Metrics for a single endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointMetrics {
    /// 50th percentile latency of successful calls in milliseconds
    pub latency_p50_ms: f64,
    /// 99th percentile latency of successful calls in milliseconds
    pub latency_p99_ms: f64,
    /// Success rate (0.0 to 1.0)
    pub success_rate: f64,
    /// Total number of calls tracked
    pub total_requests: u64,
    /// Calls that failed for any reason
    pub failed_requests: u64,
    /// Failed calls that were throttled by upstream
    pub rate_limited_requests: u64,
}

impl Default for EndpointMetrics {
    fn default() -> Self {
        Self {
            latency_p50_ms: 0.0,
            latency_p99_ms: 0.0,
            success_rate: 1.0,
            total_requests: 0,
            failed_requests: 0,
            rate_limited_requests: 0,
        }
    }
}

/// Snapshot of all endpoint metrics for one client
#[derive(Debug, Clone, Default)]
pub struct ClientMetrics {
    pub endpoints: HashMap<Endpoint, EndpointMetrics>,
}

impl ClientMetrics {
    /// Metrics for one endpoint; empty if it was never called
    pub fn endpoint(&self, endpoint: Endpoint) -> EndpointMetrics {
        self.endpoints.get(&endpoint).cloned().unwrap_or_default()
    }

    /// Total calls across all endpoints
    pub fn total_requests(&self) -> u64 {
        self.endpoints.values().map(|m| m.total_requests).sum()
    }
}

#[derive(Debug, Default)]
struct EndpointWindow {
    samples: VecDeque<(f64, Outcome)>,
    total: u64,
    failed: u64,
    rate_limited: u64,
}

impl EndpointWindow {
    fn record(&mut self, duration_ms: f64, outcome: Outcome) {
        self.total += 1;
        match outcome {
            Outcome::Success => {}
            Outcome::RateLimited => {
                self.failed += 1;
                self.rate_limited += 1;
            }
            Outcome::Failed => self.failed += 1,
        }

        if self.samples.len() >= MAX_SAMPLES {
            self.samples.pop_front();
        }
        self.samples.push_back((duration_ms, outcome));
    }

    fn snapshot(&self) -> EndpointMetrics {
        let mut latencies: Vec<f64> = self
            .samples
            .iter()
            .filter(|(_, outcome)| *outcome == Outcome::Success)
            .map(|(ms, _)| *ms)
            .collect();

        latencies.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let success_rate = if self.total > 0 {
            (self.total - self.failed) as f64 / self.total as f64
        } else {
            1.0
        };

        EndpointMetrics {
            latency_p50_ms: percentile(&latencies, 50.0),
            latency_p99_ms: percentile(&latencies, 99.0),
            success_rate,
            total_requests: self.total,
            failed_requests: self.failed,
            rate_limited_requests: self.rate_limited,
        }
    }
}

/// Collects per-endpoint metrics for a client
///
/// Share one collector between clients to aggregate their calls.
#[derive(Debug, Default)]
pub struct MetricsCollector {
    windows: Mutex<HashMap<Endpoint, EndpointWindow>>,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one endpoint call, retries included
    pub async fn record(&self, endpoint: Endpoint, duration: Duration, outcome: Outcome) {
        let duration_ms = duration.as_secs_f64() * 1000.0;
        self.windows
            .lock()
            .await
            .entry(endpoint)
            .or_default()
            .record(duration_ms, outcome);
    }

    /// Computes current metrics from collected samples
    pub async fn snapshot(&self) -> ClientMetrics {
        let windows = self.windows.lock().await;
        ClientMetrics {
            endpoints: windows
                .iter()
                .map(|(endpoint, window)| (*endpoint, window.snapshot()))
                .collect(),
        }
    }
}

/// Calculate percentile from sorted values
fn percentile(sorted_values: &[f64], p: f64) -> f64 {
    if sorted_values.is_empty() {
        return 0.0;
    }

    let idx = (p / 100.0 * (sorted_values.len() - 1) as f64).round() as usize;
    sorted_values[idx.min(sorted_values.len() - 1)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_metrics_collector() {
        let collector = MetricsCollector::new();
        let price = Endpoint::CurrentPrice;

        collector
            .record(price, Duration::from_millis(100), Outcome::Success)
            .await;
        collector
            .record(price, Duration::from_millis(200), Outcome::Success)
            .await;
        collector
            .record(price, Duration::from_millis(150), Outcome::RateLimited)
            .await;
        collector
            .record(Endpoint::TokenInfo, Duration::from_millis(50), Outcome::Failed)
            .await;

        let metrics = collector.snapshot().await;
        let price_metrics = metrics.endpoint(price);

        assert_eq!(metrics.total_requests(), 4);
        assert_eq!(price_metrics.total_requests, 3);
        assert_eq!(price_metrics.failed_requests, 1);
        assert_eq!(price_metrics.rate_limited_requests, 1);
        assert!(price_metrics.success_rate > 0.6 && price_metrics.success_rate < 0.7);
        assert_eq!(price_metrics.latency_p99_ms, 200.0);

        let info = metrics.endpoint(Endpoint::TokenInfo);
        assert_eq!(info.success_rate, 0.0);
        assert_eq!(info.rate_limited_requests, 0);
    }

    #[tokio::test]
    async fn test_unused_endpoint_is_empty() {
        let metrics = MetricsCollector::new().snapshot().await;
        assert_eq!(
            metrics.endpoint(Endpoint::HistoricalData),
            EndpointMetrics::default()
        );
    }

    #[test]
    fn test_outcome_of_result() {
        let ok: Result<(), ProviderError> = Ok(());
        assert_eq!(Outcome::of(&ok), Outcome::Success);

        let throttled: Result<(), _> =
            Err(ProviderError::RateLimitRetriesExhausted { attempts: 3 });
        assert_eq!(Outcome::of(&throttled), Outcome::RateLimited);

        let failed: Result<(), _> = Err(ProviderError::Timeout);
        assert_eq!(Outcome::of(&failed), Outcome::Failed);
    }

    #[test]
    fn test_percentile() {
        let values = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
        assert_eq!(percentile(&values, 50.0), 5.0);
        assert_eq!(percentile(&values, 99.0), 10.0);
    }
}
