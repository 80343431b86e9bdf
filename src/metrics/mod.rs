//! Prometheus metrics for the search service.
//!
//! Search operations are instrumented through [`measure_search`], document
//! store reads through [`observe_store_read`], and HTTP traffic through the
//! [`track_http_metrics`] middleware.
//!
//! # Example
//! ```no_run
//! use contract_search::metrics::{self, SEARCH_REQUESTS_TOTAL};
//!
//! metrics::init_metrics().unwrap();
//! SEARCH_REQUESTS_TOTAL
//!     .with_label_values(&["search_all", "success"])
//!     .inc();
//! ```

mod decorators;
mod middleware;

pub use decorators::{measure_search, observe_store_read, ResultCount};
pub use middleware::track_http_metrics;

use lazy_static::lazy_static;
use prometheus::{CounterVec, HistogramOpts, HistogramVec, Opts, Registry};

const NAMESPACE: &str = "contract_search";

lazy_static! {
    /// Registry backing the `/metrics` endpoint
    pub static ref PROMETHEUS_REGISTRY: Registry = Registry::new();

    // ============================================================================
    // Search Metrics
    // ============================================================================

    /// Search operations by outcome
    ///
    /// Labels: operation, outcome (success, error)
    pub static ref SEARCH_REQUESTS_TOTAL: CounterVec = CounterVec::new(
        Opts::new("requests_total", "Total number of search operations")
            .namespace(NAMESPACE),
        &["operation", "outcome"]
    ).expect("Failed to create SEARCH_REQUESTS_TOTAL metric");

    /// Search operation latency in seconds
    ///
    /// Labels: operation
    pub static ref SEARCH_DURATION_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new("duration_seconds", "Search operation duration in seconds")
            .namespace(NAMESPACE)
            .buckets(vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]),
        &["operation"]
    ).expect("Failed to create SEARCH_DURATION_SECONDS metric");

    /// Number of results returned per search operation
    ///
    /// Labels: operation
    pub static ref SEARCH_RESULTS: HistogramVec = HistogramVec::new(
        HistogramOpts::new("results", "Number of results returned per search operation")
            .namespace(NAMESPACE)
            .buckets(vec![0.0, 1.0, 5.0, 10.0, 20.0, 50.0, 100.0]),
        &["operation"]
    ).expect("Failed to create SEARCH_RESULTS metric");

    // ============================================================================
    // Store Metrics
    // ============================================================================

    /// Document store read latency in seconds
    ///
    /// Labels: collection, outcome (success, error, timeout)
    pub static ref STORE_READ_DURATION_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new("store_read_duration_seconds", "Document store read duration in seconds")
            .namespace(NAMESPACE)
            .buckets(vec![0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]),
        &["collection", "outcome"]
    ).expect("Failed to create STORE_READ_DURATION_SECONDS metric");

    // ============================================================================
    // HTTP Metrics
    // ============================================================================

    /// HTTP requests received
    ///
    /// Labels: method, path, status_code
    pub static ref HTTP_REQUESTS_TOTAL: CounterVec = CounterVec::new(
        Opts::new("http_requests_total", "Total number of HTTP requests")
            .namespace(NAMESPACE),
        &["method", "path", "status_code"]
    ).expect("Failed to create HTTP_REQUESTS_TOTAL metric");

    /// HTTP request duration in seconds
    ///
    /// Labels: method, path
    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new("http_request_duration_seconds", "HTTP request duration in seconds")
            .namespace(NAMESPACE)
            .buckets(vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
        &["method", "path"]
    ).expect("Failed to create HTTP_REQUEST_DURATION_SECONDS metric");
}

fn register<M>(metric: &M) -> Result<(), prometheus::Error>
where
    M: prometheus::core::Collector + Clone + 'static,
{
    match PROMETHEUS_REGISTRY.register(Box::new(metric.clone())) {
        Ok(()) | Err(prometheus::Error::AlreadyReg) => Ok(()),
        Err(e) => Err(e),
    }
}

/// Register all metrics with the global registry
///
/// Safe to call more than once.
pub fn init_metrics() -> Result<(), prometheus::Error> {
    register(&*SEARCH_REQUESTS_TOTAL)?;
    register(&*SEARCH_DURATION_SECONDS)?;
    register(&*SEARCH_RESULTS)?;
    register(&*STORE_READ_DURATION_SECONDS)?;
    register(&*HTTP_REQUESTS_TOTAL)?;
    register(&*HTTP_REQUEST_DURATION_SECONDS)?;

    tracing::info!("Prometheus metrics initialized successfully");
    Ok(())
}

/// Render the registry in the Prometheus text exposition format
pub fn gather_metrics() -> String {
    use prometheus::Encoder;
    let encoder = prometheus::TextEncoder::new();
    let metric_families = PROMETHEUS_REGISTRY.gather();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
        return String::from("# Error encoding metrics\n");
    }

    String::from_utf8(buffer).unwrap_or_else(|e| {
        tracing::error!("Failed to convert metrics to string: {}", e);
        String::from("# Error converting metrics\n")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init_metrics().unwrap();
        init_metrics().unwrap();
    }

    #[test]
    fn test_gather_metrics() {
        init_metrics().unwrap();
        SEARCH_REQUESTS_TOTAL
            .with_label_values(&["autocomplete", "success"])
            .inc();

        let metrics = gather_metrics();
        assert!(metrics.contains("contract_search_requests_total"));
    }
}
