//! Instrumentation wrappers for search operations and store reads

use super::*;
use crate::search::SearchResult;
use std::future::Future;
use std::time::Instant;

/// A response that reports how many results it carries
pub trait ResultCount {
    fn result_count(&self) -> usize;
}

/// Time a search operation and record its outcome and result count
///
/// # Example
/// ```no_run
/// use contract_search::metrics::measure_search;
/// # use contract_search::search::{SearchService, SearchAllRequest};
/// # async fn run(service: SearchService) {
/// let response = measure_search("search_all", async {
///     service.search_all(None, SearchAllRequest::new("acme")).await
/// })
/// .await;
/// # }
/// ```
pub async fn measure_search<F, T>(operation: &str, f: F) -> SearchResult<T>
where
    F: Future<Output = SearchResult<T>>,
    T: ResultCount,
{
    let start = Instant::now();
    let result = f.await;
    let duration = start.elapsed().as_secs_f64();

    SEARCH_DURATION_SECONDS
        .with_label_values(&[operation])
        .observe(duration);

    match &result {
        Ok(response) => {
            SEARCH_REQUESTS_TOTAL
                .with_label_values(&[operation, "success"])
                .inc();
            SEARCH_RESULTS
                .with_label_values(&[operation])
                .observe(response.result_count() as f64);
        }
        Err(_) => {
            SEARCH_REQUESTS_TOTAL
                .with_label_values(&[operation, "error"])
                .inc();
        }
    }

    result
}

/// Record the latency of one document store read
pub fn observe_store_read(collection: &str, outcome: &str, started: Instant) {
    STORE_READ_DURATION_SECONDS
        .with_label_values(&[collection, outcome])
        .observe(started.elapsed().as_secs_f64());
}
