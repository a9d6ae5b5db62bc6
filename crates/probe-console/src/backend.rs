//! Search backends for the typeahead session.
//!
//! The `SearchBackend` trait is runtime-independent and returns futures, so
//! the session driver decides where they run and tests can swap in a mock.

use futures::future::BoxFuture;
use probe_client::{Catalog, SearchClient};
use probe_core::{Candidate, FetchError};
use std::sync::Arc;

// =============================================================================
// Backend Trait
// =============================================================================

/// Source of candidates for a query.
pub trait SearchBackend: Send + Sync {
    /// Search for candidates matching `query`.
    fn search(&self, query: String) -> BoxFuture<'static, Result<Vec<Candidate>, FetchError>>;
}

// =============================================================================
// HTTP Backend
// =============================================================================

/// Backend that queries the console's search endpoint.
pub struct HttpBackend {
    client: SearchClient,
}

impl HttpBackend {
    pub fn new(client: SearchClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &SearchClient {
        &self.client
    }
}

impl SearchBackend for HttpBackend {
    fn search(&self, query: String) -> BoxFuture<'static, Result<Vec<Candidate>, FetchError>> {
        let client = self.client.clone();
        Box::pin(async move { client.search(&query).await })
    }
}

// =============================================================================
// Catalog Backend
// =============================================================================

/// Offline backend over an in-memory catalog.
pub struct CatalogBackend {
    catalog: Arc<Catalog>,
}

impl CatalogBackend {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog: Arc::new(catalog),
        }
    }
}

impl SearchBackend for CatalogBackend {
    fn search(&self, query: String) -> BoxFuture<'static, Result<Vec<Candidate>, FetchError>> {
        let catalog = self.catalog.clone();
        Box::pin(async move { Ok(catalog.search(&query)) })
    }
}

// =============================================================================
// Mock Backend for Testing
// =============================================================================

#[cfg(test)]
pub mod mock {
    use super::*;
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::time::Duration;

    /// Mock backend with canned per-query responses.
    #[derive(Default)]
    pub struct MockBackend {
        pub responses: Arc<Mutex<HashMap<String, Result<Vec<Candidate>, FetchError>>>>,
        pub delays: Arc<Mutex<HashMap<String, Duration>>>,
        pub default_delay: Duration,
        /// Queries in the order they were searched.
        pub calls: Arc<Mutex<Vec<String>>>,
    }

    impl MockBackend {
        pub fn new() -> Self {
            Self::default()
        }

        /// Answer `query` with `results`.
        pub fn with_results(self, query: &str, results: Vec<Candidate>) -> Self {
            self.responses.lock().insert(query.to_string(), Ok(results));
            self
        }

        /// Fail `query` with `error`.
        pub fn with_error(self, query: &str, error: FetchError) -> Self {
            self.responses.lock().insert(query.to_string(), Err(error));
            self
        }

        /// Delay every response without a per-query delay.
        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.default_delay = delay;
            self
        }

        /// Delay the response for `query`.
        pub fn with_query_delay(self, query: &str, delay: Duration) -> Self {
            self.delays.lock().insert(query.to_string(), delay);
            self
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().clone()
        }
    }

    impl SearchBackend for MockBackend {
        fn search(
            &self,
            query: String,
        ) -> BoxFuture<'static, Result<Vec<Candidate>, FetchError>> {
            self.calls.lock().push(query.clone());

            let delay = self
                .delays
                .lock()
                .get(&query)
                .copied()
                .unwrap_or(self.default_delay);
            // Unknown queries succeed with no candidates
            let response = self
                .responses
                .lock()
                .get(&query)
                .cloned()
                .unwrap_or_else(|| Ok(Vec::new()));

            Box::pin(async move {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                response
            })
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
