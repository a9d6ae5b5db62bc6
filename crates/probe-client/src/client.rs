//! HTTP client for the console search endpoint.

use std::time::Duration;

use probe_core::{Candidate, EndpointConfig, FetchError};

use crate::response::{decode, SearchResponse};

/// Client for `GET {base_url}/search?q=...`.
///
/// Issues exactly one request per call. No caching or retries; the caller
/// decides how often to search.
#[derive(Clone, Debug)]
pub struct SearchClient {
    http: reqwest::Client,
    search_url: String,
    timeout: Duration,
}

impl SearchClient {
    /// Create a client for the configured endpoint.
    pub fn new(config: &EndpointConfig) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            search_url: format!("{}/search", config.base_url.trim_end_matches('/')),
            timeout: config.timeout(),
        })
    }

    /// Full URL searches are sent to, without the query string.
    pub fn search_url(&self) -> &str {
        &self.search_url
    }

    /// Search for the raw query text.
    ///
    /// Wraps the request with a timeout. If it expires, returns
    /// `FetchError::Timeout`.
    pub async fn search(&self, query: &str) -> Result<Vec<Candidate>, FetchError> {
        match tokio::time::timeout(self.timeout, self.send(query)).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout {
                duration: self.timeout,
            }),
        }
    }

    async fn send(&self, query: &str) -> Result<Vec<Candidate>, FetchError> {
        let resp = self
            .http
            .get(&self.search_url)
            .query(&[("q", query)])
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            // The console reports failures as `{"error": "..."}`
            if let Ok(SearchResponse {
                error: Some(error), ..
            }) = serde_json::from_str::<SearchResponse>(&body)
            {
                return Err(FetchError::Service(error));
            }
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let candidates = decode(&body)?;
        tracing::debug!("search {:?}: {} candidates", query, candidates.len());
        Ok(candidates)
    }

    fn transport_error(&self, error: reqwest::Error) -> FetchError {
        if error.is_timeout() {
            FetchError::Timeout {
                duration: self.timeout,
            }
        } else {
            FetchError::Transport(error.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer, timeout_ms: u64) -> SearchClient {
        SearchClient::new(&EndpointConfig {
            base_url: format!("{}/", server.uri()),
            timeout_ms,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_search_sends_encoded_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "Block #12345"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [
                    {"id": "12345", "title": "Block #12345", "subtitle": "", "type": "block", "url": "/block/12345"}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, 1_000);
        assert!(client.search_url().ends_with("/search"));
        assert!(!client.search_url().ends_with("//search"));

        let candidates = client.search("Block #12345").await.unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].title, "Block #12345");
    }

    #[tokio::test]
    async fn test_empty_results_are_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
            .mount(&server)
            .await;

        let candidates = client_for(&server, 1_000).search("nothing").await.unwrap();
        assert!(candidates.is_empty());
    }

    #[tokio::test]
    async fn test_server_error_body_is_service_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(
                ResponseTemplate::new(500).set_body_json(json!({"error": "Search failed"})),
            )
            .mount(&server)
            .await;

        let err = client_for(&server, 1_000).search("x").await.unwrap_err();
        assert!(matches!(err, FetchError::Service(msg) if msg == "Search failed"));
    }

    #[tokio::test]
    async fn test_plain_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let err = client_for(&server, 1_000).search("x").await.unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 502, .. }));
    }

    #[tokio::test]
    async fn test_slow_response_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"results": []}))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let err = client_for(&server, 50).search("x").await.unwrap_err();
        assert!(matches!(err, FetchError::Timeout { .. }));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_error() {
        let client = SearchClient::new(&EndpointConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_ms: 2_000,
        })
        .unwrap();

        let err = client.search("x").await.unwrap_err();
        assert!(matches!(
            err,
            FetchError::Transport(_) | FetchError::Timeout { .. }
        ));
    }
}
