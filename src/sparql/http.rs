//! SPARQL HTTP protocol client

use crate::config::{Endpoint, HttpMethod};
use crate::error::{ExploreError, ExploreResult};
use super::results::TabularResult;
use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use std::time::Duration;

const SPARQL_RESULTS_JSON: &str = "application/sparql-results+json";
const USER_AGENT: &str = concat!("velorail/", env!("CARGO_PKG_VERSION"));

/// Sends query text to an endpoint and decodes the tabular answer.
///
/// Implemented by:
/// - `HttpTransport`: the SPARQL 1.1 protocol over HTTP
/// - test doubles that answer from memory
#[async_trait]
pub trait SparqlTransport: Send + Sync {
    /// Run a query against the endpoint
    async fn select(&self, endpoint: &Endpoint, query: &str) -> ExploreResult<TabularResult>;
}

/// SPARQL protocol transport backed by `reqwest`
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a transport with a 60 second request timeout
    pub fn new() -> ExploreResult<Self> {
        Self::with_timeout(Duration::from_secs(60))
    }

    pub fn with_timeout(timeout: Duration) -> ExploreResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ExploreError::Config(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl SparqlTransport for HttpTransport {
    async fn select(&self, endpoint: &Endpoint, query: &str) -> ExploreResult<TabularResult> {
        let encoded = utf8_percent_encode(query, NON_ALPHANUMERIC).to_string();
        let request = match endpoint.method {
            HttpMethod::Post => self
                .client
                .post(&endpoint.endpoint)
                .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(format!("query={}", encoded)),
            HttpMethod::Get => {
                let separator = if endpoint.endpoint.contains('?') { '&' } else { '?' };
                self.client
                    .get(format!("{}{}query={}", endpoint.endpoint, separator, encoded))
            }
        };

        let resp = request
            .header(ACCEPT, SPARQL_RESULTS_JSON)
            .send()
            .await
            .map_err(|e| ExploreError::endpoint(&endpoint.name, e))?;

        let status = resp.status();
        if !status.is_success() {
            let error_text = resp.text().await.unwrap_or_default();
            return Err(ExploreError::endpoint(
                &endpoint.name,
                format!("HTTP {}: {}", status, error_text.trim()),
            ));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| ExploreError::endpoint(&endpoint.name, e))?;
        TabularResult::from_sparql_json(&body)
            .map_err(|e| ExploreError::endpoint(&endpoint.name, format!("invalid results: {}", e)))
    }
}
