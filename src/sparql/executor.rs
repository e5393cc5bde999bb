//! Named query executor

use crate::config::Catalog;
use crate::error::{ExploreError, ExploreResult};
use super::http::{HttpTransport, SparqlTransport};
use super::params::{apply_params, Params};
use super::prefixes::merge_prefixes;
use super::results::TabularResult;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Query text to run: a catalog entry or literal text
#[derive(Debug, Clone, Copy)]
pub enum QuerySource<'a> {
    /// Named query from the catalog
    Named(&'a str),
    /// Literal query text, e.g. a synthesized query
    Text(&'a str),
}

/// Runs templates against catalog endpoints
#[derive(Clone)]
pub struct QueryExecutor {
    catalog: Arc<Catalog>,
    transport: Arc<dyn SparqlTransport>,
    auto_prefix: bool,
}

impl QueryExecutor {
    /// Create an executor sending queries through the given transport
    pub fn new(catalog: Arc<Catalog>, transport: Arc<dyn SparqlTransport>) -> Self {
        Self {
            catalog,
            transport,
            auto_prefix: true,
        }
    }

    /// Create an executor using the SPARQL HTTP protocol
    pub fn with_http(catalog: Arc<Catalog>) -> ExploreResult<Self> {
        Ok(Self::new(catalog, Arc::new(HttpTransport::new()?)))
    }

    /// Enable or disable merging of endpoint prefixes (on by default)
    pub fn with_auto_prefix(mut self, auto_prefix: bool) -> Self {
        self.auto_prefix = auto_prefix;
        self
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Build the exact text that would be sent, without contacting the endpoint
    pub fn prepare(
        &self,
        endpoint_name: &str,
        source: QuerySource<'_>,
        params: &Params,
    ) -> ExploreResult<String> {
        let endpoint = self.catalog.endpoint(endpoint_name)?;
        let text = match source {
            QuerySource::Named(name) => self.catalog.query(name)?.query.as_str(),
            QuerySource::Text(text) => text,
        };
        let text = if self.auto_prefix {
            merge_prefixes(text, &endpoint.prefix_declarations())
        } else {
            text.to_string()
        };
        apply_params(&text, params)
    }

    /// Run a query and return all rows, or the first error
    pub async fn execute(
        &self,
        endpoint_name: &str,
        source: QuerySource<'_>,
        params: &Params,
    ) -> ExploreResult<TabularResult> {
        let query = self.prepare(endpoint_name, source, params)?;
        let endpoint = self.catalog.endpoint(endpoint_name)?;
        debug!("SPARQL query for {}:\n{}", endpoint_name, query);

        let result = self.transport.select(endpoint, &query).await?;
        debug!("{} rows from {}", result.len(), endpoint_name);
        Ok(result)
    }

    /// Run a query, abandoning it when no answer arrives in time.
    ///
    /// The in-flight request is dropped on timeout, so a late answer is never
    /// observed by the caller.
    pub async fn execute_with_timeout(
        &self,
        endpoint_name: &str,
        source: QuerySource<'_>,
        params: &Params,
        timeout: Duration,
    ) -> ExploreResult<TabularResult> {
        tokio::time::timeout(timeout, self.execute(endpoint_name, source, params))
            .await
            .map_err(|_| ExploreError::Timeout {
                endpoint: endpoint_name.to_string(),
                after: timeout,
            })?
    }

    /// Run a named query from the catalog
    pub async fn query_by_name(
        &self,
        endpoint_name: &str,
        query_name: &str,
        params: &Params,
    ) -> ExploreResult<TabularResult> {
        self.execute(endpoint_name, QuerySource::Named(query_name), params)
            .await
    }

    /// Run literal query text
    pub async fn query_text(
        &self,
        endpoint_name: &str,
        query: &str,
        params: &Params,
    ) -> ExploreResult<TabularResult> {
        self.execute(endpoint_name, QuerySource::Text(query), params)
            .await
    }
}
