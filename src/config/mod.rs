//! Endpoint and named query catalogs
//!
//! A [`Catalog`] is loaded once and then shared read-only (typically as
//! `Arc<Catalog>`) by every component that needs endpoint or query lookups.
//!
//! Both YAML files are maps keyed by name:
//!
//! ```yaml
//! # endpoints.yaml
//! osm-qlever:
//!   endpoint: https://qlever.cs.uni-freiburg.de/api/osm-planet
//!   method: POST
//!   prefixes: |
//!     PREFIX osmrel: <https://www.openstreetmap.org/relation/>
//!
//! # queries.yaml
//! ExploreFromSubject:
//!   sparql: |
//!     SELECT ?p ?o WHERE { VALUES ?s { ?{start_node} } ?s ?p ?o }
//! ```

mod endpoint;
mod query;

pub use endpoint::{Endpoint, HttpMethod};
pub use query::NamedQuery;

use crate::error::{ExploreError, ExploreResult};
use indexmap::IndexMap;
use std::path::Path;
use tracing::info;

const BUILTIN_ENDPOINTS: &str = include_str!("../../resources/endpoints.yaml");
const BUILTIN_QUERIES: &[&str] = &[
    include_str!("../../resources/queries/sparql-explore.yaml"),
    include_str!("../../resources/queries/locations.yaml"),
];

/// Immutable endpoint and named query tables
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    endpoints: IndexMap<String, Endpoint>,
    queries: IndexMap<String, NamedQuery>,
}

impl Catalog {
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    /// The endpoints and queries bundled with the crate
    pub fn builtin() -> ExploreResult<Self> {
        Ok(Self::builder().builtin_endpoints()?.builtin_queries()?.build())
    }

    /// Parse an endpoint document and any number of query documents
    pub fn from_yaml_str(endpoints: &str, queries: &[&str]) -> ExploreResult<Self> {
        let mut builder = Self::builder().endpoints_yaml(endpoints)?;
        for yaml in queries {
            builder = builder.queries_yaml(yaml)?;
        }
        Ok(builder.build())
    }

    /// Load an endpoint file and any number of query files
    pub fn from_yaml_files<P: AsRef<Path>>(endpoints: P, queries: &[P]) -> ExploreResult<Self> {
        let mut builder = Self::builder().endpoints_file(endpoints)?;
        for path in queries {
            builder = builder.queries_file(path)?;
        }
        let catalog = builder.build();
        info!(
            "Loaded {} endpoints and {} queries",
            catalog.endpoints.len(),
            catalog.queries.len()
        );
        Ok(catalog)
    }

    /// Look up an endpoint by name
    pub fn endpoint(&self, name: &str) -> ExploreResult<&Endpoint> {
        self.endpoints
            .get(name)
            .ok_or_else(|| ExploreError::UnknownEndpoint(name.to_string()))
    }

    /// Look up a named query
    pub fn query(&self, name: &str) -> ExploreResult<&NamedQuery> {
        self.queries
            .get(name)
            .ok_or_else(|| ExploreError::UnknownQuery(name.to_string()))
    }

    pub fn endpoints(&self) -> impl Iterator<Item = &Endpoint> {
        self.endpoints.values()
    }

    pub fn queries(&self) -> impl Iterator<Item = &NamedQuery> {
        self.queries.values()
    }
}

/// Assembles a [`Catalog`]; later entries replace earlier ones of the same name
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    catalog: Catalog,
}

impl CatalogBuilder {
    pub fn endpoint(mut self, endpoint: Endpoint) -> Self {
        self.catalog.endpoints.insert(endpoint.name.clone(), endpoint);
        self
    }

    pub fn query(mut self, name: &str, text: &str) -> Self {
        self.catalog
            .queries
            .insert(name.to_string(), NamedQuery::new(name, text));
        self
    }

    /// Add all endpoints of a YAML document keyed by endpoint name
    pub fn endpoints_yaml(mut self, yaml: &str) -> ExploreResult<Self> {
        let parsed: IndexMap<String, Endpoint> = serde_yaml::from_str(yaml)?;
        for (name, endpoint) in parsed {
            self.catalog.endpoints.insert(name.clone(), endpoint.finish(&name));
        }
        Ok(self)
    }

    /// Add all queries of a YAML document keyed by query name
    pub fn queries_yaml(mut self, yaml: &str) -> ExploreResult<Self> {
        let parsed: IndexMap<String, NamedQuery> = serde_yaml::from_str(yaml)?;
        for (name, query) in parsed {
            self.catalog.queries.insert(name.clone(), query.finish(&name));
        }
        Ok(self)
    }

    /// Add the endpoints bundled with the crate
    pub fn builtin_endpoints(self) -> ExploreResult<Self> {
        self.endpoints_yaml(BUILTIN_ENDPOINTS)
    }

    /// Add the queries bundled with the crate
    pub fn builtin_queries(mut self) -> ExploreResult<Self> {
        for yaml in BUILTIN_QUERIES {
            self = self.queries_yaml(yaml)?;
        }
        Ok(self)
    }

    pub fn endpoints_file(self, path: impl AsRef<Path>) -> ExploreResult<Self> {
        self.endpoints_yaml(&read_file(path.as_ref())?)
    }

    pub fn queries_file(self, path: impl AsRef<Path>) -> ExploreResult<Self> {
        self.queries_yaml(&read_file(path.as_ref())?)
    }

    pub fn build(self) -> Catalog {
        self.catalog
    }
}

fn read_file(path: &Path) -> ExploreResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| ExploreError::Config(format!("{}: {}", path.display(), e)))
}
