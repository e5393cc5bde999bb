//! Graph nodes and their resolution from qualified names

use crate::config::Catalog;
use crate::error::{ExploreError, ExploreResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Role of the start node in the triples being explored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriplePos {
    Subject = 0,
    Predicate = 1,
    Object = 2,
}

impl fmt::Display for TriplePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TriplePos::Subject => "subject",
            TriplePos::Predicate => "predicate",
            TriplePos::Object => "object",
        };
        f.write_str(name)
    }
}

impl FromStr for TriplePos {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "subject" | "s" => Ok(TriplePos::Subject),
            "predicate" | "p" => Ok(TriplePos::Predicate),
            "object" | "o" => Ok(TriplePos::Object),
            other => Err(format!("invalid triple position: {}", other)),
        }
    }
}

/// A node of a remote graph addressed by prefix and local identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Namespace prefix, e.g. `osmrel`
    pub prefix: String,
    /// Local identifier, e.g. `10492086`
    pub local_id: String,
    /// Full IRI: namespace of the prefix followed by the local identifier
    pub uri: String,
}

impl Node {
    /// `prefix:local_id`, usable as a SPARQL term when the prefix is declared
    pub fn qualified_name(&self) -> String {
        format!("{}:{}", self.prefix, self.local_id)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.prefix, self.local_id)
    }
}

/// Resolves `(prefix, local_id)` pairs against an endpoint's prefix table
#[derive(Debug, Clone)]
pub struct NodeResolver {
    catalog: Arc<Catalog>,
}

impl NodeResolver {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    /// Resolve a node; fails with `UnknownPrefix` when the endpoint does not declare `prefix`
    pub fn resolve(&self, endpoint_name: &str, prefix: &str, local_id: &str) -> ExploreResult<Node> {
        let endpoint = self.catalog.endpoint(endpoint_name)?;
        let base_uri = endpoint
            .namespaces()
            .get_iri(prefix)
            .ok_or_else(|| ExploreError::UnknownPrefix {
                prefix: prefix.to_string(),
                endpoint: endpoint_name.to_string(),
            })?;

        Ok(Node {
            prefix: prefix.to_string(),
            local_id: local_id.to_string(),
            uri: format!("{}{}", base_uri, local_id),
        })
    }
}
