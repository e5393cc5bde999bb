//! SPARQL endpoint configuration

use crate::rdf::NamespaceManager;
use serde::{Deserialize, Serialize};

/// HTTP method used to send queries to an endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    #[default]
    Post,
}

fn default_lang() -> String {
    "sparql".to_string()
}

/// A named remote query service with its prefix table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Endpoint {
    /// Endpoint name (the catalog key)
    #[serde(default)]
    pub name: String,
    /// Query service URL
    pub endpoint: String,
    /// Query language
    #[serde(default = "default_lang")]
    pub lang: String,
    /// HTTP method
    #[serde(default)]
    pub method: HttpMethod,
    /// Backing triple store, informational
    #[serde(default)]
    pub database: Option<String>,
    /// Human readable web page of the service
    #[serde(default)]
    pub website: Option<String>,
    /// Raw block of `PREFIX` declarations
    #[serde(default)]
    pub prefixes: Option<String>,
    /// Prefix table parsed from the raw block
    #[serde(skip)]
    namespaces: NamespaceManager,
}

impl Endpoint {
    /// Create an endpoint without prefixes
    pub fn new(name: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            endpoint: endpoint.into(),
            lang: default_lang(),
            method: HttpMethod::default(),
            database: None,
            website: None,
            prefixes: None,
            namespaces: NamespaceManager::new(),
        }
    }

    /// Register a prefix, keeping declaration order
    pub fn with_prefix(mut self, prefix: &str, iri: &str) -> Self {
        self.namespaces.add_prefix(prefix, iri);
        if self.prefixes.is_some() {
            self.prefixes = Some(self.namespaces.to_prefix_block());
        }
        self
    }

    /// Use a raw block of `PREFIX` declarations as the prefix table
    pub fn with_prefix_block(mut self, block: &str) -> Self {
        self.prefixes = Some(block.to_string());
        self.namespaces = NamespaceManager::from_prefix_block(block);
        self
    }

    pub fn with_method(mut self, method: HttpMethod) -> Self {
        self.method = method;
        self
    }

    /// Fill in derived state after deserialization under the given catalog key
    pub(crate) fn finish(mut self, name: &str) -> Self {
        if self.name.is_empty() {
            self.name = name.to_string();
        }
        if let Some(block) = &self.prefixes {
            self.namespaces = NamespaceManager::from_prefix_block(block);
        }
        self
    }

    /// The ordered prefix table
    pub fn namespaces(&self) -> &NamespaceManager {
        &self.namespaces
    }

    /// `PREFIX` lines this endpoint contributes to a query, one per prefix
    /// and always in agreement with [`Endpoint::namespaces`]
    pub fn prefix_declarations(&self) -> Vec<String> {
        self.namespaces.declarations()
    }
}
