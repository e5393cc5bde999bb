//! Named, parameterized query templates

use serde::{Deserialize, Serialize};

/// A query template looked up by name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedQuery {
    /// Query name (the catalog key)
    #[serde(default)]
    pub name: String,
    /// Template text with `?{param}` or `{{ param }}` placeholders
    #[serde(alias = "sparql")]
    pub query: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl NamedQuery {
    pub fn new(name: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            query: query.into(),
            title: None,
            description: None,
        }
    }

    pub(crate) fn finish(mut self, name: &str) -> Self {
        if self.name.is_empty() {
            self.name = name.to_string();
        }
        self
    }
}
