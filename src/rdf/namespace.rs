//! RDF namespace and prefix management
//!
//! This module handles namespace prefixes for compact IRI notation. The prefix
//! table keeps declaration order: compaction is first-match, so the order in
//! which an endpoint declares its prefixes decides which prefix wins when two
//! namespace IRIs overlap.

use indexmap::IndexMap;

/// Namespace (prefix → IRI mapping)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace {
    /// Prefix
    pub prefix: String,
    /// IRI
    pub iri: String,
}

impl Namespace {
    /// Create a new namespace
    pub fn new(prefix: impl Into<String>, iri: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            iri: iri.into(),
        }
    }

    /// Render as a SPARQL `PREFIX` declaration
    pub fn declaration(&self) -> String {
        format!("PREFIX {}: <{}>", self.prefix, self.iri)
    }
}

/// Ordered prefix table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceManager {
    /// Prefix → IRI mappings in declaration order
    prefixes: IndexMap<String, String>,
}

impl NamespaceManager {
    /// Create an empty namespace manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a block of SPARQL `PREFIX` declarations.
    ///
    /// Lines that are not prefix declarations are ignored. A prefix declared
    /// twice keeps its first position and its last IRI.
    pub fn from_prefix_block(block: &str) -> Self {
        let mut mgr = Self::new();
        for line in block.lines() {
            if let Some(ns) = parse_declaration(line) {
                mgr.add_prefix(ns.prefix, ns.iri);
            }
        }
        mgr
    }

    /// Add a prefix
    pub fn add_prefix(&mut self, prefix: impl Into<String>, iri: impl Into<String>) {
        self.prefixes.insert(prefix.into(), iri.into());
    }

    /// Get IRI for a prefix
    pub fn get_iri(&self, prefix: &str) -> Option<&str> {
        self.prefixes.get(prefix).map(|s| s.as_str())
    }

    /// Whether the prefix is registered
    pub fn contains(&self, prefix: &str) -> bool {
        self.prefixes.contains_key(prefix)
    }

    /// Expand a compact IRI (prefix:local) to full IRI
    pub fn expand(&self, compact_iri: &str) -> Option<String> {
        let (prefix, local) = compact_iri.split_once(':')?;
        let iri = self.get_iri(prefix)?;
        Some(format!("{}{}", iri, local))
    }

    /// Compact an IRI using the first registered namespace it starts with
    pub fn compact(&self, iri: &str) -> Option<String> {
        self.prefixes
            .iter()
            .find(|(_, namespace_iri)| iri.starts_with(namespace_iri.as_str()))
            .map(|(prefix, namespace_iri)| format!("{}:{}", prefix, &iri[namespace_iri.len()..]))
    }

    /// Compact an IRI, falling back to an `<iri>` reference when no prefix matches
    pub fn compact_or_iri(&self, iri: &str) -> String {
        self.compact(iri).unwrap_or_else(|| format!("<{}>", iri))
    }

    /// `PREFIX` declaration lines in table order
    pub fn declarations(&self) -> Vec<String> {
        self.iter().map(|ns| ns.declaration()).collect()
    }

    /// Render the whole table as a `PREFIX` block
    pub fn to_prefix_block(&self) -> String {
        self.declarations().join("\n")
    }

    /// Iterate over the registered namespaces in declaration order
    pub fn iter(&self) -> impl Iterator<Item = Namespace> + '_ {
        self.prefixes
            .iter()
            .map(|(prefix, iri)| Namespace::new(prefix.clone(), iri.clone()))
    }

    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }
}

/// Parse `PREFIX name: <iri>` (keyword case-insensitive)
fn parse_declaration(line: &str) -> Option<Namespace> {
    let line = line.trim();
    let keyword = line.split_whitespace().next()?;
    if !keyword.eq_ignore_ascii_case("prefix") {
        return None;
    }
    let rest = line[keyword.len()..].trim_start();
    let (prefix, iri) = rest.split_once(':')?;
    let iri = iri.trim();
    let iri = iri.strip_prefix('<')?;
    let end = iri.find('>')?;
    Some(Namespace::new(prefix.trim(), &iri[..end]))
}
