//! RDF namespace handling
//!
//! Prefix tables map short prefixes such as `osmrel` to namespace IRIs and
//! are used both to resolve start nodes and to compact predicate IRIs in
//! generated queries.

pub mod namespace;

pub use namespace::{Namespace, NamespaceManager};
