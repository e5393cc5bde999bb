//! Velorail graph explorer
//!
//! Explores remote RDF knowledge graphs through their SPARQL endpoints and
//! synthesizes new queries from what it finds.
//!
//! # Components
//!
//! - [`config`]: endpoint and named query catalogs loaded from YAML
//! - [`sparql`]: placeholder templates, prefix merging and query execution
//! - [`explore`]: node resolution and the six canonical exploration queries
//! - [`querygen`]: flat query synthesis from summary explorations
//! - [`geo`]: haversine radius filtering and location lookups
//! - [`walker`]: explore, synthesize and execute in one step
//!
//! ## Example Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use velorail::{Catalog, Explorer, QueryExecutor, TriplePos};
//!
//! # async fn run() -> velorail::ExploreResult<()> {
//! let catalog = Arc::new(Catalog::builtin()?);
//! let executor = QueryExecutor::with_http(catalog)?;
//! let explorer = Explorer::new(executor, "osm-qlever");
//!
//! let node = explorer.get_node("osmrel", "10492086")?;
//! let summary = explorer.explore(&node, TriplePos::Subject, true).await?;
//! for record in &summary {
//!     println!("{:?} {:?}", record.get("p"), record.get("count"));
//! }
//! # Ok(())
//! # }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod explore;
pub mod geo;
pub mod querygen;
pub mod rdf;
pub mod sparql;
pub mod walker;

// Re-export main types for convenience
pub use config::{Catalog, CatalogBuilder, Endpoint, HttpMethod, NamedQuery};

pub use error::{ExploreError, ExploreResult};

pub use explore::{explore_query_name, Explorer, Node, NodeResolver, TriplePos};

pub use geo::{haversine_km, nearby, nearby_with, GeoColumns, LocFinder, NearbyRecord, WikidataGeoItem};

pub use querygen::{QueryGen, SynthesizedProperty, VarNameTracker};

pub use rdf::{Namespace, NamespaceManager};

pub use sparql::{
    params, HttpTransport, Params, QueryExecutor, QuerySource, Record, SparqlTransport,
    TabularResult,
};

pub use walker::KgWalker;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
