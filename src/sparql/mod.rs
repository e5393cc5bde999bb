//! SPARQL query execution against remote endpoints
//!
//! This module turns catalog templates into query text and sends it to an
//! endpoint:
//!
//! 1. look up the endpoint and (for named queries) the template
//! 2. merge the endpoint's `PREFIX` declarations into the text
//! 3. substitute `?{param}` placeholders
//! 4. send the text through a [`SparqlTransport`] and decode the rows
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use velorail::config::Catalog;
//! use velorail::sparql::{params, QueryExecutor};
//!
//! # async fn run() -> velorail::ExploreResult<()> {
//! let catalog = Arc::new(Catalog::builtin()?);
//! let executor = QueryExecutor::with_http(catalog)?;
//! let rows = executor
//!     .query_by_name("wikidata-qlever", "WikidataGeo", &params([("qid", "Q1959795")]))
//!     .await?;
//! println!("{} rows", rows.len());
//! # Ok(())
//! # }
//! ```

mod executor;
mod http;
mod params;
mod prefixes;
mod results;

pub use executor::{QueryExecutor, QuerySource};
pub use http::{HttpTransport, SparqlTransport};
pub use params::{apply_params, params, placeholders, Params};
pub use prefixes::{is_prefix_line, merge_prefixes};
pub use results::{Record, TabularResult};
