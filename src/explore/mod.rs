//! Interactive exploration of a remote graph from a single start node
//!
//! The [`Explorer`] runs one of six canonical named queries, chosen by the
//! role of the start node in the matched triples and whether per-predicate
//! counts are wanted:
//!
//! | position  | plain                  | summary                       |
//! |-----------|------------------------|-------------------------------|
//! | subject   | `ExploreFromSubject`   | `ExploreFromSubjectSummary`   |
//! | predicate | `ExploreFromPredicate` | `ExploreFromPredicateSummary` |
//! | object    | `ExploreFromObject`    | `ExploreFromObjectSummary`    |
//!
//! Summary queries return one row per predicate with a `count` column.

mod node;

pub use node::{Node, NodeResolver, TriplePos};

use crate::error::ExploreResult;
use crate::rdf::NamespaceManager;
use crate::sparql::{params, QueryExecutor, TabularResult};
use tracing::info;

/// Query names indexed by `[TriplePos][summary]`
const EXPLORE_QUERIES: [[&str; 2]; 3] = [
    ["ExploreFromSubject", "ExploreFromSubjectSummary"],
    ["ExploreFromPredicate", "ExploreFromPredicateSummary"],
    ["ExploreFromObject", "ExploreFromObjectSummary"],
];

/// Template parameter bound to the start node's qualified name
pub const START_NODE_PARAM: &str = "start_node";

/// Name of the canonical exploration query for a triple position
pub fn explore_query_name(triple_pos: TriplePos, summary: bool) -> &'static str {
    EXPLORE_QUERIES[triple_pos as usize][usize::from(summary)]
}

/// Explores nodes of one endpoint
#[derive(Clone)]
pub struct Explorer {
    executor: QueryExecutor,
    resolver: NodeResolver,
    endpoint_name: String,
}

impl Explorer {
    pub fn new(executor: QueryExecutor, endpoint_name: impl Into<String>) -> Self {
        let resolver = NodeResolver::new(executor.catalog().clone());
        Self {
            executor,
            resolver,
            endpoint_name: endpoint_name.into(),
        }
    }

    pub fn endpoint_name(&self) -> &str {
        &self.endpoint_name
    }

    pub fn executor(&self) -> &QueryExecutor {
        &self.executor
    }

    /// Prefix table of the configured endpoint
    pub fn namespaces(&self) -> ExploreResult<&NamespaceManager> {
        Ok(self.executor.catalog().endpoint(&self.endpoint_name)?.namespaces())
    }

    /// Resolve a node against the configured endpoint
    pub fn get_node(&self, prefix: &str, local_id: &str) -> ExploreResult<Node> {
        self.resolver.resolve(&self.endpoint_name, prefix, local_id)
    }

    /// Run the canonical exploration query for the node
    pub async fn explore(
        &self,
        node: &Node,
        triple_pos: TriplePos,
        summary: bool,
    ) -> ExploreResult<TabularResult> {
        let query_name = explore_query_name(triple_pos, summary);
        info!(
            "Exploring {} as {} on {} ({})",
            node.qualified_name(),
            triple_pos,
            self.endpoint_name,
            query_name
        );
        let bindings = params([(START_NODE_PARAM, node.qualified_name())]);
        self.executor
            .query_by_name(&self.endpoint_name, query_name, &bindings)
            .await
    }
}
