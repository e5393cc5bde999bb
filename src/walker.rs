//! Knowledge graph walker
//!
//! One walk step chains the other components: resolve the start node,
//! summarize its outgoing predicates, keep the selected single-valued ones,
//! synthesize a flat query for them and fetch its first row.

use crate::error::ExploreResult;
use crate::explore::{Explorer, Node, TriplePos};
use crate::querygen::QueryGen;
use crate::sparql::{Params, QueryExecutor, Record};
use std::collections::HashSet;
use tracing::{debug, info};

/// Main variable of walker queries
pub const MAIN_VAR: &str = "item";

/// Walks a remote graph node by node
#[derive(Clone)]
pub struct KgWalker {
    explorer: Explorer,
    query_gen: QueryGen,
}

impl KgWalker {
    /// Walker for a catalog endpoint; fails with `UnknownEndpoint` when it is not configured
    pub fn new(executor: QueryExecutor, endpoint_name: &str) -> ExploreResult<Self> {
        let explorer = Explorer::new(executor, endpoint_name);
        let query_gen = QueryGen::new(explorer.namespaces()?.clone());
        Ok(Self {
            explorer,
            query_gen,
        })
    }

    pub fn explorer(&self) -> &Explorer {
        &self.explorer
    }

    pub fn query_gen(&self) -> &QueryGen {
        &self.query_gen
    }

    /// Whether `uri` is named by `selected`: as full IRI, prefixed form or local name
    fn is_selected(&self, uri: &str, selected: &[String]) -> bool {
        let prefixed = self.query_gen.prefixed_property(uri);
        let local = uri
            .rsplit(|c: char| c == '/' || c == '#' || c == ':')
            .next()
            .unwrap_or(uri);
        selected
            .iter()
            .any(|s| s == uri || *s == prefixed || s == local)
    }

    /// Summary records of the selected properties, first occurrence of each only.
    ///
    /// An empty selection keeps every property.
    pub fn select_records(&self, records: &[Record], selected: &[String]) -> Vec<Record> {
        let mut seen: HashSet<&str> = HashSet::new();
        records
            .iter()
            .filter(|record| match record.get("p") {
                Some(uri) => {
                    (selected.is_empty() || self.is_selected(uri, selected)) && seen.insert(uri)
                }
                None => false,
            })
            .cloned()
            .collect()
    }

    /// Query projecting the selected single-valued properties of `node`
    pub async fn generated_query(
        &self,
        node: &Node,
        selected: &[String],
        project_limit: Option<usize>,
    ) -> ExploreResult<String> {
        let summary = self.explorer.explore(node, TriplePos::Subject, true).await?;
        let records = self.select_records(&summary.records, selected);
        debug!(
            "{} of {} properties of {} selected",
            records.len(),
            summary.len(),
            node
        );
        Ok(self
            .query_gen
            .gen(&records, MAIN_VAR, &node.qualified_name(), project_limit))
    }

    /// Walk to `prefix:node_id` and return the values of the selected properties
    pub async fn walk(
        &self,
        prefix: &str,
        node_id: &str,
        selected: &[String],
    ) -> ExploreResult<Option<Record>> {
        let node = self.explorer.get_node(prefix, node_id)?;
        let query = self.generated_query(&node, selected, None).await?;
        let result = self
            .explorer
            .executor()
            .query_text(self.explorer.endpoint_name(), &query, &Params::new())
            .await?;
        info!("walk to {} returned {} rows", node, result.len());
        Ok(result.records.into_iter().next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Catalog, Endpoint};
    use crate::error::ExploreError;
    use crate::sparql::{SparqlTransport, TabularResult};
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    /// Answers summary queries with a fixed predicate table and anything else with one row
    #[derive(Default)]
    struct ScriptedEndpoint {
        queries: Mutex<Vec<String>>,
    }

    fn summary(p: &str, count: &str) -> Record {
        [("p", p), ("count", count)].into_iter().collect()
    }

    #[async_trait]
    impl SparqlTransport for ScriptedEndpoint {
        async fn select(&self, _endpoint: &Endpoint, query: &str) -> ExploreResult<TabularResult> {
            self.queries.lock().unwrap().push(query.to_string());
            if query.contains("COUNT") {
                Ok(TabularResult::from_records(vec![
                    summary("http://www.wikidata.org/prop/direct/P31", "1"),
                    summary("http://www.wikidata.org/prop/direct/P138", "1"),
                    summary("http://www.wikidata.org/prop/direct/P138", "1"),
                    summary("http://www.wikidata.org/prop/direct/P10689", "1"),
                    summary("http://www.w3.org/2000/01/rdf-schema#label", "5"),
                ]))
            } else {
                let row: Record = [("item", "http://www.wikidata.org/entity/Q1"), ("P138", "x")]
                    .into_iter()
                    .collect();
                Ok(TabularResult::from_records(vec![row]))
            }
        }
    }

    fn catalog() -> Arc<Catalog> {
        let summary_query = "SELECT ?p (COUNT(DISTINCT ?o) AS ?count) \
                             WHERE { VALUES ?s { ?{start_node} } ?s ?p ?o } GROUP BY ?p";
        Arc::new(
            Catalog::builder()
                .endpoint(
                    Endpoint::new("wd", "http://localhost/sparql")
                        .with_prefix("wd", "http://www.wikidata.org/entity/")
                        .with_prefix("wdt", "http://www.wikidata.org/prop/direct/"),
                )
                .query("ExploreFromSubjectSummary", summary_query)
                .build(),
        )
    }

    fn walker(transport: Arc<ScriptedEndpoint>) -> KgWalker {
        KgWalker::new(QueryExecutor::new(catalog(), transport), "wd").unwrap()
    }

    #[test]
    fn test_select_records() {
        let walker = walker(Arc::new(ScriptedEndpoint::default()));
        let records = vec![
            summary("http://www.wikidata.org/prop/direct/P31", "1"),
            summary("http://www.wikidata.org/prop/direct/P138", "1"),
            summary("http://www.wikidata.org/prop/direct/P138", "1"),
            summary("http://www.wikidata.org/prop/direct/P10689", "1"),
        ];
        let selected = vec!["wdt:P138".to_string(), "P10689".to_string()];
        let picked = walker.select_records(&records, &selected);
        let props: Vec<&str> = picked.iter().map(|r| r.get("p").unwrap()).collect();
        assert_eq!(
            props,
            vec![
                "http://www.wikidata.org/prop/direct/P138",
                "http://www.wikidata.org/prop/direct/P10689"
            ]
        );
        assert_eq!(walker.select_records(&records, &[]).len(), 3);
    }

    #[tokio::test]
    async fn test_walk() {
        let transport = Arc::new(ScriptedEndpoint::default());
        let walker = walker(transport.clone());
        let record = walker
            .walk("wd", "Q1", &["P138".to_string()])
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.get("P138"), Some("x"));

        let queries = transport.queries.lock().unwrap();
        assert_eq!(queries.len(), 2);
        assert!(queries[0].contains("VALUES ?s { wd:Q1 }"));
        assert!(queries[1].contains("VALUES (?item) { (wd:Q1) }"));
        assert!(queries[1].contains("?item wdt:P138 ?P138 ."));
        assert!(!queries[1].contains("P31"));
    }

    #[tokio::test]
    async fn test_walk_unknown_prefix_sends_nothing() {
        let transport = Arc::new(ScriptedEndpoint::default());
        let err = walker(transport.clone())
            .walk("osmrel", "1", &[])
            .await
            .unwrap_err();
        assert!(matches!(err, ExploreError::UnknownPrefix { .. }));
        assert!(transport.queries.lock().unwrap().is_empty());
    }

    #[test]
    fn test_unknown_endpoint() {
        let executor = QueryExecutor::new(catalog(), Arc::new(ScriptedEndpoint::default()));
        assert!(matches!(
            KgWalker::new(executor, "nowhere"),
            Err(ExploreError::UnknownEndpoint(_))
        ));
    }
}
