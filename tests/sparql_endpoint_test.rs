//! Query execution against an in-process SPARQL endpoint

use axum::extract::{RawQuery, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::Router;
use percent_encoding::percent_decode_str;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use velorail::{
    Catalog, Endpoint, ExploreError, Explorer, HttpMethod, KgWalker, Params, QueryExecutor,
    QuerySource, TriplePos,
};

const SUMMARY_JSON: &str = r#"{
  "head": { "vars": ["p", "count"] },
  "results": { "bindings": [
    { "p": { "type": "uri", "value": "https://www.openstreetmap.org/wiki/Key:ref" },
      "count": { "type": "literal", "value": "1" } },
    { "p": { "type": "uri", "value": "https://www.openstreetmap.org/wiki/Key:name" },
      "count": { "type": "literal", "value": "3" } },
    { "p": { "type": "uri", "value": "http://www.w3.org/1999/02/22-rdf-syntax-ns#type" },
      "count": { "type": "literal", "value": "1" } }
  ] }
}"#;

const ITEM_JSON: &str = r#"{
  "head": { "vars": ["item", "ref", "type"] },
  "results": { "bindings": [
    { "item": { "type": "uri", "value": "https://www.openstreetmap.org/relation/10492086" },
      "ref": { "type": "literal", "value": "RE 10" },
      "type": { "type": "uri", "value": "https://www.openstreetmap.org/relation" } }
  ] }
}"#;

/// Queries received by the mock endpoint
type Received = Arc<Mutex<Vec<String>>>;

fn decode_query(encoded: &str) -> String {
    let value = encoded
        .split('&')
        .find_map(|pair| pair.strip_prefix("query="))
        .unwrap_or_default();
    percent_decode_str(value).decode_utf8_lossy().into_owned()
}

fn answer(received: &Received, query: String) -> axum::response::Response {
    let json = if query.contains("COUNT") { SUMMARY_JSON } else { ITEM_JSON };
    received.lock().unwrap().push(query);
    (
        [(header::CONTENT_TYPE, "application/sparql-results+json")],
        json,
    )
        .into_response()
}

async fn sparql_post(State(received): State<Received>, body: String) -> axum::response::Response {
    answer(&received, decode_query(&body))
}

async fn sparql_get(
    State(received): State<Received>,
    RawQuery(query): RawQuery,
) -> axum::response::Response {
    answer(&received, decode_query(&query.unwrap_or_default()))
}

async fn failing() -> impl IntoResponse {
    (StatusCode::INTERNAL_SERVER_ERROR, "query timed out on the backend")
}

/// Start a mock endpoint on an ephemeral port and return its base URL
async fn start_server(received: Received) -> String {
    let app = Router::new()
        .route("/sparql", post(sparql_post).get(sparql_get))
        .route("/broken", post(failing))
        .with_state(received);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn catalog(base: &str, method: HttpMethod) -> Arc<Catalog> {
    let prefixes = "\
PREFIX rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#>
PREFIX osmkey: <https://www.openstreetmap.org/wiki/Key:>
PREFIX osmrel: <https://www.openstreetmap.org/relation/>
";
    let queries = r#"
ExploreFromSubjectSummary:
  sparql: |
    SELECT ?p (COUNT(DISTINCT ?o) AS ?count)
    WHERE { VALUES ?s { ?{start_node} } ?s ?p ?o }
    GROUP BY ?p
"#;
    Arc::new(
        Catalog::builder()
            .endpoint(
                Endpoint::new("mock", format!("{}/sparql", base))
                    .with_prefix_block(prefixes)
                    .with_method(method),
            )
            .endpoint(Endpoint::new("broken", format!("{}/broken", base)))
            .queries_yaml(queries)
            .unwrap()
            .build(),
    )
}

fn init_logging() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

#[tokio::test]
async fn test_explore_summary_over_post() {
    init_logging();
    let received = Received::default();
    let base = start_server(received.clone()).await;
    let executor = QueryExecutor::with_http(catalog(&base, HttpMethod::Post)).unwrap();
    let explorer = Explorer::new(executor, "mock");

    let node = explorer.get_node("osmrel", "10492086").unwrap();
    let result = explorer.explore(&node, TriplePos::Subject, true).await.unwrap();

    assert_eq!(result.columns, vec!["p", "count"]);
    assert_eq!(result.len(), 3);
    assert_eq!(result.records[1].get("count"), Some("3"));

    let queries = received.lock().unwrap();
    assert_eq!(queries.len(), 1);
    assert!(queries[0].contains("PREFIX osmrel: <https://www.openstreetmap.org/relation/>"));
    assert!(queries[0].contains("VALUES ?s { osmrel:10492086 }"));
}

#[tokio::test]
async fn test_named_query_over_get() {
    let received = Received::default();
    let base = start_server(received.clone()).await;
    let executor = QueryExecutor::with_http(catalog(&base, HttpMethod::Get)).unwrap();

    let result = executor
        .query_text("mock", "SELECT ?item ?ref ?type WHERE { ?item osmkey:ref ?ref }", &Params::new())
        .await
        .unwrap();
    assert_eq!(result.columns, vec!["item", "ref", "type"]);
    assert_eq!(result.first().and_then(|r| r.get("ref")), Some("RE 10"));
    assert!(received.lock().unwrap()[0].contains("PREFIX osmkey:"));
}

#[tokio::test]
async fn test_http_error_status() {
    let base = start_server(Received::default()).await;
    let executor = QueryExecutor::with_http(catalog(&base, HttpMethod::Post)).unwrap();

    let err = executor
        .execute("broken", QuerySource::Text("SELECT * WHERE { ?s ?p ?o }"), &Params::new())
        .await
        .unwrap_err();
    assert!(err.is_remote());
    match err {
        ExploreError::Endpoint { endpoint, cause } => {
            assert_eq!(endpoint, "broken");
            assert!(cause.contains("500"), "cause was {}", cause);
        }
        other => panic!("expected Endpoint error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unreachable_endpoint() {
    // bind and drop to get a port nobody listens on
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let executor = QueryExecutor::with_http(catalog(&base, HttpMethod::Post)).unwrap();
    let err = executor
        .execute("mock", QuerySource::Text("ASK { ?s ?p ?o }"), &Params::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ExploreError::Endpoint { .. }));
}

#[tokio::test]
async fn test_walk_end_to_end() {
    let received = Received::default();
    let base = start_server(received.clone()).await;
    let executor = QueryExecutor::with_http(catalog(&base, HttpMethod::Post))
        .unwrap()
        .with_auto_prefix(true);
    let walker = KgWalker::new(executor, "mock").unwrap();

    let record = walker
        .walk("osmrel", "10492086", &[])
        .await
        .unwrap()
        .expect("one row");
    assert_eq!(record.get("ref"), Some("RE 10"));

    let queries = received.lock().unwrap();
    assert_eq!(queries.len(), 2);
    let generated = &queries[1];
    assert!(generated.contains("VALUES (?item) { (osmrel:10492086) }"));
    assert!(generated.contains("?item osmkey:ref ?ref ."));
    assert!(generated.contains("?item rdf:type ?type ."));
    // multi-valued
    assert!(!generated.contains("osmkey:name"));
    // every prefix declared exactly once
    assert_eq!(generated.matches("PREFIX osmrel:").count(), 1);
}

#[tokio::test]
async fn test_timeout() {
    let executor = QueryExecutor::with_http(catalog("http://10.255.255.1:9", HttpMethod::Post)).unwrap();
    let err = executor
        .execute_with_timeout(
            "mock",
            QuerySource::Text("SELECT * WHERE { ?s ?p ?o }"),
            &Params::new(),
            Duration::from_millis(50),
        )
        .await
        .unwrap_err();
    assert!(err.is_remote());
}
