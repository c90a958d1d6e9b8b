use crate::test_utils::{results_json, taxon_row};
use wikidata_api_client::{
    HttpExecutor, HttpExecutorConfig, QueryExecutor, RemoteQueryError, SparqlRequest,
};
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn request<'a>(query: &'a str, endpoint: &'a str) -> SparqlRequest<'a> {
    SparqlRequest {
        query,
        endpoint,
        user_agent: "wikidata-api-tests/0.1",
    }
}

#[tokio::test]
async fn test_short_query_uses_get() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sparql"))
        .and(query_param("format", "json"))
        .and(query_param("query", "#Tool: wikidata-api-rs\nSELECT ?main WHERE { }"))
        .and(header("accept", "application/sparql-results+json"))
        .and(header("user-agent", "wikidata-api-tests/0.1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(results_json(&[taxon_row("Q1", "Rosa")])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let executor = HttpExecutor::new(HttpExecutorConfig::default()).unwrap();
    let endpoint = format!("{}/sparql", server.uri());
    let rows = executor
        .execute(request("SELECT ?main WHERE { }", &endpoint))
        .await
        .unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].value("label"), Some("Rosa"));
}

#[tokio::test]
async fn test_long_query_uses_post() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/sparql"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("query=%23Tool%3A+wikidata-api-rs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(results_json(&[])))
        .expect(1)
        .mount(&server)
        .await;

    let executor = HttpExecutor::new(HttpExecutorConfig::default()).unwrap();
    let endpoint = format!("{}/sparql", server.uri());
    let query = format!("SELECT ?main WHERE {{ {} }}", "?main ?p ?o. ".repeat(100));
    let rows = executor.execute(request(&query, &endpoint)).await.unwrap();

    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_threshold_applies_to_encoded_query() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(results_json(&[])))
        .expect(1)
        .mount(&server)
        .await;

    // Braces triple in length once encoded.
    let query = format!("SELECT ?main WHERE {{ {} }}", "{}".repeat(240));
    assert!(query.chars().count() < 1000);
    let executor = HttpExecutor::new(HttpExecutorConfig::default()).unwrap();
    executor
        .execute(request(&query, &server.uri()))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Query timeout"))
        .mount(&server)
        .await;

    let executor = HttpExecutor::new(HttpExecutorConfig::default()).unwrap();
    let result = executor
        .execute(request("SELECT ?main WHERE { }", &server.uri()))
        .await;

    match result {
        Err(RemoteQueryError::Status { status, body, .. }) => {
            assert_eq!(status, 500);
            assert_eq!(body, "Query timeout");
        }
        other => panic!("Unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let executor = HttpExecutor::new(HttpExecutorConfig::default()).unwrap();
    let result = executor
        .execute(request("SELECT ?main WHERE { }", &server.uri()))
        .await;

    assert!(matches!(result, Err(RemoteQueryError::Envelope(_))));
}

#[tokio::test]
async fn test_unreachable_endpoint() {
    let executor = HttpExecutor::new(HttpExecutorConfig::default()).unwrap();
    let result = executor
        .execute(request("SELECT ?main WHERE { }", "http://127.0.0.1:1/sparql"))
        .await;

    assert!(matches!(result, Err(RemoteQueryError::Transport { .. })));
}
