use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};
use std::sync::Arc;
use wikidata_api_client::memory::ScriptedExecutor;
use wikidata_api_client::Repository;
use wikidata_api_model::{EntityModel, Field, QueryRow, Triple};
use wikidata_api_web::{create_router, AppState};

fn taxon_row(id: &str, label: &str) -> QueryRow {
    QueryRow::from_values([
        ("main", format!("http://www.wikidata.org/entity/{id}")),
        ("label", label.to_owned()),
        ("description", format!("species of {label}")),
        ("parents", "Plantae|Rosaceae".to_owned()),
    ])
}

fn create_server(executor: &Arc<ScriptedExecutor>) -> TestServer {
    let model = EntityModel::builder("Taxon")
        .main([Triple::new("P31", ["Q16521"])])
        .field("parents", Field::entity_list(["P171"]).required(true))
        .field("_internal", Field::scalar(["P1"]))
        .build()
        .unwrap();
    let repository = Repository::new(Arc::new(model), Arc::<ScriptedExecutor>::clone(executor));
    TestServer::new(create_router(AppState::new([repository]))).unwrap()
}

#[tokio::test]
async fn test_index() {
    let server = create_server(&Arc::new(ScriptedExecutor::new()));
    let response = server.get("/").await;

    response.assert_status_ok();
    response.assert_json(&json!({"Taxons": "/taxons"}));
}

#[tokio::test]
async fn test_list_minimal() {
    let executor = Arc::new(
        ScriptedExecutor::new().with_page(vec![taxon_row("Q1", "Rosa"), taxon_row("Q2", "Malus")]),
    );
    let server = create_server(&executor);
    let response = server.get("/taxons").await;

    response.assert_status_ok();
    response.assert_json(&json!([
        {
            "id": "Q1",
            "label": "Rosa",
            "description": "species of Rosa",
            "parents": ["Plantae", "Rosaceae"]
        },
        {
            "id": "Q2",
            "label": "Malus",
            "description": "species of Malus",
            "parents": ["Plantae", "Rosaceae"]
        }
    ]));
    assert_eq!(executor.queries().len(), 1);
}

#[tokio::test]
async fn test_list_all_pages_with_conformance() {
    let executor = Arc::new(
        ScriptedExecutor::new()
            .with_page(vec![taxon_row("Q1", "Rosa")])
            .with_page(vec![taxon_row("Q1", "Rosa"), taxon_row("Q2", "Malus")]),
    );
    let server = create_server(&executor);
    let response = server
        .get("/taxons")
        .add_query_param("page", 0)
        .add_query_param("minimal", "false")
        .add_query_param("conformance", "true")
        .await;

    response.assert_status_ok();
    let body = response.json::<Vec<Value>>();
    assert_eq!(body.len(), 2);
    assert_eq!(body[0]["alt_labels"], json!([]));
    assert_eq!(body[0]["conformance"]["result"], json!("n/a"));
    assert_eq!(body[0].get("_internal"), None);
    assert_eq!(body[0].get("main"), None);
    assert_eq!(executor.queries().len(), 3);
}

#[tokio::test]
async fn test_retrieve() {
    let executor = Arc::new(ScriptedExecutor::new().with_page(vec![taxon_row("Q1", "Rosa")]));
    let server = create_server(&executor);
    let response = server.get("/taxons/Q1").await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["id"], json!("Q1"));
    assert_eq!(body["label"], json!("Rosa"));
    assert_eq!(body["conformance"], Value::Null);
    assert!(executor.queries()[0].contains("VALUES ?main {wd:Q1}"));
}

#[tokio::test]
async fn test_retrieve_not_found() {
    let server = create_server(&Arc::new(ScriptedExecutor::new()));
    let response = server.get("/taxons/Q404").await;

    response.assert_status(StatusCode::NOT_FOUND);
    response.assert_json(&json!({"detail": "No Taxon Found with ID: Q404"}));
}

#[tokio::test]
async fn test_retrieve_normalises_identifier() {
    let executor = Arc::new(ScriptedExecutor::new().with_page(vec![taxon_row("Q1", "Rosa")]));
    let server = create_server(&executor);
    let response = server.get("/taxons/q1").await;

    response.assert_status_ok();
    assert!(executor.queries()[0].contains("VALUES ?main {wd:Q1}"));
}

#[tokio::test]
async fn test_retrieve_malformed_identifier() {
    let executor = Arc::new(ScriptedExecutor::new().with_page(vec![taxon_row("Q1", "Rosa")]));
    let server = create_server(&executor);
    let response = server.get("/taxons/x%7D%20%3Fs%20%3Fp%20%3Fo").await;

    response.assert_status(StatusCode::NOT_FOUND);
    response.assert_json(&json!({"detail": "No Taxon Found with ID: x} ?s ?p ?o"}));
    assert!(executor.queries().is_empty());
}

#[tokio::test]
async fn test_search() {
    let executor = Arc::new(
        ScriptedExecutor::new().with_page(vec![taxon_row("Q1", "Rosa"), taxon_row("Q2", "Malus")]),
    );
    let server = create_server(&executor);
    let response = server
        .get("/taxons/search")
        .add_query_param("query", "malus")
        .await;

    response.assert_status_ok();
    let body = response.json::<Vec<Value>>();
    assert_eq!(body.len(), 1);
    assert_eq!(body[0]["id"], json!("Q2"));
}

#[tokio::test]
async fn test_search_post() {
    let executor = Arc::new(ScriptedExecutor::new().with_page(vec![taxon_row("Q1", "Rosa")]));
    let server = create_server(&executor);
    let response = server
        .post("/taxons/search")
        .add_query_param("query", "rosa")
        .await;

    response.assert_status_ok();
}

#[tokio::test]
async fn test_search_without_results() {
    let executor = Arc::new(ScriptedExecutor::new().with_page(vec![taxon_row("Q1", "Rosa")]));
    let server = create_server(&executor);
    let response = server
        .get("/taxons/search")
        .add_query_param("query", "quercus")
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    response.assert_json(&json!({"detail": "No Search Results Found for 'quercus'"}));
}

#[tokio::test]
async fn test_search_without_query() {
    let server = create_server(&Arc::new(ScriptedExecutor::new()));
    let response = server.get("/taxons/search").await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_remote_failure() {
    let executor = Arc::new(ScriptedExecutor::new().with_failure("endpoint unavailable"));
    let server = create_server(&executor);
    let response = server.get("/taxons").await;

    response.assert_status(StatusCode::BAD_GATEWAY);
}
