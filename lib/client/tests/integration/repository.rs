use crate::test_utils::{results_json, taxon_model, taxon_row};
use async_trait::async_trait;
use std::sync::Arc;
use wikidata_api_client::memory::ScriptedExecutor;
use wikidata_api_client::{
    ConformanceChecker, ConformanceError, HttpExecutor, HttpExecutorConfig, ListOptions,
    RemoteQueryError, Repository, RepositoryError,
};
use wikidata_api_model::{ConformanceReport, ConformanceResult, ModelMeta, QueryRow};
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

fn repository(executor: &Arc<ScriptedExecutor>) -> Repository {
    let model = taxon_model("https://query.example.org/sparql");
    Repository::new(Arc::new(model), Arc::<ScriptedExecutor>::clone(executor))
}

#[tokio::test]
async fn test_list_single_page() {
    let executor = Arc::new(
        ScriptedExecutor::new()
            .with_page(vec![taxon_row("Q1", "Rosa"), taxon_row("Q2", "Malus")]),
    );
    let instances = repository(&executor)
        .list(ListOptions::default())
        .await
        .unwrap();

    let ids = instances.iter().map(|i| i.id().unwrap()).collect::<Vec<_>>();
    assert_eq!(ids, vec!["Q1", "Q2"]);
    let queries = executor.queries();
    assert_eq!(queries.len(), 1);
    assert!(queries[0].contains("LIMIT 2 }"), "{}", queries[0]);
}

#[tokio::test]
async fn test_list_all_pages_deduplicates() {
    let executor = Arc::new(
        ScriptedExecutor::new()
            .with_page(vec![taxon_row("Q1", "Rosa"), taxon_row("Q2", "Malus")])
            .with_page(vec![taxon_row("Q2", "Malus"), taxon_row("Q3", "Pyrus")])
            .with_page(Vec::new()),
    );
    let instances = repository(&executor)
        .list(ListOptions::all_pages())
        .await
        .unwrap();

    let ids = instances.iter().map(|i| i.id().unwrap()).collect::<Vec<_>>();
    assert_eq!(ids, vec!["Q1", "Q2", "Q3"]);
    let queries = executor.queries();
    assert_eq!(queries.len(), 3);
    assert!(queries[1].contains("LIMIT 2 OFFSET 2 }"), "{}", queries[1]);
    assert!(queries[2].contains("LIMIT 2 OFFSET 4 }"), "{}", queries[2]);
}

#[tokio::test]
async fn test_list_values_in_chunks() {
    let executor = Arc::new(ScriptedExecutor::new());
    let options = ListOptions::all_pages().with_values(["Q1", "Q2", "Q3", "Q4", "Q5"]);
    repository(&executor).list(options).await.unwrap();

    let queries = executor.queries();
    assert_eq!(queries.len(), 3);
    assert!(queries[0].contains("VALUES ?main {wd:Q1 wd:Q2}"), "{}", queries[0]);
    assert!(queries[1].contains("VALUES ?main {wd:Q3 wd:Q4}"), "{}", queries[1]);
    assert!(queries[2].contains("VALUES ?main {wd:Q5}"), "{}", queries[2]);
    assert!(queries.iter().all(|query| !query.contains("LIMIT")));
}

#[tokio::test]
async fn test_list_values_deduplicates_chunks() {
    let executor = Arc::new(
        ScriptedExecutor::new()
            .with_page(vec![taxon_row("Q1", "Rosa"), taxon_row("Q2", "Malus")])
            .with_page(vec![taxon_row("Q3", "Pyrus"), taxon_row("Q2", "Malus")])
            .with_page(vec![taxon_row("Q5", "Prunus"), taxon_row("Q1", "Rosa")]),
    );
    let options = ListOptions::all_pages().with_values(["Q1", "Q2", "Q3", "Q4", "Q5"]);
    let instances = repository(&executor).list(options).await.unwrap();

    let ids = instances.iter().map(|i| i.id().unwrap()).collect::<Vec<_>>();
    assert_eq!(ids, vec!["Q1", "Q2", "Q3", "Q5"]);
    assert_eq!(executor.queries().len(), 3);
}

#[tokio::test]
async fn test_list_skips_invalid_values() {
    let executor = Arc::new(ScriptedExecutor::new());
    let options = ListOptions::all_pages().with_values(["q1", "not an id", "Q2", "Q3"]);
    repository(&executor).list(options).await.unwrap();

    let queries = executor.queries();
    assert_eq!(queries.len(), 2);
    assert!(queries[0].contains("VALUES ?main {wd:Q1 wd:Q2}"), "{}", queries[0]);
    assert!(queries[1].contains("VALUES ?main {wd:Q3}"), "{}", queries[1]);
}

#[tokio::test]
async fn test_list_empty_values_does_not_query() {
    let executor = Arc::new(ScriptedExecutor::new());
    let options = ListOptions::all_pages().with_values(Vec::<String>::new());
    let instances = repository(&executor).list(options).await.unwrap();

    assert!(instances.is_empty());
    assert!(executor.queries().is_empty());
}

#[tokio::test]
async fn test_failure_aborts_listing() {
    let executor = Arc::new(
        ScriptedExecutor::new()
            .with_page(vec![taxon_row("Q1", "Rosa"), taxon_row("Q2", "Malus")])
            .with_failure("connection reset"),
    );
    let result = repository(&executor).list(ListOptions::all_pages()).await;

    assert!(matches!(
        result,
        Err(RepositoryError::RemoteQuery(RemoteQueryError::Executor(_)))
    ));
    assert_eq!(executor.queries().len(), 2);
}

#[tokio::test]
async fn test_get_by_id() {
    let executor = Arc::new(ScriptedExecutor::new().with_page(vec![taxon_row("Q1", "Rosa")]));
    let instance = repository(&executor)
        .get_by_id("Q1", false)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(instance.id(), Some("Q1"));
    assert_eq!(instance.list("parents"), Some(["Plantae".to_owned()].as_slice()));
    assert_eq!(instance.conformance(), None);
    let queries = executor.queries();
    assert!(queries[0].contains("VALUES ?main {wd:Q1}"), "{}", queries[0]);
    assert!(queries[0].contains("alt_labels"), "{}", queries[0]);
}

#[tokio::test]
async fn test_get_by_id_not_found() {
    let executor = Arc::new(ScriptedExecutor::new());
    let instance = repository(&executor).get_by_id("Q404", false).await.unwrap();
    assert_eq!(instance, None);
}

#[tokio::test]
async fn test_get_by_id_malformed() {
    let executor = Arc::new(ScriptedExecutor::new().with_page(vec![taxon_row("Q1", "Rosa")]));
    let instance = repository(&executor)
        .get_by_id("x} ?s ?p ?o . {", false)
        .await
        .unwrap();

    assert_eq!(instance, None);
    assert!(executor.queries().is_empty());
}

#[tokio::test]
async fn test_get_by_id_without_schema() {
    let executor = Arc::new(ScriptedExecutor::new().with_page(vec![taxon_row("Q1", "Rosa")]));
    let instance = repository(&executor)
        .get_by_id("Q1", true)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(
        instance.conformance(),
        Some(&ConformanceReport::without_schema("Q1"))
    );
}

#[derive(Debug)]
struct AlwaysConforms;

#[async_trait]
impl ConformanceChecker for AlwaysConforms {
    async fn check(&self, focus: &str, schema: &str) -> Result<ConformanceReport, ConformanceError> {
        Ok(ConformanceReport {
            focus: focus.to_owned(),
            reason: format!("Checked against {schema}"),
            result: ConformanceResult::Conforms(true),
        })
    }
}

#[tokio::test]
async fn test_get_by_id_with_checker() {
    let model = taxon_model("https://query.example.org/sparql");
    let model = model
        .to_builder()
        .meta(model.meta().clone().with_schema("E42"))
        .build()
        .unwrap();
    let executor = Arc::new(ScriptedExecutor::new().with_page(vec![taxon_row("Q1", "Rosa")]));
    let repository = Repository::new(Arc::new(model), executor).with_checker(Arc::new(AlwaysConforms));

    let instance = repository.get_by_id("Q1", true).await.unwrap().unwrap();
    let report = instance.conformance().unwrap();
    assert_eq!(report.result, ConformanceResult::Conforms(true));
    assert_eq!(report.reason, "Checked against E42");
}

#[tokio::test]
async fn test_search() {
    let executor = Arc::new(
        ScriptedExecutor::new()
            .with_page(vec![taxon_row("Q1", "Rosa canina"), taxon_row("Q2", "Malus")])
            .with_page(vec![taxon_row("Q3", "Rosa gallica")]),
    );
    let instances = repository(&executor).search("ROSA").await.unwrap();

    let ids = instances.iter().map(|i| i.id().unwrap()).collect::<Vec<_>>();
    assert_eq!(ids, vec!["Q1", "Q3"]);

    let executor = Arc::new(ScriptedExecutor::new().with_page(vec![taxon_row("Q1", "Rosa")]));
    let instances = repository(&executor).search("rosa canina").await.unwrap();
    assert!(instances.is_empty());
}

#[tokio::test]
async fn test_search_matches_every_token() {
    let executor = Arc::new(ScriptedExecutor::new().with_page(vec![
        taxon_row("Q123", "Test Item"),
        taxon_row("Q321", "Some Other Item"),
    ]));
    let instances = repository(&executor).search("some other item").await.unwrap();

    let labels = instances
        .iter()
        .map(|i| i.text("label").unwrap())
        .collect::<Vec<_>>();
    assert_eq!(labels, vec!["Some Other Item"]);
}

#[tokio::test]
async fn test_count() {
    let executor =
        Arc::new(ScriptedExecutor::new().with_page(vec![QueryRow::from_values([("count", "123")])]));
    let count = repository(&executor).count().await.unwrap();

    assert_eq!(count, 123);
    let queries = executor.queries();
    assert!(
        queries[0].contains("SELECT (COUNT(DISTINCT ?main) AS ?count)"),
        "{}",
        queries[0]
    );

    let executor = Arc::new(ScriptedExecutor::new());
    assert_eq!(repository(&executor).count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_list_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(results_json(&[taxon_row("Q1", "Rosa")])),
        )
        .expect(2)
        .mount(&server)
        .await;

    let model = taxon_model(&server.uri())
        .to_builder()
        .meta(ModelMeta::default().with_endpoint(server.uri()).with_page_size(1))
        .build()
        .unwrap();
    let executor = HttpExecutor::new(HttpExecutorConfig::default().with_get_threshold(usize::MAX))
        .unwrap();
    let repository = Repository::new(Arc::new(model), Arc::new(executor));

    let instances = repository
        .list(ListOptions::all_pages().with_minimal(true).with_limit(2))
        .await
        .unwrap();
    assert_eq!(instances.len(), 1);
}
