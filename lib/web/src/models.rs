use crate::error::WikidataApiServerError;
use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use wikidata_api_client::{ListOptions, Repository};

pub fn create_model_routes(repository: &Arc<Repository>) -> Router {
    Router::new()
        .route("/", get(handle_list))
        .route("/search", get(handle_search).post(handle_search))
        .route("/{id}", get(handle_retrieve))
        .with_state(Arc::clone(repository))
}

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    /// The page to return. `0` returns all pages.
    page: Option<usize>,
    page_size: Option<usize>,
    conformance: Option<String>,
    minimal: Option<String>,
    language: Option<String>,
}

impl ListParams {
    fn to_list_options(&self) -> ListOptions {
        let page = match self.page {
            Some(0) => None,
            Some(page) => Some(page),
            None => Some(1),
        };
        let mut options = ListOptions::default()
            .with_page(page)
            .with_minimal(flag(self.minimal.as_deref(), true))
            .with_conformance(flag(self.conformance.as_deref(), false));
        if let Some(page_size) = self.page_size {
            options = options.with_page_size(page_size);
        }
        if let Some(language) = &self.language {
            options = options.with_language(language.as_str());
        }
        options
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RetrieveParams {
    conformance: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    query: Option<String>,
}

/// Interprets a query parameter as a boolean. Any value other than `false` or `0` is true.
fn flag(value: Option<&str>, default: bool) -> bool {
    match value {
        None => default,
        Some(value) => !matches!(value.to_ascii_lowercase().as_str(), "false" | "0"),
    }
}

pub async fn handle_list(
    State(repository): State<Arc<Repository>>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Value>>, WikidataApiServerError> {
    let options = params.to_list_options();
    let minimal = options.minimal;
    let instances = repository.list(options).await?;
    let model = repository.model();
    Ok(Json(
        instances
            .iter()
            .map(|instance| model.shape(instance, minimal))
            .collect(),
    ))
}

pub async fn handle_retrieve(
    State(repository): State<Arc<Repository>>,
    Path(id): Path<String>,
    Query(params): Query<RetrieveParams>,
) -> Result<Json<Value>, WikidataApiServerError> {
    let with_conformance = flag(params.conformance.as_deref(), false);
    let model = repository.model();
    match repository.get_by_id(&id, with_conformance).await? {
        Some(instance) => Ok(Json(model.shape(&instance, false))),
        None => Err(WikidataApiServerError::NotFound(format!(
            "No {} Found with ID: {id}",
            model.name()
        ))),
    }
}

pub async fn handle_search(
    State(repository): State<Arc<Repository>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Value>>, WikidataApiServerError> {
    let Some(query) = params.query.filter(|query| !query.trim().is_empty()) else {
        return Err(WikidataApiServerError::BadRequest(
            "Missing required parameter 'query'".to_owned(),
        ));
    };
    let instances = repository.search(&query).await?;
    if instances.is_empty() {
        return Err(WikidataApiServerError::NotFound(format!(
            "No Search Results Found for '{query}'"
        )));
    }
    let model = repository.model();
    Ok(Json(
        instances
            .iter()
            .map(|instance| model.shape(instance, false))
            .collect(),
    ))
}
