use crate::conformance::conformance_report;
use crate::{
    ConformanceChecker, Pager, QueryExecutor, RemoteQueryError, RepositoryError, SparqlRequest,
};
use futures::{stream, Stream, TryStreamExt};
use serde_json::Value;
use std::collections::HashSet;
use std::pin::pin;
use std::sync::Arc;
use tracing::{debug, warn};
use wikidata_api_model::{EntityModel, Instance, QueryOptions, QueryRow};

/// The parameters of [Repository::list].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListOptions {
    /// The page to fetch. [None] fetches all pages.
    pub page: Option<usize>,
    /// Overrides the page size of the model.
    pub page_size: Option<usize>,
    /// The maximum number of entities to request.
    pub limit: Option<usize>,
    /// Restricts the fetch to a known list of identifiers.
    pub values: Option<Vec<String>>,
    pub minimal: bool,
    pub with_conformance: bool,
    /// Overrides the primary language of the model.
    pub language: Option<String>,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            page: Some(1),
            page_size: None,
            limit: None,
            values: None,
            minimal: false,
            with_conformance: false,
            language: None,
        }
    }
}

impl ListOptions {
    /// Options that fetch all pages.
    pub fn all_pages() -> Self {
        Self {
            page: None,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_page(mut self, page: Option<usize>) -> Self {
        self.page = page;
        self
    }

    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = Some(page_size);
        self
    }

    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn with_values<V: Into<String>>(mut self, values: impl IntoIterator<Item = V>) -> Self {
        self.values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_minimal(mut self, minimal: bool) -> Self {
        self.minimal = minimal;
        self
    }

    #[must_use]
    pub fn with_conformance(mut self, with_conformance: bool) -> Self {
        self.with_conformance = with_conformance;
        self
    }

    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }
}

/// Fetches the instances of one [EntityModel] through a [QueryExecutor].
///
/// Pages are fetched sequentially. Each page is decoded before the next one is requested. A
/// failing request aborts the whole operation.
#[derive(Clone, Debug)]
pub struct Repository {
    model: Arc<EntityModel>,
    executor: Arc<dyn QueryExecutor>,
    checker: Option<Arc<dyn ConformanceChecker>>,
}

impl Repository {
    pub fn new(model: Arc<EntityModel>, executor: Arc<dyn QueryExecutor>) -> Self {
        Self {
            model,
            executor,
            checker: None,
        }
    }

    #[must_use]
    pub fn with_checker(mut self, checker: Arc<dyn ConformanceChecker>) -> Self {
        self.checker = Some(checker);
        self
    }

    pub fn model(&self) -> &EntityModel {
        &self.model
    }

    /// Compiles and executes a single query.
    pub async fn execute(&self, options: &QueryOptions) -> Result<Vec<QueryRow>, RemoteQueryError> {
        let query = self.model.compile(options);
        let meta = self.model.meta();
        self.executor
            .execute(SparqlRequest {
                query: &query,
                endpoint: &meta.endpoint,
                user_agent: &meta.user_agent,
            })
            .await
    }

    /// Returns the decoded pages in fetch order. Rows keep the order of the response.
    pub fn pages(
        &self,
        options: ListOptions,
    ) -> impl Stream<Item = Result<Vec<Instance>, RepositoryError>> + '_ {
        let page_size = options
            .page_size
            .unwrap_or(self.model.meta().page_size);
        let values = options.values.as_ref().map(|values| self.entity_ids(values));
        let pager = Pager::new(options.page, page_size, options.limit, values);

        stream::try_unfold((pager, options), move |(mut pager, options)| async move {
            let Some(request) = pager.next_request() else {
                return Ok::<_, RepositoryError>(None);
            };
            let mut query_options = request.query_options().with_minimal(options.minimal);
            query_options.language.clone_from(&options.language);

            let rows = self.execute(&query_options).await?;
            debug!(
                model = self.model.name(),
                page = request.page,
                rows = rows.len(),
                "Fetched page"
            );
            pager.record(&request, rows.len());

            let mut instances = rows
                .iter()
                .map(|row| self.model.decode(row))
                .collect::<Vec<_>>();
            if options.with_conformance {
                for instance in &mut instances {
                    self.attach_conformance(instance).await?;
                }
            }
            Ok(Some((instances, (pager, options))))
        })
    }

    /// Fetches instances. If all pages are requested, instances are deduplicated by their
    /// identifier, keeping the first occurrence.
    pub async fn list(&self, options: ListOptions) -> Result<Vec<Instance>, RepositoryError> {
        let deduplicate = options.page.is_none();
        let mut pages = pin!(self.pages(options));
        let mut seen = HashSet::new();
        let mut result = Vec::new();

        while let Some(page) = pages.try_next().await? {
            for instance in page {
                if deduplicate {
                    if let Some(id) = instance.id() {
                        if !seen.insert(id.to_owned()) {
                            debug!(
                                model = self.model.name(),
                                id, "Skipping duplicate instance"
                            );
                            continue;
                        }
                    }
                }
                result.push(instance);
            }
        }
        Ok(result)
    }

    /// Fetches the instance with the identifier `id`. An `id` that contains no entity identifier
    /// is not found without querying the endpoint.
    pub async fn get_by_id(
        &self,
        id: &str,
        with_conformance: bool,
    ) -> Result<Option<Instance>, RepositoryError> {
        let options = ListOptions::default()
            .with_values([id])
            .with_limit(1)
            .with_conformance(with_conformance);
        let instance = self.list(options).await?.into_iter().next();
        if instance.is_none() {
            warn!(model = self.model.name(), id, "No instance found");
        }
        Ok(instance)
    }

    /// Returns all instances whose public values contain every token of `query`.
    ///
    /// The whole collection is fetched and filtered locally. The cost is linear in the size of
    /// the collection.
    pub async fn search(&self, query: &str) -> Result<Vec<Instance>, RepositoryError> {
        let instances = self.list(ListOptions::all_pages()).await?;
        Ok(instances
            .into_iter()
            .filter(|instance| self.model.matches(instance, query))
            .collect())
    }

    /// Counts the entities of the model.
    pub async fn count(&self) -> Result<usize, RepositoryError> {
        let rows = self
            .execute(&QueryOptions::default().with_count(true))
            .await?;
        Ok(rows.first().map_or(0, parse_count))
    }

    /// Normalises `values` to entity identifiers. Values without an identifier are dropped.
    fn entity_ids(&self, values: &[String]) -> Vec<String> {
        let meta = self.model.meta();
        values
            .iter()
            .filter_map(|value| {
                let id = meta.entity_id(value);
                if id.is_none() {
                    debug!(model = self.model.name(), value, "Skipping invalid identifier");
                }
                id
            })
            .collect()
    }

    async fn attach_conformance(&self, instance: &mut Instance) -> Result<(), RepositoryError> {
        let focus = instance.id().unwrap_or_default().to_owned();
        let report = conformance_report(&self.model, self.checker.as_ref(), &focus).await?;
        instance.set_conformance(report);
        Ok(())
    }
}

fn parse_count(row: &QueryRow) -> usize {
    match row.raw_value("count") {
        Some(Value::String(value)) => value.parse().unwrap_or_default(),
        Some(Value::Number(value)) => value
            .as_u64()
            .and_then(|value| usize::try_from(value).ok())
            .unwrap_or_default(),
        _ => 0,
    }
}
