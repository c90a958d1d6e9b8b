use crate::RemoteQueryError;
use async_trait::async_trait;
use std::fmt::Debug;
use wikidata_api_model::QueryRow;

/// A compiled query together with the endpoint it is sent to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SparqlRequest<'query> {
    pub query: &'query str,
    pub endpoint: &'query str,
    pub user_agent: &'query str,
}

/// Executes SPARQL queries and returns the rows of the `results.bindings` array.
///
/// An empty result is not an error.
#[async_trait]
pub trait QueryExecutor: Debug + Send + Sync {
    async fn execute(
        &self,
        request: SparqlRequest<'_>,
    ) -> Result<Vec<QueryRow>, RemoteQueryError>;
}
