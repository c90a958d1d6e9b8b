use crate::{QueryExecutor, RemoteQueryError, SparqlRequest};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};
use wikidata_api_model::QueryRow;

/// A [QueryExecutor] that answers with pre-recorded pages and records every query it receives.
///
/// Once all pages have been consumed, every further query returns an empty result.
#[derive(Debug, Default)]
pub struct ScriptedExecutor {
    pages: Mutex<VecDeque<Result<Vec<QueryRow>, String>>>,
    queries: Mutex<Vec<String>>,
}

impl ScriptedExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_page(self, rows: Vec<QueryRow>) -> Self {
        self.push(Ok(rows));
        self
    }

    /// Answers the next query with [RemoteQueryError::Executor].
    #[must_use]
    pub fn with_failure(self, message: impl Into<String>) -> Self {
        self.push(Err(message.into()));
        self
    }

    fn push(&self, page: Result<Vec<QueryRow>, String>) {
        self.pages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(page);
    }

    /// All queries executed so far, in order.
    pub fn queries(&self) -> Vec<String> {
        self.queries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl QueryExecutor for ScriptedExecutor {
    async fn execute(
        &self,
        request: SparqlRequest<'_>,
    ) -> Result<Vec<QueryRow>, RemoteQueryError> {
        self.queries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.query.to_owned());
        let page = self
            .pages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        match page {
            Some(Ok(rows)) => Ok(rows),
            Some(Err(message)) => Err(RemoteQueryError::Executor(message)),
            None => Ok(Vec::new()),
        }
    }
}
