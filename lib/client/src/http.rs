use crate::{QueryExecutor, RemoteQueryError, SparqlRequest};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use url::form_urlencoded;
use wikidata_api_model::QueryRow;

const SPARQL_RESULTS_JSON: &str = "application/sparql-results+json";

/// The configuration of an [HttpExecutor].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpExecutorConfig {
    /// Queries whose URL-encoded form, including the tool comment, has fewer characters are sent
    /// with `GET`. All others are sent with `POST`.
    pub get_threshold: usize,
    pub timeout: Duration,
    /// The comment line that is prepended to every query.
    pub tool_comment: String,
}

impl Default for HttpExecutorConfig {
    fn default() -> Self {
        Self {
            get_threshold: 1000,
            timeout: Duration::from_secs(60),
            tool_comment: "#Tool: wikidata-api-rs".to_owned(),
        }
    }
}

impl HttpExecutorConfig {
    #[must_use]
    pub fn with_get_threshold(mut self, get_threshold: usize) -> Self {
        self.get_threshold = get_threshold;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Executes queries against a SPARQL endpoint over HTTP.
///
/// Short queries are sent with `GET` so that they can be cached by intermediaries. Long queries
/// are sent as a form with `POST` to stay below URL length limits.
#[derive(Clone, Debug)]
pub struct HttpExecutor {
    client: Client,
    config: HttpExecutorConfig,
}

impl HttpExecutor {
    pub fn new(config: HttpExecutorConfig) -> Result<Self, RemoteQueryError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(RemoteQueryError::Client)?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &HttpExecutorConfig {
        &self.config
    }

    /// Whether the full query text `query`, tool comment included, is sent with `GET`.
    pub fn uses_get(&self, query: &str) -> bool {
        encoded_len(query) < self.config.get_threshold
    }
}

/// The length of `query` once it is encoded as a URL query parameter.
fn encoded_len(query: &str) -> usize {
    form_urlencoded::byte_serialize(query.as_bytes())
        .map(str::len)
        .sum()
}

#[derive(Deserialize)]
struct ResultsEnvelope {
    results: Results,
}

#[derive(Deserialize)]
struct Results {
    #[serde(default)]
    bindings: Vec<QueryRow>,
}

#[async_trait]
impl QueryExecutor for HttpExecutor {
    async fn execute(
        &self,
        request: SparqlRequest<'_>,
    ) -> Result<Vec<QueryRow>, RemoteQueryError> {
        let query = format!("{}\n{}", self.config.tool_comment, request.query);
        let length = encoded_len(&query);

        let builder = if self.uses_get(&query) {
            debug!(endpoint = request.endpoint, length, "Executing query with GET");
            self.client
                .get(request.endpoint)
                .query(&[("query", query.as_str()), ("format", "json")])
        } else {
            debug!(endpoint = request.endpoint, length, "Executing query with POST");
            self.client
                .post(request.endpoint)
                .form(&[("query", query.as_str())])
        };

        let transport = |source| RemoteQueryError::Transport {
            endpoint: request.endpoint.to_owned(),
            source,
        };
        let response = builder
            .header(ACCEPT, SPARQL_RESULTS_JSON)
            .header(USER_AGENT, request.user_agent)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteQueryError::Status {
                endpoint: request.endpoint.to_owned(),
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await.map_err(transport)?;
        let envelope: ResultsEnvelope = serde_json::from_str(&body)?;
        debug!(rows = envelope.results.bindings.len(), "Received query results");
        Ok(envelope.results.bindings)
    }
}
