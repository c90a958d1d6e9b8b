use thiserror::Error;

/// An error raised while executing a query against a SPARQL endpoint.
///
/// Failures are never retried. A failure aborts the whole paginated operation.
#[derive(Debug, Error)]
pub enum RemoteQueryError {
    /// The HTTP client could not be created.
    #[error("Could not create the HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    /// The endpoint could not be reached or the response could not be read.
    #[error("Could not query the SPARQL endpoint '{endpoint}': {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    /// The endpoint answered with a non-success status.
    #[error("The SPARQL endpoint '{endpoint}' responded with status {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// The response is not a valid SPARQL JSON results document.
    #[error("Malformed SPARQL results: {0}")]
    Envelope(#[from] serde_json::Error),
    /// Raised by executors that do not use HTTP.
    #[error("Query execution failed: {0}")]
    Executor(String),
}

/// An error raised by a [ConformanceChecker](crate::ConformanceChecker).
#[derive(Debug, Error)]
#[error("Could not check the conformance of '{focus}' against '{schema}': {reason}")]
pub struct ConformanceError {
    pub focus: String,
    pub schema: String,
    pub reason: String,
}

/// An error raised by a [Repository](crate::Repository).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error(transparent)]
    RemoteQuery(#[from] RemoteQueryError),
    #[error(transparent)]
    Conformance(#[from] ConformanceError),
}
