use wikidata_api_client::Repository;

/// Holds the configuration for a web server.
pub struct ServerConfig {
    /// One repository per exposed model.
    pub repositories: Vec<Repository>,
    /// The IP address or DNS name that the socket binds to.
    pub bind: String,
    /// Whether CORS is enabled.
    pub cors: bool,
}
