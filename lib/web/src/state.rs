use std::sync::Arc;
use wikidata_api_client::Repository;

#[derive(Clone, Debug)]
pub struct AppState {
    pub repositories: Vec<Arc<Repository>>,
}

impl AppState {
    pub fn new(repositories: impl IntoIterator<Item = Repository>) -> Self {
        Self {
            repositories: repositories.into_iter().map(Arc::new).collect(),
        }
    }
}
