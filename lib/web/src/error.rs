use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;
use wikidata_api_client::RepositoryError;

#[derive(thiserror::Error, Debug)]
pub enum WikidataApiServerError {
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("Wikidata could not be queried: {0}")]
    Repository(#[from] RepositoryError),
}

impl IntoResponse for WikidataApiServerError {
    fn into_response(self) -> Response {
        let status = match &self {
            WikidataApiServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            WikidataApiServerError::NotFound(_) => StatusCode::NOT_FOUND,
            WikidataApiServerError::Repository(e) => {
                error!("Request failed: {e}");
                StatusCode::BAD_GATEWAY
            }
        };
        let detail = match self {
            WikidataApiServerError::BadRequest(msg) | WikidataApiServerError::NotFound(msg) => msg,
            WikidataApiServerError::Repository(e) => e.to_string(),
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}
