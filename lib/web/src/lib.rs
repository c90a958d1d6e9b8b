use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Map, Value};
use std::net::SocketAddr;
use std::str::FromStr;
use tracing::info;

mod config;
mod error;
mod models;
mod state;

pub use config::ServerConfig;
pub use error::WikidataApiServerError;
pub use state::AppState;

use crate::models::create_model_routes;

pub async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let addr = SocketAddr::from_str(&config.bind)?;
    let app = create_router(AppState::new(config.repositories));

    let app = if config.cors {
        app.layer(tower_http::cors::CorsLayer::permissive())
    } else {
        app
    };

    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    Ok(axum::serve(listener, app).await?)
}

/// Creates the router that exposes every repository of `state` under the slug of its model.
pub fn create_router(state: AppState) -> Router {
    let mut index = Map::new();
    let mut router = Router::new();
    for repository in &state.repositories {
        let slug = repository.model().slug();
        index.insert(
            repository.model().name_plural().to_owned(),
            Value::String(format!("/{slug}")),
        );
        router = router.nest(&format!("/{slug}"), create_model_routes(repository));
    }

    let index = Json(Value::Object(index));
    router.route("/", get(|| async move { index }))
}
