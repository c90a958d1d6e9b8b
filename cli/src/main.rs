use crate::cli::{Args, Command, GlobalArgs};
use anyhow::Context;
use clap::Parser;
use serde_json::Value;
use std::io::{stdout, Write};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use url::Url;
use wikidata_api_client::{HttpExecutor, HttpExecutorConfig, ListOptions, QueryExecutor, Repository};
use wikidata_api_model::{EntityModel, QueryOptions};
use wikidata_api_web::ServerConfig;

mod cli;
mod models;

#[tokio::main]
pub async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing();

    match args.command {
        Command::Serve { bind, cors } => {
            let executor: Arc<dyn QueryExecutor> = Arc::new(create_executor(&args.global)?);
            let repositories = models::all_models()?
                .into_iter()
                .map(|model| -> anyhow::Result<Repository> {
                    let model = configure_model(&model, &args.global)?;
                    Ok(Repository::new(Arc::new(model), Arc::clone(&executor)))
                })
                .collect::<anyhow::Result<Vec<_>>>()?;
            wikidata_api_web::serve(ServerConfig {
                repositories,
                bind,
                cors,
            })
            .await
        }
        Command::Query {
            model,
            values,
            limit,
            offset,
            minimal,
            count,
        } => {
            let model = configure_model(&models::model(model)?, &args.global)?;
            let mut options = QueryOptions::default()
                .with_minimal(minimal)
                .with_count(count);
            if !values.is_empty() {
                options = options.with_values(values);
            }
            options.limit = limit;
            options.offset = offset;
            let mut out = stdout().lock();
            writeln!(out, "{}", model.compile(&options))?;
            Ok(())
        }
        Command::List {
            model,
            page,
            all,
            minimal,
            conformance,
        } => {
            let repository = create_repository(&models::model(model)?, &args.global)?;
            let page = if all { None } else { Some(page) };
            let options = ListOptions::default()
                .with_page(page)
                .with_minimal(minimal)
                .with_conformance(conformance);
            let instances = repository.list(options).await?;
            let shaped = instances
                .iter()
                .map(|instance| repository.model().shape(instance, minimal))
                .collect();
            write_json(&Value::Array(shaped))
        }
        Command::Get {
            model,
            id,
            conformance,
        } => {
            let repository = create_repository(&models::model(model)?, &args.global)?;
            let instance = repository
                .get_by_id(&id, conformance)
                .await?
                .with_context(|| format!("No {} Found with ID: {id}", repository.model().name()))?;
            write_json(&repository.model().shape(&instance, false))
        }
        Command::Search { model, query } => {
            let repository = create_repository(&models::model(model)?, &args.global)?;
            let instances = repository.search(&query).await?;
            let shaped = instances
                .iter()
                .map(|instance| repository.model().shape(instance, false))
                .collect();
            write_json(&Value::Array(shaped))
        }
        Command::Count { model } => {
            let repository = create_repository(&models::model(model)?, &args.global)?;
            let count = repository.count().await?;
            let mut out = stdout().lock();
            writeln!(out, "{count}")?;
            Ok(())
        }
    }
}

/// Logs to stderr. The filter is read from `RUST_LOG` and defaults to `info`.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Applies the global command line options to the metadata of `model`.
fn configure_model(model: &EntityModel, args: &GlobalArgs) -> anyhow::Result<EntityModel> {
    let mut meta = model.meta().clone();
    if let Some(endpoint) = &args.endpoint {
        Url::parse(endpoint).with_context(|| format!("Invalid endpoint URL {endpoint}"))?;
        meta = meta.with_endpoint(endpoint);
    }
    if let Some(user_agent) = &args.user_agent {
        meta = meta.with_user_agent(user_agent);
    }
    if let Some(language) = &args.language {
        meta = meta.with_language(language);
    }
    if let Some(page_size) = args.page_size {
        meta = meta.with_page_size(page_size);
    }
    Ok(model.to_builder().meta(meta).build()?)
}

fn create_executor(args: &GlobalArgs) -> anyhow::Result<HttpExecutor> {
    let config = HttpExecutorConfig::default()
        .with_get_threshold(args.get_threshold)
        .with_timeout(Duration::from_secs(args.timeout));
    Ok(HttpExecutor::new(config)?)
}

fn create_repository(model: &EntityModel, args: &GlobalArgs) -> anyhow::Result<Repository> {
    let model = configure_model(model, args)?;
    let executor = create_executor(args)?;
    debug!(
        model = model.name(),
        endpoint = model.meta().endpoint.as_str(),
        "Querying endpoint"
    );
    Ok(Repository::new(Arc::new(model), Arc::new(executor)))
}

fn write_json(value: &Value) -> anyhow::Result<()> {
    let mut out = stdout().lock();
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    Ok(())
}
