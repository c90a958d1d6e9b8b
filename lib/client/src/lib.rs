//! Executes [EntityModel](wikidata_api_model::EntityModel)s against a SPARQL endpoint.
//!
//! The [Repository] compiles the queries of a model, sends them through a [QueryExecutor] and
//! decodes the responses page by page.

mod conformance;
mod error;
mod executor;
mod http;
pub mod memory;
mod pager;
mod repository;

pub use conformance::ConformanceChecker;
pub use error::*;
pub use executor::*;
pub use http::*;
pub use pager::*;
pub use repository::*;
