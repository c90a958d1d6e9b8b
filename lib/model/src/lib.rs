//! Declarative models of Wikidata entities.
//!
//! A model is described by an [EntityModel], an ordered list of [Field]s and the [ModelMeta]
//! configuration. The model compiles SPARQL queries for the Wikidata Query Service and decodes
//! the JSON bindings of the responses into [Instance]s.

pub mod constants;
mod entity;
mod error;
mod field;
mod instance;
mod meta;
mod property;
mod query;
mod row;
mod triple;
mod value;

pub use entity::*;
pub use error::*;
pub use field::*;
pub use instance::*;
pub use meta::*;
pub use property::*;
pub use query::{minify, QueryOptions};
pub use row::*;
pub use triple::*;
pub use value::*;
