use crate::ConformanceError;
use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;
use tracing::{debug, warn};
use wikidata_api_model::{ConformanceReport, ConformanceResult, EntityModel};

/// Checks an entity against a named shape (e.g. a ShEx schema hosted on Wikidata).
#[async_trait]
pub trait ConformanceChecker: Debug + Send + Sync {
    async fn check(&self, focus: &str, schema: &str) -> Result<ConformanceReport, ConformanceError>;
}

/// Computes the conformance report of the entity `focus` of `model`.
///
/// Models without a schema always report "n/a". If the model has a schema but no checker is
/// available, the result is "n/a" as well.
pub(crate) async fn conformance_report(
    model: &EntityModel,
    checker: Option<&Arc<dyn ConformanceChecker>>,
    focus: &str,
) -> Result<ConformanceReport, ConformanceError> {
    let Some(schema) = &model.meta().schema else {
        debug!(
            model = model.name(),
            "No schema associated with this model, setting the conformance result to 'n/a'"
        );
        return Ok(ConformanceReport::without_schema(focus));
    };

    match checker {
        Some(checker) => checker.check(focus, schema).await,
        None => {
            warn!(
                model = model.name(),
                schema, "No conformance checker configured, setting the conformance result to 'n/a'"
            );
            Ok(ConformanceReport {
                focus: focus.to_owned(),
                reason: format!("No conformance checker configured for schema '{schema}'"),
                result: ConformanceResult::NotApplicable,
            })
        }
    }
}
