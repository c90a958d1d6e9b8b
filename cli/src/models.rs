use crate::cli::ModelName;
use wikidata_api_model::{ConfigurationError, EntityModel, Field, Triple};

/// Returns the model registered under `name`.
pub fn model(name: ModelName) -> Result<EntityModel, ConfigurationError> {
    match name {
        ModelName::Item => wikidata_item(),
        ModelName::Taxon => taxon(),
    }
}

pub fn all_models() -> Result<Vec<EntityModel>, ConfigurationError> {
    [ModelName::Item, ModelName::Taxon]
        .into_iter()
        .map(model)
        .collect()
}

/// Any Wikidata item. Without constraints on the main entity, listing scans the whole graph.
pub fn wikidata_item() -> Result<EntityModel, ConfigurationError> {
    EntityModel::builder("Wikidata Item")
        .plural("Wikidata Items")
        .build()
}

/// Biological taxa with Spanish as their primary language.
pub fn taxon() -> Result<EntityModel, ConfigurationError> {
    EntityModel::builder("Taxon")
        .main([Triple::new("P31", ["Q16521"])])
        .field("grin_ids", Field::list(["P1421"]).required(true))
        .field("parents", Field::entity_list(["P171"]).required(true))
        .field("ranks", Field::entity_list(["P105"]).required(true))
        .configure(|meta| meta.with_language("es").with_fallback_languages(""))
        .build()
}
