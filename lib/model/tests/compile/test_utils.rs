use wikidata_api_model::{EntityModel, Field, ModelMeta, Triple};

fn test_meta() -> ModelMeta {
    ModelMeta::default()
        .with_fallback_languages("[AUTO_LANGUAGE]")
        .without_prefixes()
}

/// A model with the reserved fields only.
pub fn human_model() -> EntityModel {
    EntityModel::bare_builder("Human")
        .main([Triple::new("P31", ["Q5"])])
        .meta(test_meta())
        .build()
        .unwrap()
}

pub fn taxon_model() -> EntityModel {
    EntityModel::builder("Taxon")
        .main([Triple::new("P31", ["Q16521"])])
        .field("grin_ids", Field::list(["P1421"]).required(true))
        .field("parents", Field::entity_list(["P171"]).required(true))
        .field("ranks", Field::entity_list(["P105"]).required(true))
        .meta(test_meta().with_language("es"))
        .build()
        .unwrap()
}
