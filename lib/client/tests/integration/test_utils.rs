use serde_json::{json, Value};
use wikidata_api_model::{EntityModel, Field, ModelMeta, QueryRow, Triple};

pub fn taxon_model(endpoint: &str) -> EntityModel {
    EntityModel::builder("Taxon")
        .main([Triple::new("P31", ["Q16521"])])
        .field("parents", Field::entity_list(["P171"]).required(true))
        .meta(
            ModelMeta::default()
                .with_endpoint(endpoint)
                .with_user_agent("wikidata-api-tests/0.1")
                .with_page_size(2),
        )
        .build()
        .unwrap()
}

pub fn taxon_row(id: &str, label: &str) -> QueryRow {
    QueryRow::from_values([
        ("main", format!("http://www.wikidata.org/entity/{id}")),
        ("label", label.to_owned()),
        ("parents", "Plantae".to_owned()),
    ])
}

pub fn results_json(rows: &[QueryRow]) -> Value {
    json!({
        "head": {"vars": ["main", "label", "parents"]},
        "results": {"bindings": rows}
    })
}
