use crate::constants::ROOT_VARIABLE;
use crate::query::compile;
use crate::{
    ComputedProperty, ConfigurationError, Field, FieldKind, FieldValue, Instance, ModelMeta,
    QueryOptions, QueryRow, Triple,
};
use serde_json::{Map, Value};

/// The name of the reserved label field.
pub const LABEL_FIELD: &str = "label";
/// The name of the description field of the default models.
pub const DESCRIPTION_FIELD: &str = "description";
/// The name of the alternative labels field of the default models.
pub const ALT_LABELS_FIELD: &str = "alt_labels";
/// The name of the conformance field of the default models.
pub const CONFORMANCE_FIELD: &str = "conformance";

/// A declarative description of a class of Wikidata entities.
///
/// An [EntityModel] is an ordered list of [Field]s plus the [ModelMeta] configuration. It
/// compiles queries for the entities it describes and decodes the rows of the responses into
/// [Instance]s. Models are immutable once built.
///
/// ```
/// use wikidata_api_model::{EntityModel, Field, Triple};
///
/// let taxon = EntityModel::builder("Taxon")
///     .main([Triple::new("P31", ["Q16521"])])
///     .field("parents", Field::entity_list(["P171"]).required(true))
///     .build()?;
/// assert_eq!(taxon.name_plural(), "Taxons");
/// # Ok::<_, wikidata_api_model::ConfigurationError>(())
/// ```
#[derive(Clone, Debug)]
pub struct EntityModel {
    name: String,
    name_plural: String,
    fields: Vec<Field>,
    properties: Vec<ComputedProperty>,
    meta: ModelMeta,
}

impl EntityModel {
    /// Creates a builder with the fields of a regular Wikidata item: `main`, `label`,
    /// `description`, `alt_labels` and `conformance`.
    pub fn builder(name: impl Into<String>) -> EntityModelBuilder {
        Self::bare_builder(name)
            .field(DESCRIPTION_FIELD, Field::description())
            .field(ALT_LABELS_FIELD, Field::alt_labels())
            .field(CONFORMANCE_FIELD, Field::conformance())
    }

    /// Creates a builder that only contains the reserved `main` and `label` fields.
    pub fn bare_builder(name: impl Into<String>) -> EntityModelBuilder {
        EntityModelBuilder {
            name: name.into(),
            name_plural: None,
            fields: Vec::new(),
            properties: Vec::new(),
            meta: ModelMeta::default(),
        }
        .field(ROOT_VARIABLE, Field::main_entity([]))
        .field(LABEL_FIELD, Field::label().required(true))
    }

    /// Returns a builder that starts from this model. Used to derive more specific models.
    pub fn to_builder(&self) -> EntityModelBuilder {
        EntityModelBuilder {
            name: self.name.clone(),
            name_plural: Some(self.name_plural.clone()),
            fields: self
                .fields
                .iter()
                .map(|field| (field.name().to_owned(), field.clone()))
                .collect(),
            properties: self.properties.clone(),
            meta: self.meta.clone(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn name_plural(&self) -> &str {
        &self.name_plural
    }

    /// The path segment under which the model is exposed (e.g. `taxons`).
    pub fn slug(&self) -> String {
        self.name_plural
            .chars()
            .map(|c| {
                if c.is_alphanumeric() {
                    c.to_ascii_lowercase()
                } else {
                    '-'
                }
            })
            .collect()
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name() == name)
    }

    pub fn properties(&self) -> &[ComputedProperty] {
        &self.properties
    }

    pub fn meta(&self) -> &ModelMeta {
        &self.meta
    }

    /// Compiles a SPARQL query. Compiling the same options twice yields identical strings.
    pub fn compile(&self, options: &QueryOptions) -> String {
        compile(&self.fields, &self.meta, options)
    }

    /// Creates an instance that holds the default value of every field.
    pub fn instance(&self) -> Instance {
        let mut instance = Instance::new();
        for field in self.value_fields() {
            instance.set(field.name(), field.default().clone());
        }
        instance
    }

    /// Decodes a row of a response. Missing bindings decode to the field defaults.
    pub fn decode(&self, row: &QueryRow) -> Instance {
        let mut instance = Instance::new();
        for field in self.value_fields() {
            instance.set(field.name(), field.decode(row, &self.meta));
        }
        if let Some(id) = instance.text(ROOT_VARIABLE).map(ToOwned::to_owned) {
            instance.set_id(id);
        }
        instance
    }

    /// Returns the JSON representation of `instance` that is exposed by the API.
    ///
    /// The `id` comes first, followed by all public fields in declaration order and then by the
    /// computed properties. With `minimal`, only the fields of the minimal projection and the
    /// properties flagged for it are emitted.
    pub fn shape(&self, instance: &Instance, minimal: bool) -> Value {
        let mut object = Map::new();
        object.insert(
            "id".to_owned(),
            instance.id().map_or(Value::Null, |id| Value::String(id.to_owned())),
        );
        for field in &self.fields {
            if !field.is_public() {
                continue;
            }
            let value = if let FieldKind::Conformance = field.kind() {
                match instance.conformance() {
                    Some(report) => serde_json::to_value(report).unwrap_or(Value::Null),
                    None if minimal => continue,
                    None => Value::Null,
                }
            } else {
                if field.is_suppressed(minimal) {
                    continue;
                }
                instance
                    .get(field.name())
                    .map_or(Value::Null, FieldValue::to_json)
            };
            object.insert(field.name().to_owned(), value);
        }
        for property in &self.properties {
            if minimal && !property.is_shown_in_minimal() {
                continue;
            }
            object.insert(property.name().to_owned(), property.compute(instance).to_json());
        }
        Value::Object(object)
    }

    /// Returns the lowercased text that is matched by [EntityModel::matches].
    pub fn search_text(&self, instance: &Instance) -> String {
        let mut text = String::new();
        if let Some(id) = instance.id() {
            text.push_str(id);
            text.push(' ');
        }
        for field in self.value_fields().filter(|field| field.is_public()) {
            if let Some(value) = instance.get(field.name()) {
                value.write_search_text(&mut text);
            }
        }
        text.to_lowercase()
    }

    /// Whether every whitespace separated token of `query` is contained in the search text of
    /// `instance`. The comparison is case-insensitive.
    pub fn matches(&self, instance: &Instance, query: &str) -> bool {
        let text = self.search_text(instance);
        query
            .to_lowercase()
            .split_whitespace()
            .all(|token| text.contains(token))
    }

    /// Renders `instance` as `<Model: label (main)>`.
    pub fn describe(&self, instance: &Instance) -> String {
        format!("<{}: {instance}>", self.name)
    }

    fn value_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields
            .iter()
            .filter(|field| !matches!(field.kind(), FieldKind::Conformance))
    }
}

/// Builds an [EntityModel]. Obtained through [EntityModel::builder].
#[derive(Clone, Debug)]
pub struct EntityModelBuilder {
    name: String,
    name_plural: Option<String>,
    fields: Vec<(String, Field)>,
    properties: Vec<ComputedProperty>,
    meta: ModelMeta,
}

impl EntityModelBuilder {
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn plural(mut self, name_plural: impl Into<String>) -> Self {
        self.name_plural = Some(name_plural.into());
        self
    }

    #[must_use]
    pub fn meta(mut self, meta: ModelMeta) -> Self {
        self.meta = meta;
        self
    }

    /// Applies `f` to the current metadata.
    #[must_use]
    pub fn configure(mut self, f: impl FnOnce(ModelMeta) -> ModelMeta) -> Self {
        self.meta = f(self.meta);
        self
    }

    /// Adds a field. A field with the same name is replaced in place, so redefinitions keep the
    /// position of the original declaration.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, field: Field) -> Self {
        let name = name.into();
        match self.fields.iter_mut().find(|(key, _)| *key == name) {
            Some((_, existing)) => *existing = field,
            None => self.fields.push((name, field)),
        }
        self
    }

    /// Replaces the main entity field with one that is constrained by `triples`.
    #[must_use]
    pub fn main(self, triples: impl IntoIterator<Item = Triple>) -> Self {
        self.field(ROOT_VARIABLE, Field::main_entity(triples))
    }

    /// Registers a computed property. A property with the same name is replaced in place.
    #[must_use]
    pub fn property(mut self, property: ComputedProperty) -> Self {
        match self
            .properties
            .iter_mut()
            .find(|existing| existing.name() == property.name())
        {
            Some(existing) => *existing = property,
            None => self.properties.push(property),
        }
        self
    }

    #[must_use]
    pub fn without_field(mut self, name: &str) -> Self {
        self.fields.retain(|(key, _)| key != name);
        self
    }

    pub fn build(self) -> Result<EntityModel, ConfigurationError> {
        let fields = self
            .fields
            .into_iter()
            .map(|(name, field)| field.bind(&name))
            .collect::<Vec<_>>();
        for field in &fields {
            field.validate()?;
        }

        check_reserved(&self.name, &fields, ROOT_VARIABLE, "main entity", |kind| {
            matches!(kind, FieldKind::MainEntity { .. })
        })?;
        check_reserved(&self.name, &fields, LABEL_FIELD, "label", |kind| {
            matches!(kind, FieldKind::Label)
        })?;

        for property in &self.properties {
            let name = property.name();
            if name == "id" || fields.iter().any(|field| field.name() == name) {
                return Err(ConfigurationError::DuplicateProperty {
                    model: self.name,
                    name: name.to_owned(),
                });
            }
        }

        let name_plural = self
            .name_plural
            .unwrap_or_else(|| format!("{}s", self.name));
        Ok(EntityModel {
            name: self.name,
            name_plural,
            fields,
            properties: self.properties,
            meta: self.meta,
        })
    }
}

fn check_reserved(
    model: &str,
    fields: &[Field],
    name: &str,
    expected: &'static str,
    is_valid: impl Fn(&FieldKind) -> bool,
) -> Result<(), ConfigurationError> {
    let Some(field) = fields.iter().find(|field| field.name() == name) else {
        return Err(ConfigurationError::MissingReservedField {
            model: model.to_owned(),
            field: name.to_owned(),
        });
    };
    if is_valid(field.kind()) {
        Ok(())
    } else {
        Err(ConfigurationError::InvalidReservedField {
            model: model.to_owned(),
            field: name.to_owned(),
            expected,
        })
    }
}
