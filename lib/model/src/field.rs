//! The fields of an [EntityModel](crate::EntityModel).
//!
//! A [Field] describes one attribute of an entity. It knows how to contribute to each clause of
//! the compiled SPARQL query and how to decode its value from a row of the response.

use crate::constants::{DEFAULT_SEPARATOR, ROOT_VARIABLE};
use crate::query::RenderContext;
use crate::{ConfigurationError, FieldValue, ModelMeta, QueryRow, Triple};

/// The configuration shared by all kinds of fields.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldConfig {
    /// The variable of the entity this field is attached to.
    pub entity_name: String,
    /// The properties that can satisfy this field. Rendered as an alternative path.
    pub properties: Vec<String>,
    /// Required fields are rendered as mandatory patterns, all others are `OPTIONAL`.
    pub required: bool,
    /// The value used if the field is absent from a response row.
    pub default: FieldValue,
    /// Overrides the visibility that is derived from the field name.
    pub public: Option<bool>,
    /// Whether the field is part of the minimal projection.
    pub show_in_minimal: bool,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            entity_name: ROOT_VARIABLE.to_owned(),
            properties: Vec::new(),
            required: false,
            default: FieldValue::Null,
            public: None,
            show_in_minimal: false,
        }
    }
}

/// The kind of a [Field] and the configuration that is specific to it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldKind {
    /// A single string value.
    Scalar,
    /// A single entity whose value is reduced to its identifier.
    EntityId,
    /// The entity bound to the root variable, constrained by [Triple]s.
    MainEntity { triples: Vec<Triple> },
    /// The label of an entity, provided by the label service.
    Label,
    /// The description of an entity, provided by the label service.
    Description,
    /// The alternative labels of an entity in the primary language.
    AltLabel { separator: String },
    /// Multiple string values.
    List { separator: String },
    /// Multiple entities, resolved to their labels.
    EntityList { separator: String },
    /// An entity that must be one of `values`. Exposes the label of the matched entity.
    EntityFilter { values: Vec<String> },
    /// The page of an external catalog (e.g. a Wikipedia) that is about the entity.
    ExternalLink { url: String },
    /// The result of a conformance check. Never part of a query.
    Conformance,
}

impl FieldKind {
    fn separator(&self) -> Option<&str> {
        match self {
            Self::AltLabel { separator }
            | Self::List { separator }
            | Self::EntityList { separator } => Some(separator),
            _ => None,
        }
    }

    fn uses_properties(&self) -> bool {
        matches!(
            self,
            Self::Scalar
                | Self::EntityId
                | Self::List { .. }
                | Self::EntityList { .. }
                | Self::EntityFilter { .. }
        )
    }
}

/// One attribute of an [EntityModel](crate::EntityModel).
///
/// Fields are declared with one of the constructors and refined with the builder methods. The
/// name is assigned once the field is registered on a model.
///
/// ```
/// use wikidata_api_model::Field;
///
/// let parents = Field::entity_list(["P171"]).required(true);
/// let grin_ids = Field::list(["P1421"]).separator(";");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Field {
    name: String,
    public: bool,
    config: FieldConfig,
    kind: FieldKind,
}

impl Field {
    /// Creates a new field of the given `kind`.
    pub fn new(kind: FieldKind, config: FieldConfig) -> Self {
        Self {
            name: String::new(),
            public: config.public.unwrap_or(true),
            config,
            kind,
        }
    }

    fn with_properties<P: Into<String>>(
        kind: FieldKind,
        properties: impl IntoIterator<Item = P>,
    ) -> Self {
        let config = FieldConfig {
            properties: properties.into_iter().map(Into::into).collect(),
            ..FieldConfig::default()
        };
        Self::new(kind, config)
    }

    fn list_kind(kind: FieldKind) -> Self {
        let config = FieldConfig {
            default: FieldValue::empty_list(),
            ..FieldConfig::default()
        };
        Self::new(kind, config)
    }

    pub fn scalar<P: Into<String>>(properties: impl IntoIterator<Item = P>) -> Self {
        Self::with_properties(FieldKind::Scalar, properties)
    }

    pub fn entity_id<P: Into<String>>(properties: impl IntoIterator<Item = P>) -> Self {
        Self::with_properties(FieldKind::EntityId, properties)
    }

    /// Creates the main entity field. It is always required and exposed as `id`.
    pub fn main_entity(triples: impl IntoIterator<Item = Triple>) -> Self {
        let kind = FieldKind::MainEntity {
            triples: triples.into_iter().collect(),
        };
        Self::new(kind, FieldConfig::default())
            .required(true)
            .public(false)
    }

    pub fn label() -> Self {
        Self::new(FieldKind::Label, FieldConfig::default())
    }

    pub fn description() -> Self {
        Self::new(FieldKind::Description, FieldConfig::default())
    }

    pub fn alt_labels() -> Self {
        Self::list_kind(FieldKind::AltLabel {
            separator: DEFAULT_SEPARATOR.to_owned(),
        })
    }

    pub fn list<P: Into<String>>(properties: impl IntoIterator<Item = P>) -> Self {
        Self::list_kind(FieldKind::List {
            separator: DEFAULT_SEPARATOR.to_owned(),
        })
        .properties(properties)
    }

    pub fn entity_list<P: Into<String>>(properties: impl IntoIterator<Item = P>) -> Self {
        Self::list_kind(FieldKind::EntityList {
            separator: DEFAULT_SEPARATOR.to_owned(),
        })
        .properties(properties)
    }

    pub fn entity_filter<P: Into<String>, V: Into<String>>(
        properties: impl IntoIterator<Item = P>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        let kind = FieldKind::EntityFilter {
            values: values.into_iter().map(Into::into).collect(),
        };
        Self::with_properties(kind, properties)
    }

    pub fn external_link(url: impl Into<String>) -> Self {
        let kind = FieldKind::ExternalLink { url: url.into() };
        Self::new(kind, FieldConfig::default())
    }

    pub fn conformance() -> Self {
        Self::new(FieldKind::Conformance, FieldConfig::default())
    }

    #[must_use]
    pub fn properties<P: Into<String>>(mut self, properties: impl IntoIterator<Item = P>) -> Self {
        self.config.properties = properties.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn required(mut self, required: bool) -> Self {
        self.config.required = required;
        self
    }

    #[must_use]
    pub fn default_value(mut self, default: impl Into<FieldValue>) -> Self {
        self.config.default = default.into();
        self
    }

    #[must_use]
    pub fn public(mut self, public: bool) -> Self {
        self.config.public = Some(public);
        self.public = public;
        self
    }

    #[must_use]
    pub fn show_in_minimal(mut self, show_in_minimal: bool) -> Self {
        self.config.show_in_minimal = show_in_minimal;
        self
    }

    /// Attaches this field to the entity bound to `?{entity_name}`.
    #[must_use]
    pub fn entity(mut self, entity_name: impl Into<String>) -> Self {
        self.config.entity_name = entity_name.into();
        self
    }

    /// Sets the separator of list fields. Has no effect on other kinds.
    #[must_use]
    pub fn separator(mut self, value: impl Into<String>) -> Self {
        if let FieldKind::AltLabel { separator }
        | FieldKind::List { separator }
        | FieldKind::EntityList { separator } = &mut self.kind
        {
            *separator = value.into();
        }
        self
    }

    /// Whether a missing list decodes to an empty list (`true`) or to null (`false`).
    #[must_use]
    pub fn empty(mut self, empty: bool) -> Self {
        self.config.default = if empty {
            FieldValue::empty_list()
        } else {
            FieldValue::Null
        };
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn entity_name(&self) -> &str {
        &self.config.entity_name
    }

    pub fn is_required(&self) -> bool {
        self.config.required
    }

    pub fn is_public(&self) -> bool {
        self.public
    }

    pub fn default(&self) -> &FieldValue {
        &self.config.default
    }

    /// Assigns the name of this field. Fields with a leading underscore are private unless the
    /// visibility has been set explicitly.
    pub(crate) fn bind(mut self, name: &str) -> Self {
        name.clone_into(&mut self.name);
        self.public = self.config.public.unwrap_or(!name.starts_with('_'));
        self
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigurationError> {
        if self.kind.uses_properties() && self.config.properties.is_empty() {
            return Err(ConfigurationError::MissingProperties {
                field: self.name.clone(),
            });
        }
        if let FieldKind::EntityFilter { values } = &self.kind {
            if values.is_empty() {
                return Err(ConfigurationError::MissingFilterValues {
                    field: self.name.clone(),
                });
            }
        }
        if self.kind.separator().is_some_and(str::is_empty) {
            return Err(ConfigurationError::EmptySeparator {
                field: self.name.clone(),
            });
        }
        Ok(())
    }

    /// Whether this field is left out of a minimal projection.
    ///
    /// The main entity, the label and the description are always part of the projection. Other
    /// fields are only included if they are required or marked with `show_in_minimal`.
    pub fn is_suppressed(&self, minimal: bool) -> bool {
        let always_shown = matches!(
            self.kind,
            FieldKind::MainEntity { .. } | FieldKind::Label | FieldKind::Description
        );
        minimal && !always_shown && !self.config.required && !self.config.show_in_minimal
    }

    /// The variable that is bound by the label service for labels and descriptions.
    fn service_variable(&self) -> String {
        let suffix = match self.kind {
            FieldKind::Description => "Description",
            _ => "Label",
        };
        format!("?{}{suffix}", self.config.entity_name)
    }

    fn property_path(&self, ctx: &RenderContext<'_>) -> String {
        self.config
            .properties
            .iter()
            .map(|property| format!("{}:{property}", ctx.prop_prefix))
            .collect::<Vec<_>>()
            .join("|")
    }

    fn wrap_optional(&self, pattern: String) -> String {
        if pattern.is_empty() || self.config.required {
            pattern
        } else {
            format!("OPTIONAL {{ {pattern} }}")
        }
    }

    /// The projection of the outer `SELECT`.
    pub(crate) fn outer_fragment(&self, minimal: bool) -> String {
        if self.is_suppressed(minimal) {
            return String::new();
        }
        let name = &self.name;
        let entity = &self.config.entity_name;
        match &self.kind {
            FieldKind::Scalar
            | FieldKind::EntityId
            | FieldKind::MainEntity { .. }
            | FieldKind::EntityFilter { .. }
            | FieldKind::ExternalLink { .. } => format!("?{name}"),
            FieldKind::Label | FieldKind::Description => {
                let variable = self.service_variable();
                format!("{variable} ({variable} AS ?{name})")
            }
            FieldKind::AltLabel { separator } => format!(
                "(GROUP_CONCAT(DISTINCT ?{entity}_alt_label; SEPARATOR='{}') AS ?{name})",
                escape_literal(separator)
            ),
            FieldKind::List { separator } => format!(
                "(GROUP_CONCAT(DISTINCT ?{name}_item; SEPARATOR='{}') AS ?{name})",
                escape_literal(separator)
            ),
            FieldKind::EntityList { separator } => format!(
                "(GROUP_CONCAT(DISTINCT ?{name}_itemLabel; SEPARATOR='{}') AS ?{name})",
                escape_literal(separator)
            ),
            FieldKind::Conformance => String::new(),
        }
    }

    /// The projection of the inner `SELECT DISTINCT`.
    pub(crate) fn inner_fragment(&self, minimal: bool) -> String {
        if self.is_suppressed(minimal) {
            return String::new();
        }
        let name = &self.name;
        match &self.kind {
            FieldKind::Scalar
            | FieldKind::EntityId
            | FieldKind::MainEntity { .. }
            | FieldKind::ExternalLink { .. } => format!("?{name}"),
            FieldKind::EntityFilter { .. } => format!("?{name}_qid"),
            FieldKind::List { .. } | FieldKind::EntityList { .. } => format!("?{name}_item"),
            FieldKind::Label
            | FieldKind::Description
            | FieldKind::AltLabel { .. }
            | FieldKind::Conformance => String::new(),
        }
    }

    /// The pattern in the `WHERE` clause, wrapped in `OPTIONAL` unless the field is required.
    pub(crate) fn filter_fragment(&self, ctx: &RenderContext<'_>) -> String {
        let name = &self.name;
        let entity = &self.config.entity_name;
        let pattern = match &self.kind {
            FieldKind::Scalar | FieldKind::EntityId => {
                format!("?{entity} {} ?{name}.", self.property_path(ctx))
            }
            FieldKind::MainEntity { triples } => triples
                .iter()
                .map(|triple| triple.render(entity, ctx))
                .filter(|pattern| !pattern.is_empty())
                .collect::<Vec<_>>()
                .join(" "),
            FieldKind::List { .. } | FieldKind::EntityList { .. } => {
                format!("?{entity} {} ?{name}_item.", self.property_path(ctx))
            }
            FieldKind::EntityFilter { values } => {
                let alternatives = values
                    .iter()
                    .map(|value| format!("?{name}_qid = {}:{value}", ctx.entity_prefix))
                    .collect::<Vec<_>>()
                    .join(" || ");
                format!(
                    "?{entity} {} ?{name}_qid. FILTER({alternatives}).",
                    self.property_path(ctx)
                )
            }
            FieldKind::ExternalLink { url } => {
                format!("?{name} schema:about ?{entity}; schema:isPartOf <{url}>.")
            }
            FieldKind::Label
            | FieldKind::Description
            | FieldKind::AltLabel { .. }
            | FieldKind::Conformance => String::new(),
        };
        self.wrap_optional(pattern)
    }

    /// The pattern that is evaluated outside of the inner query.
    pub(crate) fn outer_filter_fragment(&self, ctx: &RenderContext<'_>) -> String {
        let entity = &self.config.entity_name;
        let pattern = match &self.kind {
            FieldKind::AltLabel { .. } => format!(
                "?{entity} skos:altLabel ?{entity}_alt_label . FILTER(LANG(?{entity}_alt_label)='{}')",
                escape_literal(ctx.language)
            ),
            _ => String::new(),
        };
        self.wrap_optional(pattern)
    }

    /// The contribution to the label `SERVICE`.
    pub(crate) fn service_fragment(&self) -> String {
        let name = &self.name;
        let entity = &self.config.entity_name;
        match &self.kind {
            FieldKind::Label => format!("?{entity} rdfs:label {} .", self.service_variable()),
            FieldKind::Description => {
                format!("?{entity} schema:description {} .", self.service_variable())
            }
            FieldKind::EntityList { .. } => {
                format!("?{name}_item rdfs:label ?{name}_itemLabel .")
            }
            FieldKind::EntityFilter { .. } => format!("?{name}_qid rdfs:label ?{name} ."),
            _ => String::new(),
        }
    }

    /// The contribution to the `GROUP BY` clause. Aggregated fields do not contribute.
    pub(crate) fn group_fragment(&self) -> String {
        match &self.kind {
            FieldKind::Scalar
            | FieldKind::EntityId
            | FieldKind::MainEntity { .. }
            | FieldKind::EntityFilter { .. }
            | FieldKind::ExternalLink { .. } => format!("?{}", self.name),
            FieldKind::Label | FieldKind::Description => self.service_variable(),
            FieldKind::AltLabel { .. }
            | FieldKind::List { .. }
            | FieldKind::EntityList { .. }
            | FieldKind::Conformance => String::new(),
        }
    }

    /// Decodes the value of this field from a response row.
    ///
    /// Missing or malformed bindings decode to the default of the field.
    pub fn decode(&self, row: &QueryRow, meta: &ModelMeta) -> FieldValue {
        let raw = row.value(&self.name);
        match (&self.kind, raw) {
            (FieldKind::Conformance, _) | (_, None) => self.config.default.clone(),
            (FieldKind::EntityId | FieldKind::MainEntity { .. }, Some(value)) => {
                FieldValue::Text(meta.strip_entity_id(value).to_owned())
            }
            (
                FieldKind::AltLabel { separator }
                | FieldKind::List { separator }
                | FieldKind::EntityList { separator },
                Some(value),
            ) => {
                if value.is_empty() {
                    self.config.default.clone()
                } else {
                    FieldValue::List(value.split(separator.as_str()).map(ToOwned::to_owned).collect())
                }
            }
            (_, Some(value)) => FieldValue::Text(value.to_owned()),
        }
    }
}

/// Escapes a value that is placed inside a single-quoted SPARQL literal.
fn escape_literal(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}
