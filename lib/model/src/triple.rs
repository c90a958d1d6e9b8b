use crate::query::RenderContext;
use crate::ConfigurationError;

/// A graph pattern that constrains the main entity of a model.
///
/// A [Triple] matches if the subject has the `property` with any of the given `values`. Multiple
/// values are rendered as a `UNION` of patterns. The pattern can optionally follow the subclass
/// property transitively (e.g. `wdt:P31/wdt:P279*`) or be negated with `MINUS`.
///
/// ```
/// use wikidata_api_model::Triple;
///
/// let taxon = Triple::new("P31", ["Q16521"]);
/// let not_human = Triple::new("P31", ["Q5"]).negated()?;
/// # Ok::<_, wikidata_api_model::ConfigurationError>(())
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Triple {
    property: String,
    values: Vec<String>,
    subclass: bool,
    minus: bool,
}

impl Triple {
    /// Creates a new [Triple] that matches any of the `values` of `property`.
    pub fn new<V: Into<String>>(
        property: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Self {
            property: property.into(),
            values: values.into_iter().map(Into::into).collect(),
            subclass: false,
            minus: false,
        }
    }

    /// Also matches values that are transitive subclasses of the given values.
    #[must_use]
    pub fn with_subclasses(mut self) -> Self {
        self.subclass = true;
        self
    }

    /// Excludes entities that match this pattern.
    ///
    /// Returns an error if the triple has more than one value, as a negated union is ambiguous.
    pub fn negated(mut self) -> Result<Self, ConfigurationError> {
        if self.values.len() > 1 {
            return Err(ConfigurationError::UnionWithMinus {
                property: self.property,
            });
        }
        self.minus = true;
        Ok(self)
    }

    pub fn property(&self) -> &str {
        &self.property
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn is_subclass(&self) -> bool {
        self.subclass
    }

    pub fn is_minus(&self) -> bool {
        self.minus
    }

    /// Renders this pattern for the variable `?{subject}`. Returns an empty string if there are
    /// no values.
    pub(crate) fn render(&self, subject: &str, ctx: &RenderContext<'_>) -> String {
        let prop_prefix = ctx.prop_prefix;
        let path = if self.subclass {
            format!(
                "{prop_prefix}:{}/{prop_prefix}:{}*",
                self.property, ctx.subclass_prop
            )
        } else {
            format!("{prop_prefix}:{}", self.property)
        };

        let union = self
            .values
            .iter()
            .map(|value| format!("{{ ?{subject} {path} {}:{value}. }}", ctx.entity_prefix))
            .collect::<Vec<_>>()
            .join(" UNION ");

        if self.minus && !union.is_empty() {
            format!("MINUS {union}")
        } else {
            union
        }
    }
}
