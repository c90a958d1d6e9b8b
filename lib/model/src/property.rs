use crate::{FieldValue, Instance};

/// A value that is derived from the decoded fields of an [Instance] instead of being queried.
///
/// Computed properties are registered with
/// [EntityModelBuilder::property](crate::EntityModelBuilder::property) and are emitted by
/// [EntityModel::shape](crate::EntityModel::shape) after the declared fields.
///
/// ```
/// use wikidata_api_model::{ComputedProperty, FieldValue, Instance};
///
/// fn parent_count(instance: &Instance) -> FieldValue {
///     let count = instance.list("parents").map_or(0, <[String]>::len);
///     FieldValue::Text(count.to_string())
/// }
///
/// let property = ComputedProperty::new("parent_count", parent_count).show_in_minimal(true);
/// assert_eq!(property.name(), "parent_count");
/// ```
#[derive(Clone, Debug)]
pub struct ComputedProperty {
    name: String,
    compute: fn(&Instance) -> FieldValue,
    show_in_minimal: bool,
}

impl ComputedProperty {
    pub fn new(name: impl Into<String>, compute: fn(&Instance) -> FieldValue) -> Self {
        Self {
            name: name.into(),
            compute,
            show_in_minimal: false,
        }
    }

    /// Also emits the property in the minimal projection.
    #[must_use]
    pub fn show_in_minimal(mut self, show_in_minimal: bool) -> Self {
        self.show_in_minimal = show_in_minimal;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_shown_in_minimal(&self) -> bool {
        self.show_in_minimal
    }

    pub fn compute(&self, instance: &Instance) -> FieldValue {
        (self.compute)(instance)
    }
}
