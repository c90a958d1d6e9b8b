use serde::{Serialize, Serializer};
use serde_json::Value;

/// The decoded value of a single field of an [Instance](crate::Instance).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum FieldValue {
    /// No value has been bound.
    #[default]
    Null,
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    /// Creates an empty list value.
    pub fn empty_list() -> Self {
        Self::List(Vec::new())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// Returns the JSON representation that is exposed by the API.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Text(text) => Value::String(text.clone()),
            Self::List(items) => Value::Array(items.iter().cloned().map(Value::String).collect()),
        }
    }

    /// Appends the searchable text of this value to `out`. Every part is followed by a space.
    pub(crate) fn write_search_text(&self, out: &mut String) {
        match self {
            Self::Null => {}
            Self::Text(text) => {
                out.push_str(text);
                out.push(' ');
            }
            Self::List(items) => {
                for item in items {
                    out.push_str(item);
                    out.push(' ');
                }
            }
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

impl From<Vec<&str>> for FieldValue {
    fn from(value: Vec<&str>) -> Self {
        Self::List(value.into_iter().map(ToOwned::to_owned).collect())
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// The result of checking an entity against a shape.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct ConformanceReport {
    /// The identifier of the entity that has been checked.
    pub focus: String,
    pub reason: String,
    pub result: ConformanceResult,
}

impl ConformanceReport {
    pub const NO_SCHEMA_REASON: &'static str = "No Schema associated with this model";

    /// The report used for models without a schema.
    pub fn without_schema(focus: impl Into<String>) -> Self {
        Self {
            focus: focus.into(),
            reason: Self::NO_SCHEMA_REASON.to_owned(),
            result: ConformanceResult::NotApplicable,
        }
    }
}

/// Whether an entity conforms to a shape. Serialized either as a boolean or as `"n/a"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConformanceResult {
    Conforms(bool),
    NotApplicable,
}

impl Serialize for ConformanceResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Conforms(value) => serializer.serialize_bool(*value),
            Self::NotApplicable => serializer.serialize_str("n/a"),
        }
    }
}
