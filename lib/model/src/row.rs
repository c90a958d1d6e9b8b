use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single row of the `results.bindings` array of a SPARQL JSON response.
///
/// Each key is a variable name that maps to an object of the form
/// `{"type": ..., "value": ..., "xml:lang": ...}`. Variables that are not bound are missing from
/// the row. All accessors are lenient and return [None] for missing or malformed bindings.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryRow(Map<String, Value>);

impl QueryRow {
    /// Creates a row of literal bindings from `(variable, value)` pairs.
    pub fn from_values<K, V>(values: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let bindings = values
            .into_iter()
            .map(|(key, value)| {
                let mut binding = Map::new();
                binding.insert("type".to_owned(), Value::String("literal".to_owned()));
                binding.insert("value".to_owned(), Value::String(value.into()));
                (key.into(), Value::Object(binding))
            })
            .collect();
        Self(bindings)
    }

    /// Returns the string value bound to `variable`.
    pub fn value(&self, variable: &str) -> Option<&str> {
        self.raw_value(variable)?.as_str()
    }

    /// Returns the value bound to `variable` without requiring it to be a string.
    pub fn raw_value(&self, variable: &str) -> Option<&Value> {
        self.0.get(variable)?.get("value")
    }
}
