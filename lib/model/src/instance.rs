use crate::constants::ROOT_VARIABLE;
use crate::{ConformanceReport, FieldValue};
use std::fmt::{Display, Formatter};

/// A decoded entity. Holds one value per field of the model that produced it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Instance {
    id: Option<String>,
    values: Vec<(String, FieldValue)>,
    conformance: Option<ConformanceReport>,
}

impl Instance {
    pub fn new() -> Self {
        Self::default()
    }

    /// The identifier of the main entity (e.g. `Q123`).
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = Some(id.into());
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.values
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    /// Sets the value of `field`, keeping the position of an existing value.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<FieldValue>) {
        let field = field.into();
        let value = value.into();
        match self.values.iter_mut().find(|(name, _)| *name == field) {
            Some((_, existing)) => *existing = value,
            None => self.values.push((field, value)),
        }
    }

    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.set(field, value);
        self
    }

    pub fn text(&self, field: &str) -> Option<&str> {
        self.get(field)?.as_text()
    }

    pub fn list(&self, field: &str) -> Option<&[String]> {
        self.get(field)?.as_list()
    }

    /// Iterates over all `(field, value)` pairs in declaration order.
    pub fn values(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.values
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    pub fn conformance(&self) -> Option<&ConformanceReport> {
        self.conformance.as_ref()
    }

    pub fn set_conformance(&mut self, report: ConformanceReport) {
        self.conformance = Some(report);
    }
}

impl Display for Instance {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = self.text("label").unwrap_or("None");
        let main = self
            .text(ROOT_VARIABLE)
            .or(self.id.as_deref())
            .unwrap_or("None");
        write!(f, "{label} ({main})")
    }
}
