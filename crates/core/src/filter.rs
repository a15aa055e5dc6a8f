//! Collection query filters: a conjunction of per-field exact or prefix matches.
//!
//! A field that is absent from a document never satisfies a condition, on any backend.

use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Field is present and equals the value exactly.
    Equals(Value),
    /// Field is a string that literally starts with the prefix. No pattern syntax.
    StartsWith(String),
}

impl Condition {
    pub fn matches(&self, field: Option<&Value>) -> bool {
        match (self, field) {
            (Condition::Equals(expected), Some(actual)) => expected == actual,
            (Condition::Equals(_), None) => false,
            (Condition::StartsWith(prefix), Some(Value::String(s))) => s.starts_with(prefix.as_str()),
            (Condition::StartsWith(_), _) => false,
        }
    }
}

/// An empty filter matches every document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<(String, Condition)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn equals(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.with(field, Condition::Equals(value.into()))
    }

    pub fn starts_with(self, field: impl Into<String>, prefix: impl Into<String>) -> Self {
        self.with(field, Condition::StartsWith(prefix.into()))
    }

    /// Set the condition for a field, replacing any earlier one.
    pub fn with(mut self, field: impl Into<String>, condition: Condition) -> Self {
        let field = field.into();
        match self.conditions.iter_mut().find(|(name, _)| *name == field) {
            Some(slot) => slot.1 = condition,
            None => self.conditions.push((field, condition)),
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn conditions(&self) -> impl Iterator<Item = (&str, &Condition)> {
        self.conditions.iter().map(|(f, c)| (f.as_str(), c))
    }

    pub fn matches(&self, doc: &Map<String, Value>) -> bool {
        self.conditions
            .iter()
            .all(|(field, condition)| condition.matches(doc.get(field)))
    }
}
