/// Validation of incoming JSON payloads against a compiled record schema.
///
/// Every schema violation is collected rather than stopping at the first
/// problem, and each one is addressed by a field path (`font_size`,
/// `points[2].x`) instead of a JSON pointer.
use jsonschema::error::ValidationErrorKind;
use jsonschema::Validator;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    Missing,
    WrongType,
    OutOfRange,
    Empty,
    Invalid,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    #[serde(rename = "type")]
    pub kind: ViolationKind,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid input: {}", summarize(.violations))]
pub struct ValidationError {
    violations: Vec<FieldViolation>,
}

fn summarize(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| format!("{} ({})", v.field, v.message))
        .collect::<Vec<_>>()
        .join(", ")
}

impl ValidationError {
    pub fn new(violations: Vec<FieldViolation>) -> Self {
        Self { violations }
    }

    pub fn single(field: impl Into<String>, kind: ViolationKind, message: impl Into<String>) -> Self {
        Self::new(vec![FieldViolation::new(field, kind, message)])
    }

    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    /// Violated field paths, in report order.
    pub fn fields(&self) -> Vec<&str> {
        self.violations.iter().map(|v| v.field.as_str()).collect()
    }
}

/// Check `input` against `validator`, reporting every violation sorted by field path.
pub fn validate_value(validator: &Validator, input: &Value) -> Result<(), ValidationError> {
    let mut violations: Vec<FieldViolation> = validator
        .iter_errors(input)
        .map(|error| {
            let parent = field_path(&error.instance_path.to_string());
            let (field, kind) = match &error.kind {
                ValidationErrorKind::Required { property } => {
                    let name = property.as_str().unwrap_or_default();
                    let field = if parent.is_empty() {
                        name.to_string()
                    } else {
                        format!("{parent}.{name}")
                    };
                    (field, ViolationKind::Missing)
                }
                ValidationErrorKind::Type { .. } => (parent, ViolationKind::WrongType),
                ValidationErrorKind::Minimum { .. } | ValidationErrorKind::Maximum { .. } => {
                    (parent, ViolationKind::OutOfRange)
                }
                ValidationErrorKind::MinLength { .. } => (parent, ViolationKind::Empty),
                _ => (parent, ViolationKind::Invalid),
            };
            let field = if field.is_empty() { "body".to_string() } else { field };
            FieldViolation::new(field, kind, error.to_string())
        })
        .collect();

    if violations.is_empty() {
        return Ok(());
    }
    violations.sort_by(|a, b| a.field.cmp(&b.field));
    Err(ValidationError::new(violations))
}

/// `/points/2/x` becomes `points[2].x`.
fn field_path(pointer: &str) -> String {
    let mut path = String::new();
    for segment in pointer.split('/').skip(1) {
        let segment = segment.replace("~1", "/").replace("~0", "~");
        if segment.parse::<usize>().is_ok() {
            path.push('[');
            path.push_str(&segment);
            path.push(']');
        } else {
            if !path.is_empty() {
                path.push('.');
            }
            path.push_str(&segment);
        }
    }
    path
}
