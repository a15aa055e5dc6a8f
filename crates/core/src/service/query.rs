use serde::Deserialize;

use crate::document::validate::{FieldViolation, ValidationError, ViolationKind};
use crate::filter::Filter;

/// Page size for journal listings, 1..=200.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limit(usize);

impl Limit {
    pub const MIN: i64 = 1;
    pub const MAX: i64 = 200;
    pub const DEFAULT: Limit = Limit(50);

    pub fn new(value: i64) -> Result<Self, ValidationError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value as usize))
        } else {
            Err(ValidationError::single(
                "limit",
                ViolationKind::OutOfRange,
                format!("must be between {} and {}", Self::MIN, Self::MAX),
            ))
        }
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for Limit {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Date selection for day-scoped collections. An exact `date` wins over a
/// `month` prefix; empty strings count as absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DateQuery {
    pub date: Option<String>,
    pub month: Option<String>,
}

impl DateQuery {
    pub fn on(date: impl Into<String>) -> Self {
        Self {
            date: Some(date.into()),
            month: None,
        }
    }

    pub fn in_month(month: impl Into<String>) -> Self {
        Self {
            date: None,
            month: Some(month.into()),
        }
    }

    pub fn filter(&self) -> Filter {
        if let Some(date) = non_empty(&self.date) {
            Filter::new().equals("date", date)
        } else if let Some(month) = non_empty(&self.month) {
            Filter::new().starts_with("date", month)
        } else {
            Filter::new()
        }
    }
}

/// Lookup key of a single journal page. Both parts are required.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub journal_id: Option<String>,
    pub date: Option<String>,
}

impl PageQuery {
    pub fn require(self) -> Result<(String, String), ValidationError> {
        match (self.journal_id, self.date) {
            (Some(journal_id), Some(date)) => Ok((journal_id, date)),
            (journal_id, date) => {
                let missing = [("journal_id", journal_id.is_none()), ("date", date.is_none())]
                    .into_iter()
                    .filter(|(_, missing)| *missing)
                    .map(|(field, _)| {
                        FieldViolation::new(field, ViolationKind::Missing, "field required")
                    })
                    .collect();
                Err(ValidationError::new(missing))
            }
        }
    }
}

pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}
