//! Record kinds persisted by the journaling backend.
//!
//! Each kind is a serde struct that derives its JSON schema. The derived schema
//! is published at `/schema` and compiled once per kind to validate payloads;
//! serde defaults fill in whatever the payload leaves out.

use std::sync::LazyLock;

use jsonschema::Validator;
use schemars::{schema_for, JsonSchema, Schema};
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};

use crate::document::validate::{validate_value, ValidationError, ViolationKind};

/// A record kind stored in its own collection.
pub trait Record: Serialize + DeserializeOwned + JsonSchema + Send + Sync + 'static {
    const COLLECTION: &'static str;

    fn validator() -> &'static Validator;

    /// Validate a semi-structured payload into a defaulted, typed record.
    fn validate(input: &Value) -> Result<Self, ValidationError> {
        validate_value(Self::validator(), input)?;
        serde_json::from_value(input.clone()).map_err(|e| {
            tracing::warn!(collection = Self::COLLECTION, error = %e, "validated payload did not decode");
            ValidationError::single("body", ViolationKind::Invalid, e.to_string())
        })
    }
}

/// Record kinds that belong to a calendar day and can be listed by date or month.
pub trait Dated: Record {}

fn compile<R: JsonSchema>() -> Validator {
    jsonschema::validator_for(schema_for!(R).as_value())
        .expect("derived record schemas are valid JSON schemas")
}

/// Collection name and schema of every record kind, in collection order.
pub fn all() -> Vec<(&'static str, Schema)> {
    vec![
        (Journal::COLLECTION, schema_for!(Journal)),
        (JournalPage::COLLECTION, schema_for!(JournalPage)),
        (CalendarEvent::COLLECTION, schema_for!(CalendarEvent)),
        (Sticker::COLLECTION, schema_for!(Sticker)),
        (Drawing::COLLECTION, schema_for!(Drawing)),
    ]
}

/// Integers, plus floats with no fractional part (`16.0`).
fn integral<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let n = Number::deserialize(deserializer)?;
    n.as_i64()
        .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
        .ok_or_else(|| D::Error::custom(format!("expected an integer, got {n}")))
}

// ---------- Journal ----------

/// A named notebook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Journal {
    /// Journal title
    #[schemars(length(min = 1))]
    pub title: String,
    /// Cover style identifier
    #[serde(default = "Journal::cover_style")]
    pub cover_style: String,
    /// Paper style: dotted, lined, grid, blank
    #[serde(default = "Journal::paper_style")]
    pub paper_style: String,
    /// Owner identifier, reserved for authentication
    pub owner: Option<String>,
}

impl Journal {
    fn cover_style() -> String {
        "pastel-pink".into()
    }

    fn paper_style() -> String {
        "dotted".into()
    }
}

impl Record for Journal {
    const COLLECTION: &'static str = "journal";

    fn validator() -> &'static Validator {
        static VALIDATOR: LazyLock<Validator> = LazyLock::new(compile::<Journal>);
        &VALIDATOR
    }
}

// ---------- JournalPage ----------

/// A daily page. `journal_id` is not checked against existing journals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct JournalPage {
    /// Related journal id
    pub journal_id: String,
    /// ISO date YYYY-MM-DD of the daily page
    pub date: String,
    /// Rich text or markdown content
    #[serde(default)]
    pub content: String,
    /// Font family name
    #[serde(default = "JournalPage::font")]
    pub font: String,
    #[serde(default = "JournalPage::font_size", deserialize_with = "integral")]
    #[schemars(range(min = 8, max = 64))]
    pub font_size: i64,
    #[serde(default = "JournalPage::color")]
    pub color: String,
    /// left|center|right|justify
    #[serde(default = "JournalPage::alignment")]
    pub alignment: String,
    /// Background style identifier
    pub background: Option<String>,
}

impl JournalPage {
    fn font() -> String {
        "Inter".into()
    }

    fn font_size() -> i64 {
        16
    }

    fn color() -> String {
        "#1f2937".into()
    }

    fn alignment() -> String {
        "left".into()
    }
}

impl Record for JournalPage {
    const COLLECTION: &'static str = "journalpage";

    fn validator() -> &'static Validator {
        static VALIDATOR: LazyLock<Validator> = LazyLock::new(compile::<JournalPage>);
        &VALIDATOR
    }
}

// ---------- CalendarEvent ----------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CalendarEvent {
    /// ISO date YYYY-MM-DD
    pub date: String,
    /// Short title for the calendar cell
    pub title: String,
    /// Highlight color token
    pub highlight: Option<String>,
    /// Emoji shortcut
    pub emoji: Option<String>,
}

impl Record for CalendarEvent {
    const COLLECTION: &'static str = "calendarevent";

    fn validator() -> &'static Validator {
        static VALIDATOR: LazyLock<Validator> = LazyLock::new(compile::<CalendarEvent>);
        &VALIDATOR
    }
}

impl Dated for CalendarEvent {}

// ---------- Sticker ----------

/// Placement coordinates are documented as 0-1 but stored unchecked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Sticker {
    /// ISO date YYYY-MM-DD the sticker belongs to
    pub date: String,
    /// Category: emotions|nature|decor|work|custom
    #[serde(default = "Sticker::category")]
    pub category: String,
    /// Sticker label or emoji
    pub label: String,
    /// x position in cell (0-1)
    #[serde(default)]
    pub x: f64,
    /// y position in cell (0-1)
    #[serde(default)]
    pub y: f64,
    /// Relative size multiplier
    #[serde(default = "Sticker::size")]
    pub size: f64,
}

impl Sticker {
    fn category() -> String {
        "decor".into()
    }

    fn size() -> f64 {
        1.0
    }
}

impl Record for Sticker {
    const COLLECTION: &'static str = "sticker";

    fn validator() -> &'static Validator {
        static VALIDATOR: LazyLock<Validator> = LazyLock::new(compile::<Sticker>);
        &VALIDATOR
    }
}

impl Dated for Sticker {}

// ---------- Drawing ----------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct StrokePoint {
    pub x: f64,
    pub y: f64,
    /// Pressure, 0-1 by convention.
    pub p: Option<f64>,
    /// Timestamp
    pub t: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Drawing {
    /// ISO date YYYY-MM-DD
    pub date: String,
    /// pen|brush|marker
    #[serde(default = "Drawing::tool")]
    pub tool: String,
    #[serde(default = "Drawing::color")]
    pub color: String,
    #[serde(default = "Drawing::size")]
    pub size: f64,
    /// Ordered stroke points
    #[serde(default)]
    pub points: Vec<StrokePoint>,
}

impl Drawing {
    fn tool() -> String {
        "pen".into()
    }

    fn color() -> String {
        "#111827".into()
    }

    fn size() -> f64 {
        2.0
    }
}

impl Record for Drawing {
    const COLLECTION: &'static str = "drawing";

    fn validator() -> &'static Validator {
        static VALIDATOR: LazyLock<Validator> = LazyLock::new(compile::<Drawing>);
        &VALIDATOR
    }
}

impl Dated for Drawing {}
