//! Document persistence layer for the Lümn Note journaling backend.
//!
//! Typed journal records are validated against schemas derived from their types, stored as JSON
//! documents in named collections, and read back through exact or prefix filters.

pub mod document;
pub mod filter;
pub mod schema;
pub mod service;
pub mod store;

pub use document::id::DocumentId;
pub use document::model::{Document, StoredDocument};
pub use document::validate::{FieldViolation, ValidationError, ViolationKind};
pub use filter::{Condition, Filter};
pub use schema::{CalendarEvent, Drawing, Journal, JournalPage, Record, Sticker, StrokePoint};
pub use service::{Collection, Collections, DateQuery, DayView, Limit, PageQuery, ServiceError};
pub use store::{DocumentStore, StoreError, StoreStatus};
