use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::id::DocumentId;

/// A document as it comes back from a store: the raw JSON fields plus the
/// identifier the store assigned at insert time.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: DocumentId,
    pub fields: Map<String, Value>,
}

impl StoredDocument {
    pub fn new(id: DocumentId, fields: Map<String, Value>) -> Self {
        Self { id, fields }
    }

    /// Decode the stored fields into a typed record.
    pub fn decode<T: DeserializeOwned>(self) -> Result<Document<T>, serde_json::Error> {
        let record = serde_json::from_value(Value::Object(self.fields))?;
        Ok(Document {
            id: self.id.to_string(),
            record,
        })
    }
}

/// A typed record together with its external identifier.
/// Serializes as the record's fields plus `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document<T> {
    pub id: String,
    #[serde(flatten)]
    pub record: T,
}
