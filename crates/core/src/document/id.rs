/// Document identifier handling.
///
/// Stores assign a UUID to every inserted document. The UUID never leaves the
/// adapter as a UUID: callers only ever see its canonical hyphenated string.
use std::fmt;

use uuid::Uuid;

/// Store-assigned identifier of a single document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(Uuid);

impl DocumentId {
    /// Fresh time-ordered identifier, used by stores that assign ids in-process.
    pub fn generate() -> Self {
        Self(Uuid::now_v7())
    }
}

impl From<Uuid> for DocumentId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}
