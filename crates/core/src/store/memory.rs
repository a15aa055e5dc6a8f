use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Map, Value};
use tokio::sync::RwLock;

use crate::document::id::DocumentId;
use crate::document::model::StoredDocument;
use crate::filter::Filter;

/// In-process backend: one insertion-ordered vector per collection.
/// Backs tests and local runs without a database.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    collections: Arc<RwLock<HashMap<String, Vec<StoredDocument>>>>,
}

impl MemoryStore {
    pub async fn insert(&self, collection: &str, fields: Map<String, Value>) -> DocumentId {
        let id = DocumentId::generate();
        let mut collections = self.collections.write().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .push(StoredDocument::new(id, fields));
        id
    }

    pub async fn find(
        &self,
        collection: &str,
        filter: &Filter,
        limit: Option<usize>,
    ) -> Vec<StoredDocument> {
        let collections = self.collections.read().await;
        let Some(docs) = collections.get(collection) else {
            return Vec::new();
        };
        docs.iter()
            .filter(|doc| filter.matches(&doc.fields))
            .take(limit.unwrap_or(usize::MAX))
            .cloned()
            .collect()
    }

    pub async fn collection_names(&self, limit: usize) -> Vec<String> {
        let collections = self.collections.read().await;
        let mut names: Vec<String> = collections.keys().cloned().collect();
        names.sort();
        names.truncate(limit);
        names
    }
}
