//! Document store adapter.
//!
//! Every collection service goes through [`DocumentStore`], which exposes two
//! operations: insert a record into a named collection, and read back the
//! documents of a collection that match a [`Filter`]. Identifiers are assigned
//! by the backend and only ever leave the adapter as strings.

pub mod memory;
pub mod postgres;

use std::future::Future;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use sqlx::PgPool;
use thiserror::Error;

use crate::document::model::StoredDocument;
use crate::filter::Filter;
use memory::MemoryStore;
use postgres::PostgresStore;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Diagnostics collection listings are capped at this many names.
const STATUS_COLLECTION_LIMIT: usize = 10;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("document store is not available")]
    Unavailable,

    #[error("failed to write to {collection}: {source}")]
    Write {
        collection: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("failed to query {collection}: {source}")]
    Query {
        collection: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("failed to encode record: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("record for {collection} is not a JSON object")]
    NotAnObject { collection: String },

    #[error("stored document in {collection} is malformed: {message}")]
    Decode { collection: String, message: String },

    #[error("{operation} timed out after {after:?}")]
    Timeout {
        operation: &'static str,
        after: Duration,
    },
}

/// Connectivity report for diagnostics. Failures are carried as data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreStatus {
    pub backend: &'static str,
    pub connected: bool,
    pub database_name: Option<String>,
    pub collections: Vec<String>,
    pub error: Option<String>,
}

#[derive(Debug, Clone)]
enum Backend {
    Postgres(PostgresStore),
    Memory(MemoryStore),
    Disconnected,
}

/// Explicitly constructed store client, created once at startup and shared by
/// cloning. Each call is bounded by a timeout and never retried.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    backend: Backend,
    timeout: Duration,
}

impl DocumentStore {
    pub fn postgres(pool: PgPool) -> Self {
        Self::with_backend(Backend::Postgres(PostgresStore::new(pool)))
    }

    pub fn memory() -> Self {
        Self::with_backend(Backend::Memory(MemoryStore::default()))
    }

    /// A store with no connection: every create and query fails with
    /// [`StoreError::Unavailable`].
    pub fn disconnected() -> Self {
        Self::with_backend(Backend::Disconnected)
    }

    fn with_backend(backend: Backend) -> Self {
        Self {
            backend,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn backend_name(&self) -> &'static str {
        match self.backend {
            Backend::Postgres(_) => "postgres",
            Backend::Memory(_) => "memory",
            Backend::Disconnected => "none",
        }
    }

    /// Serialize `record`, insert it into `collection`, and return the new identifier.
    pub async fn create_document<R: Serialize>(
        &self,
        collection: &str,
        record: &R,
    ) -> Result<String, StoreError> {
        let Value::Object(fields) = serde_json::to_value(record)? else {
            return Err(StoreError::NotAnObject {
                collection: collection.to_string(),
            });
        };

        let id = self
            .bounded("insert", async {
                match &self.backend {
                    Backend::Postgres(pg) => pg.insert(collection, fields).await,
                    Backend::Memory(mem) => Ok(mem.insert(collection, fields).await),
                    Backend::Disconnected => Err(StoreError::Unavailable),
                }
            })
            .await?;

        tracing::debug!(collection, %id, "document inserted");
        Ok(id.to_string())
    }

    /// Documents of `collection` matching `filter`, in insertion order,
    /// capped at `limit` when given.
    pub async fn get_documents(
        &self,
        collection: &str,
        filter: &Filter,
        limit: Option<usize>,
    ) -> Result<Vec<StoredDocument>, StoreError> {
        let docs = self
            .bounded("query", async {
                match &self.backend {
                    Backend::Postgres(pg) => pg.find(collection, filter, limit).await,
                    Backend::Memory(mem) => Ok(mem.find(collection, filter, limit).await),
                    Backend::Disconnected => Err(StoreError::Unavailable),
                }
            })
            .await?;

        tracing::debug!(collection, ?filter, ?limit, count = docs.len(), "documents fetched");
        Ok(docs)
    }

    /// Probe the backend. Never fails; problems are reported in the status.
    pub async fn status(&self) -> StoreStatus {
        let mut status = StoreStatus {
            backend: self.backend_name(),
            connected: false,
            database_name: None,
            collections: Vec::new(),
            error: None,
        };

        match &self.backend {
            Backend::Disconnected => {}
            Backend::Memory(mem) => {
                status.connected = true;
                status.database_name = Some("memory".to_string());
                status.collections = mem.collection_names(STATUS_COLLECTION_LIMIT).await;
            }
            Backend::Postgres(pg) => {
                let probe = self
                    .bounded("status", async {
                        let name = pg.database_name().await?;
                        let collections = pg.collection_names(STATUS_COLLECTION_LIMIT).await?;
                        Ok((name, collections))
                    })
                    .await;
                match probe {
                    Ok((name, collections)) => {
                        status.connected = true;
                        status.database_name = Some(name);
                        status.collections = collections;
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "store status probe failed");
                        status.error = Some(err.to_string());
                    }
                }
            }
        }
        status
    }

    /// Release backend resources. Called once on shutdown.
    pub async fn close(&self) {
        if let Backend::Postgres(pg) = &self.backend {
            pg.close().await;
        }
    }

    async fn bounded<T, F>(&self, operation: &'static str, fut: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        tokio::time::timeout(self.timeout, fut)
            .await
            .map_err(|_| StoreError::Timeout {
                operation,
                after: self.timeout,
            })?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn disconnected_store_reports_unavailable() {
        let store = DocumentStore::disconnected();
        let err = store
            .create_document("journal", &json!({"title": "x"}))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Unavailable));

        let err = store
            .get_documents("journal", &Filter::new(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Unavailable));

        let status = store.status().await;
        assert!(!status.connected);
        assert_eq!(status.backend, "none");
    }

    #[tokio::test]
    async fn non_object_records_are_rejected() {
        let store = DocumentStore::memory();
        let err = store.create_document("journal", &json!([1, 2])).await.unwrap_err();
        assert!(matches!(err, StoreError::NotAnObject { .. }));
    }

    #[tokio::test]
    async fn created_ids_are_unique_across_collections() {
        let store = DocumentStore::memory();
        let mut ids = std::collections::HashSet::new();
        for collection in ["journal", "sticker", "journal", "drawing", "sticker"] {
            let id = store
                .create_document(collection, &json!({"date": "2024-05-01"}))
                .await
                .unwrap();
            assert!(ids.insert(id));
        }
        assert_eq!(ids.len(), 5);
    }

    #[tokio::test]
    async fn returned_documents_expose_string_id() {
        let store = DocumentStore::memory();
        let id = store
            .create_document("sticker", &json!({"label": "star"}))
            .await
            .unwrap();
        let docs = store.get_documents("sticker", &Filter::new(), None).await.unwrap();
        assert_eq!(docs[0].id.to_string(), id);
        assert_eq!(Value::Object(docs[0].fields.clone()), json!({"label": "star"}));
    }

    #[tokio::test]
    async fn slow_calls_time_out() {
        let store = DocumentStore::memory().with_timeout(Duration::from_millis(10));
        let err = store
            .bounded("query", async {
                tokio::time::sleep(Duration::from_millis(200)).await;
                Ok::<_, StoreError>(())
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Timeout { operation: "query", .. }));
    }

    #[tokio::test]
    async fn memory_status_lists_collections() {
        let store = DocumentStore::memory();
        store.create_document("sticker", &json!({})).await.unwrap();
        store.create_document("calendarevent", &json!({})).await.unwrap();
        let status = store.status().await;
        assert!(status.connected);
        assert_eq!(status.collections, vec!["calendarevent", "sticker"]);
    }
}
