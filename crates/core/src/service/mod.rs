//! Collection services: the store adapter bound to one record kind.

pub mod day;
pub mod query;

use std::fmt;
use std::marker::PhantomData;

use serde_json::Value;
use thiserror::Error;

use crate::document::model::Document;
use crate::document::validate::ValidationError;
use crate::filter::Filter;
use crate::schema::{CalendarEvent, Dated, Drawing, Journal, JournalPage, Record, Sticker};
use crate::store::{DocumentStore, StoreError};

pub use day::DayView;
pub use query::{DateQuery, Limit, PageQuery};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, ServiceError>;

/// Create and query operations for the collection of one record kind.
pub struct Collection<R> {
    store: DocumentStore,
    _record: PhantomData<fn() -> R>,
}

impl<R> Clone for Collection<R> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            _record: PhantomData,
        }
    }
}

impl<R: Record> fmt::Debug for Collection<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collection")
            .field("name", &R::COLLECTION)
            .field("store", &self.store.backend_name())
            .finish()
    }
}

impl<R: Record> Collection<R> {
    pub fn new(store: DocumentStore) -> Self {
        Self {
            store,
            _record: PhantomData,
        }
    }

    pub fn name(&self) -> &'static str {
        R::COLLECTION
    }

    /// Validate `input` and insert it. Invalid input never reaches the store.
    pub async fn create(&self, input: &Value) -> Result<String> {
        let record = R::validate(input)?;
        let id = self.store.create_document(self.name(), &record).await?;
        tracing::info!(collection = self.name(), %id, "record created");
        Ok(id)
    }

    pub async fn list(&self, filter: &Filter, limit: Option<usize>) -> Result<Vec<Document<R>>> {
        let docs = self.store.get_documents(self.name(), filter, limit).await?;
        docs.into_iter()
            .map(|doc| {
                doc.decode().map_err(|e| {
                    ServiceError::Store(StoreError::Decode {
                        collection: self.name().to_string(),
                        message: e.to_string(),
                    })
                })
            })
            .collect()
    }

    pub async fn find_one(&self, filter: &Filter) -> Result<Option<Document<R>>> {
        Ok(self.list(filter, Some(1)).await?.into_iter().next())
    }
}

impl Collection<Journal> {
    pub async fn list_journals(&self, limit: Limit) -> Result<Vec<Document<Journal>>> {
        self.list(&Filter::new(), Some(limit.get())).await
    }
}

impl Collection<JournalPage> {
    /// The page of `journal_id` on `date`. Absence is an error.
    pub async fn get_page(&self, journal_id: &str, date: &str) -> Result<Document<JournalPage>> {
        let filter = Filter::new().equals("journal_id", journal_id).equals("date", date);
        self.find_one(&filter)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Page not found".to_string()))
    }

    /// The first page on `date`, restricted to `journal_id` when one is given.
    pub async fn page_for_day(
        &self,
        date: &str,
        journal_id: Option<&str>,
    ) -> Result<Option<Document<JournalPage>>> {
        let mut filter = Filter::new();
        if let Some(journal_id) = journal_id {
            filter = filter.equals("journal_id", journal_id);
        }
        self.find_one(&filter.equals("date", date)).await
    }
}

impl<R: Dated> Collection<R> {
    /// Uncapped listing by exact date, else month prefix, else everything.
    pub async fn list_dated(&self, query: &DateQuery) -> Result<Vec<Document<R>>> {
        self.list(&query.filter(), None).await
    }
}

/// One service per record kind over a shared store.
#[derive(Debug, Clone)]
pub struct Collections {
    pub journals: Collection<Journal>,
    pub pages: Collection<JournalPage>,
    pub events: Collection<CalendarEvent>,
    pub stickers: Collection<Sticker>,
    pub drawings: Collection<Drawing>,
}

impl Collections {
    pub fn new(store: DocumentStore) -> Self {
        Self {
            journals: Collection::new(store.clone()),
            pages: Collection::new(store.clone()),
            events: Collection::new(store.clone()),
            stickers: Collection::new(store.clone()),
            drawings: Collection::new(store),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn collections() -> Collections {
        Collections::new(DocumentStore::memory())
    }

    #[tokio::test]
    async fn journal_round_trip_with_defaults() {
        let c = collections();
        let id = c.journals.create(&json!({"title": "Travel"})).await.unwrap();
        let journals = c.journals.list_journals(Limit::default()).await.unwrap();
        assert_eq!(journals.len(), 1);
        assert_eq!(journals[0].id, id);
        assert_eq!(journals[0].record.title, "Travel");
        assert_eq!(journals[0].record.cover_style, "pastel-pink");
        assert_eq!(journals[0].record.paper_style, "dotted");
    }

    #[tokio::test]
    async fn journal_limit_caps_results() {
        let c = collections();
        for title in ["a", "b", "c"] {
            c.journals.create(&json!({"title": title})).await.unwrap();
        }
        let one = c.journals.list_journals(Limit::new(1).unwrap()).await.unwrap();
        assert_eq!(one.len(), 1);
        assert_eq!(one[0].record.title, "a");
    }

    #[tokio::test]
    async fn invalid_input_is_not_stored() {
        let store = DocumentStore::memory();
        let c = Collections::new(store.clone());
        let err = c
            .pages
            .create(&json!({"journal_id": "j1", "date": "2024-05-01", "font_size": 65}))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        let stored = store
            .get_documents("journalpage", &Filter::new(), None)
            .await
            .unwrap();
        assert!(stored.is_empty());
    }

    #[tokio::test]
    async fn page_lookup_by_journal_and_date() {
        let c = collections();
        c.pages
            .create(&json!({"journal_id": "j1", "date": "2024-05-01", "content": "hello"}))
            .await
            .unwrap();
        c.pages
            .create(&json!({"journal_id": "j2", "date": "2024-05-01", "content": "other"}))
            .await
            .unwrap();

        let page = c.pages.get_page("j2", "2024-05-01").await.unwrap();
        assert_eq!(page.record.content, "other");
        assert_eq!(page.record.font_size, 16);
    }

    #[tokio::test]
    async fn missing_page_is_not_found() {
        let c = collections();
        c.pages
            .create(&json!({"journal_id": "j1", "date": "2024-05-01"}))
            .await
            .unwrap();
        let err = c.pages.get_page("j1", "2024-05-02").await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn events_date_month_precedence() {
        let c = collections();
        let march = c
            .events
            .create(&json!({"date": "2024-03-05", "title": "Dentist"}))
            .await
            .unwrap();
        let april = c
            .events
            .create(&json!({"date": "2024-04-01", "title": "Trip"}))
            .await
            .unwrap();

        let by_month = c.events.list_dated(&DateQuery::in_month("2024-03")).await.unwrap();
        assert_eq!(by_month.iter().map(|d| &d.id).collect::<Vec<_>>(), vec![&march]);

        let by_date = c.events.list_dated(&DateQuery::on("2024-03-05")).await.unwrap();
        assert_eq!(by_date.iter().map(|d| &d.id).collect::<Vec<_>>(), vec![&march]);

        let both = DateQuery {
            date: Some("2024-04-01".into()),
            month: Some("2024-03".into()),
        };
        let date_wins = c.events.list_dated(&both).await.unwrap();
        assert_eq!(date_wins.iter().map(|d| &d.id).collect::<Vec<_>>(), vec![&april]);

        let all = c.events.list_dated(&DateQuery::default()).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn sticker_and_drawing_round_trip() {
        let c = collections();
        c.stickers
            .create(&json!({"date": "2024-05-01", "label": "sun", "x": 0.25, "y": 0.75}))
            .await
            .unwrap();
        c.drawings
            .create(&json!({
                "date": "2024-05-01",
                "tool": "brush",
                "points": [{"x": 0.1, "y": 0.2, "p": 0.5}, {"x": 0.3, "y": 0.4}],
            }))
            .await
            .unwrap();

        let stickers = c.stickers.list_dated(&DateQuery::on("2024-05-01")).await.unwrap();
        assert_eq!(
            stickers[0].record,
            Sticker {
                date: "2024-05-01".into(),
                category: "decor".into(),
                label: "sun".into(),
                x: 0.25,
                y: 0.75,
                size: 1.0,
            }
        );

        let drawings = c.drawings.list_dated(&DateQuery::in_month("2024-05")).await.unwrap();
        assert_eq!(drawings[0].record.tool, "brush");
        assert_eq!(drawings[0].record.points.len(), 2);
        assert_eq!(drawings[0].record.points[0].p, Some(0.5));
        assert_eq!(drawings[0].record.points[1].p, None);
    }

    #[tokio::test]
    async fn store_errors_propagate() {
        let c = Collections::new(DocumentStore::disconnected());
        let err = c.events.create(&json!({"date": "d", "title": "t"})).await.unwrap_err();
        assert!(matches!(err, ServiceError::Store(StoreError::Unavailable)));
        let err = c.events.list_dated(&DateQuery::default()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Store(StoreError::Unavailable)));
    }
}
