use serde_json::{Map, Value};
use sqlx::migrate::Migrator;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::StoreError;
use crate::document::id::DocumentId;
use crate::document::model::StoredDocument;
use crate::filter::{Condition, Filter};

/// Schema migrations for the `documents` table.
pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

const TABLE: &str = "documents";

/// PostgreSQL backend. All collections share one JSONB `documents` table;
/// ids come from `gen_random_uuid()`.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(
        &self,
        collection: &str,
        fields: Map<String, Value>,
    ) -> Result<DocumentId, StoreError> {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO documents (collection, content)
            VALUES ($1, $2)
            RETURNING id
            "#,
        )
        .bind(collection)
        .bind(Json(Value::Object(fields)))
        .fetch_one(&self.pool)
        .await
        .map_err(|source| StoreError::Write {
            collection: collection.to_string(),
            source,
        })?;

        Ok(id.into())
    }

    pub async fn find(
        &self,
        collection: &str,
        filter: &Filter,
        limit: Option<usize>,
    ) -> Result<Vec<StoredDocument>, StoreError> {
        let mut query = select_query(collection, filter, limit);
        let rows: Vec<(Uuid, Json<Value>)> = query
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(|source| StoreError::Query {
                collection: collection.to_string(),
                source,
            })?;

        rows.into_iter()
            .map(|(id, Json(content))| match content {
                Value::Object(fields) => Ok(StoredDocument::new(id.into(), fields)),
                other => Err(StoreError::Decode {
                    collection: collection.to_string(),
                    message: format!("expected object, found {other}"),
                }),
            })
            .collect()
    }

    pub async fn database_name(&self) -> Result<String, StoreError> {
        sqlx::query_scalar("SELECT current_database()::text")
            .fetch_one(&self.pool)
            .await
            .map_err(|source| StoreError::Query {
                collection: TABLE.to_string(),
                source,
            })
    }

    pub async fn collection_names(&self, limit: usize) -> Result<Vec<String>, StoreError> {
        sqlx::query_scalar(
            "SELECT DISTINCT collection FROM documents ORDER BY collection LIMIT $1",
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|source| StoreError::Query {
            collection: TABLE.to_string(),
            source,
        })
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Build the SELECT for one collection. String matches compare the text value
/// and require a JSON string; other exact matches compare JSONB values. Prefix
/// matches use `starts_with`, so user input is never interpreted as a pattern.
fn select_query<'a>(
    collection: &'a str,
    filter: &'a Filter,
    limit: Option<usize>,
) -> QueryBuilder<'a, Postgres> {
    let mut query = QueryBuilder::new("SELECT id, content FROM documents WHERE collection = ");
    query.push_bind(collection);

    for (field, condition) in filter.conditions() {
        query.push(" AND ");
        match condition {
            Condition::Equals(Value::String(text)) => {
                push_field(&mut query, "->>", field);
                query.push(" = ");
                query.push_bind(text.as_str());
                query.push(" AND jsonb_typeof(");
                push_field(&mut query, "->", field);
                query.push(") = 'string'");
            }
            Condition::Equals(value) => {
                push_field(&mut query, "->", field);
                query.push(" = ");
                query.push_bind(Json(value.clone()));
            }
            Condition::StartsWith(prefix) => {
                query.push("starts_with(");
                push_field(&mut query, "->>", field);
                query.push(", ");
                query.push_bind(prefix.as_str());
                query.push(")");
            }
        }
    }

    query.push(" ORDER BY seq");
    if let Some(limit) = limit {
        query.push(" LIMIT ");
        query.push_bind(i64::try_from(limit).unwrap_or(i64::MAX));
    }
    query
}

/// Plain field names are inlined so expression indexes like
/// `(content ->> 'date')` apply; anything else is bound as a parameter.
fn push_field<'a>(query: &mut QueryBuilder<'a, Postgres>, operator: &str, field: &'a str) {
    query.push("(content ").push(operator).push(" ");
    if is_plain_field(field) {
        query.push("'").push(field).push("'");
    } else {
        query.push_bind(field);
    }
    query.push(")");
}

fn is_plain_field(field: &str) -> bool {
    !field.is_empty() && field.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::DocumentStore;
    use serde_json::json;

    #[test]
    fn unfiltered_select() {
        let filter = Filter::new();
        let query = select_query("journal", &filter, Some(50));
        assert_eq!(
            query.sql(),
            "SELECT id, content FROM documents WHERE collection = $1 ORDER BY seq LIMIT $2"
        );
    }

    #[test]
    fn exact_and_prefix_conditions() {
        let filter = Filter::new()
            .equals("journal_id", "j1")
            .starts_with("date", "2024-03");
        let query = select_query("journalpage", &filter, None);
        assert_eq!(
            query.sql(),
            "SELECT id, content FROM documents WHERE collection = $1 \
             AND (content ->> 'journal_id') = $2 \
             AND jsonb_typeof((content -> 'journal_id')) = 'string' \
             AND starts_with((content ->> 'date'), $3) ORDER BY seq"
        );
    }

    #[test]
    fn non_string_values_compare_as_jsonb() {
        let filter = Filter::new().equals("font_size", 16);
        let query = select_query("journalpage", &filter, None);
        assert_eq!(
            query.sql(),
            "SELECT id, content FROM documents WHERE collection = $1 \
             AND (content -> 'font_size') = $2 ORDER BY seq"
        );
    }

    #[test]
    fn unusual_field_names_are_bound() {
        let filter = Filter::new().equals("x') OR 1=1 --", 1);
        let query = select_query("sticker", &filter, None);
        assert_eq!(
            query.sql(),
            "SELECT id, content FROM documents WHERE collection = $1 \
             AND (content -> $2) = $3 ORDER BY seq"
        );
    }

    #[test]
    fn prefix_input_never_reaches_sql_text() {
        let filter = Filter::new().starts_with("date", "2024'); DROP TABLE documents; --");
        let query = select_query("sticker", &filter, None);
        assert!(!query.sql().contains("DROP"));
    }

    /// Requires a PostgreSQL instance: `TEST_DATABASE_URL=postgres://... cargo test -- --ignored`
    #[tokio::test]
    #[ignore = "requires TEST_DATABASE_URL"]
    async fn postgres_round_trip() {
        let url = std::env::var("TEST_DATABASE_URL").expect("TEST_DATABASE_URL must be set");
        let pool = PgPool::connect(&url).await.unwrap();
        MIGRATOR.run(&pool).await.unwrap();
        let store = DocumentStore::postgres(pool);

        let collection = format!("test_{}", Uuid::now_v7().simple());
        let first = store
            .create_document(&collection, &json!({"date": "2024-03-05", "title": "a"}))
            .await
            .unwrap();
        store
            .create_document(&collection, &json!({"date": "2024-04-01", "title": "b"}))
            .await
            .unwrap();

        let march = store
            .get_documents(&collection, &Filter::new().starts_with("date", "2024-03"), None)
            .await
            .unwrap();
        assert_eq!(march.len(), 1);
        assert_eq!(march[0].id.to_string(), first);

        let on_day = store
            .get_documents(&collection, &Filter::new().equals("date", "2024-04-01"), None)
            .await
            .unwrap();
        assert_eq!(on_day.len(), 1);
        assert_eq!(on_day[0].fields["title"], json!("b"));

        let all = store.get_documents(&collection, &Filter::new(), None).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].fields["title"], json!("a"));

        store.close().await;
    }
}
