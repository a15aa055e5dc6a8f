use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use lumn_core::schema;
use serde_json::{json, Map, Value};

use crate::state::AppState;

/// Greeting, schema introspection and diagnostics routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/api/hello", get(hello))
        .route("/schema", get(get_schema))
        .route("/test", get(test_database))
}

async fn root() -> Json<Value> {
    Json(json!({ "message": "Lümn Note Backend Running" }))
}

async fn hello() -> Json<Value> {
    Json(json!({ "message": "Hello from Lümn Note API" }))
}

/// JSON schemas of every record kind, for the database viewer and other tools.
async fn get_schema() -> Json<Value> {
    let mut schemas = Map::new();
    let mut collections = Vec::new();
    for (collection, schema) in schema::all() {
        schemas.insert(collection.to_string(), schema.to_value());
        collections.push(collection);
    }
    Json(json!({
        "schemas": schemas,
        "collections": collections,
    }))
}

/// Connectivity diagnostics. Always succeeds; store problems are reported as data.
async fn test_database(State(state): State<AppState>) -> Json<Value> {
    let status = state.store().status().await;

    let (database, connection_status) = match (&status.error, status.connected) {
        (Some(err), _) => (format!("error: {err}"), "Not Connected"),
        (None, true) => ("connected".to_string(), "Connected"),
        (None, false) => ("not available".to_string(), "Not Connected"),
    };
    let database_url = if state.config().database_url.is_some() {
        "set"
    } else {
        "not set"
    };
    let database_name = state
        .config()
        .database_name
        .clone()
        .or(status.database_name);

    Json(json!({
        "backend": "running",
        "store": status.backend,
        "database": database,
        "database_url": database_url,
        "database_name": database_name,
        "connection_status": connection_status,
        "collections": status.collections,
        "checked_at": Utc::now(),
    }))
}
