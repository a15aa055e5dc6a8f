use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Query, State},
    routing::post,
    Json, Router,
};
use lumn_core::{Document, JournalPage, PageQuery};
use serde_json::Value;

use super::Created;
use crate::error::ApiResult;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/pages", post(create_page).get(get_page))
}

async fn create_page(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<Created>> {
    let Json(body) = payload?;
    let id = state.collections().pages.create(&body).await?;
    Ok(Json(Created { id }))
}

/// Exactly one page for the `(journal_id, date)` pair, or 404.
async fn get_page(
    State(state): State<AppState>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResult<Json<Document<JournalPage>>> {
    let Query(query) = query?;
    let (journal_id, date) = query.require()?;
    let page = state.collections().pages.get_page(&journal_id, &date).await?;
    Ok(Json(page))
}
