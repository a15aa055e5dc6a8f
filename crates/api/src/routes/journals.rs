use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Query, State},
    routing::post,
    Json, Router,
};
use lumn_core::{Document, Journal, Limit};
use serde::Deserialize;
use serde_json::Value;

use super::Created;
use crate::error::ApiResult;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/journals", post(create_journal).get(list_journals))
}

#[derive(Debug, Deserialize)]
struct ListParams {
    limit: Option<i64>,
}

async fn create_journal(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<Created>> {
    let Json(body) = payload?;
    let id = state.collections().journals.create(&body).await?;
    Ok(Json(Created { id }))
}

async fn list_journals(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> ApiResult<Json<Vec<Document<Journal>>>> {
    let Query(params) = params?;
    let limit = match params.limit {
        Some(n) => Limit::new(n)?,
        None => Limit::default(),
    };
    Ok(Json(state.collections().journals.list_journals(limit).await?))
}
