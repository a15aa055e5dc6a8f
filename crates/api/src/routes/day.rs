use axum::{
    extract::{rejection::PathRejection, rejection::QueryRejection, Path, Query, State},
    routing::get,
    Json, Router,
};
use lumn_core::DayView;
use serde::Deserialize;

use crate::error::ApiResult;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/day/{date}", get(get_day))
}

#[derive(Debug, Deserialize)]
struct DayParams {
    journal_id: Option<String>,
}

async fn get_day(
    State(state): State<AppState>,
    date: Result<Path<String>, PathRejection>,
    params: Result<Query<DayParams>, QueryRejection>,
) -> ApiResult<Json<DayView>> {
    let Path(date) = date?;
    let Query(params) = params?;
    let day = state
        .collections()
        .day(&date, params.journal_id.as_deref())
        .await?;
    Ok(Json(day))
}
