use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Query, State},
    routing::post,
    Json, Router,
};
use lumn_core::schema::Dated;
use lumn_core::{CalendarEvent, Collection, Collections, DateQuery, Document, Drawing, Sticker};
use serde_json::Value;

use super::Created;
use crate::error::ApiResult;
use crate::state::AppState;

/// Day-scoped record kinds that share the create / list-by-date routes.
trait DayEntry: Dated {
    const PATH: &'static str;

    fn collection(collections: &Collections) -> &Collection<Self>;
}

impl DayEntry for CalendarEvent {
    const PATH: &'static str = "/api/events";

    fn collection(collections: &Collections) -> &Collection<Self> {
        &collections.events
    }
}

impl DayEntry for Sticker {
    const PATH: &'static str = "/api/stickers";

    fn collection(collections: &Collections) -> &Collection<Self> {
        &collections.stickers
    }
}

impl DayEntry for Drawing {
    const PATH: &'static str = "/api/drawings";

    fn collection(collections: &Collections) -> &Collection<Self> {
        &collections.drawings
    }
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(entry_routes::<CalendarEvent>())
        .merge(entry_routes::<Sticker>())
        .merge(entry_routes::<Drawing>())
}

fn entry_routes<E: DayEntry>() -> Router<AppState> {
    Router::new().route(E::PATH, post(create_entry::<E>).get(list_entries::<E>))
}

async fn create_entry<E: DayEntry>(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<Created>> {
    let Json(body) = payload?;
    let id = E::collection(state.collections()).create(&body).await?;
    Ok(Json(Created { id }))
}

/// `?date=YYYY-MM-DD` or `?month=YYYY-MM`; date wins when both are given.
async fn list_entries<E: DayEntry>(
    State(state): State<AppState>,
    query: Result<Query<DateQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<Document<E>>>> {
    let Query(query) = query?;
    let entries = E::collection(state.collections()).list_dated(&query).await?;
    Ok(Json(entries))
}
