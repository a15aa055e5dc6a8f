use serde::Serialize;

use super::query::DateQuery;
use super::{Collections, Result};
use crate::document::model::Document;
use crate::schema::{CalendarEvent, Drawing, JournalPage, Sticker};

/// Everything recorded for one calendar day.
///
/// Built from four independent reads; the view is not a point-in-time
/// snapshot when writes race with it.
#[derive(Debug, Clone, Serialize)]
pub struct DayView {
    pub date: String,
    pub page: Option<Document<JournalPage>>,
    pub events: Vec<Document<CalendarEvent>>,
    pub stickers: Vec<Document<Sticker>>,
    pub drawings: Vec<Document<Drawing>>,
}

impl Collections {
    /// Compose the day view for `date`. Drawings come back with their full
    /// point sequences. Any failing read fails the whole view.
    pub async fn day(&self, date: &str, journal_id: Option<&str>) -> Result<DayView> {
        let journal_id = journal_id.filter(|id| !id.is_empty());
        let on_day = DateQuery::on(date);

        let (page, events, stickers, drawings) = tokio::try_join!(
            self.pages.page_for_day(date, journal_id),
            self.events.list_dated(&on_day),
            self.stickers.list_dated(&on_day),
            self.drawings.list_dated(&on_day),
        )?;

        tracing::debug!(
            date,
            has_page = page.is_some(),
            events = events.len(),
            stickers = stickers.len(),
            drawings = drawings.len(),
            "day composed"
        );

        Ok(DayView {
            date: date.to_string(),
            page,
            events,
            stickers,
            drawings,
        })
    }
}
