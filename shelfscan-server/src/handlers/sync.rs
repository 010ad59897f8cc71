//! Server-Sent Events handler for catalog changes

use crate::state::{AppState, CatalogEvent, ServerEvent};
use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::Stream;
use serde_json::json;
use std::convert::Infallible;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

/// SSE endpoint for real-time updates
pub async fn sync_events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.subscribe();
    let stream = BroadcastStream::new(rx);

    let event_stream = stream.filter_map(|result| match result {
        Ok(event) => Some(Ok(to_sse(event))),
        Err(_) => None, // Lagged, skip
    });

    Sse::new(event_stream).keep_alive(KeepAlive::default())
}

fn to_sse(event: ServerEvent) -> Event {
    let at = event.at.to_rfc3339();
    let (event_type, data) = match event.change {
        CatalogEvent::BookAdded {
            id,
            title,
            position,
        } => (
            "book_added",
            json!({ "id": id, "title": title, "position": position, "at": at }),
        ),
        CatalogEvent::BookDeleted { id, title } => (
            "book_deleted",
            json!({ "id": id, "title": title, "at": at }),
        ),
        CatalogEvent::CatalogImported { count } => (
            "catalog_imported",
            json!({ "count": count, "at": at }),
        ),
        CatalogEvent::Error { message } => ("error", json!({ "message": message, "at": at })),
    };

    Event::default().event(event_type).data(data.to_string())
}
