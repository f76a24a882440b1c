use std::convert::Infallible;

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
    Router,
};
use futures::stream::{self, Stream, StreamExt};
use social_lens_core::events::types::DatasetEvent;
use tokio::sync::broadcast::error::RecvError;

use crate::state::AppState;

/// Server-sent event stream of dataset and chat changes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/events", get(subscribe))
}

async fn subscribe(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.event_bus().subscribe();
    tracing::debug!(
        subscribers = state.event_bus().subscriber_count(),
        "event stream opened"
    );

    let updates = stream::unfold(rx, |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(event) => return Some((event, rx)),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "event stream subscriber lagged");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });

    let events = stream::once(async { DatasetEvent::Welcome })
        .chain(updates)
        .map(|event| Ok::<_, Infallible>(to_sse(&event)));

    Sse::new(events).keep_alive(KeepAlive::default())
}

fn to_sse(event: &DatasetEvent) -> Event {
    let name = match event {
        DatasetEvent::Welcome => "welcome",
        DatasetEvent::DatasetReplaced(_) => "datasetReplaced",
        DatasetEvent::ChatHistoryChanged(_) => "chatHistoryChanged",
    };
    Event::default()
        .event(name)
        .json_data(event)
        .unwrap_or_else(|_| Event::default().event(name))
}

