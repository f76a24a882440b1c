pub mod chat;
pub mod dataset;
pub mod events;
pub mod health;
pub mod records;

use axum::{extract::DefaultBodyLimit, Router};
use tower_http::limit::RequestBodyLimitLayer;

use crate::state::AppState;

/// Assemble the full router with all route groups.
pub fn build_router(state: AppState) -> Router {
    let max_body = state.config().max_upload_bytes;
    Router::new()
        .merge(health::routes())
        .merge(dataset::routes())
        .merge(records::routes())
        .merge(chat::routes())
        .merge(events::routes())
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_body))
        .with_state(state)
}
