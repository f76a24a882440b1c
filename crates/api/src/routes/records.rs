use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use social_lens_core::analytics::{summarize, AnalyticsSummary};
use social_lens_core::NormalizedRecord;

use crate::state::AppState;

/// Read-only views over the active dataset.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/records", get(list_records))
        .route("/v1/analytics", get(analytics))
}

#[derive(Debug, Default, Deserialize)]
struct Page {
    limit: Option<usize>,
    offset: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecordsPage {
    pub total: usize,
    pub records: Vec<NormalizedRecord>,
}

/// Records, most recent first.
async fn list_records(State(state): State<AppState>, Query(page): Query<Page>) -> Json<RecordsPage> {
    let dataset = state.dataset().snapshot();
    let records = dataset
        .records()
        .iter()
        .skip(page.offset.unwrap_or(0))
        .take(page.limit.unwrap_or(usize::MAX))
        .cloned()
        .collect();
    Json(RecordsPage {
        total: dataset.len(),
        records,
    })
}

async fn analytics(State(state): State<AppState>) -> Json<AnalyticsSummary> {
    Json(summarize(&state.dataset().snapshot()))
}
