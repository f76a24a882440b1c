use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    routing::post,
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use social_lens_core::events::types::{DatasetEvent, DatasetReplaced};
use social_lens_core::ingest::pipeline::run_pipeline;
use social_lens_core::record::store;
use social_lens_core::{IngestError, RawTable};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Header carrying the shared upload password.
pub const PASSWORD_HEADER: &str = "x-upload-password";

/// Upload routes. Each upload fully replaces the active dataset.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/dataset/csv", post(upload_csv))
        .route("/v1/dataset/json", post(upload_json))
}

#[derive(Debug, Deserialize)]
struct JsonUpload {
    posts: Vec<Value>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub records: usize,
}

async fn upload_csv(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<UploadResponse>> {
    check_password(&state, &headers)?;
    let table = RawTable::from_csv(&body).map_err(IngestError::from)?;
    adopt(&state, table).await
}

async fn upload_json(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(upload): Json<JsonUpload>,
) -> ApiResult<Json<UploadResponse>> {
    check_password(&state, &headers)?;
    let table = RawTable::from_json_rows(&upload.posts).map_err(IngestError::from)?;
    adopt(&state, table).await
}

// Not a security boundary; a shared string kept out of casual reach.
fn check_password(state: &AppState, headers: &HeaderMap) -> ApiResult<()> {
    let supplied = headers
        .get(PASSWORD_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if supplied == state.config().upload_password {
        Ok(())
    } else {
        Err(ApiError::Unauthorized)
    }
}

/// Normalize, persist, then swap. Any failure leaves the active dataset as it was.
async fn adopt(state: &AppState, table: RawTable) -> ApiResult<Json<UploadResponse>> {
    let _upload = state.upload_lock().lock().await;

    let output = run_pipeline(&table)?;
    store::replace_dataset(state.pool(), &output.dataset).await?;

    let records = output.dataset.len();
    state.dataset().replace(output.dataset);
    state
        .event_bus()
        .publish(DatasetEvent::DatasetReplaced(DatasetReplaced {
            records,
            timestamp: Utc::now(),
        }));

    tracing::info!(
        records,
        discarded = output.discards.len(),
        "active dataset replaced"
    );
    Ok(Json(UploadResponse { records }))
}
