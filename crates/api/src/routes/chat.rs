use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use social_lens_core::chat::history;
use social_lens_core::chat::model::ConversationMessage;
use social_lens_core::context::select_context;
use social_lens_core::events::types::{ChatHistoryChanged, DatasetEvent};
use social_lens_llm::prompt::{build_conversation, system_prompt, HISTORY_WINDOW};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Question answering and chat log routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/chat", axum::routing::post(ask))
        .route("/v1/chat/history", get(list_history).delete(clear_history))
        .route(
            "/v1/chat/history/{id}",
            patch(edit_message).delete(delete_message),
        )
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AskRequest {
    message: String,
    /// Message URL of the record the user is looking at, if any.
    #[serde(default)]
    focused_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AskResponse {
    pub response: String,
}

#[derive(Debug, Deserialize)]
struct EditRequest {
    content: String,
}

async fn ask(State(state): State<AppState>, Json(req): Json<AskRequest>) -> ApiResult<Json<AskResponse>> {
    let question = req.message.trim();
    if question.is_empty() {
        return Err(ApiError::BadRequest("message must not be empty".into()));
    }
    let client = state.llm().ok_or_else(|| {
        ApiError::Unavailable("language model API key is not configured".into())
    })?;

    let system = {
        let dataset = state.dataset().snapshot();
        let focused = match req.focused_url.as_deref() {
            Some(url) => Some(dataset.find_by_url(url).ok_or_else(|| {
                ApiError::NotFound(format!("no record with Message URL {url}"))
            })?),
            None => None,
        };
        let context = select_context(&dataset, focused);
        system_prompt(dataset.len(), &context)
    };

    let recent = history::recent(state.pool(), HISTORY_WINDOW as i64).await?;
    let messages = build_conversation(system, &recent, question);
    let answer = client.complete(&messages).await?;

    history::append_exchange(state.pool(), question, &answer).await?;
    publish_history_changed(&state);

    Ok(Json(AskResponse { response: answer }))
}

async fn list_history(State(state): State<AppState>) -> ApiResult<Json<Vec<ConversationMessage>>> {
    Ok(Json(history::list(state.pool()).await?))
}

async fn clear_history(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let deleted = history::clear(state.pool()).await?;
    publish_history_changed(&state);
    Ok(Json(json!({ "deleted": deleted })))
}

async fn edit_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<EditRequest>,
) -> ApiResult<Json<ConversationMessage>> {
    if req.content.trim().is_empty() {
        return Err(ApiError::BadRequest("content must not be empty".into()));
    }
    let message = history::edit(state.pool(), id, &req.content)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("chat message {id}")))?;
    publish_history_changed(&state);
    Ok(Json(message))
}

async fn delete_message(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<StatusCode> {
    if !history::delete(state.pool(), id).await? {
        return Err(ApiError::NotFound(format!("chat message {id}")));
    }
    publish_history_changed(&state);
    Ok(StatusCode::NO_CONTENT)
}

fn publish_history_changed(state: &AppState) {
    state
        .event_bus()
        .publish(DatasetEvent::ChatHistoryChanged(ChatHistoryChanged {
            timestamp: Utc::now(),
        }));
}
