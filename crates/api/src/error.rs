use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use social_lens_core::ingest::table::TableError;
use social_lens_core::IngestError;
use social_lens_llm::LlmError;

/// API error type, rendered as a JSON error body.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("unauthorized")]
    Unauthorized,

    #[error("unprocessable upload: {0}")]
    Upload(#[from] IngestError),

    #[error("service unavailable: {0}")]
    Unavailable(String),

    #[error("language model error: {0}")]
    Llm(#[from] LlmError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "notFound", msg.clone()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "badRequest", msg.clone()),
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                "Incorrect upload password".to_string(),
            ),
            ApiError::Upload(err) => {
                let error_type = match err {
                    IngestError::Table(_) => "invalidFile",
                    IngestError::MissingColumns(_) => "missingColumns",
                    IngestError::NoValidData { .. } => "noValidData",
                };
                (StatusCode::UNPROCESSABLE_ENTITY, error_type, upload_message(err))
            }
            ApiError::Unavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, "unavailable", msg.clone())
            }
            ApiError::Llm(err) => {
                tracing::error!("Language model error: {err}");
                (
                    StatusCode::BAD_GATEWAY,
                    "upstreamError",
                    "Failed to process chat message".to_string(),
                )
            }
            ApiError::Database(err) => {
                tracing::error!("Database error: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internalError",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": {
                "type": error_type,
                "message": message,
                "statusCode": status.as_u16(),
            }
        });

        (status, Json(body)).into_response()
    }
}

// Row-level discard counts stay internal; the uploader sees the condition only.
fn upload_message(err: &IngestError) -> String {
    match err {
        IngestError::Table(TableError::Csv(e)) => format!("Could not read file: {e}"),
        IngestError::Table(e) => capitalize(e.to_string()),
        IngestError::MissingColumns(e) => capitalize(e.to_string()),
        IngestError::NoValidData { .. } => "No valid data found in file".to_string(),
    }
}

fn capitalize(mut msg: String) -> String {
    if let Some(first) = msg.get_mut(0..1) {
        first.make_ascii_uppercase();
    }
    msg
}

/// Convenience type alias for route handlers.
pub type ApiResult<T> = Result<T, ApiError>;
