use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

#[derive(Serialize)]
pub struct ErrorResponse {
    error: String,
}

/// Failure kinds surfaced by the summarization pipeline.
///
/// Callers that need the original "always returns text" contract go through
/// [`crate::summarizer::Summarizer::summarize_text`], which renders any of
/// these as an `Error: ...` string.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("fetch tool error: {0}")]
    Tool(String),

    #[error("model error: {0}")]
    Model(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::Config(_) | AppError::Model(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Network(_) | AppError::Tool(_) => StatusCode::BAD_GATEWAY,
        };

        let body = Json(ErrorResponse {
            error: self.to_string(),
        });

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
