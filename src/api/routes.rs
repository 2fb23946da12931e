use axum::{
    Router,
    extract::{Json, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
};
use chrono::Utc;
use tower_http::cors::{Any, CorsLayer};

use crate::AppState;
use crate::api::models::{SummarizeRequest, SummarizeResponse};
use crate::api::response;
use crate::error::AppError;
use crate::summarizer::contains_unexecuted_tool_call;

const INDEX_HTML: &str = include_str!("../../static/index.html");

const GENERIC_FAILURE: &str = "Failed to process URL. Please try again.";

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/summarize", post(summarize_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(app_state)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn summarize_handler(
    State(state): State<AppState>,
    Json(req): Json<SummarizeRequest>,
) -> impl IntoResponse {
    // Presentation-layer validation: rejected requests never reach the
    // summarizer, so no tool process is spawned and no network call is made.
    let url = req.url.trim();
    if url.is_empty() {
        return response::error(StatusCode::BAD_REQUEST, "Please enter a URL.");
    }
    if !has_http_scheme(url) {
        return response::error(
            StatusCode::BAD_REQUEST,
            "Please enter a valid URL starting with http:// or https://",
        );
    }

    tracing::info!(url, model = %state.config.model, "processing summarize request");

    match state.summarizer.summarize(url).await {
        Ok(summary) if contains_unexecuted_tool_call(&summary) => {
            tracing::warn!(url, "model echoed a tool call instead of executing it");
            response::error(StatusCode::BAD_GATEWAY, GENERIC_FAILURE)
        }
        Ok(summary) => response::success(SummarizeResponse {
            url: url.to_string(),
            summary,
            summarized_at: Utc::now(),
        }),
        Err(err) => {
            tracing::error!(url, error = %err, "summarization failed");
            let status = match &err {
                AppError::Config(_) | AppError::Model(_) => StatusCode::INTERNAL_SERVER_ERROR,
                AppError::Network(_) | AppError::Tool(_) => StatusCode::BAD_GATEWAY,
            };
            response::error(status, err.to_string())
        }
    }
}

fn has_http_scheme(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, FetchCommand};
    use crate::error::Result;
    use crate::llm::{ChatMessage, ChatModel, ToolDef};
    use crate::mcp::{ToolServer, ToolSession};
    use crate::summarizer::Summarizer;
    use async_trait::async_trait;
    use axum::response::Response;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    /// Backends that must never be reached: reaching one fails the test.
    struct UnreachableModel;

    #[async_trait]
    impl ChatModel for UnreachableModel {
        async fn complete(
            &self,
            _messages: &[ChatMessage],
            _tools: &[ToolDef],
        ) -> Result<ChatMessage> {
            panic!("model backend must not be called");
        }
    }

    struct UnreachableTools;

    #[async_trait]
    impl ToolServer for UnreachableTools {
        async fn open(&self) -> Result<Box<dyn ToolSession>> {
            panic!("tool backend must not be called");
        }
    }

    /// A model that immediately answers with a fixed final text.
    struct FixedModel(String);

    #[async_trait]
    impl ChatModel for FixedModel {
        async fn complete(
            &self,
            _messages: &[ChatMessage],
            _tools: &[ToolDef],
        ) -> Result<ChatMessage> {
            Ok(ChatMessage::assistant(self.0.clone()))
        }
    }

    struct EmptyTools;

    #[async_trait]
    impl ToolServer for EmptyTools {
        async fn open(&self) -> Result<Box<dyn ToolSession>> {
            Ok(Box::new(EmptySession))
        }
    }

    struct EmptySession;

    #[async_trait]
    impl ToolSession for EmptySession {
        fn tools(&self) -> Vec<ToolDef> {
            Vec::new()
        }

        async fn call(&self, _name: &str, _arguments: &str) -> String {
            String::new()
        }

        async fn close(self: Box<Self>) {}
    }

    fn test_config() -> Config {
        Config {
            server_addr: "127.0.0.1:0".parse().unwrap(),
            groq_api_key: "test-key".to_string(),
            model: "test-model".to_string(),
            fetch_command: FetchCommand::parse("true").unwrap(),
        }
    }

    fn state_with(summarizer: Summarizer) -> AppState {
        AppState {
            config: Arc::new(test_config()),
            summarizer: Arc::new(summarizer),
        }
    }

    async fn call_handler(state: AppState, url: &str) -> Response {
        summarize_handler(
            State(state),
            Json(SummarizeRequest {
                url: url.to_string(),
            }),
        )
        .await
        .into_response()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn rejects_url_without_http_scheme_before_any_backend_call() {
        let state = state_with(Summarizer::with_backends(
            Arc::new(UnreachableModel),
            Arc::new(UnreachableTools),
        ));

        let response = call_handler(state, "ftp://example.com").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn rejects_empty_url_before_any_backend_call() {
        let state = state_with(Summarizer::with_backends(
            Arc::new(UnreachableModel),
            Arc::new(UnreachableTools),
        ));

        let response = call_handler(state, "   ").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["meta"]["status"], "error");
        assert!(body["data"].is_null());
    }

    #[tokio::test]
    async fn returns_summary_with_source_echo() {
        let state = state_with(Summarizer::with_backends(
            Arc::new(FixedModel("A useful summary.".to_string())),
            Arc::new(EmptyTools),
        ));

        let response = call_handler(state, "https://example.com/article").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["data"]["summary"], "A useful summary.");
        assert_eq!(body["data"]["url"], "https://example.com/article");
        assert_eq!(body["meta"]["status"], "success");
    }

    #[tokio::test]
    async fn degenerate_output_is_replaced_by_generic_failure() {
        let raw = "<function=fetch{\"url\": \"https://example.com\"}</function>";
        let state = state_with(Summarizer::with_backends(
            Arc::new(FixedModel(raw.to_string())),
            Arc::new(EmptyTools),
        ));

        let response = call_handler(state, "https://example.com").await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let body = body_json(response).await;
        assert_eq!(body["meta"]["message"], GENERIC_FAILURE);
        // The raw tool-call text never reaches the client.
        assert!(!body.to_string().contains("<function="));
    }

    #[tokio::test]
    async fn backend_errors_map_to_gateway_status() {
        struct FailingModel;

        #[async_trait]
        impl ChatModel for FailingModel {
            async fn complete(
                &self,
                _messages: &[ChatMessage],
                _tools: &[ToolDef],
            ) -> Result<ChatMessage> {
                Err(crate::error::AppError::Tool("fetch tool died".to_string()))
            }
        }

        let state = state_with(Summarizer::with_backends(
            Arc::new(FailingModel),
            Arc::new(EmptyTools),
        ));

        let response = call_handler(state, "https://example.com").await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn scheme_check_accepts_both_http_and_https() {
        assert!(has_http_scheme("http://example.com"));
        assert!(has_http_scheme("https://example.com"));
        assert!(!has_http_scheme("example.com"));
        assert!(!has_http_scheme("file:///etc/passwd"));
    }

    #[test]
    fn index_page_embeds_the_form() {
        assert!(INDEX_HTML.contains("id=\"summarize-form\""));
        assert!(INDEX_HTML.contains("https://example.com/article"));
    }
}
