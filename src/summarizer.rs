//! The URL-to-text transformation: a model client bound to one external
//! fetch tool.

use std::sync::Arc;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::llm::{ChatMessage, ChatModel, GroqClient};
use crate::mcp::{FetchServer, ToolServer, ToolSession};

/// Upper bound on model round trips within one summarization.
const MAX_TOOL_ROUNDS: usize = 8;

pub struct Summarizer {
    model: Arc<dyn ChatModel>,
    tools: Arc<dyn ToolServer>,
}

impl Summarizer {
    /// Bind a Groq client and the configured fetch tool.
    ///
    /// The credential comes in as a value on `config`; construction never
    /// touches the process environment.
    pub fn new(config: &Config) -> Self {
        Summarizer {
            model: Arc::new(GroqClient::new(&config.groq_api_key, &config.model)),
            tools: Arc::new(FetchServer::new(config.fetch_command.clone())),
        }
    }

    /// Build a summarizer over explicit backends.
    pub fn with_backends(model: Arc<dyn ChatModel>, tools: Arc<dyn ToolServer>) -> Self {
        Summarizer { model, tools }
    }

    /// Summarize the content behind `url`.
    ///
    /// Opens a fetch-tool session scoped to this call, instructs the model
    /// to fetch the page and summarize it, and dispatches any tool calls the
    /// model issues until it produces a final text. The session is closed on
    /// every path; nothing carries over into the next call.
    pub async fn summarize(&self, url: &str) -> Result<String> {
        tracing::info!(url, "summarizing");

        let session = self.tools.open().await?;
        let outcome = self.run(&*session, url).await;
        session.close().await;

        outcome
    }

    /// Original text contract: any failure is rendered as an `Error: ...`
    /// string, never propagated.
    pub async fn summarize_text(&self, url: &str) -> String {
        match self.summarize(url).await {
            Ok(summary) => summary,
            Err(e) => format!("Error: {}", e),
        }
    }

    async fn run(&self, session: &dyn ToolSession, url: &str) -> Result<String> {
        let tools = session.tools();
        let mut messages = vec![ChatMessage::user(instruction(url))];

        for round in 0..MAX_TOOL_ROUNDS {
            let reply = self.model.complete(&messages, &tools).await?;

            if reply.tool_calls.is_empty() {
                return Ok(reply.text().to_string());
            }

            tracing::debug!(round, calls = reply.tool_calls.len(), "dispatching tool calls");
            let calls = reply.tool_calls.clone();
            messages.push(reply);
            for call in &calls {
                let output = session.call(&call.function.name, &call.function.arguments).await;
                messages.push(ChatMessage::tool(output, call.id.clone()));
            }
        }

        Err(AppError::Model(format!(
            "no final answer after {} tool rounds",
            MAX_TOOL_ROUNDS
        )))
    }
}

fn instruction(url: &str) -> String {
    format!(
        "Please use the fetch tool to get the content from {} and then provide a \
         comprehensive summary of what you find. Make sure to actually fetch the \
         content and summarize it, don't just show the function call.",
        url
    )
}

/// Heuristic for a reply that echoes a tool call instead of executing it.
///
/// Tied to one model family's failure mode; the web path treats a match as a
/// failed summarization and shows a generic error instead of the raw text.
pub fn contains_unexecuted_tool_call(text: &str) -> bool {
    text.contains("<function=") && text.contains("</function>")
}
