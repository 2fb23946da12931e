//! Fetch-tool boundary: spawns the configured MCP server and bridges its
//! tools into [`ToolDef`]s the model can call.

use async_trait::async_trait;
use rmcp::{
    ServiceExt,
    model::{CallToolRequestParams, RawContent},
    service::{RoleClient, RunningService},
    transport::TokioChildProcess,
};
use tokio::process::Command;

use crate::config::FetchCommand;
use crate::error::{AppError, Result};
use crate::llm::ToolDef;

/// Opens tool sessions. One session covers exactly one summarization call.
#[async_trait]
pub trait ToolServer: Send + Sync {
    async fn open(&self) -> Result<Box<dyn ToolSession>>;
}

/// A live connection to a tool process.
///
/// `call` never fails: tool-side problems are reported as text so the model
/// can react to them, matching how the protocol surfaces tool errors.
#[async_trait]
pub trait ToolSession: Send + Sync {
    fn tools(&self) -> Vec<ToolDef>;

    async fn call(&self, name: &str, arguments: &str) -> String;

    async fn close(self: Box<Self>);
}

/// Production [`ToolServer`]: spawns the configured fetch command as a child
/// process and speaks MCP to it over stdio.
pub struct FetchServer {
    command: FetchCommand,
}

impl FetchServer {
    pub fn new(command: FetchCommand) -> Self {
        FetchServer { command }
    }
}

#[async_trait]
impl ToolServer for FetchServer {
    async fn open(&self) -> Result<Box<dyn ToolSession>> {
        let mut command = Command::new(&self.command.program);
        command.args(&self.command.args);

        let transport = TokioChildProcess::new(command).map_err(|e| {
            AppError::Tool(format!("failed to spawn {}: {}", self.command.program, e))
        })?;

        let peer: RunningService<RoleClient, ()> = ()
            .serve(transport)
            .await
            .map_err(|e| AppError::Tool(format!("MCP handshake failed: {}", e)))?;

        let mcp_tools = peer
            .list_all_tools()
            .await
            .map_err(|e| AppError::Tool(format!("failed to list tools: {}", e)))?;

        tracing::debug!(count = mcp_tools.len(), "fetch tool session opened");
        let tools = mcp_tools.iter().map(convert_tool).collect();

        Ok(Box::new(McpSession { peer, tools }))
    }
}

struct McpSession {
    peer: RunningService<RoleClient, ()>,
    tools: Vec<ToolDef>,
}

#[async_trait]
impl ToolSession for McpSession {
    fn tools(&self) -> Vec<ToolDef> {
        self.tools.clone()
    }

    async fn call(&self, name: &str, arguments: &str) -> String {
        let args: Option<serde_json::Map<String, serde_json::Value>> = if arguments.is_empty() {
            None
        } else {
            match serde_json::from_str(arguments) {
                Ok(v) => Some(v),
                Err(e) => return format!("invalid tool arguments: {}", e),
            }
        };

        let mut params = CallToolRequestParams::new(name.to_string());
        params.arguments = args;

        match self.peer.call_tool(params).await {
            Ok(result) => {
                if result.is_error == Some(true) {
                    format!("tool reported an error: {}", extract_text(&result.content))
                } else {
                    extract_text(&result.content)
                }
            }
            Err(e) => format!("tool call failed: {}", e),
        }
    }

    async fn close(self: Box<Self>) {
        if let Err(e) = self.peer.cancel().await {
            tracing::warn!("fetch tool shutdown failed: {}", e);
        }
    }
}

/// Convert an MCP tool definition into the chat-completions tool format.
fn convert_tool(tool: &rmcp::model::Tool) -> ToolDef {
    let parameters = serde_json::to_value(tool.input_schema.as_ref())
        .unwrap_or_else(|_| serde_json::json!({}));

    ToolDef::function(
        tool.name.as_ref(),
        tool.description.as_deref().unwrap_or_default(),
        parameters,
    )
}

/// Collect the text parts of a tool result.
fn extract_text(content: &[rmcp::model::Content]) -> String {
    content
        .iter()
        .filter_map(|c| match &c.raw {
            RawContent::Text(t) => Some(t.text.as_str()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("\n")
}
