use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use crate::error::{AppError, Result};

pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

const DEFAULT_FETCH_COMMAND: &str = "python -m mcp_server_fetch";

/// The fetch-tool invocation: a program plus its arguments.
///
/// Only the invocation is configured here; the tool speaks MCP over stdio
/// once spawned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl FetchCommand {
    /// Split a command line on whitespace into program + args.
    pub fn parse(spec: &str) -> Result<Self> {
        let mut parts = spec.split_whitespace().map(str::to_string);
        let program = parts
            .next()
            .ok_or_else(|| AppError::Config("FETCH_COMMAND is empty".to_string()))?;

        Ok(FetchCommand {
            program,
            args: parts.collect(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_addr: SocketAddr,
    pub groq_api_key: String,
    pub model: String,
    pub fetch_command: FetchCommand,
}

impl Config {
    /// Load configuration from the environment (and `.env` if present).
    ///
    /// A missing credential fails here, before any request machinery is
    /// built.
    pub fn load() -> Result<Self> {
        // Load environment variables from .env file if it exists
        dotenv::dotenv().ok();

        let groq_api_key = env::var("GROQ_API_KEY").map_err(|_| {
            AppError::Config(
                "GROQ_API_KEY not found in environment. Please set it in your .env file"
                    .to_string(),
            )
        })?;

        Self::with_api_key(groq_api_key)
    }

    /// Build a configuration with an explicitly supplied credential.
    ///
    /// The credential is threaded through as a value; the process
    /// environment is never mutated.
    pub fn with_api_key(groq_api_key: impl Into<String>) -> Result<Self> {
        let groq_api_key = groq_api_key.into();
        if groq_api_key.is_empty() {
            return Err(AppError::Config("GROQ_API_KEY is empty".to_string()));
        }

        let model = env::var("GROQ_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let fetch_spec =
            env::var("FETCH_COMMAND").unwrap_or_else(|_| DEFAULT_FETCH_COMMAND.to_string());
        let fetch_command = FetchCommand::parse(&fetch_spec)?;

        // Server configuration with defaults
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT").unwrap_or_else(|_| "3000".to_string());
        let port = port
            .parse::<u16>()
            .map_err(|e| AppError::Config(format!("Invalid port: {}", e)))?;
        let ip = IpAddr::from_str(&host)
            .map_err(|e| AppError::Config(format!("Invalid host address: {}", e)))?;

        Ok(Config {
            server_addr: SocketAddr::new(ip, port),
            groq_api_key,
            model,
            fetch_command,
        })
    }
}
