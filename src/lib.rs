pub mod api;
pub mod config;
pub mod error;
pub mod llm;
pub mod mcp;
pub mod summarizer;

use std::sync::Arc;

use config::Config;
use summarizer::Summarizer;

/// Application state shared across handlers.
///
/// The summarizer is constructed once at startup and reused for the whole
/// server session; it is read-only after construction.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub summarizer: Arc<Summarizer>,
}
