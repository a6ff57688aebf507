//! Effector and sensor traits: the narrow interfaces the command router
//! drives: opening URLs and applications, speaking text, and looking up
//! short encyclopedia summaries.

use crate::error::ToolError;
use async_trait::async_trait;

/// Desktop side effects. Fire-and-forget: success only means the request
/// was handed to the OS.
#[async_trait]
pub trait Desktop: Send + Sync {
    async fn open_url(&self, url: &str) -> Result<(), ToolError>;

    async fn launch_app(&self, app_name: &str) -> Result<(), ToolError>;
}

/// Text-to-speech (or its console stand-in).
#[async_trait]
pub trait Voice: Send + Sync {
    async fn speak(&self, text: &str);
}

/// Reference lookup returning a short plain-text summary.
#[async_trait]
pub trait Encyclopedia: Send + Sync {
    /// Summarize `query` in at most `sentences` sentences.
    async fn summary(&self, query: &str, sentences: usize) -> Result<String, ToolError>;
}
