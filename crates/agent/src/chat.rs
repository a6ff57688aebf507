//! The chat agent: prompt builder + generation backend + conversation store.

use crate::prompt::PromptBuilder;
use crate::response_stream::ResponseStream;
use jarvis_core::error::MemoryError;
use jarvis_core::memory::ConversationStore;
use jarvis_core::message::{Speaker, Turn};
use jarvis_core::role::Role;
use jarvis_providers::GenerationBackend;
use std::sync::Arc;
use tracing::{debug, info};

pub struct ChatAgent {
    backend: GenerationBackend,
    prompts: PromptBuilder,
    store: Arc<dyn ConversationStore>,
}

impl ChatAgent {
    pub fn new(backend: GenerationBackend, store: Arc<dyn ConversationStore>) -> Self {
        Self {
            backend,
            prompts: PromptBuilder::new(),
            store,
        }
    }

    pub fn backend(&self) -> &GenerationBackend {
        &self.backend
    }

    async fn prompt_for(&self, input: &str, role: &Role) -> String {
        let history = self.store.history().await;
        debug!(turns = history.len(), role = %role, "Building prompt");
        self.prompts.build(input, &history, role)
    }

    /// Answer `input` in one piece and record the exchange.
    ///
    /// An inline generation error is recorded like any other reply. Only a
    /// failure to persist the log is returned as an error.
    pub async fn respond(&self, input: &str, role: &Role) -> Result<String, MemoryError> {
        let prompt = self.prompt_for(input, role).await;
        let reply = self.backend.generate(&prompt).await;

        self.store.append(Speaker::User, input).await?;
        self.store.append(Speaker::Assistant, &reply).await?;
        info!(role = %role, chars = reply.len(), "Exchange recorded");

        Ok(reply)
    }

    /// Answer `input` as a stream of fragments.
    ///
    /// The exchange is recorded only after the stream has been polled to
    /// completion. See [`ResponseStream`].
    pub async fn respond_stream(&self, input: &str, role: &Role) -> ResponseStream {
        let prompt = self.prompt_for(input, role).await;
        let fragments = self.backend.generate_stream(&prompt).await;
        ResponseStream::new(fragments, Arc::clone(&self.store), input.to_string())
    }

    pub async fn clear_memory(&self) -> Result<(), MemoryError> {
        self.store.clear().await
    }

    pub async fn history(&self) -> Vec<Turn> {
        self.store.history().await
    }
}
