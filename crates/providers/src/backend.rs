//! The generation layer: one-shot and streamed text from the configured
//! provider, with every failure turned into inline text.
//!
//! Callers never see a `ProviderError`. A failed call yields a single
//! string starting with [`ERROR_MARKER`], which flows through the chat path
//! like any other assistant reply.

use crate::router::build_from_config;
use futures::stream::{self, BoxStream, StreamExt};
use jarvis_config::{AppConfig, ConfigError};
use jarvis_core::error::ProviderError;
use jarvis_core::provider::{ChunkReceiver, Provider, ProviderRequest, Usage};
use std::sync::Arc;
use tracing::{debug, warn};

/// Prefix of every inline error reply.
pub const ERROR_MARKER: &str = "⚠️";

/// A finite, single-pass sequence of non-empty text fragments.
pub type TextStream = BoxStream<'static, String>;

/// Render a provider failure as user-visible text.
pub fn inline_error(provider: &str, err: &ProviderError) -> String {
    format!("{ERROR_MARKER} {provider} error: {err}")
}

pub struct GenerationBackend {
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
}

impl GenerationBackend {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: 0.7,
            max_tokens: None,
        }
    }

    /// Build from configuration. Fails immediately when no API key is set.
    pub fn from_config(config: &AppConfig) -> Result<Self, ConfigError> {
        let provider = build_from_config(config)?;
        Ok(Self::new(provider, &config.model)
            .with_temperature(config.temperature)
            .with_max_tokens(config.max_tokens))
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn provider(&self) -> &Arc<dyn Provider> {
        &self.provider
    }

    fn request(&self, prompt: &str) -> ProviderRequest {
        ProviderRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }

    /// Generate a full reply, surfacing provider failures.
    ///
    /// Used where the caller reacts to failure itself (the structured
    /// action path) instead of showing the error as a reply.
    pub async fn try_generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let response = self.provider.complete(self.request(prompt)).await?;
        log_usage(self.provider.name(), response.usage.as_ref());
        Ok(response.text.trim().to_string())
    }

    /// Generate a full reply. Never fails: errors come back as inline text.
    pub async fn generate(&self, prompt: &str) -> String {
        match self.try_generate(prompt).await {
            Ok(text) => text,
            Err(e) => {
                warn!(provider = self.provider.name(), error = %e, "Generation failed");
                inline_error(self.provider.name(), &e)
            }
        }
    }

    /// Stream a reply as it is produced.
    ///
    /// Empty fragments are dropped. If the call fails to start or breaks
    /// part-way, the stream yields one inline error fragment and ends.
    pub async fn generate_stream(&self, prompt: &str) -> TextStream {
        let name = self.provider.name().to_string();
        match self.provider.stream(self.request(prompt)).await {
            Ok(rx) => fragments(name, rx),
            Err(e) => {
                warn!(provider = %name, error = %e, "Streaming generation failed to start");
                stream::once(async move { inline_error(&name, &e) }).boxed()
            }
        }
    }
}

/// Adapt a provider chunk channel into a text stream.
fn fragments(provider: String, rx: ChunkReceiver) -> TextStream {
    stream::unfold(Some(rx), move |state| {
        let provider = provider.clone();
        async move {
            let mut rx = state?;
            loop {
                match rx.recv().await? {
                    Ok(chunk) => {
                        if chunk.done {
                            log_usage(&provider, chunk.usage.as_ref());
                        }
                        let next = if chunk.done { None } else { Some(rx) };
                        match chunk.content {
                            Some(text) if !text.is_empty() => return Some((text, next)),
                            _ => match next {
                                Some(again) => rx = again,
                                None => return None,
                            },
                        }
                    }
                    Err(e) => {
                        warn!(provider = %provider, error = %e, "Stream interrupted");
                        return Some((inline_error(&provider, &e), None));
                    }
                }
            }
        }
    })
    .boxed()
}

fn log_usage(provider: &str, usage: Option<&Usage>) {
    if let Some(u) = usage {
        debug!(
            provider,
            prompt_tokens = u.prompt_tokens,
            completion_tokens = u.completion_tokens,
            total_tokens = u.total_tokens,
            "Token usage"
        );
    }
}
