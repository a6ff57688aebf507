//! Google Gemini provider (Generative Language REST API).
//!
//! - `models/{model}:generateContent` for one-shot calls
//! - `models/{model}:streamGenerateContent?alt=sse` for streaming
//!
//! The key travels in the `x-goog-api-key` header so it never appears in
//! request URLs or logs.

use crate::http::{client, ensure_success};
use crate::sse::SseBuffer;
use async_trait::async_trait;
use futures::StreamExt;
use jarvis_core::error::ProviderError;
use jarvis_core::provider::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

pub struct GeminiProvider {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl GeminiProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            api_key: api_key.into(),
            client: client(),
        }
    }

    /// Point at a different endpoint (proxy, regional host).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self, model: &str, method: &str) -> String {
        format!("{}/models/{}:{}", self.base_url, model, method)
    }

    fn body(request: &ProviderRequest) -> GenerateRequest {
        GenerateRequest {
            contents: vec![Content {
                role: "user".into(),
                parts: vec![Part {
                    text: request.prompt.clone(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: request.temperature,
                max_output_tokens: request.max_tokens,
            },
        }
    }

    async fn post(&self, url: &str, body: &GenerateRequest) -> Result<reqwest::Response, ProviderError> {
        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        ensure_success("gemini", response).await
    }
}

#[async_trait]
impl Provider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        debug!(model = %request.model, "Sending Gemini generateContent request");

        let url = self.endpoint(&request.model, "generateContent");
        let response = self.post(&url, &Self::body(&request)).await?;

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("Failed to parse response: {e}")))?;

        if let Some(error) = parsed.error {
            return Err(ProviderError::ApiError {
                status_code: error.code.unwrap_or(200),
                message: error.message,
            });
        }

        let text = parsed.text().ok_or_else(|| {
            let reason = parsed
                .prompt_feedback
                .and_then(|f| f.block_reason)
                .map(|r| format!("prompt blocked ({r})"))
                .unwrap_or_else(|| "no text in response".into());
            ProviderError::InvalidResponse(reason)
        })?;

        Ok(ProviderResponse {
            text,
            usage: parsed.usage_metadata.map(Usage::from),
            model: parsed.model_version.unwrap_or(request.model),
        })
    }

    async fn stream(&self, request: ProviderRequest) -> Result<ChunkReceiver, ProviderError> {
        debug!(model = %request.model, "Sending Gemini streaming request");

        let url = format!(
            "{}?alt=sse",
            self.endpoint(&request.model, "streamGenerateContent")
        );
        let response = self.post(&url, &Self::body(&request)).await?;

        let (tx, rx) = tokio::sync::mpsc::channel(64);

        tokio::spawn(async move {
            let mut byte_stream = response.bytes_stream().fuse();
            let mut buffer = SseBuffer::default();
            let mut usage = None;

            loop {
                let data = match buffer.next_data() {
                    Some(data) => data,
                    None => match byte_stream.next().await {
                        Some(Ok(bytes)) => {
                            buffer.push(&bytes);
                            continue;
                        }
                        Some(Err(e)) => {
                            let _ = tx
                                .send(Err(ProviderError::StreamInterrupted(e.to_string())))
                                .await;
                            return;
                        }
                        None => match buffer.finish() {
                            Some(data) => data,
                            None => break,
                        },
                    },
                };

                let parsed: GenerateResponse = match serde_json::from_str(&data) {
                    Ok(parsed) => parsed,
                    Err(e) => {
                        trace!(data = %data, error = %e, "Ignoring unparseable SSE chunk");
                        continue;
                    }
                };

                if let Some(error) = parsed.error {
                    let _ = tx
                        .send(Err(ProviderError::StreamInterrupted(error.message)))
                        .await;
                    return;
                }

                if let Some(meta) = parsed.usage_metadata.clone() {
                    usage = Some(Usage::from(meta));
                }

                if let Some(text) = parsed.text().filter(|t| !t.is_empty()) {
                    if tx.send(Ok(StreamChunk::text(text))).await.is_err() {
                        return; // receiver dropped
                    }
                }
            }

            let _ = tx.send(Ok(StreamChunk::finished(usage))).await;
        });

        Ok(rx)
    }

    async fn health_check(&self) -> Result<bool, ProviderError> {
        let response = self
            .client
            .get(format!("{}/models", self.base_url))
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        Ok(response.status().is_success())
    }
}

// --- Gemini API types (internal) ---

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    role: String,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens", skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
    #[serde(default)]
    model_version: Option<String>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
    #[serde(default)]
    error: Option<ApiError>,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate, if it has any parts.
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        if content.parts.is_empty() {
            return None;
        }
        Some(content.parts.iter().map(|p| p.text.as_str()).collect())
    }
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
    #[serde(default)]
    total_token_count: u32,
}

impl From<UsageMetadata> for Usage {
    fn from(u: UsageMetadata) -> Self {
        Usage {
            prompt_tokens: u.prompt_token_count,
            completion_tokens: u.candidates_token_count,
            total_tokens: u.total_token_count,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    code: Option<u16>,
    message: String,
}
