//! Provider router: builds the configured LLM provider.

use crate::gemini::GeminiProvider;
use crate::openai_compat::OpenAiCompatProvider;
use jarvis_config::{AppConfig, ConfigError};
use jarvis_core::provider::Provider;
use std::sync::Arc;

/// Build the provider named by `config.provider`.
///
/// Fails with `ConfigError::MissingApiKey` before any client is created if
/// no credential is configured.
pub fn build_from_config(config: &AppConfig) -> Result<Arc<dyn Provider>, ConfigError> {
    let api_key = config.require_api_key()?;

    let provider: Arc<dyn Provider> = match config.provider.as_str() {
        "gemini" | "google" => {
            let mut p = GeminiProvider::new(api_key);
            if let Some(url) = &config.api_url {
                p = p.with_base_url(url);
            }
            Arc::new(p)
        }
        name => {
            let base_url = match &config.api_url {
                Some(url) => url.clone(),
                None => default_base_url(name).ok_or_else(|| {
                    ConfigError::ValidationError(format!(
                        "unknown provider '{name}': set api_url to use a custom endpoint"
                    ))
                })?,
            };
            Arc::new(OpenAiCompatProvider::new(name, base_url, api_key))
        }
    };

    tracing::debug!(provider = provider.name(), model = %config.model, "Provider built");
    Ok(provider)
}

/// Get the default base URL for well-known OpenAI-compatible providers.
fn default_base_url(provider_name: &str) -> Option<String> {
    let url = match provider_name {
        "openai" => "https://api.openai.com/v1",
        "openrouter" => "https://openrouter.ai/api/v1",
        "ollama" => "http://localhost:11434/v1",
        "deepseek" => "https://api.deepseek.com/v1",
        "groq" => "https://api.groq.com/openai/v1",
        "together" => "https://api.together.xyz/v1",
        "vllm" => "http://localhost:8000/v1",
        "llamacpp" | "llama.cpp" => "http://localhost:8080/v1",
        _ => return None,
    };
    Some(url.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(provider: &str, key: Option<&str>) -> AppConfig {
        AppConfig {
            provider: provider.into(),
            api_key: key.map(String::from),
            ..AppConfig::default()
        }
    }

    #[test]
    fn missing_key_fails_fast() {
        let result = build_from_config(&config_with("gemini", None));
        assert!(matches!(result, Err(ConfigError::MissingApiKey)));
    }

    #[test]
    fn builds_gemini_by_default() {
        let provider = build_from_config(&config_with("gemini", Some("gm-key"))).unwrap();
        assert_eq!(provider.name(), "gemini");
    }

    #[test]
    fn builds_openai_compatible() {
        let provider = build_from_config(&config_with("groq", Some("gsk"))).unwrap();
        assert_eq!(provider.name(), "groq");
    }

    #[test]
    fn unknown_provider_needs_url() {
        assert!(build_from_config(&config_with("acme", Some("k"))).is_err());

        let mut config = config_with("acme", Some("k"));
        config.api_url = Some("https://llm.acme.internal/v1".into());
        assert_eq!(build_from_config(&config).unwrap().name(), "acme");
    }

    #[test]
    fn default_base_urls() {
        assert!(default_base_url("openai").unwrap().contains("api.openai.com"));
        assert!(default_base_url("ollama").unwrap().contains("localhost:11434"));
        assert!(default_base_url("nope").is_none());
    }
}
