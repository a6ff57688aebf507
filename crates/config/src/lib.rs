//! Configuration loading, validation, and management for Jarvis.
//!
//! Loads configuration from `~/.jarvis/config.toml`, then a `.env` file in
//! the working directory, then environment variable overrides. The API key
//! is validated once, at startup, through [`AppConfig::require_api_key`].

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variables consulted for the API key, highest priority first.
pub const API_KEY_VARS: [&str; 4] = [
    "JARVIS_API_KEY",
    "GEMINI_API_KEY",
    "GENAI_API_KEY",
    "OPENAI_API_KEY",
];

/// The root configuration structure.
///
/// Maps directly to `~/.jarvis/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key for the LLM provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// LLM provider ("gemini", "openai", "openrouter", "ollama", ...)
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Model identifier passed to the provider
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL override for the provider endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Max tokens per LLM response
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Conversation memory configuration
    #[serde(default)]
    pub memory: MemoryConfig,

    /// Voice assistant configuration
    #[serde(default)]
    pub voice: VoiceConfig,
}

fn default_provider() -> String {
    "gemini".into()
}
fn default_model() -> String {
    "gemini-2.5-flash".into()
}
fn default_temperature() -> f32 {
    0.7
}

fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("api_url", &self.api_url)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("memory", &self.memory)
            .field("voice", &self.voice)
            .finish()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Path of the JSON conversation log. Defaults to `~/.jarvis/memory.json`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl MemoryConfig {
    pub fn resolved_path(&self) -> PathBuf {
        self.path
            .clone()
            .unwrap_or_else(|| AppConfig::config_dir().join("memory.json"))
    }
}

/// How spoken output is produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TtsBackend {
    /// The platform speech synthesizer (`say`, `espeak`, SAPI)
    #[default]
    System,
    /// Print to the terminal only
    Console,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceConfig {
    #[serde(default)]
    pub tts: TtsBackend,

    /// Search engine prefix; the query is appended as the `q` parameter
    #[serde(default = "default_search_url")]
    pub search_url: String,

    /// Sentences to read back from an encyclopedia lookup
    #[serde(default = "default_lookup_sentences")]
    pub lookup_sentences: usize,

    /// Wikipedia language edition
    #[serde(default = "default_lookup_language")]
    pub lookup_language: String,

    /// Applications the assistant may launch beyond the built-in table
    #[serde(default)]
    pub allowed_apps: Vec<String>,
}

fn default_search_url() -> String {
    "https://www.google.com/search".into()
}
fn default_lookup_sentences() -> usize {
    2
}
fn default_lookup_language() -> String {
    "en".into()
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            tts: TtsBackend::default(),
            search_url: default_search_url(),
            lookup_sentences: default_lookup_sentences(),
            lookup_language: default_lookup_language(),
            allowed_apps: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.jarvis/config.toml).
    ///
    /// A `.env` file in the working directory is read first (existing
    /// environment variables win). Then environment variables override:
    /// - API key: see [`API_KEY_VARS`]
    /// - `JARVIS_PROVIDER`, `JARVIS_MODEL`, `JARVIS_MEMORY_PATH`
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!("Loaded environment from {}", path.display());
        }

        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides using the given lookup.
    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if self.api_key.as_deref().is_none_or(|k| k.trim().is_empty()) {
            self.api_key = API_KEY_VARS
                .iter()
                .find_map(|var| lookup(var).filter(|v| !v.trim().is_empty()));
        }

        if let Some(provider) = lookup("JARVIS_PROVIDER") {
            self.provider = provider;
        }

        if let Some(model) = lookup("JARVIS_MODEL") {
            self.model = model;
        }

        if let Some(path) = lookup("JARVIS_MEMORY_PATH") {
            self.memory.path = Some(PathBuf::from(path));
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".jarvis")
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::ValidationError(
                "temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.model.trim().is_empty() {
            return Err(ConfigError::ValidationError("model must not be empty".into()));
        }

        if self.voice.lookup_sentences == 0 {
            return Err(ConfigError::ValidationError(
                "voice.lookup_sentences must be at least 1".into(),
            ));
        }

        Ok(())
    }

    /// The API key, or `MissingApiKey` if it is absent or blank.
    ///
    /// This is the single fail-fast credential check; nothing that talks
    /// to an LLM is constructed without passing through it.
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        match self.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(ConfigError::MissingApiKey),
        }
    }

    /// Generate a default config TOML string (for `onboard` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            provider: default_provider(),
            model: default_model(),
            api_url: None,
            temperature: default_temperature(),
            max_tokens: None,
            memory: MemoryConfig::default(),
            voice: VoiceConfig::default(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),

    #[error("No API key configured (set one of {})", API_KEY_VARS.join(", "))]
    MissingApiKey,
}
