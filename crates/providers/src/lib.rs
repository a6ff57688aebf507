//! LLM Provider implementations for Jarvis.
//!
//! All providers implement the `jarvis_core::Provider` trait.
//! The router builds the configured provider, and [`GenerationBackend`]
//! wraps it with the degrade-to-text policy the assistant relies on.

pub mod backend;
pub mod gemini;
mod http;
pub mod openai_compat;
pub mod router;
mod sse;

pub use backend::{GenerationBackend, TextStream, inline_error};
pub use gemini::GeminiProvider;
pub use openai_compat::OpenAiCompatProvider;
pub use router::build_from_config;
