//! # Jarvis Core
//!
//! Domain types, collaborator traits, and error definitions for the Jarvis
//! assistant. This crate has **no I/O of its own**: it defines the model
//! that the provider, memory, tool and dispatch crates implement against.
//!
//! ## Design Philosophy
//!
//! Every external collaborator (LLM backend, conversation store, desktop
//! effectors, reference lookup) is a trait here. Implementations live in
//! their respective crates, so the agent and the command router can be
//! exercised with scripted stand-ins.

pub mod effector;
pub mod error;
pub mod memory;
pub mod message;
pub mod provider;
pub mod role;

// Re-export key types at crate root for ergonomics
pub use effector::{Desktop, Encyclopedia, Voice};
pub use error::{ActionError, Error, MemoryError, ProviderError, ToolError};
pub use memory::ConversationStore;
pub use message::{Speaker, Turn};
pub use provider::{ChunkReceiver, Provider, ProviderRequest, ProviderResponse, StreamChunk, Usage};
pub use role::Role;
