//! The conversational agent: the chat side of Jarvis.
//!
//! Each request follows the same path:
//!
//! 1. **Build** the prompt (system persona + role persona + full history + input)
//! 2. **Generate** via the configured backend, whole or streamed
//! 3. **Record** the user turn and the assistant turn, in that order
//!
//! Streamed replies are only recorded once the stream has been driven to
//! its end; a consumer that stops early leaves the log untouched.

pub mod chat;
pub mod prompt;
pub mod response_stream;

pub use chat::ChatAgent;
pub use prompt::{PromptBuilder, SYSTEM_PERSONA};
pub use response_stream::ResponseStream;
