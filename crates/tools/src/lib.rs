//! Built-in effectors for Jarvis.
//!
//! These are the concrete implementations of the `Desktop`, `Voice` and
//! `Encyclopedia` traits the command router drives: opening URLs and
//! applications through the OS, speaking text with the platform TTS
//! command (or printing it), and short Wikipedia summaries.

pub mod desktop;
pub mod search;
pub mod voice;
pub mod wikipedia;

pub use desktop::SystemDesktop;
pub use search::search_url;
pub use voice::{ConsoleVoice, SystemVoice};
pub use wikipedia::WikipediaEncyclopedia;
