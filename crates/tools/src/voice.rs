//! Speech output.
//!
//! `SystemVoice` echoes every line to the console and then reads it aloud
//! with the platform speech command (`say` on macOS, `espeak` elsewhere).
//! If the speech command cannot be started it is disabled for the rest of
//! the session and only the console echo remains.

use async_trait::async_trait;
use jarvis_core::effector::Voice;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::process::Command;
use tracing::{debug, warn};

/// Console-only voice. Prints `Jarvis: <text>`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleVoice;

#[async_trait]
impl Voice for ConsoleVoice {
    async fn speak(&self, text: &str) {
        println!("Jarvis: {text}");
    }
}

#[derive(Debug)]
pub struct SystemVoice {
    program: String,
    available: AtomicBool,
}

impl SystemVoice {
    /// Use the platform default speech command.
    pub fn new() -> Self {
        let program = if cfg!(target_os = "macos") { "say" } else { "espeak" };
        Self::with_program(program)
    }

    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            available: AtomicBool::new(true),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn is_available(&self) -> bool {
        self.available.load(Ordering::Relaxed)
    }
}

impl Default for SystemVoice {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Voice for SystemVoice {
    async fn speak(&self, text: &str) {
        ConsoleVoice.speak(text).await;

        if text.trim().is_empty() || !self.is_available() {
            return;
        }

        // Wait for speech to finish so consecutive lines don't overlap
        match Command::new(&self.program).arg(text).status().await {
            Ok(status) if status.success() => {}
            Ok(status) => debug!(program = %self.program, code = ?status.code(), "Speech command failed"),
            Err(e) => {
                warn!(program = %self.program, error = %e, "Speech unavailable, falling back to console only");
                self.available.store(false, Ordering::Relaxed);
            }
        }
    }
}
