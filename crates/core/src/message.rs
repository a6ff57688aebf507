//! Turn and Speaker domain types.
//!
//! A `Turn` is one role-tagged message in the conversation log. Its JSON
//! shape (`{"role": "user", "message": "..."}`) is the persisted format.

use serde::{Deserialize, Serialize};

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    /// The end user
    User,
    /// The AI assistant
    Assistant,
}

impl Speaker {
    /// Lowercase wire name, as stored in the log.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }

    /// Capitalized display label used in prompts and transcripts.
    pub fn label(&self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Assistant => "Assistant",
        }
    }
}

impl std::fmt::Display for Speaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recorded exchange unit. Immutable once written to the log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Speaker,
    pub message: String,
}

impl Turn {
    pub fn new(role: Speaker, message: impl Into<String>) -> Self {
        Self {
            role,
            message: message.into(),
        }
    }

    /// Create a user turn.
    pub fn user(message: impl Into<String>) -> Self {
        Self::new(Speaker::User, message)
    }

    /// Create an assistant turn.
    pub fn assistant(message: impl Into<String>) -> Self {
        Self::new(Speaker::Assistant, message)
    }
}

impl std::fmt::Display for Turn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.role.label(), self.message)
    }
}
