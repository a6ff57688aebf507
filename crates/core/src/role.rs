//! Assistant personas selectable per request.
//!
//! A role only shapes the prompt of the request that used it; it is never
//! stored alongside a turn.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[default]
    Tutor,
    Coder,
    Mentor,
    /// A name outside the known set. Contributes no persona text.
    Unknown(String),
}

impl Role {
    /// The known personas, in menu order.
    pub const KNOWN: [Role; 3] = [Role::Tutor, Role::Coder, Role::Mentor];

    /// Resolve a role by name, case-insensitively. Never fails.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "tutor" => Self::Tutor,
            "coder" => Self::Coder,
            "mentor" => Self::Mentor,
            _ => Self::Unknown(name.trim().to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Tutor => "Tutor",
            Self::Coder => "Coder",
            Self::Mentor => "Mentor",
            Self::Unknown(name) => name,
        }
    }

    /// Persona text injected into the prompt. Empty for unknown roles.
    pub fn persona(&self) -> &'static str {
        match self {
            Self::Tutor => {
                "You are acting as a Tutor. Explain concepts step by step with examples."
            }
            Self::Coder => "You are acting as a Coding Assistant. Be concise and code-focused.",
            Self::Mentor => {
                "You are acting as a Career Mentor. Give realistic and actionable advice."
            }
            Self::Unknown(_) => "",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Role {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_name(s))
    }
}
