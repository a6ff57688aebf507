//! Prompt assembly.
//!
//! Section order is fixed: system persona, role persona, conversation
//! history (`"<Speaker>: <message>"`, one per line, in log order), the new
//! user input, and an assistant cue. History is included verbatim with no
//! truncation, so prompt size grows with the log.

use jarvis_core::message::Turn;
use jarvis_core::role::Role;

pub const SYSTEM_PERSONA: &str = "You are JARVIS, a smart, professional, and helpful personal AI assistant. \
     You answer clearly, accurately, and efficiently.";

#[derive(Debug, Clone)]
pub struct PromptBuilder {
    system_prompt: String,
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self {
            system_prompt: SYSTEM_PERSONA.to_string(),
        }
    }

    /// Assemble the prompt. Pure: same inputs give byte-identical output.
    pub fn build(&self, user_input: &str, history: &[Turn], role: &Role) -> String {
        let history_block = history
            .iter()
            .map(Turn::to_string)
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "SYSTEM:\n{system}\n\n\
             ROLE:\n{role}\n\n\
             CONVERSATION HISTORY:\n{history_block}\n\n\
             USER:\n{user_input}\n\n\
             ASSISTANT:",
            system = self.system_prompt,
            role = role.persona(),
        )
    }
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new()
    }
}
