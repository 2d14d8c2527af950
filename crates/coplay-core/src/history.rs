//! The append-only conversation history.
//!
//! The history is the engine's only channel to the model: every prompt,
//! every raw response (valid or not), every corrective message, and
//! every human hint lands here in order and is never rewritten or
//! dropped. Each model call receives the entire history, which is what
//! lets a stateless chat backend carry session continuity.

use coplay_types::{ChatMessage, Role};

/// An ordered, append-only sequence of chat messages.
///
/// The first entry is always the system instruction; the type offers no
/// way to remove or edit entries after the fact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationHistory {
    messages: Vec<ChatMessage>,
}

impl ConversationHistory {
    /// Start a history with the session's system instruction.
    pub fn new(system_instruction: impl Into<String>) -> Self {
        Self {
            messages: vec![ChatMessage::system(system_instruction)],
        }
    }

    /// Append a user message (state prompts, feedback, correctives).
    pub fn user(&mut self, content: impl Into<String>) {
        self.messages.push(ChatMessage::user(content));
    }

    /// Append a raw model response, verbatim, valid or not.
    pub fn assistant(&mut self, content: impl Into<String>) {
        self.messages.push(ChatMessage::assistant(content));
    }

    /// Append a human hint as a user message. Blank hints are skipped.
    pub fn hint(&mut self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        self.messages.push(ChatMessage::user(format!("Hint from Ben: {text}")));
    }

    /// The full message sequence, oldest first.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Number of messages, including the system instruction.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Never true: the system instruction is always present.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The most recent message with the given role, if any.
    pub fn last_with_role(&self, role: Role) -> Option<&ChatMessage> {
        self.messages.iter().rev().find(|m| m.role == role)
    }
}
