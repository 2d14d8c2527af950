//! Role-tagged chat messages exchanged with the model backend.
//!
//! The conversation history is an ordered sequence of these messages.
//! The wire representation matches what chat-completion APIs expect:
//! lowercase role strings and plain string content.

use serde::{Deserialize, Serialize};

/// The author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The fixed session instruction. Always the first history entry.
    System,
    /// Prompts, world feedback, corrective messages, and human hints.
    User,
    /// Raw model responses, valid or not, recorded verbatim.
    Assistant,
}

/// One message in the conversation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Who authored the message.
    pub role: Role,
    /// The message text, recorded verbatim.
    pub content: String,
}

impl ChatMessage {
    /// Build a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// Build a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Build an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_serialize_lowercase() {
        let msg = ChatMessage::system("You are Ava.");
        let json = serde_json::to_string(&msg).unwrap_or_default();
        assert_eq!(json, r#"{"role":"system","content":"You are Ava."}"#);
    }

    #[test]
    fn roles_deserialize_lowercase() {
        let raw = r#"{"role":"assistant","content":"{}"}"#;
        let msg: Result<ChatMessage, _> = serde_json::from_str(raw);
        assert_eq!(msg.ok().map(|m| m.role), Some(Role::Assistant));
    }
}
