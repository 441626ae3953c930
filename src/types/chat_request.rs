use serde::{Deserialize, Serialize};

use crate::types::{Message, Sender};

/// Role of a prior turn as the chat endpoint expects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    /// A user turn.
    User,
    /// An assistant (bot) turn.
    Assistant,
}

impl std::fmt::Display for TurnRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TurnRole::User => write!(f, "user"),
            TurnRole::Assistant => write!(f, "assistant"),
        }
    }
}

impl From<Sender> for TurnRole {
    fn from(sender: Sender) -> Self {
        match sender {
            Sender::User => TurnRole::User,
            Sender::Bot => TurnRole::Assistant,
        }
    }
}

/// One prior message in the `chat_history` of a chat request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    /// Who spoke.
    pub role: TurnRole,
    /// What was said.
    pub content: String,
}

impl ChatTurn {
    /// Creates a new turn.
    pub fn new(role: TurnRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

impl From<&Message> for ChatTurn {
    fn from(message: &Message) -> Self {
        Self::new(message.sender.into(), message.text.clone())
    }
}

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The raw channel reference the user typed; the backend re-resolves it
    /// on every turn.
    pub youtube_url: String,
    /// The new user message.
    pub message: String,
    /// The whole conversation so far, including the new user message.
    #[serde(default)]
    pub chat_history: Vec<ChatTurn>,
}

impl ChatRequest {
    /// Creates a request, translating the message log into role/content turns.
    pub fn new(reference: impl Into<String>, message: impl Into<String>, log: &[Message]) -> Self {
        Self {
            youtube_url: reference.into(),
            message: message.into(),
            chat_history: log.iter().map(ChatTurn::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MessageId;

    #[test]
    fn wire_shape() {
        let log = vec![
            Message::new(MessageId(1), "Chat started", Sender::Bot),
            Message::new(MessageId(2), "hello", Sender::User),
        ];
        let request = ChatRequest::new("@SomeCreator", "hello", &log);
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "youtube_url": "@SomeCreator",
                "message": "hello",
                "chat_history": [
                    {"role": "assistant", "content": "Chat started"},
                    {"role": "user", "content": "hello"}
                ]
            })
        );
    }

    #[test]
    fn history_defaults_to_empty() {
        let request: ChatRequest =
            serde_json::from_value(serde_json::json!({"youtube_url": "x", "message": "m"}))
                .unwrap();
        assert!(request.chat_history.is_empty());
    }
}
