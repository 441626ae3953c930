use std::fmt;

use serde::{Deserialize, Serialize};

/// Distinct identifier of a message within a session controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub u64);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Author of a message in the conversation log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// Typed by the user.
    User,
    /// Produced by the backend (or a local fallback standing in for it).
    Bot,
}

/// One entry of the conversation log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Unique id.
    pub id: MessageId,
    /// Message text.
    pub text: String,
    /// Who wrote it.
    pub sender: Sender,
}

impl Message {
    /// Creates a new message.
    pub fn new(id: MessageId, text: impl Into<String>, sender: Sender) -> Self {
        Self {
            id,
            text: text.into(),
            sender,
        }
    }

    /// Returns true if the user authored this message.
    pub fn is_user(&self) -> bool {
        self.sender == Sender::User
    }

    /// Returns true if the bot authored this message.
    pub fn is_bot(&self) -> bool {
        self.sender == Sender::Bot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialization() {
        let message = Message::new(MessageId(7), "hello", Sender::User);
        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": 7, "text": "hello", "sender": "user"})
        );
    }

    #[test]
    fn sender_predicates() {
        assert!(Message::new(MessageId(1), "a", Sender::User).is_user());
        assert!(Message::new(MessageId(2), "b", Sender::Bot).is_bot());
    }
}
