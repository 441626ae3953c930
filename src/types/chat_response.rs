use serde::{Deserialize, Serialize};

use crate::types::ChannelInfo;

/// Reply used when the backend answers without any text.
pub const FALLBACK_REPLY: &str = "I'm not sure how to respond to that.";

/// Body returned by `POST /api/chat`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// The assistant reply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,

    /// Updated channel metadata, if the backend refreshed it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_info: Option<ChannelInfo>,

    /// Backend-side conversation id, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
}

impl ChatResponse {
    /// Creates a response carrying only a reply.
    pub fn with_reply(reply: impl Into<String>) -> Self {
        Self {
            response: Some(reply.into()),
            ..Self::default()
        }
    }

    /// Attaches channel metadata.
    pub fn with_channel_info(mut self, info: ChannelInfo) -> Self {
        self.channel_info = Some(info);
        self
    }

    /// Returns the reply text, or [`FALLBACK_REPLY`] when it is missing or empty.
    pub fn reply(&self) -> &str {
        self.response
            .as_deref()
            .filter(|reply| !reply.is_empty())
            .unwrap_or(FALLBACK_REPLY)
    }

    /// Returns the channel metadata that replaces the session's, if the
    /// backend sent any.  An empty object still counts as sent.
    pub fn updated_channel_info(&self) -> Option<&ChannelInfo> {
        self.channel_info.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_and_metadata() {
        let json = serde_json::json!({
            "conversation_id": "conv_42",
            "response": "hi there",
            "channel_info": {"title": "Some Creator", "subscriber_count": "10"}
        });
        let response: ChatResponse = serde_json::from_value(json).unwrap();
        assert_eq!(response.reply(), "hi there");
        assert_eq!(
            response.updated_channel_info().and_then(|i| i.title.as_deref()),
            Some("Some Creator")
        );
        assert_eq!(response.conversation_id.as_deref(), Some("conv_42"));
    }

    #[test]
    fn missing_reply_falls_back() {
        let response: ChatResponse = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(response.reply(), FALLBACK_REPLY);
        let response = ChatResponse::with_reply("");
        assert_eq!(response.reply(), FALLBACK_REPLY);
    }

    #[test]
    fn empty_channel_info_still_replaces() {
        let json = serde_json::json!({"response": "oops", "channel_info": {}});
        let response: ChatResponse = serde_json::from_value(json).unwrap();
        assert_eq!(response.updated_channel_info(), Some(&ChannelInfo::new()));

        let json = serde_json::json!({"response": "oops", "channel_info": null});
        let response: ChatResponse = serde_json::from_value(json).unwrap();
        assert!(response.updated_channel_info().is_none());
    }
}
