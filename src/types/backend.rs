//! Request and response bodies of the backend's auxiliary endpoints.

use serde::{Deserialize, Serialize};

use crate::types::ChatTurn;

/// Default number of results for a channel search.
pub const DEFAULT_SEARCH_RESULTS: u32 = 5;

/// Body of `POST /api/search`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelSearchParams {
    /// Channel name or URL to search for.
    pub query: String,
    /// Maximum number of channels to return.
    pub max_results: u32,
}

impl ChannelSearchParams {
    /// Creates search parameters with the default result limit.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            max_results: DEFAULT_SEARCH_RESULTS,
        }
    }

    /// Sets the result limit.
    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = max_results;
        self
    }
}

/// Body returned by `GET /api/health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    /// `"ok"` when the backend is serving.
    pub status: String,
    /// Backend version.
    #[serde(default)]
    pub version: Option<String>,
    /// `"development"` or `"production"`.
    #[serde(default)]
    pub environment: Option<String>,
}

impl HealthStatus {
    /// Returns true if the backend reports itself healthy.
    pub fn is_ok(&self) -> bool {
        self.status.eq_ignore_ascii_case("ok")
    }
}

/// Body returned by `GET /api/conversations/{id}`: the backend's own record
/// of a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    /// Conversation id.
    pub conversation_id: String,
    /// Turns recorded by the backend.
    #[serde(default)]
    pub messages: Vec<ChatTurn>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TurnRole;

    #[test]
    fn search_params_default_limit() {
        let params = ChannelSearchParams::new("neetcode");
        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            serde_json::json!({"query": "neetcode", "max_results": 5})
        );
        assert_eq!(params.with_max_results(2).max_results, 2);
    }

    #[test]
    fn health() {
        let health: HealthStatus = serde_json::from_value(serde_json::json!({
            "status": "ok", "version": "1.0.0", "environment": "production"
        }))
        .unwrap();
        assert!(health.is_ok());
        assert_eq!(health.version.as_deref(), Some("1.0.0"));
    }

    #[test]
    fn conversation() {
        let conversation: Conversation = serde_json::from_value(serde_json::json!({
            "conversation_id": "conv_1",
            "messages": [{"role": "user", "content": "hi"}, {"role": "assistant", "content": "yo"}]
        }))
        .unwrap();
        assert_eq!(conversation.messages.len(), 2);
        assert_eq!(conversation.messages[1].role, TurnRole::Assistant);
    }
}
