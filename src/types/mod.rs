// Public modules
pub mod backend;
pub mod channel_info;
pub mod chat_request;
pub mod chat_response;
pub mod message;

// Re-exports
pub use backend::{ChannelSearchParams, Conversation, DEFAULT_SEARCH_RESULTS, HealthStatus};
pub use channel_info::ChannelInfo;
pub use chat_request::{ChatRequest, ChatTurn, TurnRole};
pub use chat_response::{ChatResponse, FALLBACK_REPLY};
pub use message::{Message, MessageId, Sender};
