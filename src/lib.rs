//! Client library for chatting with a backend that speaks in the style of a
//! content channel.
//!
//! The pieces, leaf first:
//!
//! - [`resolve_channel_identifier`] turns whatever the user typed into a
//!   canonical channel identifier.
//! - [`ChannelChat`] talks to the backend over HTTP.
//! - [`session`] owns the conversation: phase, message log, channel metadata
//!   and the transient loading/hint state the UI shows.
//! - [`chat`] is the terminal front end used by the `channelchat` binary.

// Public modules
pub mod chat;
pub mod client;
pub mod error;
pub mod identifier;
pub mod observability;
pub mod session;
pub mod types;

// Re-exports
pub use client::{BASE_URL_ENV, ChannelBackend, ChannelChat, DEFAULT_BASE_URL};
pub use error::{Error, Result};
pub use identifier::{ChannelIdentifier, resolve_channel_identifier};
pub use observability::register_biometrics;
pub use session::{Session, SessionController, SessionHandle, SessionPhase};
pub use types::*;
