//! Interactive terminal front end for channel chat.
//!
//! The REPL drives a [`crate::SessionHandle`] and renders the snapshots it
//! publishes:
//!
//! - Picking a channel, with startup hints while the backend wakes up
//! - A header with the channel's title, avatar and subscriber count
//! - Slash commands for search, health checks and transcripts
//!
//! # Architecture
//!
//! - [`config`]: CLI argument parsing and configuration
//! - [`commands`]: Slash command parsing
//! - [`render`]: Terminal output

mod commands;
mod config;
mod render;

pub use commands::{ChatCommand, help_text, parse_command};
pub use config::{ChatArgs, ChatConfig, ChatConfigFile};
pub use render::{
    DEFAULT_AVATAR, DEFAULT_TITLE, PlainTextRenderer, Renderer, avatar_initial, channel_summary,
    display_title, format_subscriber_count,
};
