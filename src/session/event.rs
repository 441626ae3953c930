use std::time::Duration;

use crate::error::Error;
use crate::identifier::ChannelIdentifier;
use crate::types::{ChannelInfo, ChatRequest, ChatResponse};

/// An input to the session state machine.
///
/// Completion events carry the epoch they were issued under so that results
/// arriving after a reset can be recognized and dropped.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// The user edited the message input buffer.
    InputChanged(String),

    /// The user asked to start chatting with a channel.
    StartRequested {
        /// Raw channel reference as typed.
        reference: String,
    },

    /// The delayed startup hint fired.
    HintElapsed {
        /// Epoch the timer was scheduled under.
        epoch: u64,
    },

    /// The channel lookup finished.
    LookupCompleted {
        /// Epoch the lookup was issued under.
        epoch: u64,
        /// Metadata, or the lookup failure.
        outcome: Result<ChannelInfo, Error>,
    },

    /// The user submitted a message.
    SendRequested {
        /// Message text.
        text: String,
    },

    /// The chat exchange finished.
    ExchangeCompleted {
        /// Epoch the exchange was issued under.
        epoch: u64,
        /// Reply, or the exchange failure.
        outcome: Result<ChatResponse, Error>,
    },

    /// The user asked to leave the current channel.
    ResetRequested,
}

/// A side effect requested by [`Session::apply`](crate::session::Session::apply).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Look up channel metadata and report back with `LookupCompleted`.
    FetchChannel {
        /// Epoch to echo back.
        epoch: u64,
        /// Resolved identifier.
        identifier: ChannelIdentifier,
    },

    /// Arm the startup hint timer; report back with `HintElapsed`.
    ScheduleHint {
        /// Epoch to echo back.
        epoch: u64,
        /// How long to wait.
        delay: Duration,
    },

    /// Disarm the startup hint timer if it is armed.
    CancelHint,

    /// Send a chat turn and report back with `ExchangeCompleted`.
    SendMessage {
        /// Epoch to echo back.
        epoch: u64,
        /// Request body.
        request: ChatRequest,
    },
}
