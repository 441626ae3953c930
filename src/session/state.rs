//! The session aggregate and its transition function.

use std::fmt;
use std::time::Duration;

use crate::identifier::resolve_channel_identifier;
use crate::observability::{
    SESSION_EXCHANGE_FAILURES, SESSION_EXCHANGES, SESSION_LOOKUP_FALLBACKS, SESSION_RESETS,
    SESSION_STALE_COMPLETIONS, SESSION_STARTS, SESSION_UNRESOLVED_REFERENCES,
};
use crate::session::event::{Effect, SessionEvent};
use crate::types::{ChannelInfo, ChatRequest, Message, MessageId, Sender};

/// How long a channel lookup may be pending before the wake-up hint shows.
pub const HINT_DELAY: Duration = Duration::from_millis(2500);

/// Hint shown as soon as a channel lookup starts.
pub const CONNECTING_HINT: &str = "Connecting to the server...";

/// Hint shown once a channel lookup has been pending for [`HINT_DELAY`].
pub const WAKING_HINT: &str = "This can take a few seconds if the server is waking up...";

/// Reply appended when a chat exchange fails.
pub const APOLOGY: &str =
    "Sorry, I encountered an error processing your request. Please try again.";

/// Returns the bot message that opens every session.
pub fn welcome_text(reference: &str) -> String {
    format!("Chat started with YouTube channel: {reference}. How can I help you today?")
}

/// Lifecycle phase of a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SessionPhase {
    /// No channel selected.
    #[default]
    NotStarted,
    /// Channel lookup in flight.
    Starting,
    /// Conversation open.
    Active,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionPhase::NotStarted => write!(f, "not started"),
            SessionPhase::Starting => write!(f, "starting"),
            SessionPhase::Active => write!(f, "active"),
        }
    }
}

/// Everything the UI needs to render one chat session.
///
/// The only way to change a `Session` is [`Session::apply`], so every
/// transition updates phase, log, metadata, input buffer and hint together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    phase: SessionPhase,
    reference: String,
    channel_info: Option<ChannelInfo>,
    messages: Vec<Message>,
    input: String,
    loading: bool,
    hint: Option<String>,
    conversation_id: Option<String>,
    epoch: u64,
    next_message_id: u64,
    hint_delay: Duration,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(HINT_DELAY)
    }
}

impl Session {
    /// Creates a session that has not started, with the given wake-up hint delay.
    pub fn new(hint_delay: Duration) -> Self {
        Self {
            phase: SessionPhase::NotStarted,
            reference: String::new(),
            channel_info: None,
            messages: Vec::new(),
            input: String::new(),
            loading: false,
            hint: None,
            conversation_id: None,
            epoch: 0,
            next_message_id: 1,
            hint_delay,
        }
    }

    /// Returns the current phase.
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Returns the raw channel reference the session was started with.
    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// Returns the channel metadata, if any.
    pub fn channel_info(&self) -> Option<&ChannelInfo> {
        self.channel_info.as_ref()
    }

    /// Returns the conversation log in order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Returns the message input buffer.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Returns true while a lookup or exchange is in flight.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Returns the startup hint text, if one should be displayed.
    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    /// Returns the latest backend conversation id, if any.
    pub fn conversation_id(&self) -> Option<&str> {
        self.conversation_id.as_deref()
    }

    /// Returns the session generation; it changes on every reset.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Returns true if a new message may be sent now.
    pub fn can_send(&self) -> bool {
        self.phase == SessionPhase::Active && !self.loading
    }

    /// Applies one event and returns the side effects it requires.
    ///
    /// Events that are not valid in the current state are ignored and yield
    /// no effects.
    pub fn apply(&mut self, event: SessionEvent) -> Vec<Effect> {
        match event {
            SessionEvent::InputChanged(text) => {
                self.input = text;
                Vec::new()
            }
            SessionEvent::StartRequested { reference } => self.start(reference),
            SessionEvent::HintElapsed { epoch } => {
                if epoch == self.epoch && self.phase == SessionPhase::Starting {
                    self.hint = Some(WAKING_HINT.to_string());
                }
                Vec::new()
            }
            SessionEvent::LookupCompleted { epoch, outcome } => {
                if epoch != self.epoch || self.phase != SessionPhase::Starting {
                    SESSION_STALE_COMPLETIONS.click();
                    tracing::debug!(epoch, current = self.epoch, "dropping stale lookup");
                    return Vec::new();
                }
                let info = match outcome {
                    Ok(info) => info,
                    Err(err) => {
                        SESSION_LOOKUP_FALLBACKS.click();
                        tracing::warn!(
                            reference = %self.reference,
                            error = %err,
                            "channel lookup failed; using reference as title"
                        );
                        ChannelInfo::with_title(self.reference.clone())
                    }
                };
                self.loading = false;
                self.hint = None;
                self.activate(info);
                vec![Effect::CancelHint]
            }
            SessionEvent::SendRequested { text } => self.send(text),
            SessionEvent::ExchangeCompleted { epoch, outcome } => {
                if epoch != self.epoch || self.phase != SessionPhase::Active || !self.loading {
                    SESSION_STALE_COMPLETIONS.click();
                    tracing::debug!(epoch, current = self.epoch, "dropping stale reply");
                    return Vec::new();
                }
                let reply = match outcome {
                    Ok(response) => {
                        if let Some(info) = response.updated_channel_info() {
                            self.channel_info = Some(info.clone());
                        }
                        if response.conversation_id.is_some() {
                            self.conversation_id = response.conversation_id.clone();
                        }
                        response.reply().to_string()
                    }
                    Err(err) => {
                        SESSION_EXCHANGE_FAILURES.click();
                        tracing::warn!(error = %err, "chat exchange failed");
                        APOLOGY.to_string()
                    }
                };
                self.push(reply, Sender::Bot);
                self.loading = false;
                Vec::new()
            }
            SessionEvent::ResetRequested => self.reset(),
        }
    }

    fn start(&mut self, reference: String) -> Vec<Effect> {
        if self.phase != SessionPhase::NotStarted || reference.trim().is_empty() {
            return Vec::new();
        }
        SESSION_STARTS.click();
        self.reference = reference;
        match resolve_channel_identifier(&self.reference) {
            None => {
                SESSION_UNRESOLVED_REFERENCES.click();
                tracing::info!(reference = %self.reference, "unrecognized channel URL; skipping lookup");
                let info = ChannelInfo::with_title(self.reference.clone());
                self.activate(info);
                Vec::new()
            }
            Some(identifier) => {
                tracing::debug!(identifier = %identifier, epoch = self.epoch, "starting session");
                self.phase = SessionPhase::Starting;
                self.loading = true;
                self.hint = Some(CONNECTING_HINT.to_string());
                vec![
                    Effect::ScheduleHint {
                        epoch: self.epoch,
                        delay: self.hint_delay,
                    },
                    Effect::FetchChannel {
                        epoch: self.epoch,
                        identifier,
                    },
                ]
            }
        }
    }

    fn activate(&mut self, info: ChannelInfo) {
        self.channel_info = Some(info);
        self.phase = SessionPhase::Active;
        self.messages.clear();
        let welcome = welcome_text(&self.reference);
        self.push(welcome, Sender::Bot);
    }

    fn send(&mut self, text: String) -> Vec<Effect> {
        if !self.can_send() || text.trim().is_empty() {
            return Vec::new();
        }
        SESSION_EXCHANGES.click();
        self.push(text.clone(), Sender::User);
        self.input.clear();
        self.loading = true;
        let request = ChatRequest::new(self.reference.clone(), text, &self.messages);
        vec![Effect::SendMessage {
            epoch: self.epoch,
            request,
        }]
    }

    fn reset(&mut self) -> Vec<Effect> {
        if self.phase == SessionPhase::NotStarted {
            return Vec::new();
        }
        SESSION_RESETS.click();
        self.phase = SessionPhase::NotStarted;
        self.reference.clear();
        self.channel_info = None;
        self.messages.clear();
        self.input.clear();
        self.loading = false;
        self.hint = None;
        self.conversation_id = None;
        self.epoch += 1;
        vec![Effect::CancelHint]
    }

    fn push(&mut self, text: String, sender: Sender) {
        let id = MessageId(self.next_message_id);
        self.next_message_id += 1;
        self.messages.push(Message::new(id, text, sender));
    }
}
