use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch};

use crate::client::ChannelBackend;
use crate::error::{Error, Result};
use crate::session::event::{Effect, SessionEvent};
use crate::session::state::{Session, SessionPhase};
use crate::session::timer::HintTimer;

/// Drives a [`Session`]: feeds it events one at a time, runs the effects it
/// asks for, and publishes every new state.
///
/// Network calls and the hint timer run as separate tasks that post their
/// completion back into the controller's queue, so the session itself is only
/// ever touched by the controller.
pub struct SessionController<B: ChannelBackend + 'static> {
    backend: Arc<B>,
    session: Session,
    hint_timer: Option<HintTimer>,
    events: mpsc::UnboundedReceiver<SessionEvent>,
    sends: mpsc::UnboundedReceiver<SendRequest>,
    feedback: mpsc::WeakUnboundedSender<SessionEvent>,
    state: watch::Sender<Session>,
}

/// A message submitted through a handle, answered once the session has
/// accepted or ignored it.
#[derive(Debug)]
struct SendRequest {
    text: String,
    accepted: oneshot::Sender<bool>,
}

impl<B: ChannelBackend + 'static> SessionController<B> {
    /// Creates a controller and the handle used to talk to it.
    ///
    /// The controller does nothing until [`SessionController::run`] is awaited
    /// (or events are fed with [`SessionController::dispatch`]).
    pub fn new(backend: Arc<B>, hint_delay: Duration) -> (Self, SessionHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        let (send_tx, send_rx) = mpsc::unbounded_channel();
        let session = Session::new(hint_delay);
        let (state_tx, state_rx) = watch::channel(session.clone());
        let controller = Self {
            backend,
            session,
            hint_timer: None,
            events: rx,
            sends: send_rx,
            feedback: tx.downgrade(),
            state: state_tx,
        };
        let handle = SessionHandle {
            events: tx,
            sends: send_tx,
            state: state_rx,
        };
        (controller, handle)
    }

    /// Creates a controller, spawns it on the current runtime, and returns its handle.
    pub fn spawn(backend: Arc<B>, hint_delay: Duration) -> SessionHandle {
        let (controller, handle) = Self::new(backend, hint_delay);
        tokio::spawn(controller.run());
        handle
    }

    /// Processes events until every handle and in-flight task is gone.
    pub async fn run(mut self) {
        let mut sends_open = true;
        loop {
            tokio::select! {
                event = self.events.recv() => match event {
                    Some(event) => self.dispatch(event),
                    None => break,
                },
                request = self.sends.recv(), if sends_open => match request {
                    Some(request) => self.dispatch_send(request),
                    None => sends_open = false,
                },
            }
        }
        self.hint_timer = None;
        tracing::debug!("session controller stopped");
    }

    /// Applies one event, runs its effects, and publishes the resulting state.
    pub fn dispatch(&mut self, event: SessionEvent) {
        self.apply(event);
    }

    fn dispatch_send(&mut self, request: SendRequest) {
        let accepted = self.apply(SessionEvent::SendRequested { text: request.text });
        if !accepted {
            tracing::debug!(epoch = self.session.epoch(), "send ignored by session");
        }
        let _ = request.accepted.send(accepted);
    }

    // Returns true if the event asked for any side effect.
    fn apply(&mut self, event: SessionEvent) -> bool {
        let before = self.session.phase();
        let effects = self.session.apply(event);
        let acted = !effects.is_empty();
        for effect in effects {
            self.execute(effect);
        }
        let after = self.session.phase();
        if before != after {
            tracing::debug!(from = %before, to = %after, epoch = self.session.epoch(), "session phase changed");
        }
        self.state.send_replace(self.session.clone());
        acted
    }

    /// Returns the current session state.
    pub fn session(&self) -> &Session {
        &self.session
    }

    fn execute(&mut self, effect: Effect) {
        match effect {
            Effect::ScheduleHint { epoch, delay } => {
                if let Some(events) = self.feedback.upgrade() {
                    self.hint_timer = Some(HintTimer::schedule(delay, epoch, events));
                }
            }
            Effect::CancelHint => {
                if let Some(timer) = self.hint_timer.take() {
                    timer.cancel();
                }
            }
            Effect::FetchChannel { epoch, identifier } => {
                let Some(events) = self.feedback.upgrade() else {
                    return;
                };
                let backend = Arc::clone(&self.backend);
                tokio::spawn(async move {
                    let outcome = backend.fetch_channel(&identifier).await;
                    let _ = events.send(SessionEvent::LookupCompleted { epoch, outcome });
                });
            }
            Effect::SendMessage { epoch, request } => {
                let Some(events) = self.feedback.upgrade() else {
                    return;
                };
                let backend = Arc::clone(&self.backend);
                tokio::spawn(async move {
                    let outcome = backend.send_message(&request).await;
                    let _ = events.send(SessionEvent::ExchangeCompleted { epoch, outcome });
                });
            }
        }
    }
}

/// Cloneable front end of a [`SessionController`].
#[derive(Debug, Clone)]
pub struct SessionHandle {
    events: mpsc::UnboundedSender<SessionEvent>,
    sends: mpsc::UnboundedSender<SendRequest>,
    state: watch::Receiver<Session>,
}

impl SessionHandle {
    /// Requests a session start with a raw channel reference.
    pub fn start(&self, reference: impl Into<String>) -> Result<()> {
        let reference = reference.into();
        if reference.trim().is_empty() {
            return Err(Error::validation(
                "channel reference is blank",
                Some("reference".to_string()),
            ));
        }
        self.post(SessionEvent::StartRequested { reference })
    }

    /// Sends a message and returns once the session has taken it.
    ///
    /// Rejected while a previous reply is still pending or no channel is
    /// active, including when another send got there first.  On success the
    /// message is already in the log and the published state is loading.
    pub async fn send(&self, text: impl Into<String>) -> Result<()> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(Error::validation("message is blank", Some("text".to_string())));
        }
        if self.state.borrow().is_loading() {
            return Err(Error::validation("a reply is still pending", None));
        }
        let (accepted, answer) = oneshot::channel();
        self.sends
            .send(SendRequest { text, accepted })
            .map_err(|_| Error::abort("session controller stopped"))?;
        match answer.await {
            Ok(true) => Ok(()),
            Ok(false) => Err(Error::validation(
                "a reply is still pending or no channel is active",
                None,
            )),
            Err(_) => Err(Error::abort("session controller stopped")),
        }
    }

    /// Requests a reset back to the channel picker.
    pub fn reset(&self) -> Result<()> {
        self.post(SessionEvent::ResetRequested)
    }

    /// Replaces the message input buffer.
    pub fn set_input(&self, text: impl Into<String>) -> Result<()> {
        self.post(SessionEvent::InputChanged(text.into()))
    }

    /// Returns a snapshot of the latest published state.
    pub fn state(&self) -> Session {
        self.state.borrow().clone()
    }

    /// Returns a receiver that observes every published state.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.clone()
    }

    /// Starts a session and waits until it is active (or reset meanwhile).
    pub async fn start_and_wait(&self, reference: impl Into<String>) -> Result<Session> {
        let mut rx = self.subscribe();
        let epoch = {
            let session = rx.borrow();
            if session.phase() != SessionPhase::NotStarted {
                return Err(Error::validation("a session is already running", None));
            }
            session.epoch()
        };
        self.start(reference)?;
        wait_until(&mut rx, |s| {
            s.epoch() != epoch || s.phase() == SessionPhase::Active
        })
        .await
    }

    /// Sends a message and waits until its reply (or apology) is in the log.
    pub async fn send_and_wait(&self, text: impl Into<String>) -> Result<Session> {
        let mut rx = self.subscribe();
        let (epoch, before) = {
            let session = rx.borrow();
            if !session.can_send() {
                return Err(Error::validation("session is not ready for a message", None));
            }
            (session.epoch(), session.messages().len())
        };
        self.send(text).await?;
        wait_until(&mut rx, |s| {
            s.epoch() != epoch || (!s.is_loading() && s.messages().len() >= before + 2)
        })
        .await
    }

    fn post(&self, event: SessionEvent) -> Result<()> {
        self.events
            .send(event)
            .map_err(|_| Error::abort("session controller stopped"))
    }
}

async fn wait_until<F>(rx: &mut watch::Receiver<Session>, mut done: F) -> Result<Session>
where
    F: FnMut(&Session) -> bool,
{
    rx.wait_for(|session| done(session))
        .await
        .map(|session| Session::clone(&session))
        .map_err(|_| Error::abort("session controller stopped"))
}
