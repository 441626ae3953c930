//! The chat session state machine.
//!
//! A session moves from [`SessionPhase::NotStarted`] through
//! [`SessionPhase::Starting`] (channel lookup in flight) to
//! [`SessionPhase::Active`], and back to `NotStarted` on reset.  All
//! transitions go through [`Session::apply`]; [`SessionController`] runs the
//! network calls and the startup hint timer the transitions ask for.

mod controller;
mod event;
mod state;
mod timer;

pub use controller::{SessionController, SessionHandle};
pub use event::{Effect, SessionEvent};
pub use state::{
    APOLOGY, CONNECTING_HINT, HINT_DELAY, Session, SessionPhase, WAKING_HINT, welcome_text,
};
pub use timer::HintTimer;
