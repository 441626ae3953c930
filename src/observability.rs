use biometrics::{Collector, Counter, Moments};

pub(crate) static CLIENT_REQUESTS: Counter = Counter::new("channelchat.client.requests");
pub(crate) static CLIENT_REQUEST_ERRORS: Counter =
    Counter::new("channelchat.client.request_errors");
pub(crate) static CLIENT_REQUEST_DURATION: Moments =
    Moments::new("channelchat.client.request_duration_seconds");

pub(crate) static SESSION_STARTS: Counter = Counter::new("channelchat.session.starts");
pub(crate) static SESSION_UNRESOLVED_REFERENCES: Counter =
    Counter::new("channelchat.session.unresolved_references");
pub(crate) static SESSION_LOOKUP_FALLBACKS: Counter =
    Counter::new("channelchat.session.lookup_fallbacks");
pub(crate) static SESSION_EXCHANGES: Counter = Counter::new("channelchat.session.exchanges");
pub(crate) static SESSION_EXCHANGE_FAILURES: Counter =
    Counter::new("channelchat.session.exchange_failures");
pub(crate) static SESSION_STALE_COMPLETIONS: Counter =
    Counter::new("channelchat.session.stale_completions");
pub(crate) static SESSION_RESETS: Counter = Counter::new("channelchat.session.resets");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&CLIENT_REQUESTS);
    collector.register_counter(&CLIENT_REQUEST_ERRORS);
    collector.register_moments(&CLIENT_REQUEST_DURATION);

    collector.register_counter(&SESSION_STARTS);
    collector.register_counter(&SESSION_UNRESOLVED_REFERENCES);
    collector.register_counter(&SESSION_LOOKUP_FALLBACKS);
    collector.register_counter(&SESSION_EXCHANGES);
    collector.register_counter(&SESSION_EXCHANGE_FAILURES);
    collector.register_counter(&SESSION_STALE_COMPLETIONS);
    collector.register_counter(&SESSION_RESETS);
}
