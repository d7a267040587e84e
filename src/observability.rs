use biometrics::{Collector, Counter, Moments};

pub(crate) static CLIENT_REQUESTS: Counter = Counter::new("geminichat.client.requests");
pub(crate) static CLIENT_REQUEST_ERRORS: Counter =
    Counter::new("geminichat.client.request_errors");
pub(crate) static CLIENT_REQUEST_TIMEOUTS: Counter =
    Counter::new("geminichat.client.request_timeouts");
pub(crate) static CLIENT_REQUEST_DURATION: Moments =
    Moments::new("geminichat.client.request_duration_seconds");

pub(crate) static SESSION_TURNS_COMMITTED: Counter =
    Counter::new("geminichat.session.turns_committed");
pub(crate) static SESSION_TURNS_ROLLED_BACK: Counter =
    Counter::new("geminichat.session.turns_rolled_back");
pub(crate) static SESSION_SUBMISSIONS_REJECTED: Counter =
    Counter::new("geminichat.session.submissions_rejected");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&CLIENT_REQUESTS);
    collector.register_counter(&CLIENT_REQUEST_ERRORS);
    collector.register_counter(&CLIENT_REQUEST_TIMEOUTS);
    collector.register_moments(&CLIENT_REQUEST_DURATION);

    collector.register_counter(&SESSION_TURNS_COMMITTED);
    collector.register_counter(&SESSION_TURNS_ROLLED_BACK);
    collector.register_counter(&SESSION_SUBMISSIONS_REJECTED);
}
