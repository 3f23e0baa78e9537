//! The three cooperating pieces behind every search: a debounced dispatcher for
//! keystrokes, a single-flight guard per channel, and a bounded-retry poller.

mod dispatcher;
mod guard;
mod poller;

pub use dispatcher::{DEFAULT_DEBOUNCE_DELAY, DebounceConfig, DebouncedDispatcher, EmptyQueryPolicy};
pub use guard::{FlightPermit, SingleFlightGuard};
pub use poller::{
    BoundedRetryPoller, DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_INTERVAL, PollReport, RetryPolicy,
};
