use std::{future::Future, time::Duration};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::model::{Location, SearchError, SearchOutcome};

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_secs(4);

/// How often, and how far apart, an empty search is repeated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total number of calls, including the first one. Never below 1.
    pub max_attempts: u32,
    /// Wait between two consecutive calls.
    pub interval: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, interval: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            interval,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_INTERVAL)
    }
}

/// Terminal result of a polling session.
#[derive(Debug, Clone, PartialEq)]
pub enum PollReport {
    Success {
        results: Vec<Location>,
        attempts: u32,
    },
    Exhausted {
        attempts: u32,
    },
    Failed {
        error: SearchError,
        attempts: u32,
    },
}

impl PollReport {
    pub const fn attempts(&self) -> u32 {
        match self {
            Self::Success { attempts, .. }
            | Self::Exhausted { attempts }
            | Self::Failed { attempts, .. } => *attempts,
        }
    }
}

/// Repeats a search while it comes back empty, up to a fixed ceiling.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoundedRetryPoller {
    policy: RetryPolicy,
}

impl BoundedRetryPoller {
    pub const fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    pub const fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Run `operation` until it yields results, fails, or runs out of attempts.
    ///
    /// Each call receives its own clone of `request`, so every attempt sees
    /// identical parameters.
    pub async fn poll<R, F, Fut>(&self, request: &R, operation: F) -> PollReport
    where
        R: Clone,
        F: FnMut(R) -> Fut,
        Fut: Future<Output = SearchOutcome>,
    {
        self.poll_observed(request, operation, |_| {}).await
    }

    /// Like [`poll`](Self::poll), calling `on_retry(attempt)` each time an empty
    /// attempt is followed by another one.
    pub async fn poll_observed<R, F, Fut, O>(
        &self,
        request: &R,
        mut operation: F,
        mut on_retry: O,
    ) -> PollReport
    where
        R: Clone,
        F: FnMut(R) -> Fut,
        Fut: Future<Output = SearchOutcome>,
        O: FnMut(u32),
    {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match operation(request.clone()).await.normalize() {
                SearchOutcome::Success(results) => {
                    info!(attempt, count = results.len(), "Search returned results");
                    return PollReport::Success {
                        results,
                        attempts: attempt,
                    };
                }
                SearchOutcome::Failure(error) => {
                    warn!(attempt, %error, "Search failed; not retrying");
                    return PollReport::Failed {
                        error,
                        attempts: attempt,
                    };
                }
                SearchOutcome::Empty if attempt >= self.policy.max_attempts => {
                    info!(attempt, "Search still empty; giving up");
                    return PollReport::Exhausted { attempts: attempt };
                }
                SearchOutcome::Empty => {
                    debug!(
                        attempt,
                        interval = ?self.policy.interval,
                        "Search empty; retrying"
                    );
                    on_retry(attempt);
                    tokio::time::sleep(self.policy.interval).await;
                }
            }
        }
    }
}
