use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Channel, Location};
use crate::projection::ProjectionError;

/// Why a search did not produce results.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SearchError {
    /// Nothing available yet (e.g. the device location is unresolved). Retryable.
    #[error("no results available yet")]
    TransientEmpty,
    /// Malformed request, network or authentication failure. Never retried.
    #[error("search failed: {0}")]
    HardFailure(String),
    /// Upstream returned a record that breaks the expected data contract.
    #[error("data contract violation: {0}")]
    DataContractViolation(#[from] ProjectionError),
    /// Another request on the same channel is still outstanding.
    #[error("a {0} search is already in flight")]
    ChannelBusy(Channel),
}

impl SearchError {
    pub fn hard(reason: impl fmt::Display) -> Self {
        Self::HardFailure(reason.to_string())
    }

    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::TransientEmpty)
    }
}

/// Result of a single provider call.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Success(Vec<Location>),
    Empty,
    Failure(SearchError),
}

impl SearchOutcome {
    /// Fold a provider result into an outcome.
    ///
    /// Empty result sets and [`SearchError::TransientEmpty`] both become
    /// [`SearchOutcome::Empty`].
    pub fn from_result(result: Result<Vec<Location>, SearchError>) -> Self {
        match result {
            Ok(results) if results.is_empty() => Self::Empty,
            Ok(results) => Self::Success(results),
            Err(SearchError::TransientEmpty) => Self::Empty,
            Err(err) => Self::Failure(err),
        }
    }

    /// Collapse `Success(vec![])` into `Empty`.
    #[must_use]
    pub fn normalize(self) -> Self {
        match self {
            Self::Success(results) if results.is_empty() => Self::Empty,
            other => other,
        }
    }

    pub const fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Success(results) => results.is_empty(),
            Self::Failure(_) => false,
        }
    }
}

impl From<Result<Vec<Location>, SearchError>> for SearchOutcome {
    fn from(result: Result<Vec<Location>, SearchError>) -> Self {
        Self::from_result(result)
    }
}

/// Per-channel session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SearchSessionState {
    #[default]
    Idle,
    InFlight,
    /// `attempt` empty attempts have completed and another one is pending.
    Retrying { attempt: u32 },
    /// The retry ceiling was hit; no further automatic attempts.
    Exhausted,
}

impl SearchSessionState {
    /// Whether a request is currently outstanding on the channel.
    pub const fn is_busy(self) -> bool {
        matches!(self, Self::InFlight | Self::Retrying { .. })
    }
}

impl fmt::Display for SearchSessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::InFlight => f.write_str("in flight"),
            Self::Retrying { attempt } => write!(f, "retrying (attempt {attempt})"),
            Self::Exhausted => f.write_str("exhausted"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Coordinate;

    #[test]
    fn test_from_result_classification() {
        let marker = Location::placeholder(Coordinate::new(1.0, 1.0));

        assert_eq!(SearchOutcome::from_result(Ok(vec![])), SearchOutcome::Empty);
        assert_eq!(
            SearchOutcome::from_result(Ok(vec![marker.clone()])),
            SearchOutcome::Success(vec![marker])
        );
        assert_eq!(
            SearchOutcome::from_result(Err(SearchError::TransientEmpty)),
            SearchOutcome::Empty
        );
        assert!(matches!(
            SearchOutcome::from_result(Err(SearchError::hard("401 unauthorized"))),
            SearchOutcome::Failure(SearchError::HardFailure(_))
        ));
    }

    #[test]
    fn test_normalize_collapses_empty_success() {
        assert_eq!(SearchOutcome::Success(vec![]).normalize(), SearchOutcome::Empty);
        assert!(SearchOutcome::Success(vec![]).is_empty());
        assert!(!SearchOutcome::Failure(SearchError::TransientEmpty).is_empty());
    }

    #[test]
    fn test_busy_states() {
        assert!(!SearchSessionState::Idle.is_busy());
        assert!(SearchSessionState::InFlight.is_busy());
        assert!(SearchSessionState::Retrying { attempt: 2 }.is_busy());
        assert!(!SearchSessionState::Exhausted.is_busy());
    }
}
