use std::sync::{Mutex, MutexGuard, PoisonError};

use ahash::AHashMap as HashMap;
use tracing::{debug, trace};

use crate::model::{Channel, SearchSessionState};

/// Per-channel single-flight bookkeeping.
///
/// Holds the [`SearchSessionState`] of every channel. Only the coordination
/// components write to it; everyone else reads through [`state`](Self::state).
#[derive(Debug, Default)]
pub struct SingleFlightGuard {
    states: Mutex<HashMap<Channel, SearchSessionState>>,
}

impl SingleFlightGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `channel` in flight if nothing is outstanding on it.
    ///
    /// Returns `false`, leaving the state untouched, when the channel is
    /// already in flight or waiting to retry. An exhausted channel may be
    /// entered again by a new request.
    pub fn try_enter(&self, channel: Channel) -> bool {
        let mut states = self.lock();
        let state = states.entry(channel).or_default();
        if state.is_busy() {
            debug!(%channel, %state, "Rejected overlapping search");
            return false;
        }
        *state = SearchSessionState::InFlight;
        trace!(%channel, "Channel entered");
        true
    }

    /// Return `channel` to idle. Safe to call more than once.
    pub fn leave(&self, channel: Channel) {
        self.set(channel, SearchSessionState::Idle);
    }

    /// Record that `attempt` attempts came back empty and another is scheduled.
    pub(crate) fn mark_retrying(&self, channel: Channel, attempt: u32) {
        self.set(channel, SearchSessionState::Retrying { attempt });
    }

    pub(crate) fn mark_exhausted(&self, channel: Channel) {
        self.set(channel, SearchSessionState::Exhausted);
    }

    pub fn state(&self, channel: Channel) -> SearchSessionState {
        self.lock().get(&channel).copied().unwrap_or_default()
    }

    /// Enter `channel` and get a permit that leaves it again when dropped.
    pub fn acquire(&self, channel: Channel) -> Option<FlightPermit<'_>> {
        self.try_enter(channel).then_some(FlightPermit {
            guard: self,
            channel,
            settled: false,
        })
    }

    fn set(&self, channel: Channel, state: SearchSessionState) {
        trace!(%channel, %state, "Channel state change");
        self.lock().insert(channel, state);
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Channel, SearchSessionState>> {
        // Every critical section is a single map write, so a poisoned map is still consistent.
        self.states.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Scoped occupation of a channel.
///
/// Dropping the permit releases the channel to idle unless it was settled as
/// [`exhausted`](Self::exhaust). Early returns and panics therefore never leave
/// a channel stuck in flight.
#[derive(Debug)]
pub struct FlightPermit<'a> {
    guard: &'a SingleFlightGuard,
    channel: Channel,
    settled: bool,
}

impl FlightPermit<'_> {
    pub const fn channel(&self) -> Channel {
        self.channel
    }

    pub fn retrying(&self, attempt: u32) {
        self.guard.mark_retrying(self.channel, attempt);
    }

    /// Leave the channel resting in [`SearchSessionState::Exhausted`].
    pub fn exhaust(mut self) {
        self.guard.mark_exhausted(self.channel);
        self.settled = true;
    }
}

impl Drop for FlightPermit<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.guard.leave(self.channel);
        }
    }
}
