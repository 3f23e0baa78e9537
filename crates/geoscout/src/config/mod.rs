use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{
    coordination::{DebounceConfig, EmptyQueryPolicy, RetryPolicy},
    error::GeoscoutError,
    model::{Channel, SearchSessionState},
};

/// Largest search radius the upstream API accepts.
pub const MAX_SEARCH_RADIUS_METERS: u32 = 10_000;
pub const DEFAULT_SEARCH_RADIUS_METERS: u32 = 10_000;
pub const DEFAULT_GEOFENCE_TAG: &str = "QSR";
pub const DEFAULT_NEARBY_LIMIT: usize = 10;
pub const DEFAULT_AUTOCOMPLETE_LIMIT: usize = 4;
pub const DEFAULT_UPDATE_BUFFER: usize = 64;

/// Strings the UI shows while a channel is busy or after it gave up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallbackText {
    pub retrieving: String,
    pub no_results: String,
    pub failed: String,
}

impl Default for FallbackText {
    fn default() -> Self {
        Self {
            retrieving: "Retrieving Locations...".to_owned(),
            no_results: "No locations found in area".to_owned(),
            failed: "Network Error".to_owned(),
        }
    }
}

impl FallbackText {
    /// Text for a channel state, or `None` when results (or nothing) should be shown.
    pub fn for_state(&self, state: SearchSessionState) -> Option<&str> {
        match state {
            SearchSessionState::InFlight | SearchSessionState::Retrying { .. } => {
                Some(&self.retrieving)
            }
            SearchSessionState::Exhausted => Some(&self.no_results),
            SearchSessionState::Idle => None,
        }
    }
}

/// Everything the [`SearchCoordinator`](crate::SearchCoordinator) needs to know.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordinatorConfig {
    pub debounce: DebounceConfig,
    pub retry: RetryPolicy,
    pub search_radius_meters: u32,
    pub geofence_tag: String,
    pub nearby_limit: usize,
    pub autocomplete_limit: usize,
    /// Capacity of the update broadcast; slow subscribers skip older updates.
    pub update_buffer: usize,
    pub fallback_text: FallbackText,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            debounce: DebounceConfig::default(),
            retry: RetryPolicy::default(),
            search_radius_meters: DEFAULT_SEARCH_RADIUS_METERS,
            geofence_tag: DEFAULT_GEOFENCE_TAG.to_owned(),
            nearby_limit: DEFAULT_NEARBY_LIMIT,
            autocomplete_limit: DEFAULT_AUTOCOMPLETE_LIMIT,
            update_buffer: DEFAULT_UPDATE_BUFFER,
            fallback_text: FallbackText::default(),
        }
    }
}

impl CoordinatorConfig {
    pub fn builder() -> CoordinatorConfigBuilder {
        CoordinatorConfigBuilder::new()
    }

    pub fn status_text(&self, state: SearchSessionState) -> Option<&str> {
        self.fallback_text.for_state(state)
    }

    /// Result limit used for `channel`.
    pub const fn limit_for(&self, channel: Channel) -> usize {
        match channel {
            Channel::Nearby => self.nearby_limit,
            Channel::Autocomplete => self.autocomplete_limit,
            Channel::Geocode => 1,
        }
    }

    pub fn validate(&self) -> Result<(), GeoscoutError> {
        if self.search_radius_meters == 0 || self.search_radius_meters > MAX_SEARCH_RADIUS_METERS {
            return Err(GeoscoutError::ConfigError(format!(
                "Search radius must be between 1 and {MAX_SEARCH_RADIUS_METERS} meters, got {}",
                self.search_radius_meters
            )));
        }
        if self.geofence_tag.trim().is_empty() {
            return Err(GeoscoutError::ConfigError(
                "Geofence tag must not be empty".to_owned(),
            ));
        }
        if self.nearby_limit == 0 || self.autocomplete_limit == 0 {
            return Err(GeoscoutError::ConfigError(
                "Result limits must be at least 1".to_owned(),
            ));
        }
        if self.update_buffer == 0 {
            return Err(GeoscoutError::ConfigError(
                "Update buffer must hold at least one update".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Builder for [`CoordinatorConfig`] with ergonomic defaults
#[derive(Debug, Clone, Default)]
pub struct CoordinatorConfigBuilder {
    config: CoordinatorConfig,
}

impl CoordinatorConfigBuilder {
    /// Create a new builder with the sample app's defaults
    pub fn new() -> Self {
        Self {
            config: CoordinatorConfig::default(),
        }
    }

    /// Snappier typing feedback and quicker, shorter retries
    pub fn responsive() -> Self {
        let mut builder = Self::new();
        builder.config.debounce.delay = Duration::from_millis(250);
        builder.config.retry = RetryPolicy::new(3, Duration::from_secs(2));
        builder
    }

    /// Fewer autocomplete calls and more patience while the location resolves
    pub fn patient() -> Self {
        let mut builder = Self::new();
        builder.config.debounce.delay = Duration::from_millis(750);
        builder.config.retry = RetryPolicy::new(5, Duration::from_secs(4));
        builder
    }

    /// Idle period before typed text becomes a query
    pub fn debounce(mut self, delay: Duration) -> Self {
        self.config.debounce.delay = delay;
        self
    }

    /// Drop blank queries instead of forwarding them
    pub fn suppress_empty_queries(mut self, suppress: bool) -> Self {
        self.config.debounce.empty_query = if suppress {
            EmptyQueryPolicy::Suppress
        } else {
            EmptyQueryPolicy::Forward
        };
        self
    }

    /// Total attempts for a nearby search (at least 1)
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.config.retry.max_attempts = attempts.max(1);
        self
    }

    /// Wait between empty attempts
    pub fn retry_interval(mut self, interval: Duration) -> Self {
        self.config.retry.interval = interval;
        self
    }

    pub fn search_radius(mut self, meters: u32) -> Self {
        self.config.search_radius_meters = meters;
        self
    }

    pub fn geofence_tag(mut self, tag: impl Into<String>) -> Self {
        self.config.geofence_tag = tag.into();
        self
    }

    pub fn nearby_limit(mut self, limit: usize) -> Self {
        self.config.nearby_limit = limit;
        self
    }

    pub fn autocomplete_limit(mut self, limit: usize) -> Self {
        self.config.autocomplete_limit = limit;
        self
    }

    pub fn update_buffer(mut self, capacity: usize) -> Self {
        self.config.update_buffer = capacity;
        self
    }

    pub fn fallback_text(mut self, text: FallbackText) -> Self {
        self.config.fallback_text = text;
        self
    }

    /// Build the final configuration without validation
    pub fn build(self) -> CoordinatorConfig {
        self.config
    }

    /// Build and validate the final configuration
    pub fn try_build(self) -> Result<CoordinatorConfig, GeoscoutError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
