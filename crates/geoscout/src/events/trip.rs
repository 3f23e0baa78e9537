use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use super::{TripEvent, TripEventHandler, TripPhase};
use crate::model::{Location, Metadata};

/// Journey steps in the order the UI shows them.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum TripStatus {
    #[default]
    Unknown,
    Started,
    Approaching,
    Arrived,
    Completed,
}

impl TripStatus {
    pub const JOURNEY: [Self; 4] = [
        Self::Started,
        Self::Approaching,
        Self::Arrived,
        Self::Completed,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::Started => "Started",
            Self::Approaching => "Approaching",
            Self::Arrived => "Arrived",
            Self::Completed => "Completed",
        }
    }
}

/// How a journey step relates to the current status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepMarker {
    Current,
    Passed,
    Upcoming,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TravelMode {
    #[default]
    Car,
    Foot,
    Bike,
}

/// What the SDK needs to start tracking a trip to a geofence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripOptions {
    pub external_id: String,
    pub destination_geofence_tag: String,
    pub destination_geofence_external_id: String,
    pub mode: TravelMode,
    pub metadata: Metadata,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TripError {
    #[error("a trip is already in progress")]
    AlreadyOnTrip,
    #[error("no trip is in progress")]
    NotOnTrip,
    #[error("`{label}` cannot be a trip destination: {reason}")]
    InvalidDestination { label: String, reason: &'static str },
}

/// View state of the current trip, driven by SDK trip events.
#[derive(Debug, Clone, Default)]
pub struct TripTracker {
    on_trip: bool,
    status: TripStatus,
    eta_minutes: Option<u32>,
    destination: Option<Location>,
    trip_metadata: Metadata,
    mode: TravelMode,
    last_event_at: Option<DateTime<Utc>>,
}

impl TripTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Metadata attached to every trip this tracker starts.
    pub fn with_trip_metadata(mut self, metadata: Metadata) -> Self {
        self.trip_metadata = metadata;
        self
    }

    pub fn with_mode(mut self, mode: TravelMode) -> Self {
        self.mode = mode;
        self
    }

    pub const fn is_on_trip(&self) -> bool {
        self.on_trip
    }

    pub const fn status(&self) -> TripStatus {
        self.status
    }

    /// Minutes left, rounded up.
    pub const fn eta_minutes(&self) -> Option<u32> {
        self.eta_minutes
    }

    pub const fn destination(&self) -> Option<&Location> {
        self.destination.as_ref()
    }

    pub const fn last_event_at(&self) -> Option<DateTime<Utc>> {
        self.last_event_at
    }

    /// Begin a trip to `destination` and return the options to hand to the SDK.
    pub fn start_trip(&mut self, destination: &Location) -> Result<TripOptions, TripError> {
        if self.on_trip {
            return Err(TripError::AlreadyOnTrip);
        }
        let invalid = |reason| TripError::InvalidDestination {
            label: destination.label.clone(),
            reason,
        };
        if destination.is_placeholder() {
            return Err(invalid("map markers are not geofences"));
        }
        let tag = destination.tag.clone().ok_or_else(|| invalid("missing tag"))?;
        let external_id = destination
            .external_id
            .clone()
            .ok_or_else(|| invalid("missing external id"))?;

        let options = TripOptions {
            external_id: format!("trip-{}", Utc::now().format("%Y%m%dT%H%M%S%3f")),
            destination_geofence_tag: tag,
            destination_geofence_external_id: external_id,
            mode: self.mode,
            metadata: self.trip_metadata.clone(),
        };

        info!(trip = %options.external_id, destination = %destination.label, "Trip started");
        self.on_trip = true;
        self.status = TripStatus::Started;
        self.eta_minutes = None;
        self.destination = Some(destination.clone());
        Ok(options)
    }

    /// Finish the current trip.
    pub fn complete_trip(&mut self) -> Result<(), TripError> {
        if !self.on_trip {
            return Err(TripError::NotOnTrip);
        }
        info!("Trip completed");
        self.on_trip = false;
        self.status = TripStatus::Completed;
        Ok(())
    }

    pub fn step_marker(&self, step: TripStatus) -> StepMarker {
        match self.status.cmp(&step) {
            std::cmp::Ordering::Equal => StepMarker::Current,
            std::cmp::Ordering::Greater => StepMarker::Passed,
            std::cmp::Ordering::Less => StepMarker::Upcoming,
        }
    }

    /// "N minute(s)", or an ellipsis while unknown.
    pub fn eta_text(&self) -> String {
        self.eta_minutes
            .map_or_else(|| "...".to_owned(), |minutes| format!("{minutes} minute(s)"))
    }
}

fn round_up_minutes(eta: f64) -> Option<u32> {
    (eta.is_finite() && eta >= 0.0).then(|| eta.ceil() as u32)
}

impl TripEventHandler for TripTracker {
    fn on_trip_event(&mut self, event: &TripEvent) {
        debug!(phase = ?event.phase, eta = ?event.eta_minutes, "Trip event");
        self.last_event_at = Some(event.occurred_at);
        let eta = event.eta_minutes.and_then(round_up_minutes);

        match event.phase {
            TripPhase::Started | TripPhase::Updated => {
                if self.status == TripStatus::Unknown {
                    self.status = TripStatus::Started;
                }
                if eta.is_some() {
                    self.eta_minutes = eta;
                }
            }
            TripPhase::Approaching => {
                self.status = TripStatus::Approaching;
                if eta.is_some() {
                    self.eta_minutes = eta;
                }
            }
            TripPhase::Arrived => {
                self.status = TripStatus::Arrived;
                self.eta_minutes = Some(0);
            }
            TripPhase::Stopped => {
                self.status = TripStatus::Completed;
                self.eta_minutes = Some(0);
            }
        }
    }
}
