//! Location events coming back from the SDK, and their routing.
//!
//! Rather than one delegate callback switching over every event type, each
//! event is classified into a [`LocationEvent`] variant and handed to the
//! handler registered for that concern.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

mod presence;
mod trip;

pub use presence::GeofencePresence;
pub use trip::{StepMarker, TravelMode, TripError, TripOptions, TripStatus, TripTracker};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeofenceTransition {
    Entered,
    Exited,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeofenceEvent {
    pub transition: GeofenceTransition,
    pub geofence_id: String,
    pub external_id: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripPhase {
    Started,
    Updated,
    Approaching,
    Arrived,
    Stopped,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripEvent {
    pub phase: TripPhase,
    pub external_id: Option<String>,
    /// Remaining travel time in (fractional) minutes, when the SDK knows it.
    pub eta_minutes: Option<f64>,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum LocationEvent {
    Geofence(GeofenceEvent),
    Trip(TripEvent),
    /// Any event type nobody handles.
    Other { kind: String },
}

pub trait TripEventHandler: Send {
    fn on_trip_event(&mut self, event: &TripEvent);
}

pub trait GeofenceEventHandler: Send {
    fn on_geofence_event(&mut self, event: &GeofenceEvent);
}

impl<H: TripEventHandler> TripEventHandler for Arc<Mutex<H>> {
    fn on_trip_event(&mut self, event: &TripEvent) {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .on_trip_event(event);
    }
}

impl<H: GeofenceEventHandler> GeofenceEventHandler for Arc<Mutex<H>> {
    fn on_geofence_event(&mut self, event: &GeofenceEvent) {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .on_geofence_event(event);
    }
}

/// How a batch of events was distributed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RouteSummary {
    pub trip: usize,
    pub geofence: usize,
    pub ignored: usize,
}

/// Hands each event to every handler registered for its concern.
#[derive(Default)]
pub struct EventRouter {
    trip_handlers: Vec<Box<dyn TripEventHandler>>,
    geofence_handlers: Vec<Box<dyn GeofenceEventHandler>>,
}

impl std::fmt::Debug for EventRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventRouter")
            .field("trip_handlers", &self.trip_handlers.len())
            .field("geofence_handlers", &self.geofence_handlers.len())
            .finish()
    }
}

impl EventRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_trip(mut self, handler: impl TripEventHandler + 'static) -> Self {
        self.trip_handlers.push(Box::new(handler));
        self
    }

    pub fn on_geofence(mut self, handler: impl GeofenceEventHandler + 'static) -> Self {
        self.geofence_handlers.push(Box::new(handler));
        self
    }

    pub fn dispatch(&mut self, event: &LocationEvent) -> RouteSummary {
        let mut summary = RouteSummary::default();
        match event {
            LocationEvent::Trip(trip) => {
                trace!(phase = ?trip.phase, "Routing trip event");
                for handler in &mut self.trip_handlers {
                    handler.on_trip_event(trip);
                }
                summary.trip += 1;
            }
            LocationEvent::Geofence(geofence) => {
                trace!(transition = ?geofence.transition, geofence_id = %geofence.geofence_id, "Routing geofence event");
                for handler in &mut self.geofence_handlers {
                    handler.on_geofence_event(geofence);
                }
                summary.geofence += 1;
            }
            LocationEvent::Other { kind } => {
                debug!(kind, "Ignoring unhandled location event");
                summary.ignored += 1;
            }
        }
        summary
    }

    /// Route a batch in order.
    pub fn dispatch_all<'a, I>(&mut self, events: I) -> RouteSummary
    where
        I: IntoIterator<Item = &'a LocationEvent>,
    {
        events
            .into_iter()
            .fold(RouteSummary::default(), |total, event| {
                let one = self.dispatch(event);
                RouteSummary {
                    trip: total.trip + one.trip,
                    geofence: total.geofence + one.geofence,
                    ignored: total.ignored + one.ignored,
                }
            })
    }
}
