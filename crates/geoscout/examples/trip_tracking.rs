//! Trip tracking from SDK events
//!
//! Starts a trip to a store and replays a recorded stream of location events
//! through the event router.

use std::sync::{Arc, Mutex};

use geoscout::{
    CoordinatorConfig, EventRouter, GeofencePresence, InMemoryProvider, LocationEvent, Metadata,
    MetadataValue, NearbyOutcome, SearchCoordinator, TripStatus, TripTracker,
};

const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/stores.json");

const RECORDED_EVENTS: &str = r#"[
    { "category": "trip", "phase": "started", "eta_minutes": 9.4, "occurred_at": "2024-05-01T12:00:00Z" },
    { "category": "trip", "phase": "updated", "eta_minutes": 4.1, "occurred_at": "2024-05-01T12:05:00Z" },
    { "category": "other", "kind": "user.entered_region_country" },
    { "category": "trip", "phase": "approaching", "eta_minutes": 0.6, "occurred_at": "2024-05-01T12:09:00Z" },
    { "category": "geofence", "transition": "entered", "geofence_id": "gf_union_sq", "external_id": "store-union-sq", "occurred_at": "2024-05-01T12:10:00Z" },
    { "category": "trip", "phase": "arrived", "occurred_at": "2024-05-01T12:10:05Z" }
]"#;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    geoscout::init_logging(tracing::Level::INFO)?;

    let coordinator =
        SearchCoordinator::new(InMemoryProvider::from_path(FIXTURE)?, CoordinatorConfig::default())?;
    let NearbyOutcome::Found(stores) = coordinator.find_nearby(None).await? else {
        println!("No stores nearby");
        return Ok(());
    };
    let store = &stores[0];

    let metadata = Metadata::from([(
        "Car Model".to_owned(),
        MetadataValue::from("Green Honda Civic"),
    )]);
    let tracker = Arc::new(Mutex::new(TripTracker::new().with_trip_metadata(metadata)));
    let presence = Arc::new(Mutex::new(GeofencePresence::new()));
    let mut router = EventRouter::new()
        .on_trip(Arc::clone(&tracker))
        .on_geofence(Arc::clone(&presence));

    let options = tracker
        .lock()
        .map_err(|_| "trip tracker lock poisoned")?
        .start_trip(store)?;
    println!("Started {} to {}", options.external_id, store.label);

    let events: Vec<LocationEvent> = serde_json::from_str(RECORDED_EVENTS)?;
    for event in &events {
        router.dispatch(event);
        let tracker = tracker.lock().map_err(|_| "trip tracker lock poisoned")?;
        let steps = TripStatus::JOURNEY
            .iter()
            .map(|step| format!("{}:{:?}", step.label(), tracker.step_marker(*step)))
            .collect::<Vec<_>>()
            .join(" ");
        println!("  eta {:<12} {steps}", tracker.eta_text());
    }

    let in_store = presence
        .lock()
        .map_err(|_| "presence lock poisoned")?
        .in_store_mode();
    println!("In-store mode: {in_store}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trip_tracking_example() {
        assert!(main().is_ok(), "Example should run successfully");
    }
}
