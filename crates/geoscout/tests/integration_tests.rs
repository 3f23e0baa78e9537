//! Integration tests for the geoscout search coordinator
//!
//! These run against the public API only, with an in-memory provider loaded
//! from `tests/data/stores.json` and tokio's paused clock.

use std::{
    path::PathBuf,
    sync::{Arc, Mutex},
    time::Duration,
};

use chrono::Utc;
use geoscout::{
    Channel, CoordinatorConfigBuilder, CoordinatorUpdate, EventRouter, GeofenceEvent,
    GeofencePresence, GeofenceTransition, InMemoryProvider, LocationEvent, LocationKind,
    NearbyOutcome, SearchCoordinator, SearchError, SearchSessionState, StoreDetails, TripEvent,
    TripPhase, TripStatus, TripTracker,
};
use tokio::time::Instant;

fn setup_test_env() {
    let _ = geoscout::init_logging(tracing::Level::WARN);
}

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data/stores.json")
}

fn provider() -> InMemoryProvider {
    InMemoryProvider::from_path(fixture_path()).expect("Fixture should load")
}

#[tokio::test(start_paused = true)]
async fn test_full_store_locator_workflow() {
    setup_test_env();

    let coordinator = SearchCoordinator::new(provider(), CoordinatorConfigBuilder::new().build())
        .expect("Should create coordinator");

    // 1. Nearby stores around the device, closest first, other tags excluded
    let NearbyOutcome::Found(stores) = coordinator.find_nearby(None).await.unwrap() else {
        panic!("Should find stores around the device");
    };
    let ids: Vec<_> = stores.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["gf_union_sq", "gf_flatiron", "gf_brooklyn"]);

    // 2. Store details from metadata
    let details = StoreDetails::from_location(&stores[0]);
    assert_eq!(details.hours, "Store hours: 7am - 11pm");
    assert_eq!(details.address, "4 Union Sq E, New York, NY");
    assert_eq!(details.curbside, "Curbside is available at this location");

    // 3. Type an address and pick the suggestion
    let mut updates = coordinator.subscribe();
    for prefix in ["j", "ja", "jay", "jay st"] {
        coordinator.on_query_intent(prefix);
        tokio::time::sleep(Duration::from_millis(120)).await;
    }
    assert!(matches!(
        updates.recv().await.unwrap(),
        CoordinatorUpdate::SuggestionsUpdated { count: 1, .. }
    ));
    assert_eq!(coordinator.provider().autocomplete_calls(), 1);
    let suggestion = coordinator.current_suggestions().remove(0);
    assert_eq!(suggestion.label, "Jay St & Water St");

    // 4. Search around the picked address: a pin plus the stores
    coordinator.find_nearby(Some(&suggestion)).await.unwrap();
    let on_map = coordinator.current_nearby_results();
    let selectable = coordinator.selectable_nearby_results();
    assert_eq!(on_map.len(), selectable.len() + 1);
    assert_eq!(selectable[0].id, "gf_brooklyn");
    assert!(
        on_map
            .iter()
            .any(|l| l.kind == LocationKind::Placeholder && l.coordinate == suggestion.coordinate)
    );
    assert_eq!(coordinator.current_region().center, suggestion.coordinate);
}

#[tokio::test(start_paused = true)]
async fn test_nearby_search_waits_for_location() {
    setup_test_env();

    let coordinator = SearchCoordinator::new(
        provider().empty_for_first(2),
        CoordinatorConfigBuilder::new()
            .retry_interval(Duration::from_secs(4))
            .build(),
    )
    .unwrap();
    let start = Instant::now();

    let outcome = coordinator.find_nearby(None).await.unwrap();

    assert!(matches!(outcome, NearbyOutcome::Found(_)));
    assert_eq!(coordinator.provider().search_calls(), 3);
    assert_eq!(start.elapsed(), Duration::from_secs(8));
}

#[tokio::test(start_paused = true)]
async fn test_nearby_search_gives_up() {
    setup_test_env();

    let coordinator = SearchCoordinator::new(
        provider().empty_for_first(u32::MAX),
        CoordinatorConfigBuilder::responsive().build(),
    )
    .unwrap();
    let start = Instant::now();

    let outcome = coordinator.find_nearby(None).await.unwrap();

    assert_eq!(outcome, NearbyOutcome::Exhausted { attempts: 3 });
    assert_eq!(start.elapsed(), Duration::from_secs(4));
    assert_eq!(
        coordinator.session_state(Channel::Nearby),
        SearchSessionState::Exhausted
    );
    assert_eq!(
        coordinator.status_text(Channel::Nearby).as_deref(),
        Some("No locations found in area")
    );
    assert!(coordinator.selectable_nearby_results().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_nearby_requests_single_flight() {
    setup_test_env();

    let coordinator = SearchCoordinator::new(
        provider().with_latency(Duration::from_millis(300)),
        CoordinatorConfigBuilder::new().build(),
    )
    .unwrap();

    let (a, b) = tokio::join!(coordinator.find_nearby(None), coordinator.find_nearby(None));

    assert!(a.is_ok());
    assert_eq!(b, Err(SearchError::ChannelBusy(Channel::Nearby)));
    assert_eq!(coordinator.provider().search_calls(), 1);
    assert_eq!(
        coordinator.session_state(Channel::Nearby),
        SearchSessionState::Idle
    );
}

#[tokio::test(start_paused = true)]
async fn test_other_tag_finds_other_geofences() {
    setup_test_env();

    let coordinator = SearchCoordinator::new(
        provider(),
        CoordinatorConfigBuilder::new().geofence_tag("GAS").build(),
    )
    .unwrap();

    let NearbyOutcome::Found(stores) = coordinator.find_nearby(None).await.unwrap() else {
        panic!("Should find the gas station");
    };
    assert_eq!(stores.len(), 1);
    assert_eq!(stores[0].id, "gf_gas");
}

#[tokio::test(start_paused = true)]
async fn test_trip_to_selected_store() {
    setup_test_env();

    let coordinator =
        SearchCoordinator::new(provider(), CoordinatorConfigBuilder::new().build()).unwrap();
    let NearbyOutcome::Found(stores) = coordinator.find_nearby(None).await.unwrap() else {
        panic!("Should find stores");
    };

    let tracker = Arc::new(Mutex::new(TripTracker::new()));
    let presence = Arc::new(Mutex::new(GeofencePresence::new()));
    let mut router = EventRouter::new()
        .on_trip(Arc::clone(&tracker))
        .on_geofence(Arc::clone(&presence));

    let options = tracker.lock().unwrap().start_trip(&stores[0]).unwrap();
    assert_eq!(options.destination_geofence_external_id, "store-union-sq");

    let trip = |phase, eta| {
        LocationEvent::Trip(TripEvent {
            phase,
            external_id: Some(options.external_id.clone()),
            eta_minutes: eta,
            occurred_at: Utc::now(),
        })
    };
    router.dispatch_all(&[
        trip(TripPhase::Updated, Some(6.5)),
        trip(TripPhase::Approaching, Some(0.8)),
        LocationEvent::Geofence(GeofenceEvent {
            transition: GeofenceTransition::Entered,
            geofence_id: stores[0].id.clone(),
            external_id: stores[0].external_id.clone(),
            occurred_at: Utc::now(),
        }),
        trip(TripPhase::Arrived, None),
    ]);

    let tracker = tracker.lock().unwrap();
    assert_eq!(tracker.status(), TripStatus::Arrived);
    assert_eq!(tracker.eta_text(), "0 minute(s)");
    assert!(presence.lock().unwrap().in_store_mode());
}

#[test]
fn test_invalid_configuration_rejected() {
    setup_test_env();

    assert!(
        CoordinatorConfigBuilder::new()
            .search_radius(50_000)
            .try_build()
            .is_err()
    );
    assert!(InMemoryProvider::from_path("does/not/exist.json").is_err());
}
