//! The UI-facing search coordinator.
//!
//! [`SearchCoordinator`] owns one session per [`Channel`] and wires the
//! debounced dispatcher, the single-flight guard and the bounded-retry poller
//! over a [`LocationProvider`].
//!
//! # Quick Start
//!
//! ```rust
//! use geoscout::{
//!     Coordinate, CoordinatorConfigBuilder, InMemoryProvider, NearbyOutcome, ProviderFixture,
//!     SearchCoordinator,
//! };
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), geoscout::error::GeoscoutError> {
//! let provider = InMemoryProvider::new(ProviderFixture::default())
//!     .with_device_location(Coordinate::new(40.7359, -73.9911));
//! let config = CoordinatorConfigBuilder::new().max_attempts(1).try_build()?;
//! let coordinator = SearchCoordinator::new(provider, config)?;
//!
//! // Keystrokes go through the debouncer; suggestions arrive asynchronously.
//! coordinator.on_query_intent("841 Broad");
//!
//! // Nearby search retries while the result set is empty.
//! match coordinator.find_nearby(None).await? {
//!     NearbyOutcome::Found(stores) => println!("{} stores", stores.len()),
//!     NearbyOutcome::Exhausted { attempts } => println!("nothing after {attempts} tries"),
//! }
//! # Ok(())
//! # }
//! ```

use std::sync::{
    Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard,
    atomic::{AtomicU64, Ordering},
};

use tokio::{
    sync::{broadcast, mpsc::UnboundedReceiver},
    task::JoinHandle,
};
use tracing::{debug, info, instrument, warn};

use crate::{
    config::CoordinatorConfig,
    coordination::{
        BoundedRetryPoller, DebouncedDispatcher, EmptyQueryPolicy, PollReport, SingleFlightGuard,
    },
    error::GeoscoutError,
    model::{
        AutocompleteRequest, Channel, Coordinate, GeocodeRequest, Location, MapRegion,
        QueryIntent, SearchError, SearchOutcome, SearchRequest, SearchSessionState, selectable,
    },
    provider::LocationProvider,
};

/// Change notifications for UI binding.
#[derive(Debug, Clone, PartialEq)]
pub enum CoordinatorUpdate {
    SuggestionsUpdated { sequence: u64, count: usize },
    NearbyUpdated { count: usize, attempts: u32 },
    ChannelExhausted { channel: Channel, attempts: u32 },
    ChannelFailed { channel: Channel, error: SearchError },
}

/// Terminal result of [`SearchCoordinator::find_nearby`] that is not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum NearbyOutcome {
    Found(Vec<Location>),
    Exhausted { attempts: u32 },
}

#[derive(Debug, Default)]
struct ResultBoard {
    suggestions: Vec<Location>,
    suggestions_sequence: u64,
    nearby: Vec<Location>,
    region: MapRegion,
    last_errors: Vec<(Channel, SearchError)>,
}

impl ResultBoard {
    fn record_error(&mut self, channel: Channel, error: SearchError) {
        self.last_errors.retain(|(existing, _)| *existing != channel);
        self.last_errors.push((channel, error));
    }

    fn clear_error(&mut self, channel: Channel) {
        self.last_errors.retain(|(existing, _)| *existing != channel);
    }
}

struct Shared<P> {
    provider: P,
    config: CoordinatorConfig,
    guard: SingleFlightGuard,
    poller: BoundedRetryPoller,
    board: RwLock<ResultBoard>,
    updates: broadcast::Sender<CoordinatorUpdate>,
}

impl<P: LocationProvider> Shared<P> {
    fn board(&self) -> RwLockReadGuard<'_, ResultBoard> {
        self.board.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn board_mut(&self) -> RwLockWriteGuard<'_, ResultBoard> {
        self.board.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, update: CoordinatorUpdate) {
        // Nobody listening is fine.
        let _ = self.updates.send(update);
    }

    fn fail(&self, channel: Channel, error: &SearchError) {
        warn!(%channel, %error, "Search failed");
        self.board_mut().record_error(channel, error.clone());
        self.publish(CoordinatorUpdate::ChannelFailed {
            channel,
            error: error.clone(),
        });
    }

    fn set_suggestions(&self, sequence: u64, suggestions: Vec<Location>) {
        let count = suggestions.len();
        {
            let mut board = self.board_mut();
            board.suggestions = suggestions;
            board.suggestions_sequence = sequence;
            board.clear_error(Channel::Autocomplete);
        }
        debug!(sequence, count, "Suggestions updated");
        self.publish(CoordinatorUpdate::SuggestionsUpdated { sequence, count });
    }

    async fn autocomplete(&self, intent: QueryIntent, latest: &AtomicU64) {
        if intent.is_superseded_by(latest.load(Ordering::Acquire)) {
            debug!(sequence = intent.sequence, "Skipping superseded query");
            return;
        }
        if intent.text.trim().is_empty() {
            self.set_suggestions(intent.sequence, Vec::new());
            return;
        }
        let Some(permit) = self.guard.acquire(Channel::Autocomplete) else {
            return;
        };

        let request =
            AutocompleteRequest::new(intent.text.clone(), None, self.config.autocomplete_limit);
        let outcome = self.provider.autocomplete(request).await.normalize();
        drop(permit);

        // The call itself is not cancellable; stale answers are dropped here.
        if intent.is_superseded_by(latest.load(Ordering::Acquire)) {
            debug!(
                sequence = intent.sequence,
                "Discarding suggestions for superseded query"
            );
            return;
        }

        match outcome {
            SearchOutcome::Success(suggestions) => self.set_suggestions(intent.sequence, suggestions),
            SearchOutcome::Empty => self.set_suggestions(intent.sequence, Vec::new()),
            SearchOutcome::Failure(error) => self.fail(Channel::Autocomplete, &error),
        }
    }
}

async fn consume_intents<P: LocationProvider>(
    shared: Arc<Shared<P>>,
    mut intents: UnboundedReceiver<QueryIntent>,
    latest: Arc<AtomicU64>,
) {
    while let Some(intent) = intents.recv().await {
        shared.autocomplete(intent, &latest).await;
    }
    debug!("Query intent stream closed");
}

/// Coordinates nearby search, autocomplete and geocoding for one UI session.
///
/// Must be created inside a tokio runtime; dropping it stops the background
/// autocomplete consumer.
pub struct SearchCoordinator<P: LocationProvider + 'static> {
    shared: Arc<Shared<P>>,
    dispatcher: DebouncedDispatcher,
    consumer: JoinHandle<()>,
}

impl<P: LocationProvider + 'static> std::fmt::Debug for SearchCoordinator<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchCoordinator")
            .field("config", &self.shared.config)
            .field("guard", &self.shared.guard)
            .finish_non_exhaustive()
    }
}

impl<P: LocationProvider + 'static> SearchCoordinator<P> {
    /// Validate `config` and start the coordinator.
    #[instrument(name = "Create SearchCoordinator", level = "info", skip_all)]
    pub fn new(provider: P, config: CoordinatorConfig) -> Result<Self, GeoscoutError> {
        config.validate()?;

        let (updates, _) = broadcast::channel(config.update_buffer);
        let (dispatcher, intents) = DebouncedDispatcher::spawn(config.debounce);
        let shared = Arc::new(Shared {
            provider,
            poller: BoundedRetryPoller::new(config.retry),
            config,
            guard: SingleFlightGuard::new(),
            board: RwLock::new(ResultBoard::default()),
            updates,
        });
        let consumer = tokio::spawn(consume_intents(
            Arc::clone(&shared),
            intents,
            dispatcher.sequence_handle(),
        ));

        info!(
            debounce = ?shared.config.debounce.delay,
            max_attempts = shared.config.retry.max_attempts,
            interval = ?shared.config.retry.interval,
            "SearchCoordinator ready"
        );
        Ok(Self {
            shared,
            dispatcher,
            consumer,
        })
    }

    /// Feed one keystroke-level change of the search field.
    ///
    /// Returns the sequence number of the submission.
    pub fn on_query_intent(&self, text: impl Into<String>) -> u64 {
        let text = text.into();
        let suppress_blank = self.shared.config.debounce.empty_query == EmptyQueryPolicy::Suppress
            && text.trim().is_empty();
        let sequence = self.dispatcher.submit(text);
        if suppress_blank {
            // A cleared field never reaches the consumer, so clear here.
            self.shared.set_suggestions(sequence, Vec::new());
        }
        sequence
    }

    /// Drop any keystrokes that have not turned into a query yet.
    pub fn cancel_pending_query(&self) {
        self.dispatcher.reset();
    }

    /// Search geofences around `anchor`, or around the device when `None`.
    ///
    /// Empty answers are retried per the configured policy. On success the
    /// stored result list also gets a placeholder marker for `anchor`, and the
    /// map region moves to it.
    #[instrument(name = "Find nearby", level = "info", skip_all, fields(anchored = anchor.is_some()))]
    pub async fn find_nearby(&self, anchor: Option<&Location>) -> Result<NearbyOutcome, SearchError> {
        let shared = &*self.shared;
        let permit = shared
            .guard
            .acquire(Channel::Nearby)
            .ok_or(SearchError::ChannelBusy(Channel::Nearby))?;

        let anchor_coordinate = anchor.map(|location| location.coordinate);
        if let Some(center) = anchor_coordinate {
            shared.board_mut().region = MapRegion::anchored_at(center);
        }

        let request = SearchRequest::new(
            anchor_coordinate,
            shared.config.search_radius_meters,
            shared.config.geofence_tag.clone(),
            shared.config.nearby_limit,
        );
        let provider = &shared.provider;
        let report = shared
            .poller
            .poll_observed(
                &request,
                |request| provider.search_geofences(request),
                |attempt| permit.retrying(attempt),
            )
            .await;

        let marker = anchor_coordinate.map(Location::placeholder);
        match report {
            PollReport::Success { results, attempts } => {
                let mut all = results.clone();
                all.extend(marker);
                let count = all.len();
                {
                    let mut board = shared.board_mut();
                    board.nearby = all;
                    board.clear_error(Channel::Nearby);
                }
                drop(permit);
                info!(count, attempts, "Nearby results updated");
                shared.publish(CoordinatorUpdate::NearbyUpdated { count, attempts });
                Ok(NearbyOutcome::Found(results))
            }
            PollReport::Exhausted { attempts } => {
                shared.board_mut().nearby = marker.into_iter().collect();
                permit.exhaust();
                info!(attempts, "No nearby results");
                shared.publish(CoordinatorUpdate::ChannelExhausted {
                    channel: Channel::Nearby,
                    attempts,
                });
                Ok(NearbyOutcome::Exhausted { attempts })
            }
            PollReport::Failed { error, .. } => {
                drop(permit);
                shared.fail(Channel::Nearby, &error);
                Err(error)
            }
        }
    }

    /// Resolve an address to a single location.
    #[instrument(name = "Geocode", level = "info", skip(self))]
    pub async fn geocode(&self, address: &str) -> Result<Location, SearchError> {
        let shared = &*self.shared;
        let permit = shared
            .guard
            .acquire(Channel::Geocode)
            .ok_or(SearchError::ChannelBusy(Channel::Geocode))?;

        let outcome = shared
            .provider
            .geocode(GeocodeRequest::new(address))
            .await
            .normalize();
        drop(permit);

        match outcome {
            SearchOutcome::Success(results) => {
                shared.board_mut().clear_error(Channel::Geocode);
                results.into_iter().next().ok_or(SearchError::TransientEmpty)
            }
            SearchOutcome::Empty => Err(SearchError::TransientEmpty),
            SearchOutcome::Failure(error) => {
                shared.fail(Channel::Geocode, &error);
                Err(error)
            }
        }
    }

    /// Geocode `address`, then search around the result.
    pub async fn find_nearby_address(&self, address: &str) -> Result<NearbyOutcome, SearchError> {
        let anchor = self.geocode(address).await?;
        self.find_nearby(Some(&anchor)).await
    }

    /// Centre the map on the device, or on the fallback region when unknown.
    pub fn update_region(&self, device_location: Option<Coordinate>) {
        self.shared.board_mut().region =
            device_location.map_or_else(MapRegion::default, MapRegion::around);
    }

    /// Latest autocomplete suggestions.
    pub fn current_suggestions(&self) -> Vec<Location> {
        self.shared.board().suggestions.clone()
    }

    /// Sequence number of the query the current suggestions belong to.
    pub fn suggestions_sequence(&self) -> u64 {
        self.shared.board().suggestions_sequence
    }

    /// Latest nearby results, including placeholder markers (for the map).
    pub fn current_nearby_results(&self) -> Vec<Location> {
        self.shared.board().nearby.clone()
    }

    /// Latest nearby results that may be offered for selection.
    pub fn selectable_nearby_results(&self) -> Vec<Location> {
        selectable(&self.shared.board().nearby)
    }

    pub fn current_region(&self) -> MapRegion {
        self.shared.board().region
    }

    pub fn session_state(&self, channel: Channel) -> SearchSessionState {
        self.shared.guard.state(channel)
    }

    /// Fallback text for `channel`: loading, nothing found, or the last failure.
    pub fn status_text(&self, channel: Channel) -> Option<String> {
        let state = self.session_state(channel);
        if let Some(text) = self.shared.config.status_text(state) {
            return Some(text.to_owned());
        }
        self.last_error(channel)
            .map(|_| self.shared.config.fallback_text.failed.clone())
    }

    /// Most recent error reported on `channel`, cleared by the next success.
    pub fn last_error(&self, channel: Channel) -> Option<SearchError> {
        self.shared
            .board()
            .last_errors
            .iter()
            .find(|(existing, _)| *existing == channel)
            .map(|(_, error)| error.clone())
    }

    pub fn latest_query_sequence(&self) -> u64 {
        self.dispatcher.latest_sequence()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CoordinatorUpdate> {
        self.shared.updates.subscribe()
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.shared.config
    }

    pub fn provider(&self) -> &P {
        &self.shared.provider
    }
}

impl<P: LocationProvider + 'static> Drop for SearchCoordinator<P> {
    fn drop(&mut self) {
        self.consumer.abort();
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::{self, Instant};

    use super::*;
    use crate::{
        config::CoordinatorConfigBuilder,
        model::LocationKind,
        projection::{RawAddress, RawGeofence, RawGeometry},
        provider::{InMemoryProvider, ProviderFixture},
    };

    const HOME: Coordinate = Coordinate::new(40.7359, -73.9911);

    fn fixture() -> ProviderFixture {
        ProviderFixture {
            device_location: Some(HOME),
            geofences: vec![RawGeofence {
                id: "gf_union".to_owned(),
                external_id: Some("union-sq".to_owned()),
                tag: Some("QSR".to_owned()),
                description: Some("Union Square".to_owned()),
                geometry: RawGeometry::Circle {
                    center: Coordinate::new(40.7362, -73.9903),
                    radius_meters: 100.0,
                },
                metadata: None,
            }],
            addresses: vec![
                RawAddress {
                    formatted_address: Some("841 Broadway, New York, NY".to_owned()),
                    address_label: None,
                    coordinate: Coordinate::new(40.7343, -73.9907),
                },
                RawAddress {
                    formatted_address: Some("1 Broad St, Philadelphia, PA".to_owned()),
                    address_label: None,
                    coordinate: Coordinate::new(39.9524, -75.1636),
                },
            ],
        }
    }

    fn coordinator(provider: InMemoryProvider) -> SearchCoordinator<InMemoryProvider> {
        SearchCoordinator::new(provider, CoordinatorConfig::default()).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_find_nearby_success_first_try() {
        let coordinator = coordinator(InMemoryProvider::new(fixture()));

        let outcome = coordinator.find_nearby(None).await.unwrap();

        let NearbyOutcome::Found(results) = outcome else {
            panic!("expected results");
        };
        assert_eq!(results.len(), 1);
        assert_eq!(coordinator.current_nearby_results(), results);
        assert_eq!(
            coordinator.session_state(Channel::Nearby),
            SearchSessionState::Idle
        );
        assert_eq!(coordinator.status_text(Channel::Nearby), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_find_nearby_retries_until_results() {
        let coordinator = coordinator(InMemoryProvider::new(fixture()).empty_for_first(2));
        let start = Instant::now();

        let outcome = coordinator.find_nearby(None).await.unwrap();

        assert!(matches!(outcome, NearbyOutcome::Found(ref r) if r.len() == 1));
        assert_eq!(coordinator.provider().search_calls(), 3);
        assert_eq!(start.elapsed(), Duration::from_secs(8));
    }

    #[tokio::test(start_paused = true)]
    async fn test_find_nearby_exhausts() {
        let coordinator = coordinator(InMemoryProvider::new(fixture()).empty_for_first(3));
        let mut updates = coordinator.subscribe();

        let outcome = coordinator.find_nearby(None).await.unwrap();

        assert_eq!(outcome, NearbyOutcome::Exhausted { attempts: 3 });
        assert_eq!(
            coordinator.session_state(Channel::Nearby),
            SearchSessionState::Exhausted
        );
        assert_eq!(
            coordinator.status_text(Channel::Nearby).as_deref(),
            Some("No locations found in area")
        );
        assert!(coordinator.current_nearby_results().is_empty());
        assert_eq!(
            updates.recv().await.unwrap(),
            CoordinatorUpdate::ChannelExhausted {
                channel: Channel::Nearby,
                attempts: 3
            }
        );

        // A new caller request may enter an exhausted channel.
        let again = coordinator.find_nearby(None).await.unwrap();
        assert!(matches!(again, NearbyOutcome::Found(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_overlapping_nearby_search_is_rejected() {
        let provider = InMemoryProvider::new(fixture()).empty_for_first(1);
        let coordinator = coordinator(provider);

        let (first, second) = tokio::join!(coordinator.find_nearby(None), async {
            // Let the first search reach its retry wait.
            time::sleep(Duration::from_secs(1)).await;
            assert_eq!(
                coordinator.session_state(Channel::Nearby),
                SearchSessionState::Retrying { attempt: 1 }
            );
            assert_eq!(
                coordinator.status_text(Channel::Nearby).as_deref(),
                Some("Retrieving Locations...")
            );
            coordinator.find_nearby(None).await
        });

        assert!(matches!(first, Ok(NearbyOutcome::Found(_))));
        assert_eq!(second, Err(SearchError::ChannelBusy(Channel::Nearby)));
        assert_eq!(coordinator.provider().search_calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_anchor_adds_placeholder_and_moves_region() {
        let coordinator = coordinator(InMemoryProvider::new(fixture()));
        let anchor = coordinator.geocode("841 Broadway").await.unwrap();

        coordinator.find_nearby(Some(&anchor)).await.unwrap();

        let all = coordinator.current_nearby_results();
        let selectable = coordinator.selectable_nearby_results();
        assert_eq!(all.len(), 2);
        assert_eq!(selectable.len(), 1);
        assert!(all.iter().any(Location::is_placeholder));
        assert!(selectable.iter().all(|l| l.kind == LocationKind::Geofence));
        assert_eq!(
            coordinator.current_region(),
            MapRegion::anchored_at(anchor.coordinate)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_hard_failure_resets_channel_and_surfaces() {
        let coordinator = coordinator(
            InMemoryProvider::new(fixture()).failing_with(SearchError::hard("HTTP 401")),
        );

        let err = coordinator.find_nearby(None).await.unwrap_err();

        assert!(matches!(err, SearchError::HardFailure(_)));
        assert_eq!(coordinator.provider().search_calls(), 1);
        assert_eq!(
            coordinator.session_state(Channel::Nearby),
            SearchSessionState::Idle
        );
        assert_eq!(coordinator.last_error(Channel::Nearby), Some(err));
        assert_eq!(
            coordinator.status_text(Channel::Nearby).as_deref(),
            Some("Network Error")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_typing_burst_yields_one_autocomplete_call() {
        let coordinator = coordinator(InMemoryProvider::new(fixture()));
        let mut updates = coordinator.subscribe();

        coordinator.on_query_intent("8");
        coordinator.on_query_intent("84");
        let last = coordinator.on_query_intent("841 broad");

        let update = updates.recv().await.unwrap();
        assert_eq!(
            update,
            CoordinatorUpdate::SuggestionsUpdated {
                sequence: last,
                count: 1
            }
        );
        assert_eq!(coordinator.provider().autocomplete_calls(), 1);
        assert_eq!(coordinator.suggestions_sequence(), last);
        assert_eq!(
            coordinator.current_suggestions()[0].label,
            "841 Broadway, New York, NY"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_superseded_suggestions_are_discarded() {
        let provider = InMemoryProvider::new(fixture()).with_latency(Duration::from_secs(2));
        let coordinator = coordinator(provider);
        let mut updates = coordinator.subscribe();

        coordinator.on_query_intent("broad");
        // Emitted at 500ms; its call is still running when the user types again.
        time::sleep(Duration::from_secs(1)).await;
        let last = coordinator.on_query_intent("philadelphia");

        let update = updates.recv().await.unwrap();
        assert_eq!(
            update,
            CoordinatorUpdate::SuggestionsUpdated {
                sequence: last,
                count: 1
            }
        );
        assert_eq!(coordinator.provider().autocomplete_calls(), 2);
        assert_eq!(
            coordinator.current_suggestions()[0].label,
            "1 Broad St, Philadelphia, PA"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_query_clears_suggestions_without_calling_provider() {
        let coordinator = coordinator(InMemoryProvider::new(fixture()));
        let mut updates = coordinator.subscribe();

        coordinator.on_query_intent("broad");
        assert!(matches!(
            updates.recv().await.unwrap(),
            CoordinatorUpdate::SuggestionsUpdated { count: 2, .. }
        ));

        coordinator.on_query_intent("");
        assert!(matches!(
            updates.recv().await.unwrap(),
            CoordinatorUpdate::SuggestionsUpdated { count: 0, .. }
        ));
        assert_eq!(coordinator.provider().autocomplete_calls(), 1);
        assert!(coordinator.current_suggestions().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_suppressed_blank_query_clears_immediately() {
        let config = CoordinatorConfigBuilder::new()
            .suppress_empty_queries(true)
            .build();
        let coordinator =
            SearchCoordinator::new(InMemoryProvider::new(fixture()), config).unwrap();
        let mut updates = coordinator.subscribe();

        coordinator.on_query_intent("broad");
        updates.recv().await.unwrap();
        assert_eq!(coordinator.current_suggestions().len(), 2);

        coordinator.on_query_intent("  ");
        assert!(coordinator.current_suggestions().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_autocomplete_failure_is_published() {
        let coordinator =
            coordinator(InMemoryProvider::new(fixture()).failing_with(SearchError::hard("down")));
        let mut updates = coordinator.subscribe();

        coordinator.on_query_intent("broad");

        assert_eq!(
            updates.recv().await.unwrap(),
            CoordinatorUpdate::ChannelFailed {
                channel: Channel::Autocomplete,
                error: SearchError::hard("down"),
            }
        );
        assert_eq!(
            coordinator.session_state(Channel::Autocomplete),
            SearchSessionState::Idle
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_geocode_miss_is_transient_empty() {
        let coordinator = coordinator(InMemoryProvider::new(fixture()));
        assert_eq!(
            coordinator.geocode("nowhere at all").await,
            Err(SearchError::TransientEmpty)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_find_nearby_address() {
        let coordinator = coordinator(InMemoryProvider::new(fixture()));

        let outcome = coordinator.find_nearby_address("841 Broadway").await.unwrap();

        assert!(matches!(outcome, NearbyOutcome::Found(ref r) if r[0].id == "gf_union"));
        assert_eq!(coordinator.current_region().span_meters, 10_000.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_update_region() {
        let coordinator = coordinator(InMemoryProvider::new(fixture()));

        coordinator.update_region(Some(HOME));
        assert_eq!(coordinator.current_region(), MapRegion::around(HOME));

        coordinator.update_region(None);
        assert_eq!(coordinator.current_region(), MapRegion::default());
    }

    #[tokio::test]
    async fn test_invalid_config_is_rejected() {
        let config = CoordinatorConfigBuilder::new().nearby_limit(0).build();
        assert!(SearchCoordinator::new(InMemoryProvider::default(), config).is_err());
    }
}
