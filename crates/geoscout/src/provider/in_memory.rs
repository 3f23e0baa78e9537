use std::{
    fs,
    path::Path,
    sync::atomic::{AtomicU32, Ordering},
    time::Duration,
};

use async_trait::async_trait;
use itertools::Itertools;
use rapidfuzz::fuzz;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use super::LocationProvider;
use crate::{
    error::Result,
    model::{
        AutocompleteRequest, Coordinate, GeocodeRequest, Location, SearchError, SearchOutcome,
        SearchRequest,
    },
    projection::{RawAddress, RawGeofence, project_address, project_geofences},
};

/// Serializable contents of an [`InMemoryProvider`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderFixture {
    /// Where the device is. Searches without an anchor come back empty when unset.
    #[serde(default)]
    pub device_location: Option<Coordinate>,
    #[serde(default)]
    pub geofences: Vec<RawGeofence>,
    #[serde(default)]
    pub addresses: Vec<RawAddress>,
}

/// Provider backed by a fixed set of records.
///
/// Useful offline, in demos and in tests. Nearby search filters by tag and
/// haversine distance; autocomplete matches addresses by substring and ranks
/// them by fuzzy similarity.
#[derive(Debug, Default)]
pub struct InMemoryProvider {
    fixture: ProviderFixture,
    latency: Duration,
    empty_searches_left: AtomicU32,
    failure: Option<SearchError>,
    search_calls: AtomicU32,
    autocomplete_calls: AtomicU32,
}

impl InMemoryProvider {
    pub fn new(fixture: ProviderFixture) -> Self {
        Self {
            fixture,
            ..Self::default()
        }
    }

    /// Load a fixture from a JSON file.
    #[instrument(name = "Load provider fixture", level = "info", skip_all)]
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let fixture: ProviderFixture = serde_json::from_str(&fs::read_to_string(path)?)?;
        info!(
            path = ?path,
            geofences = fixture.geofences.len(),
            addresses = fixture.addresses.len(),
            "Loaded provider fixture"
        );
        Ok(Self::new(fixture))
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    pub fn with_device_location(mut self, location: Coordinate) -> Self {
        self.fixture.device_location = Some(location);
        self
    }

    /// Simulated round-trip time for every call.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Make the first `count` nearby searches come back empty, as when the
    /// device location has not been resolved yet.
    pub fn empty_for_first(self, count: u32) -> Self {
        self.empty_searches_left.store(count, Ordering::Release);
        self
    }

    /// Fail every call with `error`.
    pub fn failing_with(mut self, error: SearchError) -> Self {
        self.failure = Some(error);
        self
    }

    pub fn search_calls(&self) -> u32 {
        self.search_calls.load(Ordering::Acquire)
    }

    pub fn autocomplete_calls(&self) -> u32 {
        self.autocomplete_calls.load(Ordering::Acquire)
    }

    pub const fn fixture(&self) -> &ProviderFixture {
        &self.fixture
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    fn take_forced_empty(&self) -> bool {
        self.empty_searches_left
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |left| left.checked_sub(1))
            .is_ok()
    }

    fn matching_addresses(&self, text: &str) -> Vec<&RawAddress> {
        let needle = text.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        self.fixture
            .addresses
            .iter()
            .filter_map(|address| {
                let label = address_label(address)?.to_lowercase();
                label
                    .contains(&needle)
                    .then(|| (fuzz::ratio(needle.chars(), label.chars()), address))
            })
            .sorted_by(|(a, _), (b, _)| b.total_cmp(a))
            .map(|(_, address)| address)
            .collect()
    }
}

fn address_label(address: &RawAddress) -> Option<&str> {
    address
        .formatted_address
        .as_deref()
        .or(address.address_label.as_deref())
}

fn project_address_batch<'a>(
    addresses: impl IntoIterator<Item = &'a RawAddress>,
) -> SearchOutcome {
    addresses
        .into_iter()
        .map(project_address)
        .collect::<std::result::Result<Vec<Location>, _>>()
        .map_err(SearchError::from)
        .into()
}

#[async_trait]
impl LocationProvider for InMemoryProvider {
    async fn search_geofences(&self, request: SearchRequest) -> SearchOutcome {
        self.search_calls.fetch_add(1, Ordering::AcqRel);
        self.simulate_latency().await;

        if let Some(error) = &self.failure {
            return SearchOutcome::Failure(error.clone());
        }
        if self.take_forced_empty() {
            debug!("Forced empty search");
            return SearchOutcome::Empty;
        }
        let Some(anchor) = request.anchor().or(self.fixture.device_location) else {
            debug!("No anchor and no device location; nothing to search around");
            return SearchOutcome::Empty;
        };

        let radius = f64::from(request.radius_meters());
        let nearby = self
            .fixture
            .geofences
            .iter()
            .filter(|geofence| geofence.tag.as_deref() == Some(request.tag()))
            .filter_map(|geofence| {
                let center = geofence.geometry.center()?;
                let distance = anchor.distance_meters(&center);
                (distance <= radius).then_some((distance, geofence))
            })
            .sorted_by(|(a, _), (b, _)| a.total_cmp(b))
            .take(request.limit())
            .map(|(_, geofence)| geofence)
            .collect_vec();

        debug!(count = nearby.len(), %anchor, radius, "In-memory nearby search");
        project_geofences(nearby)
            .map_err(SearchError::from)
            .into()
    }

    async fn autocomplete(&self, request: AutocompleteRequest) -> SearchOutcome {
        self.autocomplete_calls.fetch_add(1, Ordering::AcqRel);
        self.simulate_latency().await;

        if let Some(error) = &self.failure {
            return SearchOutcome::Failure(error.clone());
        }
        let matches = self.matching_addresses(request.text());
        project_address_batch(matches.into_iter().take(request.limit()))
    }

    async fn geocode(&self, request: GeocodeRequest) -> SearchOutcome {
        self.simulate_latency().await;

        if let Some(error) = &self.failure {
            return SearchOutcome::Failure(error.clone());
        }
        let matches = self.matching_addresses(request.address());
        project_address_batch(matches.into_iter().take(1))
    }
}
