use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use geoscout::{
    AutocompleteRequest, Coordinate, GeocodeRequest, LocationProvider, SearchError, SearchOutcome,
    SearchRequest,
    projection::{project_addresses, project_geofences},
};
use itertools::Itertools;
use reqwest::{
    Client,
    header::{AUTHORIZATION, HeaderMap, HeaderValue},
};
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};

use crate::{
    RadarConfig, RadarError, Result,
    dto::{AddressResponse, ErrorResponse, GeofenceSearchResponse},
};

pub const SEARCH_GEOFENCES_PATH: &str = "/v1/search/geofences";
pub const AUTOCOMPLETE_PATH: &str = "/v1/search/autocomplete";
pub const GEOCODE_FORWARD_PATH: &str = "/v1/geocode/forward";

/// [`LocationProvider`] backed by the Radar REST API.
///
/// Nearby searches without an explicit anchor use the last known device
/// location. Until one is known they come back empty, which the coordinator
/// treats as "try again shortly".
#[derive(Debug)]
pub struct RadarClient {
    http: Client,
    config: RadarConfig,
    device_location: RwLock<Option<Coordinate>>,
}

impl RadarClient {
    pub fn new(config: RadarConfig) -> Result<Self> {
        let mut key = HeaderValue::from_str(config.publishable_key())
            .map_err(|_| RadarError::InvalidPublishableKey)?;
        key.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, key);

        let http = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout())
            .build()?;

        info!(base_url = config.base_url(), "Radar client ready");
        Ok(Self {
            http,
            config,
            device_location: RwLock::new(None),
        })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(RadarConfig::from_env()?)
    }

    pub fn with_device_location(self, location: Coordinate) -> Self {
        self.set_device_location(Some(location));
        self
    }

    /// Record the latest device fix, or forget it with `None`.
    pub fn set_device_location(&self, location: Option<Coordinate>) {
        *self
            .device_location
            .write()
            .unwrap_or_else(PoisonError::into_inner) = location;
    }

    pub fn device_location(&self) -> Option<Coordinate> {
        *self
            .device_location
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub const fn config(&self) -> &RadarConfig {
        &self.config
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let url = self.config.endpoint(path);
        debug!(%url, "Radar request");
        let response = self.http.get(&url).query(query).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .ok()
                .and_then(|error| error.meta.message)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown").to_owned());
            return Err(RadarError::Status {
                status: status.as_u16(),
                message,
            });
        }
        Ok(serde_json::from_str(&response.text().await?)?)
    }

    async fn fetch_addresses(&self, path: &str, query: &[(&str, String)]) -> SearchOutcome {
        match self.get::<AddressResponse>(path, query).await {
            Ok(response) => {
                let raw = response
                    .addresses
                    .into_iter()
                    .map(|address| address.into_raw())
                    .collect_vec();
                project_addresses(&raw).map_err(SearchError::from).into()
            }
            Err(error) => failure(path, error),
        }
    }
}

fn failure(path: &str, error: RadarError) -> SearchOutcome {
    warn!(path, %error, "Radar request failed");
    SearchOutcome::Failure(error.into())
}

#[async_trait]
impl LocationProvider for RadarClient {
    #[instrument(name = "Radar geofence search", level = "info", skip_all)]
    async fn search_geofences(&self, request: SearchRequest) -> SearchOutcome {
        let Some(near) = request.anchor().or_else(|| self.device_location()) else {
            debug!("Device location not known yet");
            return SearchOutcome::Empty;
        };

        let query = [
            ("near", near.to_string()),
            ("radius", request.radius_meters().to_string()),
            ("tags", request.tag().to_owned()),
            ("limit", request.limit().to_string()),
        ];
        match self
            .get::<GeofenceSearchResponse>(SEARCH_GEOFENCES_PATH, &query)
            .await
        {
            Ok(response) => {
                let raw = response
                    .geofences
                    .into_iter()
                    .map(|geofence| geofence.into_raw())
                    .collect_vec();
                project_geofences(&raw).map_err(SearchError::from).into()
            }
            Err(error) => failure(SEARCH_GEOFENCES_PATH, error),
        }
    }

    #[instrument(name = "Radar autocomplete", level = "info", skip_all)]
    async fn autocomplete(&self, request: AutocompleteRequest) -> SearchOutcome {
        let mut query = vec![
            ("query", request.text().to_owned()),
            ("limit", request.limit().to_string()),
        ];
        query.extend(request.anchor().map(|near| ("near", near.to_string())));
        self.fetch_addresses(AUTOCOMPLETE_PATH, &query).await
    }

    #[instrument(name = "Radar forward geocode", level = "info", skip_all)]
    async fn geocode(&self, request: GeocodeRequest) -> SearchOutcome {
        let query = [("query", request.address().to_owned())];
        self.fetch_addresses(GEOCODE_FORWARD_PATH, &query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> RadarClient {
        RadarClient::new(
            RadarConfig::new("prj_test_pk_1")
                .unwrap()
                // Nothing listens here; any request that is sent fails fast.
                .with_base_url("http://127.0.0.1:9")
                .unwrap(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_search_without_location_is_empty_without_request() {
        let client = client();
        let request = SearchRequest::new(None, 10_000, "QSR", 10);

        assert_eq!(client.search_geofences(request).await, SearchOutcome::Empty);
    }

    #[tokio::test]
    async fn test_transport_error_is_hard_failure() {
        let client = client().with_device_location(Coordinate::new(40.7359, -73.9911));
        let request = SearchRequest::new(None, 10_000, "QSR", 10);

        let outcome = client.search_geofences(request).await;

        assert!(matches!(
            outcome,
            SearchOutcome::Failure(SearchError::HardFailure(_))
        ));
    }

    #[test]
    fn test_device_location_can_be_cleared() {
        let client = client().with_device_location(Coordinate::new(1.0, 2.0));
        assert_eq!(client.device_location(), Some(Coordinate::new(1.0, 2.0)));
        client.set_device_location(None);
        assert_eq!(client.device_location(), None);
    }

    #[test]
    fn test_invalid_key_is_rejected() {
        let config = RadarConfig::new("prj\ntest").unwrap();
        assert!(matches!(
            RadarClient::new(config),
            Err(RadarError::InvalidPublishableKey)
        ));
    }
}
