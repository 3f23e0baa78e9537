//! The external location capability the coordinator drives.

use async_trait::async_trait;

use crate::model::{AutocompleteRequest, GeocodeRequest, SearchOutcome, SearchRequest};

mod in_memory;

pub use in_memory::{InMemoryProvider, ProviderFixture};

/// Source of geofence searches, address suggestions and geocoding.
///
/// Implementations report "nothing yet" as [`SearchOutcome::Empty`] and
/// reserve [`SearchOutcome::Failure`] for problems a retry will not fix.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn search_geofences(&self, request: SearchRequest) -> SearchOutcome;

    async fn autocomplete(&self, request: AutocompleteRequest) -> SearchOutcome;

    async fn geocode(&self, request: GeocodeRequest) -> SearchOutcome;
}

#[async_trait]
impl<P> LocationProvider for std::sync::Arc<P>
where
    P: LocationProvider + ?Sized,
{
    async fn search_geofences(&self, request: SearchRequest) -> SearchOutcome {
        (**self).search_geofences(request).await
    }

    async fn autocomplete(&self, request: AutocompleteRequest) -> SearchOutcome {
        (**self).autocomplete(request).await
    }

    async fn geocode(&self, request: GeocodeRequest) -> SearchOutcome {
        (**self).geocode(request).await
    }
}
