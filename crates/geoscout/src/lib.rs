//! Geoscout - Store Locator Search Coordination
//!
//! Geoscout sits between a store-locator UI and a location platform. It turns
//! keystrokes, map gestures and "find stores near me" taps into a small number
//! of well-behaved search calls, and turns the platform's answers into
//! display-ready [`Location`] records.
//!
//! # Quick Start
//!
//! ```rust
//! use geoscout::{CoordinatorConfigBuilder, InMemoryProvider, SearchCoordinator};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), geoscout::error::GeoscoutError> {
//! let provider = InMemoryProvider::from_json_str(r#"{ "addresses": [] }"#)?;
//! let config = CoordinatorConfigBuilder::responsive().geofence_tag("QSR").try_build()?;
//! let coordinator = SearchCoordinator::new(provider, config)?;
//!
//! coordinator.on_query_intent("841 Broadway");
//! println!("{:?}", coordinator.current_suggestions());
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - **Debounced autocomplete**: a burst of keystrokes becomes one query, and
//!   answers to superseded queries are dropped
//! - **Single-flight channels**: at most one outstanding call per channel
//! - **Bounded retries**: empty nearby searches are repeated a fixed number of
//!   times, then the channel reports that nothing was found
//! - **Safe projection**: upstream records are validated once, at the boundary
//! - **Event routing**: trip and geofence events are delivered to dedicated handlers
//!
//! Providers plug in through [`LocationProvider`]; an HTTP implementation
//! lives in the `geoscout-radar` crate.
use once_cell::sync::OnceCell;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

mod config;
pub mod coordination;
mod core;
pub mod error;
pub mod events;
pub mod model;
pub mod projection;
pub mod provider;
mod store;

pub use self::core::{CoordinatorUpdate, NearbyOutcome, SearchCoordinator};
pub use config::{
    CoordinatorConfig, CoordinatorConfigBuilder, DEFAULT_AUTOCOMPLETE_LIMIT, DEFAULT_GEOFENCE_TAG,
    DEFAULT_NEARBY_LIMIT, DEFAULT_SEARCH_RADIUS_METERS, FallbackText, MAX_SEARCH_RADIUS_METERS,
};
pub use coordination::{
    BoundedRetryPoller, DebounceConfig, DebouncedDispatcher, EmptyQueryPolicy, PollReport,
    RetryPolicy, SingleFlightGuard,
};
pub use events::{
    EventRouter, GeofenceEvent, GeofencePresence, GeofenceTransition, LocationEvent, TripEvent,
    TripPhase, TripStatus, TripTracker,
};
pub use model::{
    AutocompleteRequest, Channel, Coordinate, GeocodeRequest, Location, LocationKind, MapRegion,
    Metadata, MetadataValue, QueryIntent, SearchError, SearchOutcome, SearchRequest,
    SearchSessionState,
};
pub use projection::{ProjectionError, RawAddress, RawGeofence, RawGeometry};
pub use provider::{InMemoryProvider, LocationProvider, ProviderFixture};
pub use store::StoreDetails;

static LOGGER_INIT: OnceCell<()> = OnceCell::new();

/// Initialize logging for Geoscout.
///
/// Sets up structured logging with the given minimum level. `RUST_LOG`, when
/// present, takes precedence. Calling it again is a no-op.
///
/// # Examples
///
/// ```rust
/// use geoscout::init_logging;
/// use tracing::Level;
///
/// init_logging(Level::INFO)?;
/// # Ok::<(), geoscout::error::GeoscoutError>(())
/// ```
pub fn init_logging(level: impl Into<LevelFilter>) -> Result<&'static (), error::GeoscoutError> {
    LOGGER_INIT.get_or_try_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(level.into().to_string()))?
            .add_directive("reqwest=warn".parse()?)
            .add_directive("hyper_util=warn".parse()?);

        tracing_subscriber::fmt::fmt()
            .with_env_filter(filter)
            .with_span_events(FmtSpan::CLOSE)
            .init();
        Ok(())
    })
}
