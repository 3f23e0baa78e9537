//! Radar REST API provider for geoscout.
//!
//! ```rust,no_run
//! use geoscout::{CoordinatorConfig, SearchCoordinator};
//! use geoscout_radar::RadarClient;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Reads RADAR_PUBLISHABLE_KEY (and optionally RADAR_BASE_URL)
//! let radar = RadarClient::from_env()?;
//! let coordinator = SearchCoordinator::new(radar, CoordinatorConfig::default())?;
//! coordinator.find_nearby(None).await?;
//! # Ok(())
//! # }
//! ```
//!
//! Without the default `http` feature only the configuration and the response
//! types are available, which is enough to parse recorded responses offline.

mod config;
pub mod dto;

#[cfg(feature = "http")]
mod client;

pub use config::{
    BASE_URL_ENV, DEFAULT_BASE_URL, DEFAULT_TIMEOUT, PUBLISHABLE_KEY_ENV, RadarConfig,
};
#[cfg(feature = "http")]
pub use client::{AUTOCOMPLETE_PATH, GEOCODE_FORWARD_PATH, RadarClient, SEARCH_GEOFENCES_PATH};

mod error {
    use geoscout::SearchError;
    use thiserror::Error;

    #[derive(Error, Debug)]
    pub enum RadarError {
        #[error("No Radar publishable key configured (set RADAR_PUBLISHABLE_KEY)")]
        MissingPublishableKey,
        #[error("Publishable key is not a valid header value")]
        InvalidPublishableKey,
        #[error("Invalid base URL: {0}")]
        InvalidBaseUrl(String),
        #[cfg(feature = "http")]
        #[error("HTTP error: {0}")]
        Http(#[from] reqwest::Error),
        #[error("Radar returned {status}: {message}")]
        Status { status: u16, message: String },
        #[error("Serialization error: {0}")]
        Serde(#[from] serde_json::Error),
    }

    /// Every Radar problem is one a retry will not fix.
    impl From<RadarError> for SearchError {
        fn from(error: RadarError) -> Self {
            Self::hard(error)
        }
    }

    pub type Result<T> = std::result::Result<T, RadarError>;
}

pub use error::{RadarError, Result};
