use std::{fmt, time::Duration};

use crate::RadarError;

pub const DEFAULT_BASE_URL: &str = "https://api.radar.io";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub const PUBLISHABLE_KEY_ENV: &str = "RADAR_PUBLISHABLE_KEY";
pub const BASE_URL_ENV: &str = "RADAR_BASE_URL";

/// Connection settings for the Radar REST API.
#[derive(Clone, PartialEq, Eq)]
pub struct RadarConfig {
    publishable_key: String,
    base_url: String,
    timeout: Duration,
}

impl fmt::Debug for RadarConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RadarConfig")
            .field("publishable_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl RadarConfig {
    pub fn new(publishable_key: impl Into<String>) -> Result<Self, RadarError> {
        let publishable_key = publishable_key.into();
        if publishable_key.trim().is_empty() {
            return Err(RadarError::MissingPublishableKey);
        }
        Ok(Self {
            publishable_key,
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Read `RADAR_PUBLISHABLE_KEY` and, optionally, `RADAR_BASE_URL`.
    pub fn from_env() -> Result<Self, RadarError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env) but reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, RadarError> {
        let key = lookup(PUBLISHABLE_KEY_ENV).ok_or(RadarError::MissingPublishableKey)?;
        let config = Self::new(key)?;
        match lookup(BASE_URL_ENV).filter(|url| !url.trim().is_empty()) {
            Some(url) => config.with_base_url(url),
            None => Ok(config),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Result<Self, RadarError> {
        let base_url = base_url.into();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(RadarError::InvalidBaseUrl(base_url));
        }
        self.base_url = base_url.trim_end_matches('/').to_owned();
        Ok(self)
    }

    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn publishable_key(&self) -> &str {
        &self.publishable_key
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Absolute URL for an API path such as `/v1/search/geofences`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}
