use std::fmt;

use serde::{Deserialize, Serialize};

use super::Coordinate;

/// Independent search lanes. Each lane is single-flight within itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Nearby,
    Autocomplete,
    Geocode,
}

impl Channel {
    pub const ALL: [Self; 3] = [Self::Nearby, Self::Autocomplete, Self::Geocode];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Nearby => "nearby",
            Self::Autocomplete => "autocomplete",
            Self::Geocode => "geocode",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A debounced piece of user input, stamped with its submission order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryIntent {
    pub text: String,
    pub sequence: u64,
}

impl QueryIntent {
    /// Whether a newer submission has replaced this one.
    pub const fn is_superseded_by(&self, latest_sequence: u64) -> bool {
        self.sequence < latest_sequence
    }
}

/// Parameters of one nearby geofence search.
///
/// Fields are private so an issued request cannot be altered; retries reuse
/// clones of the same value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    anchor: Option<Coordinate>,
    radius_meters: u32,
    tag: String,
    limit: usize,
}

impl SearchRequest {
    pub fn new(
        anchor: Option<Coordinate>,
        radius_meters: u32,
        tag: impl Into<String>,
        limit: usize,
    ) -> Self {
        Self {
            anchor,
            radius_meters,
            tag: tag.into(),
            limit,
        }
    }

    /// `None` means "around the device's current location".
    pub const fn anchor(&self) -> Option<Coordinate> {
        self.anchor
    }

    pub const fn radius_meters(&self) -> u32 {
        self.radius_meters
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub const fn limit(&self) -> usize {
        self.limit
    }
}

/// Parameters of one address autocomplete call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutocompleteRequest {
    text: String,
    anchor: Option<Coordinate>,
    limit: usize,
}

impl AutocompleteRequest {
    pub fn new(text: impl Into<String>, anchor: Option<Coordinate>, limit: usize) -> Self {
        Self {
            text: text.into(),
            anchor,
            limit,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub const fn anchor(&self) -> Option<Coordinate> {
        self.anchor
    }

    pub const fn limit(&self) -> usize {
        self.limit
    }
}

/// Parameters of one forward-geocoding call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeocodeRequest {
    address: String,
}

impl GeocodeRequest {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }
}
