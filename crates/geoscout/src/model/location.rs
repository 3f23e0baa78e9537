use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

/// Latitude/longitude pair in decimal degrees (WGS84).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Whether both components are finite and inside the WGS84 bounds.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Great-circle distance to `other` in metres (haversine).
    pub fn distance_meters(&self, other: &Self) -> f64 {
        const EARTH_RADIUS_METERS: f64 = 6_371_008.8;

        let (lat1, lat2) = (self.latitude.to_radians(), other.latitude.to_radians());
        let d_lat = lat2 - lat1;
        let d_lon = (other.longitude - self.longitude).to_radians();

        let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_METERS * a.sqrt().asin()
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5},{:.5}", self.latitude, self.longitude)
    }
}

/// A metadata value after validation at the projection boundary.
///
/// Upstream metadata dictionaries are untyped; only these three shapes are
/// accepted; anything else is rejected when the record is projected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Bool(bool),
    Number(f64),
    String(String),
}

impl MetadataValue {
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub const fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{value}"),
            Self::Number(value) => write!(f, "{value}"),
            Self::String(value) => f.write_str(value),
        }
    }
}

impl From<bool> for MetadataValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for MetadataValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for MetadataValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

pub type Metadata = BTreeMap<String, MetadataValue>;

/// What a [`Location`] was produced from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationKind {
    /// A geofence returned by a nearby search.
    Geofence,
    /// An address suggestion or geocoding result.
    Address,
    /// A bare map marker with no search-result identity.
    Placeholder,
}

/// Normalized, display-ready location record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Provider-internal identifier. Empty for placeholders.
    pub id: String,
    pub external_id: Option<String>,
    pub tag: Option<String>,
    /// Human-readable label.
    pub label: String,
    pub coordinate: Coordinate,
    #[serde(default)]
    pub metadata: Metadata,
    pub kind: LocationKind,
}

impl Location {
    /// A marker that only exists to be drawn on a map (e.g. a searched address pin).
    pub fn placeholder(coordinate: Coordinate) -> Self {
        Self {
            id: String::new(),
            external_id: None,
            tag: None,
            label: String::new(),
            coordinate,
            metadata: Metadata::new(),
            kind: LocationKind::Placeholder,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.kind == LocationKind::Placeholder
    }

    /// Whether the record may be offered in a selection list.
    pub fn is_selectable(&self) -> bool {
        !self.is_placeholder()
    }

    pub fn metadata_value(&self, key: &str) -> Option<&MetadataValue> {
        self.metadata.get(key)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            LocationKind::Placeholder => write!(f, "Marker @ {}", self.coordinate),
            _ => write!(f, "{} @ {}", self.label, self.coordinate),
        }
    }
}

/// Keep only the entries that can be offered for selection.
pub fn selectable(locations: &[Location]) -> Vec<Location> {
    locations
        .iter()
        .filter(|location| location.is_selectable())
        .cloned()
        .collect()
}

/// Region a map view should display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapRegion {
    pub center: Coordinate,
    pub span_meters: f64,
}

impl MapRegion {
    pub const FALLBACK_CENTER: Coordinate = Coordinate::new(40.73566, -73.99048);
    pub const DEFAULT_SPAN_METERS: f64 = 1_000.0;
    pub const ANCHORED_SPAN_METERS: f64 = 10_000.0;

    pub const fn new(center: Coordinate, span_meters: f64) -> Self {
        Self {
            center,
            span_meters,
        }
    }

    /// Region around a known user position.
    pub const fn around(center: Coordinate) -> Self {
        Self::new(center, Self::DEFAULT_SPAN_METERS)
    }

    /// Wider region used after searching around an entered address.
    pub const fn anchored_at(center: Coordinate) -> Self {
        Self::new(center, Self::ANCHORED_SPAN_METERS)
    }
}

impl Default for MapRegion {
    fn default() -> Self {
        Self::around(Self::FALLBACK_CENTER)
    }
}
