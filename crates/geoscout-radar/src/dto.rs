//! Wire shapes of the Radar REST responses.
//!
//! These only mirror the JSON; turning them into [`Location`](geoscout::Location)s
//! goes through the core projection so every provider is validated the same way.

use geoscout::{Coordinate, RawAddress, RawGeofence, RawGeometry};
use itertools::Itertools;
use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Meta {
    pub code: u16,
    #[serde(default)]
    pub message: Option<String>,
}

/// GeoJSON point; coordinates are `[longitude, latitude]`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GeoJsonPoint {
    pub coordinates: [f64; 2],
}

impl GeoJsonPoint {
    pub const fn to_coordinate(&self) -> Coordinate {
        Coordinate::new(self.coordinates[1], self.coordinates[0])
    }
}

/// GeoJSON polygon; only the outer ring is kept.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GeoJsonPolygon {
    #[serde(default)]
    pub coordinates: Vec<Vec<[f64; 2]>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadarGeofence {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default)]
    pub external_id: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type", default)]
    pub geometry_type: Option<String>,
    #[serde(default)]
    pub geometry_center: Option<GeoJsonPoint>,
    #[serde(default)]
    pub geometry_radius: Option<f64>,
    #[serde(default)]
    pub geometry: Option<GeoJsonPolygon>,
    #[serde(default)]
    pub metadata: Option<Map<String, Value>>,
}

impl RadarGeofence {
    fn raw_geometry(&self) -> RawGeometry {
        let center = self.geometry_center.as_ref().map(GeoJsonPoint::to_coordinate);
        match (self.geometry_type.as_deref(), center) {
            (Some("circle"), Some(center)) => RawGeometry::Circle {
                center,
                radius_meters: self.geometry_radius.unwrap_or_default(),
            },
            (Some("polygon" | "isochrone"), Some(center)) => RawGeometry::Polygon {
                center,
                ring: self
                    .geometry
                    .as_ref()
                    .and_then(|polygon| polygon.coordinates.first())
                    .map(|ring| {
                        ring.iter()
                            .map(|[longitude, latitude]| Coordinate::new(*latitude, *longitude))
                            .collect_vec()
                    })
                    .unwrap_or_default(),
            },
            _ => RawGeometry::Unsupported,
        }
    }

    pub fn into_raw(self) -> RawGeofence {
        RawGeofence {
            geometry: self.raw_geometry(),
            id: self.id,
            external_id: self.external_id,
            tag: self.tag,
            description: self.description,
            metadata: self.metadata,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadarAddress {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub address_label: Option<String>,
}

impl RadarAddress {
    pub fn into_raw(self) -> RawAddress {
        RawAddress {
            formatted_address: self.formatted_address,
            address_label: self.address_label,
            coordinate: Coordinate::new(self.latitude, self.longitude),
        }
    }
}

/// Body of `GET /v1/search/geofences`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GeofenceSearchResponse {
    #[serde(default)]
    pub meta: Meta,
    #[serde(default)]
    pub geofences: Vec<RadarGeofence>,
}

/// Body of `GET /v1/search/autocomplete` and `GET /v1/geocode/forward`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AddressResponse {
    #[serde(default)]
    pub meta: Meta,
    #[serde(default)]
    pub addresses: Vec<RadarAddress>,
}

/// Body of an error response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub meta: Meta,
}
