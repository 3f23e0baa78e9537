//! Projection of raw provider records into [`Location`]s.
//!
//! This is the validation boundary: geometry variants are unwrapped to a single
//! centre point and untyped metadata is coerced into [`MetadataValue`]. A record
//! that does not fit is rejected as a whole.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::model::{Coordinate, Location, LocationKind, Metadata, MetadataValue};

pub use error::ProjectionError;

/// Label used when a record has no description.
pub const FALLBACK_LABEL: &str = "Unnamed location";

/// Geometry of a geofence as returned by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RawGeometry {
    Circle {
        center: Coordinate,
        radius_meters: f64,
    },
    Polygon {
        center: Coordinate,
        #[serde(default)]
        ring: Vec<Coordinate>,
    },
    /// Any geometry type this crate does not understand.
    #[serde(other)]
    Unsupported,
}

impl RawGeometry {
    pub const fn center(&self) -> Option<Coordinate> {
        match self {
            Self::Circle { center, .. } | Self::Polygon { center, .. } => Some(*center),
            Self::Unsupported => None,
        }
    }
}

/// A geofence record straight from the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawGeofence {
    pub id: String,
    #[serde(default)]
    pub external_id: Option<String>,
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub geometry: RawGeometry,
    #[serde(default)]
    pub metadata: Option<Map<String, Value>>,
}

/// An address record (autocomplete suggestion or geocoding hit).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawAddress {
    #[serde(default)]
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub address_label: Option<String>,
    pub coordinate: Coordinate,
}

/// Project a single geofence.
pub fn project_geofence(raw: &RawGeofence) -> Result<Location, ProjectionError> {
    let coordinate = raw
        .geometry
        .center()
        .ok_or_else(|| ProjectionError::UnsupportedGeometry { id: raw.id.clone() })?;
    check_coordinate(&raw.id, coordinate)?;

    let metadata = match &raw.metadata {
        Some(map) => coerce_metadata(&raw.id, map)?,
        None => Metadata::new(),
    };

    let label = raw
        .description
        .as_deref()
        .filter(|description| !description.trim().is_empty())
        .unwrap_or(FALLBACK_LABEL)
        .to_owned();

    Ok(Location {
        id: raw.id.clone(),
        external_id: raw.external_id.clone(),
        tag: raw.tag.clone(),
        label,
        coordinate,
        metadata,
        kind: LocationKind::Geofence,
    })
}

/// Project a batch of geofences, failing on the first bad record.
pub fn project_geofences<'a, I>(records: I) -> Result<Vec<Location>, ProjectionError>
where
    I: IntoIterator<Item = &'a RawGeofence>,
{
    let locations = records
        .into_iter()
        .map(project_geofence)
        .collect::<Result<Vec<_>, _>>()?;
    debug!(count = locations.len(), "Projected geofences");
    Ok(locations)
}

/// Project an address suggestion.
pub fn project_address(raw: &RawAddress) -> Result<Location, ProjectionError> {
    let id = raw
        .formatted_address
        .clone()
        .unwrap_or_else(|| raw.coordinate.to_string());
    check_coordinate(&id, raw.coordinate)?;

    let label = raw
        .formatted_address
        .as_deref()
        .or(raw.address_label.as_deref())
        .unwrap_or(FALLBACK_LABEL)
        .to_owned();

    Ok(Location {
        id,
        external_id: None,
        tag: None,
        label,
        coordinate: raw.coordinate,
        metadata: Metadata::new(),
        kind: LocationKind::Address,
    })
}

pub fn project_addresses<'a, I>(records: I) -> Result<Vec<Location>, ProjectionError>
where
    I: IntoIterator<Item = &'a RawAddress>,
{
    records.into_iter().map(project_address).collect()
}

fn check_coordinate(id: &str, coordinate: Coordinate) -> Result<(), ProjectionError> {
    if coordinate.is_valid() {
        Ok(())
    } else {
        Err(ProjectionError::InvalidCoordinate {
            id: id.to_owned(),
            latitude: coordinate.latitude,
            longitude: coordinate.longitude,
        })
    }
}

fn coerce_metadata(id: &str, raw: &Map<String, Value>) -> Result<Metadata, ProjectionError> {
    raw.iter()
        .map(|(key, value)| {
            let coerced = match value {
                Value::Bool(flag) => MetadataValue::Bool(*flag),
                Value::String(text) => MetadataValue::String(text.clone()),
                Value::Number(number) => number.as_f64().map(MetadataValue::Number).ok_or_else(
                    || ProjectionError::UnsupportedMetadataValue {
                        id: id.to_owned(),
                        key: key.clone(),
                        found: "non-finite number",
                    },
                )?,
                other => {
                    return Err(ProjectionError::UnsupportedMetadataValue {
                        id: id.to_owned(),
                        key: key.clone(),
                        found: json_type_name(other),
                    });
                }
            };
            Ok((key.clone(), coerced))
        })
        .collect()
}

const fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

mod error {
    use thiserror::Error;

    #[derive(Error, Debug, Clone, PartialEq)]
    pub enum ProjectionError {
        #[error("record `{id}` has an unsupported geometry")]
        UnsupportedGeometry { id: String },
        #[error("record `{id}` has an unsupported {found} value for metadata key `{key}`")]
        UnsupportedMetadataValue {
            id: String,
            key: String,
            found: &'static str,
        },
        #[error("record `{id}` has an out-of-range coordinate ({latitude}, {longitude})")]
        InvalidCoordinate {
            id: String,
            latitude: f64,
            longitude: f64,
        },
    }
}
