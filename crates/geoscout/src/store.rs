//! Display strings for a store geofence, read from its metadata.

use serde::Serialize;
use tracing::warn;

use crate::model::{Location, MetadataValue};

pub const STORE_HOURS_OPENING_KEY: &str = "store_hours_opening";
pub const STORE_HOURS_CLOSING_KEY: &str = "store_hours_closing";
pub const STORE_ADDRESS_KEY: &str = "store_address";
pub const HAS_CURBSIDE_KEY: &str = "has_curbside";

pub const HOURS_FALLBACK: &str = "Hours not available";
pub const ADDRESS_FALLBACK: &str = "No address available";
pub const CURBSIDE_FALLBACK: &str = "Curbside may not be available";
pub const CURBSIDE_AVAILABLE: &str = "Curbside is available at this location";
pub const CURBSIDE_UNAVAILABLE: &str = "Curbside is not available at this location";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreDetails {
    pub name: String,
    pub hours: String,
    pub address: String,
    pub curbside: String,
}

impl StoreDetails {
    pub fn from_location(location: &Location) -> Self {
        let text = |key: &str| match location.metadata_value(key) {
            Some(MetadataValue::String(value)) => Some(value.as_str()),
            Some(other) => {
                warn!(id = %location.id, key, value = %other, "Expected a string metadata value");
                None
            }
            None => None,
        };

        let hours = match (text(STORE_HOURS_OPENING_KEY), text(STORE_HOURS_CLOSING_KEY)) {
            (Some(opening), Some(closing)) => format!("Store hours: {opening} - {closing}"),
            _ => HOURS_FALLBACK.to_owned(),
        };
        let address = text(STORE_ADDRESS_KEY).unwrap_or(ADDRESS_FALLBACK).to_owned();
        let curbside = match location
            .metadata_value(HAS_CURBSIDE_KEY)
            .and_then(MetadataValue::as_bool)
        {
            Some(true) => CURBSIDE_AVAILABLE,
            Some(false) => CURBSIDE_UNAVAILABLE,
            None => CURBSIDE_FALLBACK,
        }
        .to_owned();

        Self {
            name: location.label.clone(),
            hours,
            address,
            curbside,
        }
    }
}
