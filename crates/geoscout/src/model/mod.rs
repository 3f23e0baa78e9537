//! Plain data types shared by every part of the coordinator.

mod location;
mod outcome;
mod request;

pub use location::{
    Coordinate, Location, LocationKind, MapRegion, Metadata, MetadataValue, selectable,
};
pub use outcome::{SearchError, SearchOutcome, SearchSessionState};
pub use request::{AutocompleteRequest, Channel, GeocodeRequest, QueryIntent, SearchRequest};
