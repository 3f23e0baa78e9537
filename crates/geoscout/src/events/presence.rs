use ahash::AHashSet as HashSet;
use tracing::info;

use super::{GeofenceEvent, GeofenceEventHandler, GeofenceTransition};

/// Which geofences the user is currently inside.
///
/// Being inside any of them switches the app into "in-store" mode.
#[derive(Debug, Clone, Default)]
pub struct GeofencePresence {
    inside: HashSet<String>,
}

impl GeofencePresence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_inside(&self, geofence_id: &str) -> bool {
        self.inside.contains(geofence_id)
    }

    pub fn in_store_mode(&self) -> bool {
        !self.inside.is_empty()
    }

    pub fn occupied(&self) -> impl Iterator<Item = &str> {
        self.inside.iter().map(String::as_str)
    }
}

impl GeofenceEventHandler for GeofencePresence {
    fn on_geofence_event(&mut self, event: &GeofenceEvent) {
        let was_in_store = self.in_store_mode();
        match event.transition {
            GeofenceTransition::Entered => {
                self.inside.insert(event.geofence_id.clone());
            }
            GeofenceTransition::Exited => {
                self.inside.remove(&event.geofence_id);
            }
        }
        if was_in_store != self.in_store_mode() {
            info!(in_store = self.in_store_mode(), "In-store mode changed");
        }
    }
}
