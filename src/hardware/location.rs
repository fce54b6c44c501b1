//! Location provider interface

use crate::core::{Coordinate, LOCATION_MAXIMUM_AGE_MS, LOCATION_TIMEOUT_MS};
use serde::{Deserialize, Serialize};

/// Handle identifying an active position watch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct WatchId(pub u32);

/// Position request options
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationOptions {
    /// Prefer precision over battery life and privacy
    pub enable_high_accuracy: bool,
    pub timeout_ms: u32,
    /// Accept a cached result up to this age
    pub maximum_age_ms: u32,
}

impl Default for LocationOptions {
    fn default() -> Self {
        Self {
            enable_high_accuracy: false,
            timeout_ms: LOCATION_TIMEOUT_MS,
            maximum_age_ms: LOCATION_MAXIMUM_AGE_MS,
        }
    }
}

/// Successful position reading
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationFix {
    pub coordinate: Coordinate,
    /// Provider timestamp (milliseconds since epoch)
    pub timestamp_ms: u64,
}

impl LocationFix {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            coordinate: Coordinate::new(latitude, longitude),
            timestamp_ms: 0,
        }
    }

    pub fn with_timestamp(mut self, timestamp_ms: u64) -> Self {
        self.timestamp_ms = timestamp_ms;
        self
    }
}

/// Asynchronous geolocation source.
///
/// Requests return immediately; results are delivered later by the host
/// through the compass controller's location handlers.
pub trait LocationProvider {
    fn is_supported(&self) -> bool;

    /// Ask for a single position
    fn request_current_position(&mut self, options: &LocationOptions);

    /// Start continuous updates
    fn watch_position(&mut self, options: &LocationOptions) -> WatchId;

    fn clear_watch(&mut self, watch_id: WatchId);
}
