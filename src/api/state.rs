//! Observer position and heading state

use crate::algorithms::geo_math::normalize_degrees;
use crate::core::Coordinate;
use crate::hardware::WatchId;
use serde::Serialize;
use std::time::Duration;

/// Latest known location and heading of the observer.
///
/// Heading is always kept in [0, 360). Location, once set, only goes back to
/// absent through [`PositionState::reset`].
#[derive(Debug, Clone, Default)]
pub struct PositionState {
    current_location: Option<Coordinate>,
    current_heading_degrees: f64,
    /// Clock time of the last committed location
    location_updated_at: Option<Duration>,
    /// Clock time of the last applied heading
    heading_updated_at: Option<Duration>,
    watch_id: Option<WatchId>,
    compass_active: bool,
    compass_supported: bool,
}

/// Serializable view of [`PositionState`] for diagnostics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateSnapshot {
    pub current_location: Option<Coordinate>,
    pub current_heading_degrees: f64,
    pub location_updated_ms: Option<u64>,
    pub heading_updated_ms: Option<u64>,
    pub watching_location: bool,
    pub compass_active: bool,
    pub compass_supported: bool,
}

impl PositionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_location(&self) -> Option<Coordinate> {
        self.current_location
    }

    pub fn has_location(&self) -> bool {
        self.current_location.is_some()
    }

    pub fn current_heading_degrees(&self) -> f64 {
        self.current_heading_degrees
    }

    pub fn set_location(&mut self, location: Coordinate) {
        self.current_location = Some(location);
    }

    pub(crate) fn set_location_at(&mut self, location: Coordinate, now: Duration) {
        self.set_location(location);
        self.location_updated_at = Some(now);
    }

    /// Store a heading, wrapped into [0, 360)
    pub fn set_heading(&mut self, degrees: f64) {
        if degrees.is_finite() {
            self.current_heading_degrees = normalize_degrees(degrees);
        }
    }

    pub(crate) fn set_heading_at(&mut self, degrees: f64, now: Duration) {
        self.set_heading(degrees);
        self.heading_updated_at = Some(now);
    }

    pub fn location_updated_at(&self) -> Option<Duration> {
        self.location_updated_at
    }

    pub fn heading_updated_at(&self) -> Option<Duration> {
        self.heading_updated_at
    }

    pub fn watch_id(&self) -> Option<WatchId> {
        self.watch_id
    }

    pub fn is_watching(&self) -> bool {
        self.watch_id.is_some()
    }

    pub(crate) fn set_watch_id(&mut self, watch_id: Option<WatchId>) {
        self.watch_id = watch_id;
    }

    pub fn compass_active(&self) -> bool {
        self.compass_active
    }

    pub(crate) fn set_compass_active(&mut self, active: bool) {
        self.compass_active = active;
    }

    pub fn compass_supported(&self) -> bool {
        self.compass_supported
    }

    pub(crate) fn set_compass_supported(&mut self, supported: bool) {
        self.compass_supported = supported;
    }

    /// Back to the initial state: no location, heading 0, no subscriptions
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            current_location: self.current_location,
            current_heading_degrees: self.current_heading_degrees,
            location_updated_ms: self.location_updated_at.map(|t| t.as_millis() as u64),
            heading_updated_ms: self.heading_updated_at.map(|t| t.as_millis() as u64),
            watching_location: self.is_watching(),
            compass_active: self.compass_active,
            compass_supported: self.compass_supported,
        }
    }
}
