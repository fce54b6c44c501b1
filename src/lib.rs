//! Landmark Compass
//!
//! Computes bearing and distance from the observer to a fixed set of
//! landmarks and keeps a compass face in sync as position and device heading
//! change. Sensor input is rate limited before it touches state; rendering
//! goes through a sink trait so the pipeline runs without any UI.

pub mod core;
pub mod algorithms;
pub mod processing;
pub mod utils;
pub mod hardware;
pub mod api;

// Re-export commonly used types
pub use crate::core::{Coordinate, DirectionResult, DistanceUnit, Landmark, EARTH_RADIUS_KM};
pub use crate::algorithms::{bearing, distance_km, format_distance, km_to_miles, DirectionEngine};
pub use crate::processing::{Clock, ManualClock, MovementFilter, SystemClock, UpdateScheduler};
pub use crate::hardware::{
    LocationFix, LocationOptions, LocationProvider, OrientationProvider, OrientationReading, SensorError,
    SensorResult, WatchId,
};
pub use crate::api::{
    CompassRenderer, Element, LandmarkCompass, MessageKey, PositionState, RenderSink, StatusChannel, StatusSink,
    TextCatalog, Transform,
};
pub use crate::utils::{CompassConfig, ConfigError, ConfigurationManager};
