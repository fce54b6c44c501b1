//! Physical constants and pipeline parameters

/// Mean Earth radius used by the haversine formula (km)
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Kilometres to statute miles
pub const KM_TO_MILES: f64 = 0.621371;

pub const FEET_PER_MILE: f64 = 5280.0;

/// Orientation throttle cool-down, ~30 updates per second (ms)
pub const ORIENTATION_DELAY_MS: f64 = 33.3;

/// Location debounce quiescence window (ms)
pub const LOCATION_DELAY_MS: f64 = 60_000.0;

/// Longest accepted throttle or debounce delay (ms), about 49.7 days
pub const MAX_DELAY_MS: f64 = u32::MAX as f64;

/// Per-axis degree delta below which a location update is GPS jitter (~11 m)
pub const INSIGNIFICANT_MOVE_DEG: f64 = 0.0001;

/// Gap between the compass rim and the landmark icon ring (px)
pub const LANDMARK_MARGIN_PX: f64 = 20.0;

/// Compass diameter used when the render sink cannot measure it (px)
pub const DEFAULT_COMPASS_DIAMETER_PX: f64 = 300.0;

/// Geolocation request timeout (ms)
pub const LOCATION_TIMEOUT_MS: u32 = 30_000;

/// Maximum age of a cached geolocation result (ms)
pub const LOCATION_MAXIMUM_AGE_MS: u32 = 60_000;

/// Scheduler channel for orientation updates
pub const ORIENTATION_CHANNEL: &str = "orientation";

/// Scheduler channel for location updates
pub const LOCATION_CHANNEL: &str = "location";

/// Placeholder shown in a distance label before the first fix
pub const DISTANCE_PLACEHOLDER: &str = "--";
