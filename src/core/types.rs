//! Core data types for the compass pipeline

use serde::{Deserialize, Serialize};
use std::fmt;

/// Geodetic coordinate in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Latitude within [-90, 90] and longitude within [-180, 180]
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}

/// Named point of interest shown on the compass face
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub id: String,
    pub position: Coordinate,
}

impl Landmark {
    pub fn new(id: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            id: id.into(),
            position: Coordinate::new(latitude, longitude),
        }
    }
}

/// Bearing and distance from the observer to one landmark
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectionResult {
    pub landmark_id: String,
    /// Forward azimuth in [0, 360)
    pub bearing_degrees: f64,
    pub distance_km: f64,
}

/// Unit system for distance labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnit {
    /// Metres and kilometres
    #[default]
    Metric,
    /// Feet and miles
    Imperial,
}

/// Built-in Tokyo landmark set
pub fn default_landmarks() -> Vec<Landmark> {
    vec![
        Landmark::new("tower", 35.6586, 139.7454),
        Landmark::new("tree", 35.7101, 139.8107),
        Landmark::new("fuji", 35.3606, 138.7274),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_validity() {
        assert!(Coordinate::new(35.0, 139.0).is_valid());
        assert!(Coordinate::new(-90.0, 180.0).is_valid());
        assert!(!Coordinate::new(91.0, 0.0).is_valid());
        assert!(!Coordinate::new(0.0, -180.5).is_valid());
        assert!(!Coordinate::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn test_default_landmarks_have_unique_ids() {
        let landmarks = default_landmarks();
        assert_eq!(landmarks.len(), 3);

        let mut ids: Vec<_> = landmarks.iter().map(|l| l.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn test_distance_unit_serde_names() {
        let json = serde_json::to_string(&DistanceUnit::Imperial).unwrap();
        assert_eq!(json, "\"imperial\"");

        let unit: DistanceUnit = serde_json::from_str("\"metric\"").unwrap();
        assert_eq!(unit, DistanceUnit::Metric);
    }
}
