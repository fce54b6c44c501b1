//! Geodesic algorithms

pub mod geo_math;
pub mod direction;

pub use geo_math::{bearing, distance_km, format_distance, km_to_miles, normalize_degrees};
pub use direction::DirectionEngine;
