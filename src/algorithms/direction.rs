//! Per-landmark bearing and distance computation
//!
//! The engine is the only place geodesic values are computed. Rendering
//! consumes its cached result set, so heading-only updates never touch the
//! geodesic math.

use crate::algorithms::geo_math::{bearing, distance_km};
use crate::api::state::PositionState;
use crate::core::{DirectionResult, Landmark};
use log::debug;

/// Computes and caches direction results for a fixed landmark set
#[derive(Debug, Clone)]
pub struct DirectionEngine {
    landmarks: Vec<Landmark>,
    latest: Vec<DirectionResult>,
    recompute_count: u64,
}

impl DirectionEngine {
    pub fn new(landmarks: Vec<Landmark>) -> Self {
        Self {
            landmarks,
            latest: Vec::new(),
            recompute_count: 0,
        }
    }

    /// Bearing and distance from the current location to every landmark.
    ///
    /// Returns an empty set while no location is known.
    pub fn compute(state: &PositionState, landmarks: &[Landmark]) -> Vec<DirectionResult> {
        let Some(origin) = state.current_location() else {
            return Vec::new();
        };

        landmarks
            .iter()
            .map(|landmark| DirectionResult {
                landmark_id: landmark.id.clone(),
                bearing_degrees: bearing(&origin, &landmark.position),
                distance_km: distance_km(&origin, &landmark.position),
            })
            .collect()
    }

    /// Recompute against `state` and replace the cached result set.
    ///
    /// Without a location the cache is left untouched and an empty slice is
    /// returned, so callers skip rendering.
    pub fn recompute_all(&mut self, state: &PositionState) -> &[DirectionResult] {
        if state.current_location().is_none() {
            return &[];
        }

        self.latest = Self::compute(state, &self.landmarks);
        self.recompute_count += 1;
        debug!(
            "Recomputed directions for {} landmarks (pass {})",
            self.latest.len(),
            self.recompute_count
        );
        &self.latest
    }

    /// Last computed result set
    pub fn latest(&self) -> &[DirectionResult] {
        &self.latest
    }

    pub fn landmarks(&self) -> &[Landmark] {
        &self.landmarks
    }

    /// Number of geodesic passes run so far
    pub fn recompute_count(&self) -> u64 {
        self.recompute_count
    }

    /// Drop cached results
    pub fn clear(&mut self) {
        self.latest.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Coordinate;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_compute_without_location_is_empty() {
        let state = PositionState::new();
        let results = DirectionEngine::compute(&state, &crate::core::default_landmarks());
        assert!(results.is_empty());
    }

    #[test]
    fn test_recompute_without_location_keeps_cache() {
        let mut engine = DirectionEngine::new(vec![Landmark::new("north", 35.01, 139.0)]);
        let mut state = PositionState::new();
        state.set_location(Coordinate::new(35.0, 139.0));
        assert_eq!(engine.recompute_all(&state).len(), 1);

        state.reset();
        assert!(engine.recompute_all(&state).is_empty());
        assert_eq!(engine.latest().len(), 1);
        assert_eq!(engine.recompute_count(), 1);
    }

    #[test]
    fn test_one_result_per_landmark() {
        let mut engine = DirectionEngine::new(crate::core::default_landmarks());
        let mut state = PositionState::new();
        state.set_location(Coordinate::new(35.68, 139.76));

        let results = engine.recompute_all(&state);
        assert_eq!(results.len(), 3);
        for result in results {
            assert!((0.0..360.0).contains(&result.bearing_degrees));
            assert!(result.distance_km >= 0.0);
        }
    }

    #[test]
    fn test_empty_landmark_set() {
        let mut engine = DirectionEngine::new(Vec::new());
        let mut state = PositionState::new();
        state.set_location(Coordinate::new(35.0, 139.0));
        assert!(engine.recompute_all(&state).is_empty());
        assert_eq!(engine.recompute_count(), 1);
    }

    #[test]
    fn test_due_north_landmark() {
        let mut state = PositionState::new();
        state.set_location(Coordinate::new(35.0, 139.0));
        let results = DirectionEngine::compute(&state, &[Landmark::new("peak", 35.01, 139.0)]);

        assert_eq!(results[0].landmark_id, "peak");
        assert_abs_diff_eq!(results[0].bearing_degrees, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(results[0].distance_km, 1.11, epsilon = 0.01);
    }

    #[test]
    fn test_heading_does_not_affect_results() {
        let landmarks = crate::core::default_landmarks();
        let mut state = PositionState::new();
        state.set_location(Coordinate::new(35.68, 139.76));
        let before = DirectionEngine::compute(&state, &landmarks);

        state.set_heading(123.0);
        let after = DirectionEngine::compute(&state, &landmarks);
        assert_eq!(before, after);
    }
}
