//! GPS jitter rejection for location updates
//!
//! The threshold is a flat per-axis degree delta. Metres per degree of
//! longitude shrink toward the poles, so the effective distance varies with
//! latitude; that is accepted behavior.

use crate::core::{Coordinate, INSIGNIFICANT_MOVE_DEG};

/// Rejects location updates that barely differ from a reference location
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementFilter {
    threshold_deg: f64,
    accepted: u64,
    rejected: u64,
}

impl Default for MovementFilter {
    fn default() -> Self {
        Self::new(INSIGNIFICANT_MOVE_DEG)
    }
}

impl MovementFilter {
    pub fn new(threshold_deg: f64) -> Self {
        Self {
            threshold_deg,
            accepted: 0,
            rejected: 0,
        }
    }

    /// A move is insignificant when both axes change by less than the threshold
    pub fn is_significant(&self, reference: &Coordinate, candidate: &Coordinate) -> bool {
        let lat_diff = (candidate.latitude - reference.latitude).abs();
        let lon_diff = (candidate.longitude - reference.longitude).abs();
        !(lat_diff < self.threshold_deg && lon_diff < self.threshold_deg)
    }

    /// Check `candidate` against an optional reference and count the outcome.
    /// With no reference every candidate passes.
    pub fn accept(&mut self, reference: Option<&Coordinate>, candidate: &Coordinate) -> bool {
        let significant = reference.map_or(true, |r| self.is_significant(r, candidate));
        if significant {
            self.accepted += 1;
        } else {
            self.rejected += 1;
        }
        significant
    }

    pub fn threshold_deg(&self) -> f64 {
        self.threshold_deg
    }

    pub fn accepted(&self) -> u64 {
        self.accepted
    }

    pub fn rejected(&self) -> u64 {
        self.rejected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_moves_are_insignificant() {
        let filter = MovementFilter::default();
        let reference = Coordinate::new(35.0, 139.0);

        assert!(!filter.is_significant(&reference, &Coordinate::new(35.00005, 139.00005)));
        assert!(!filter.is_significant(&reference, &Coordinate::new(34.99995, 138.99991)));
        assert!(!filter.is_significant(&reference, &reference));
    }

    #[test]
    fn test_either_axis_crossing_threshold_is_significant() {
        let filter = MovementFilter::default();
        let reference = Coordinate::new(35.0, 139.0);

        assert!(filter.is_significant(&reference, &Coordinate::new(35.0002, 139.0)));
        assert!(filter.is_significant(&reference, &Coordinate::new(35.0, 138.9998)));
        assert!(filter.is_significant(&reference, &Coordinate::new(35.00001, 139.0005)));
    }

    #[test]
    fn test_accept_counts_outcomes() {
        let mut filter = MovementFilter::default();
        let reference = Coordinate::new(35.0, 139.0);

        assert!(filter.accept(None, &reference));
        assert!(!filter.accept(Some(&reference), &Coordinate::new(35.00001, 139.0)));
        assert!(filter.accept(Some(&reference), &Coordinate::new(35.001, 139.0)));

        assert_eq!(filter.accepted(), 2);
        assert_eq!(filter.rejected(), 1);
    }

    #[test]
    fn test_custom_threshold() {
        let filter = MovementFilter::new(0.01);
        let reference = Coordinate::new(0.0, 0.0);
        assert!(!filter.is_significant(&reference, &Coordinate::new(0.005, 0.005)));
        assert!(filter.is_significant(&reference, &Coordinate::new(0.02, 0.0)));
    }
}
