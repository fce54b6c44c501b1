//! Spherical-earth bearing and distance math
//!
//! All functions are pure and operate on decimal-degree coordinates.

use crate::core::{Coordinate, DistanceUnit, EARTH_RADIUS_KM, FEET_PER_MILE, KM_TO_MILES};

/// Forward azimuth from `from` to `to`, in degrees within [0, 360).
///
/// Identical points have no defined direction; the result is then 0.
pub fn bearing(from: &Coordinate, to: &Coordinate) -> f64 {
    let phi1 = from.latitude.to_radians();
    let phi2 = to.latitude.to_radians();
    let delta_lambda = (to.longitude - from.longitude).to_radians();

    let y = delta_lambda.sin() * phi2.cos();
    let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * delta_lambda.cos();

    normalize_degrees(y.atan2(x).to_degrees())
}

/// Great-circle distance in kilometres (haversine).
pub fn distance_km(from: &Coordinate, to: &Coordinate) -> f64 {
    let phi1 = from.latitude.to_radians();
    let phi2 = to.latitude.to_radians();
    let delta_phi = (to.latitude - from.latitude).to_radians();
    let delta_lambda = (to.longitude - from.longitude).to_radians();

    let a = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

pub fn km_to_miles(km: f64) -> f64 {
    km * KM_TO_MILES
}

/// Wrap any angle into [0, 360)
pub fn normalize_degrees(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Human-readable distance label.
///
/// Metric: below 1 km in whole metres, below 10 km with one decimal, otherwise
/// whole kilometres. Imperial: below 0.1 mi in whole feet, below 10 mi with one
/// decimal, otherwise whole miles.
pub fn format_distance(distance_km: f64, unit: DistanceUnit) -> String {
    match unit {
        DistanceUnit::Metric => {
            if distance_km < 1.0 {
                format!("{}m", round_half_up(distance_km * 1000.0))
            } else if distance_km < 10.0 {
                format!("{}km", one_decimal(distance_km))
            } else {
                format!("{}km", round_half_up(distance_km))
            }
        }
        DistanceUnit::Imperial => {
            let miles = km_to_miles(distance_km);
            if miles < 0.1 {
                format!("{}ft", round_half_up(miles * FEET_PER_MILE))
            } else if miles < 10.0 {
                format!("{}mi", one_decimal(miles))
            } else {
                format!("{}mi", round_half_up(miles))
            }
        }
    }
}

/// Nearest integer, ties toward positive infinity
fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// One decimal place, rounding the exact binary value of `value`.
///
/// `1.15` is stored as 1.1499999... and so prints `1.1`. Only values that are
/// exactly halfway in binary (1.25, 0.75) round up.
fn one_decimal(value: f64) -> String {
    let twentieths = (value * 20.0).round();
    let exact_tie = value.mul_add(20.0, -twentieths) == 0.0 && twentieths % 2.0 != 0.0;
    if exact_tie {
        format!("{:.1}", (twentieths + 1.0) / 20.0)
    } else {
        format!("{:.1}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn tokyo() -> Coordinate {
        Coordinate::new(35.0, 139.0)
    }

    #[test]
    fn test_bearing_cardinal_directions() {
        let origin = tokyo();
        assert_abs_diff_eq!(bearing(&origin, &Coordinate::new(35.01, 139.0)), 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(bearing(&origin, &Coordinate::new(34.99, 139.0)), 180.0, epsilon = 1e-9);

        let east = bearing(&origin, &Coordinate::new(35.0, 139.01));
        assert_abs_diff_eq!(east, 90.0, epsilon = 0.01);

        let west = bearing(&origin, &Coordinate::new(35.0, 138.99));
        assert_abs_diff_eq!(west, 270.0, epsilon = 0.01);
    }

    #[test]
    fn test_bearing_always_in_range() {
        let points = [
            Coordinate::new(0.0, 0.0),
            Coordinate::new(89.9, 179.9),
            Coordinate::new(-89.9, -179.9),
            Coordinate::new(35.3606, 138.7274),
            Coordinate::new(-33.8688, 151.2093),
            Coordinate::new(51.4779, -0.0015),
        ];

        for a in &points {
            for b in &points {
                let value = bearing(a, b);
                assert!((0.0..360.0).contains(&value), "bearing {} out of range", value);
            }
        }
    }

    #[test]
    fn test_bearing_identical_points_does_not_panic() {
        let value = bearing(&tokyo(), &tokyo());
        assert!(value.is_finite());
        assert!((0.0..360.0).contains(&value));
    }

    #[test]
    fn test_distance_zero_for_identical_points() {
        assert_eq!(distance_km(&tokyo(), &tokyo()), 0.0);
    }

    #[test]
    fn test_distance_symmetry() {
        let a = Coordinate::new(35.6586, 139.7454);
        let b = Coordinate::new(35.3606, 138.7274);
        let c = Coordinate::new(-33.8688, 151.2093);

        assert_relative_eq!(distance_km(&a, &b), distance_km(&b, &a), max_relative = 1e-12);
        assert_relative_eq!(distance_km(&a, &c), distance_km(&c, &a), max_relative = 1e-12);
    }

    #[test]
    fn test_distance_known_values() {
        // 0.01 degree of latitude
        let d = distance_km(&tokyo(), &Coordinate::new(35.01, 139.0));
        assert_abs_diff_eq!(d, 1.1119, epsilon = 1e-3);

        // Quarter meridian
        let d = distance_km(&Coordinate::new(0.0, 0.0), &Coordinate::new(90.0, 0.0));
        assert_abs_diff_eq!(d, EARTH_RADIUS_KM * std::f64::consts::FRAC_PI_2, epsilon = 1e-6);
    }

    #[test]
    fn test_km_to_miles() {
        assert_abs_diff_eq!(km_to_miles(1.0), 0.621371, epsilon = 1e-12);
        assert_eq!(km_to_miles(0.0), 0.0);
    }

    #[test]
    fn test_normalize_degrees() {
        assert_eq!(normalize_degrees(0.0), 0.0);
        assert_eq!(normalize_degrees(360.0), 0.0);
        assert_eq!(normalize_degrees(-90.0), 270.0);
        assert_eq!(normalize_degrees(725.0), 5.0);
        let tiny = normalize_degrees(-1e-20);
        assert!((0.0..360.0).contains(&tiny));
    }

    #[test]
    fn test_format_metric() {
        assert_eq!(format_distance(0.5, DistanceUnit::Metric), "500m");
        assert_eq!(format_distance(0.0, DistanceUnit::Metric), "0m");
        assert_eq!(format_distance(1.2, DistanceUnit::Metric), "1.2km");
        assert_eq!(format_distance(1.0, DistanceUnit::Metric), "1.0km");
        assert_eq!(format_distance(15.0, DistanceUnit::Metric), "15km");
        assert_eq!(format_distance(10.0, DistanceUnit::Metric), "10km");
        assert_eq!(format_distance(0.9994, DistanceUnit::Metric), "999m");
    }

    #[test]
    fn test_format_imperial() {
        // 0.05 km = 0.0311 mi = 164 ft
        assert_eq!(format_distance(0.05, DistanceUnit::Imperial), "164ft");
        // 5 km = 3.107 mi
        assert_eq!(format_distance(5.0, DistanceUnit::Imperial), "3.1mi");
        // 20 km = 12.43 mi
        assert_eq!(format_distance(20.0, DistanceUnit::Imperial), "12mi");
    }

    #[test]
    fn test_format_imperial_breakpoints() {
        // 0.1 mi = 0.160934 km
        assert_eq!(format_distance(0.160, DistanceUnit::Imperial), "525ft");
        assert_eq!(format_distance(0.162, DistanceUnit::Imperial), "0.1mi");

        // 10 mi = 16.0934 km; 9.998 mi still takes the one-decimal branch
        assert_eq!(format_distance(16.09, DistanceUnit::Imperial), "10.0mi");
        assert_eq!(format_distance(16.10, DistanceUnit::Imperial), "10mi");
        assert_eq!(format_distance(16.00, DistanceUnit::Imperial), "9.9mi");
    }

    #[test]
    fn test_format_one_decimal_uses_binary_value() {
        assert_eq!(format_distance(1.15, DistanceUnit::Metric), "1.1km");
        assert_eq!(format_distance(1.45, DistanceUnit::Metric), "1.4km");
        assert_eq!(format_distance(2.05, DistanceUnit::Metric), "2.0km");
        assert_eq!(format_distance(1.75, DistanceUnit::Metric), "1.8km");
    }

    #[test]
    fn test_format_rounds_ties_up() {
        assert_eq!(format_distance(1.25, DistanceUnit::Metric), "1.3km");
        assert_eq!(format_distance(12.5, DistanceUnit::Metric), "13km");
    }
}
