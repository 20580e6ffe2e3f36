//! # Compass Geometry
//!
//! Bearing arithmetic used by the scoring engine. All bearings are degrees,
//! 0 = North, increasing clockwise. Inputs outside [0, 360) are accepted and
//! normalized.

/// Width of the "close miss" band around an optimal swell window edge.
pub const NEAR_MISS_DEGREES: f64 = 30.0;

/// Wrap any bearing into [0, 360).
pub fn normalize_bearing(deg: f64) -> f64 {
    let wrapped = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Circular distance between two bearings, in [0, 180].
///
/// # Example
/// ```
/// use surf_report_lib::geometry::angle_diff;
///
/// assert_eq!(angle_diff(0.0, 350.0), 10.0);
/// assert_eq!(angle_diff(350.0, 10.0), 20.0);
/// assert_eq!(angle_diff(90.0, 270.0), 180.0);
/// ```
pub fn angle_diff(a: f64, b: f64) -> f64 {
    let diff = (a - b).abs() % 360.0;
    if diff > 180.0 {
        360.0 - diff
    } else {
        diff
    }
}

/// True if `dir` lies on the closed arc from `min` clockwise to `max`.
///
/// When `min > max` the arc crosses north, so `min = 350, max = 20`
/// contains 5 but not 100.
pub fn is_in_range(dir: f64, min: f64, max: f64) -> bool {
    let dir = normalize_bearing(dir);
    let min = normalize_bearing(min);
    let max = normalize_bearing(max);

    if min <= max {
        dir >= min && dir <= max
    } else {
        dir >= min || dir <= max
    }
}

/// True if `dir` is within 30° of either edge of the window.
///
/// Independent of whether `dir` is inside the window; callers check
/// [`is_in_range`] first.
pub fn is_within_30_degrees(dir: f64, min: f64, max: f64) -> bool {
    angle_diff(dir, min) <= NEAR_MISS_DEGREES || angle_diff(dir, max) <= NEAR_MISS_DEGREES
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_angle_diff_symmetric_and_zero() {
        for &(a, b) in &[(0.0, 90.0), (10.0, 350.0), (123.0, 301.5), (270.0, 90.0)] {
            assert_eq!(angle_diff(a, b), angle_diff(b, a), "{a} vs {b}");
        }
        for &x in &[0.0, 45.0, 180.0, 359.0] {
            assert_eq!(angle_diff(x, x), 0.0);
        }
    }

    #[test]
    fn test_angle_diff_wraps() {
        assert_eq!(angle_diff(0.0, 350.0), 10.0);
        assert_eq!(angle_diff(350.0, 10.0), 20.0);
        assert_eq!(angle_diff(0.0, 180.0), 180.0);
        assert_eq!(angle_diff(720.0, 10.0), 10.0);
    }

    #[test]
    fn test_angle_diff_stays_within_half_circle() {
        let mut a = 0.0;
        while a < 360.0 {
            let d = angle_diff(a, 17.0);
            assert!((0.0..=180.0).contains(&d), "angle_diff({a}, 17) = {d}");
            a += 7.5;
        }
    }

    #[test]
    fn test_is_in_range_plain_window() {
        assert!(is_in_range(270.0, 260.0, 280.0));
        assert!(is_in_range(260.0, 260.0, 280.0));
        assert!(is_in_range(280.0, 260.0, 280.0));
        assert!(!is_in_range(259.0, 260.0, 280.0));
        assert!(!is_in_range(90.0, 260.0, 280.0));
    }

    #[test]
    fn test_is_in_range_wraps_north() {
        assert!(is_in_range(350.0, 340.0, 20.0));
        assert!(is_in_range(5.0, 350.0, 20.0));
        assert!(is_in_range(0.0, 340.0, 20.0));
        assert!(!is_in_range(100.0, 340.0, 20.0));
        assert!(!is_in_range(330.0, 340.0, 20.0));
    }

    #[test]
    fn test_is_in_range_normalizes_inputs() {
        assert!(is_in_range(-10.0, 340.0, 20.0));
        assert!(is_in_range(630.0, 260.0, 280.0));
        assert!(is_in_range(270.0, -100.0, -80.0));
    }

    #[test]
    fn test_is_within_30_degrees() {
        assert!(is_within_30_degrees(230.0, 260.0, 280.0));
        assert!(is_within_30_degrees(310.0, 260.0, 280.0));
        assert!(!is_within_30_degrees(229.0, 260.0, 280.0));
        assert!(!is_within_30_degrees(311.0, 260.0, 280.0));
        // Edge proximity across north
        assert!(is_within_30_degrees(355.0, 20.0, 40.0));
    }

    #[test]
    fn test_normalize_bearing() {
        assert_eq!(normalize_bearing(360.0), 0.0);
        assert_eq!(normalize_bearing(-90.0), 270.0);
        assert_eq!(normalize_bearing(725.0), 5.0);
        assert!(normalize_bearing(-1e-20) < 360.0);
    }
}
