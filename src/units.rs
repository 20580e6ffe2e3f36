//! Unit conversions applied at the collaborator boundary.
//!
//! The scoring engine works in feet, mph, seconds and degrees only. Every
//! source client converts its raw values with these helpers before handing
//! them on.

/// Feet per meter
pub const METERS_TO_FEET: f64 = 3.28084;

/// Miles per hour per kilometer per hour
pub const KMH_TO_MPH: f64 = 0.621371;

/// Miles per hour per meter per second
pub const MS_TO_MPH: f64 = 2.23694;

pub fn meters_to_feet(meters: f64) -> f64 {
    meters * METERS_TO_FEET
}

pub fn kmh_to_mph(kmh: f64) -> f64 {
    kmh * KMH_TO_MPH
}

pub fn ms_to_mph(ms: f64) -> f64 {
    ms * MS_TO_MPH
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_conversions() {
        assert!(close(meters_to_feet(1.0), 3.28084));
        assert!(close(meters_to_feet(2.0), 6.56168));
        assert!(close(kmh_to_mph(10.0), 6.21371));
        assert!(close(ms_to_mph(5.0), 11.1847));
    }

    #[test]
    fn test_zero_stays_zero() {
        // Missing readings arrive as zero and must stay zero after conversion
        assert_eq!(meters_to_feet(0.0), 0.0);
        assert_eq!(kmh_to_mph(0.0), 0.0);
        assert_eq!(ms_to_mph(0.0), 0.0);
    }
}
