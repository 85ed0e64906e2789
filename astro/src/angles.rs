//! Angle normalization and conversion helpers

/// Floored modulo, result always in [0, modulus)
fn modulo(value: f64, modulus: f64) -> f64 {
    ((value % modulus) + modulus) % modulus
}

/// Normalize an angle in degrees into [0, 360)
pub fn normalize_degrees(degrees: f64) -> f64 {
    modulo(degrees, 360.0)
}

/// Normalize an hour angle into [0, 24)
pub fn normalize_hours(hours: f64) -> f64 {
    modulo(hours, 24.0)
}

/// Convert right ascension hours to degrees (1 hour = 15 degrees)
pub fn hours_to_degrees(hours: f64) -> f64 {
    hours * 15.0
}

/// Convert degrees to right ascension hours
pub fn degrees_to_hours(degrees: f64) -> f64 {
    degrees / 15.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_degrees() {
        assert_eq!(normalize_degrees(0.0), 0.0);
        assert_eq!(normalize_degrees(360.0), 0.0);
        assert_eq!(normalize_degrees(370.0), 10.0);
        assert_eq!(normalize_degrees(-10.0), 350.0);
        assert_eq!(normalize_degrees(720.0), 0.0);
        assert_eq!(normalize_degrees(-725.0), 355.0);
    }

    #[test]
    fn test_normalize_degrees_stays_in_range() {
        // A tiny negative input must not round up to the excluded bound
        let normalized = normalize_degrees(-1e-16);
        assert!((0.0..360.0).contains(&normalized));
    }

    #[test]
    fn test_normalize_hours() {
        assert_eq!(normalize_hours(0.0), 0.0);
        assert_eq!(normalize_hours(24.0), 0.0);
        assert_eq!(normalize_hours(25.5), 1.5);
        assert_eq!(normalize_hours(-1.0), 23.0);
        assert_eq!(normalize_hours(-25.0), 23.0);
    }

    #[test]
    fn test_hour_degree_conversion() {
        assert_eq!(hours_to_degrees(1.0), 15.0);
        assert_eq!(hours_to_degrees(24.0), 360.0);
        assert_eq!(degrees_to_hours(180.0), 12.0);
        assert_eq!(degrees_to_hours(hours_to_degrees(6.5)), 6.5);
    }
}
