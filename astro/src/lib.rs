//! Astronomical coordinates for the mount simulator
//!
//! Features:
//! - Angle normalization and hour/degree conversion helpers
//! - Julian date and sidereal time from the system clock
//! - Equatorial <-> horizontal coordinate transforms

pub mod angles;
pub mod location;
pub mod time;
pub mod transform;

pub use angles::{degrees_to_hours, hours_to_degrees, normalize_degrees, normalize_hours};
pub use location::GeographicLocation;
pub use time::{
    greenwich_mean_sidereal_time, julian_date_from, julian_date_now, local_sidereal_time,
    JD_J2000, JD_UNIX_EPOCH,
};
pub use transform::{equatorial_to_horizontal, horizontal_to_equatorial};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Position on the celestial sphere in the equatorial frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquatorialCoordinates {
    /// Right ascension in hours, [0, 24)
    pub right_ascension_hours: f64,
    /// Declination in degrees, [-90, 90]
    pub declination_degrees: f64,
}

impl EquatorialCoordinates {
    /// Create coordinates with the right ascension normalized into [0, 24)
    pub fn new(right_ascension_hours: f64, declination_degrees: f64) -> Self {
        Self {
            right_ascension_hours: normalize_hours(right_ascension_hours),
            declination_degrees,
        }
    }
}

impl fmt::Display for EquatorialCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RA {:.4}h Dec {:+.4}°",
            self.right_ascension_hours, self.declination_degrees
        )
    }
}

/// Position in the local horizontal frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HorizontalCoordinates {
    /// Altitude above the horizon in degrees, [-90, 90]
    pub altitude_degrees: f64,
    /// Azimuth in degrees from true north, increasing eastward, [0, 360)
    pub azimuth_degrees: f64,
}

impl HorizontalCoordinates {
    /// Create coordinates with the azimuth normalized into [0, 360)
    pub fn new(altitude_degrees: f64, azimuth_degrees: f64) -> Self {
        Self {
            altitude_degrees,
            azimuth_degrees: normalize_degrees(azimuth_degrees),
        }
    }
}

impl fmt::Display for HorizontalCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Alt {:+.4}° Az {:.4}°",
            self.altitude_degrees, self.azimuth_degrees
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equatorial_new_normalizes_ra() {
        let coords = EquatorialCoordinates::new(25.5, 10.0);
        assert!((coords.right_ascension_hours - 1.5).abs() < 1e-12);
        assert_eq!(coords.declination_degrees, 10.0);

        let coords = EquatorialCoordinates::new(-1.0, -10.0);
        assert!((coords.right_ascension_hours - 23.0).abs() < 1e-12);
    }

    #[test]
    fn test_horizontal_new_normalizes_azimuth() {
        let coords = HorizontalCoordinates::new(45.0, -90.0);
        assert!((coords.azimuth_degrees - 270.0).abs() < 1e-12);
        assert_eq!(coords.altitude_degrees, 45.0);
    }

    #[test]
    fn test_coordinate_display() {
        let eq = EquatorialCoordinates::new(6.0, 45.0);
        assert_eq!(format!("{}", eq), "RA 6.0000h Dec +45.0000°");

        let hz = HorizontalCoordinates::new(-10.0, 120.0);
        assert_eq!(format!("{}", hz), "Alt -10.0000° Az 120.0000°");
    }
}
