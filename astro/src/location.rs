//! Observer location

use serde::{Deserialize, Serialize};
use std::fmt;

/// Geographic location of the observer
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GeographicLocation {
    /// Latitude in degrees, north positive
    pub latitude_degrees: f64,
    /// Longitude in degrees, east positive
    pub longitude_degrees: f64,
    /// Elevation above sea level in meters
    pub elevation_meters: f64,
}

impl GeographicLocation {
    pub fn new(latitude_degrees: f64, longitude_degrees: f64, elevation_meters: f64) -> Self {
        Self {
            latitude_degrees,
            longitude_degrees,
            elevation_meters,
        }
    }
}

impl fmt::Display for GeographicLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "lat {:+.4}° lon {:+.4}° elev {:.0} m",
            self.latitude_degrees, self.longitude_degrees, self.elevation_meters
        )
    }
}
