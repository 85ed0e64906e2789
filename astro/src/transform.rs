//! Equatorial <-> horizontal coordinate transforms
//!
//! Azimuth is referenced to true north and increases eastward. Right
//! ascension and hour angles are in hours, everything else in degrees.

use crate::angles::{degrees_to_hours, hours_to_degrees, normalize_degrees, normalize_hours};
use crate::time::local_sidereal_time;
use crate::{EquatorialCoordinates, GeographicLocation, HorizontalCoordinates};

/// Convert equatorial coordinates to the horizontal frame at a Julian date
pub fn equatorial_to_horizontal(
    equatorial: &EquatorialCoordinates,
    location: &GeographicLocation,
    julian_date: f64,
) -> HorizontalCoordinates {
    let lst_hours = local_sidereal_time(julian_date, location.longitude_degrees);
    let hour_angle =
        hours_to_degrees(normalize_hours(lst_hours - equatorial.right_ascension_hours)).to_radians();
    let declination = equatorial.declination_degrees.to_radians();
    let latitude = location.latitude_degrees.to_radians();

    // alt = asin(sin dec sin lat + cos dec cos lat cos HA)
    let sin_altitude = declination.sin() * latitude.sin()
        + declination.cos() * latitude.cos() * hour_angle.cos();
    let altitude = sin_altitude.clamp(-1.0, 1.0).asin();

    // az = atan2(-cos dec sin HA, sin dec cos lat - cos dec sin lat cos HA)
    let azimuth = (-declination.cos() * hour_angle.sin()).atan2(
        declination.sin() * latitude.cos() - declination.cos() * latitude.sin() * hour_angle.cos(),
    );

    HorizontalCoordinates {
        altitude_degrees: altitude.to_degrees(),
        azimuth_degrees: normalize_degrees(azimuth.to_degrees()),
    }
}

/// Convert horizontal coordinates back to the equatorial frame at a Julian date
pub fn horizontal_to_equatorial(
    horizontal: &HorizontalCoordinates,
    location: &GeographicLocation,
    julian_date: f64,
) -> EquatorialCoordinates {
    let altitude = horizontal.altitude_degrees.to_radians();
    let azimuth = horizontal.azimuth_degrees.to_radians();
    let latitude = location.latitude_degrees.to_radians();

    // dec = asin(sin lat sin alt + cos lat cos alt cos az)
    let sin_declination =
        latitude.sin() * altitude.sin() + latitude.cos() * altitude.cos() * azimuth.cos();
    let declination = sin_declination.clamp(-1.0, 1.0).asin();

    // HA = atan2(-sin az cos alt, sin alt cos lat - cos alt sin lat cos az)
    let hour_angle = (-azimuth.sin() * altitude.cos()).atan2(
        altitude.sin() * latitude.cos() - altitude.cos() * latitude.sin() * azimuth.cos(),
    );

    let lst_hours = local_sidereal_time(julian_date, location.longitude_degrees);
    let right_ascension = normalize_hours(lst_hours - degrees_to_hours(hour_angle.to_degrees()));

    EquatorialCoordinates {
        right_ascension_hours: right_ascension,
        declination_degrees: declination.to_degrees(),
    }
}
