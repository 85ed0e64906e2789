//! Julian date and sidereal time

use crate::angles::normalize_hours;
use chrono::{DateTime, Utc};

/// Julian date of the Unix epoch (1970-01-01 00:00:00 UTC)
pub const JD_UNIX_EPOCH: f64 = 2_440_587.5;

/// Julian date of the J2000.0 epoch
pub const JD_J2000: f64 = 2_451_545.0;

/// Current Julian date from the system clock
pub fn julian_date_now() -> f64 {
    julian_date_from(Utc::now())
}

/// Julian date for an arbitrary UTC timestamp
pub fn julian_date_from(utc: DateTime<Utc>) -> f64 {
    utc.timestamp_millis() as f64 / 86_400_000.0 + JD_UNIX_EPOCH
}

/// Greenwich mean sidereal time in hours
///
/// USNO approximation, accurate to a fraction of a second of time over the
/// current century.
pub fn greenwich_mean_sidereal_time(julian_date: f64) -> f64 {
    let days_since_j2000 = julian_date - JD_J2000;
    normalize_hours(18.697_374_558 + 24.065_709_824_419_08 * days_since_j2000)
}

/// Local mean sidereal time in hours for an east-positive longitude
pub fn local_sidereal_time(julian_date: f64, longitude_degrees: f64) -> f64 {
    normalize_hours(greenwich_mean_sidereal_time(julian_date) + longitude_degrees / 15.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_julian_date_of_j2000() {
        let utc = Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap();
        assert!((julian_date_from(utc) - JD_J2000).abs() < 1e-9);
    }

    #[test]
    fn test_julian_date_of_unix_epoch() {
        let utc = Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).unwrap();
        assert!((julian_date_from(utc) - JD_UNIX_EPOCH).abs() < 1e-9);
    }

    #[test]
    fn test_gmst_at_j2000() {
        let gmst = greenwich_mean_sidereal_time(JD_J2000);
        assert!((gmst - 18.697_374_558).abs() < 1e-9);
    }

    #[test]
    fn test_gmst_advances_one_sidereal_day() {
        // One sidereal day later the GMST comes back around
        let sidereal_day = 0.997_269_566_33;
        let gmst0 = greenwich_mean_sidereal_time(JD_J2000);
        let gmst1 = greenwich_mean_sidereal_time(JD_J2000 + sidereal_day);
        assert!((gmst1 - gmst0).abs() < 1e-4);
    }

    #[test]
    fn test_local_sidereal_time_offsets_by_longitude() {
        let gmst = greenwich_mean_sidereal_time(JD_J2000);
        let lst_east = local_sidereal_time(JD_J2000, 30.0);
        let lst_west = local_sidereal_time(JD_J2000, -30.0);
        assert!((normalize_hours(lst_east - gmst) - 2.0).abs() < 1e-9);
        assert!((normalize_hours(gmst - lst_west) - 2.0).abs() < 1e-9);
    }
}
