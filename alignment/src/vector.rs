//! Telescope direction vectors
//!
//! A telescope direction vector is a unit vector in the mount frame: x toward
//! the north horizon, y toward the west horizon, z toward the zenith. Azimuth
//! is measured clockwise from north seen from above, which is why the y
//! component carries a negative sign.

use scopesim_astro::normalize_degrees;
use serde::{Deserialize, Serialize};

/// Unit direction vector in the mount reference frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TelescopeDirectionVector {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl TelescopeDirectionVector {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Build a direction vector from altitude and azimuth in degrees
    pub fn from_altaz(altitude_degrees: f64, azimuth_degrees: f64) -> Self {
        let altitude = altitude_degrees.to_radians();
        let azimuth = azimuth_degrees.to_radians();
        Self {
            x: altitude.cos() * azimuth.cos(),
            y: -altitude.cos() * azimuth.sin(),
            z: altitude.sin(),
        }
    }

    /// Recover (altitude, azimuth) in degrees, azimuth normalized into [0, 360)
    pub fn to_altaz(&self) -> (f64, f64) {
        let altitude = self.z.clamp(-1.0, 1.0).asin().to_degrees();
        let azimuth = normalize_degrees((-self.y).atan2(self.x).to_degrees());
        (altitude, azimuth)
    }

    /// Rotate around the east-west (y) axis by an angle in degrees.
    /// Positive angles tip the zenith toward the north horizon.
    pub fn rotate_around_y(&self, angle_degrees: f64) -> Self {
        let (sin_angle, cos_angle) = angle_degrees.to_radians().sin_cos();
        Self {
            x: self.x * cos_angle + self.z * sin_angle,
            y: self.y,
            z: self.z * cos_angle - self.x * sin_angle,
        }
    }

    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Scale to unit length. Near-zero vectors are returned unchanged.
    pub fn normalized(&self) -> Self {
        let length = self.length();
        if length < 1e-12 {
            return *self;
        }
        Self {
            x: self.x / length,
            y: self.y / length,
            z: self.z / length,
        }
    }

    pub fn dot(&self, other: &Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(&self, other: &Self) -> Self {
        Self {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }
}
