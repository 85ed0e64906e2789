//! Sync point database

use crate::vector::TelescopeDirectionVector;
use crate::AlignmentError;
use serde::{Deserialize, Serialize};

/// Tolerance used when comparing sync points for duplicates
const DUPLICATE_EPSILON: f64 = 1e-6;

/// One recorded correspondence between celestial coordinates and the
/// mechanical direction the mount reported at the moment of sync
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SyncPoint {
    /// Julian date of the observation
    pub observation_julian_date: f64,
    /// Right ascension in hours
    pub right_ascension_hours: f64,
    /// Declination in degrees
    pub declination_degrees: f64,
    /// Mount direction at the moment of sync
    pub telescope_direction: TelescopeDirectionVector,
}

impl SyncPoint {
    /// True when both the celestial coordinates and the mount direction match
    /// within tolerance. The observation time is deliberately not compared.
    pub fn matches(&self, other: &SyncPoint) -> bool {
        (self.right_ascension_hours - other.right_ascension_hours).abs() < DUPLICATE_EPSILON
            && (self.declination_degrees - other.declination_degrees).abs() < DUPLICATE_EPSILON
            && (self.telescope_direction.x - other.telescope_direction.x).abs() < DUPLICATE_EPSILON
            && (self.telescope_direction.y - other.telescope_direction.y).abs() < DUPLICATE_EPSILON
            && (self.telescope_direction.z - other.telescope_direction.z).abs() < DUPLICATE_EPSILON
    }
}

/// Ordered collection of sync points
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlignmentDatabase {
    points: Vec<SyncPoint>,
}

impl AlignmentDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sync point, rejecting duplicates of an existing entry
    pub fn try_add(&mut self, point: SyncPoint) -> Result<(), AlignmentError> {
        if self.points.iter().any(|existing| existing.matches(&point)) {
            return Err(AlignmentError::DuplicateSyncPoint {
                ra_hours: point.right_ascension_hours,
                dec_degrees: point.declination_degrees,
            });
        }
        self.points.push(point);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn points(&self) -> &[SyncPoint] {
        &self.points
    }
}
