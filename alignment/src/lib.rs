//! Sync-point alignment for the mount simulator
//!
//! Features:
//! - Telescope direction vectors and rotations in the mount frame
//! - Sync point database with duplicate detection
//! - Pluggable alignment model trait with a single-point default
//! - Celestial <-> mechanical conversion with an approximate fallback

pub mod convert;
pub mod database;
pub mod model;
pub mod vector;

pub use convert::{ApproximateAlignment, CoordinateConverter};
pub use database::{AlignmentDatabase, SyncPoint};
pub use model::{AlignmentModel, ReferencePair, SinglePointModel};
pub use vector::TelescopeDirectionVector;

use thiserror::Error;

/// Errors from the alignment subsystem
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AlignmentError {
    /// A sync point with the same coordinates and mount direction already exists
    #[error("duplicate sync point at RA {ra_hours:.4}h Dec {dec_degrees:.4}°")]
    DuplicateSyncPoint { ra_hours: f64, dec_degrees: f64 },
}
