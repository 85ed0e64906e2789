//! Mount error types

use crate::axis::Axis;
use scopesim_alignment::AlignmentError;
use thiserror::Error;

/// Result alias for mount operations
pub type MountResult<T> = Result<T, MountError>;

/// Errors surfaced by mount operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MountError {
    /// The goto target converts to a position outside the physical range
    #[error("{axis} target {value:.4}° outside [{min:.4}°, {max:.4}°]")]
    TargetOutOfRange {
        axis: Axis,
        value: f64,
        min: f64,
        max: f64,
    },

    /// The same sync point was recorded before
    #[error("duplicate sync point at RA {ra_hours:.4}h Dec {dec_degrees:.4}°")]
    DuplicateSyncPoint { ra_hours: f64, dec_degrees: f64 },

    /// Configuration rejected during validation
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The driver task is no longer running
    #[error("mount driver stopped")]
    DriverStopped,
}

impl MountError {
    /// Convenience constructor for validation failures
    pub fn invalid_config(message: impl Into<String>) -> Self {
        MountError::InvalidConfig(message.into())
    }
}

impl From<AlignmentError> for MountError {
    fn from(err: AlignmentError) -> Self {
        match err {
            AlignmentError::DuplicateSyncPoint {
                ra_hours,
                dec_degrees,
            } => MountError::DuplicateSyncPoint {
                ra_hours,
                dec_degrees,
            },
        }
    }
}

impl From<MountError> for String {
    fn from(err: MountError) -> Self {
        err.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_out_of_range_display() {
        let err = MountError::TargetOutOfRange {
            axis: Axis::Altitude,
            value: -12.5,
            min: 0.0,
            max: 90.0,
        };
        assert_eq!(
            err.to_string(),
            "altitude target -12.5000° outside [0.0000°, 90.0000°]"
        );
    }

    #[test]
    fn test_duplicate_sync_point_display() {
        let err = MountError::DuplicateSyncPoint {
            ra_hours: 6.0,
            dec_degrees: 45.0,
        };
        assert_eq!(
            err.to_string(),
            "duplicate sync point at RA 6.0000h Dec 45.0000°"
        );
    }

    #[test]
    fn test_invalid_config_display() {
        let err = MountError::invalid_config("tick_period must be positive");
        assert_eq!(
            err.to_string(),
            "invalid configuration: tick_period must be positive"
        );
    }

    #[test]
    fn test_driver_stopped_display() {
        assert_eq!(MountError::DriverStopped.to_string(), "mount driver stopped");
    }

    #[test]
    fn test_from_alignment_error() {
        let err: MountError = AlignmentError::DuplicateSyncPoint {
            ra_hours: 1.0,
            dec_degrees: 2.0,
        }
        .into();
        assert_eq!(
            err,
            MountError::DuplicateSyncPoint {
                ra_hours: 1.0,
                dec_degrees: 2.0
            }
        );
    }

    #[test]
    fn test_into_string() {
        let message: String = MountError::DriverStopped.into();
        assert_eq!(message, "mount driver stopped");
    }
}
