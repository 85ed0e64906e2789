//! Celestial <-> mechanical coordinate conversion
//!
//! Conversions route through the alignment model once it has been initialised
//! from sync points. Before that they fall back to the direct astronomical
//! transform plus a fixed rotation for the configured mount orientation.

use crate::database::{AlignmentDatabase, SyncPoint};
use crate::model::{AlignmentModel, ReferencePair};
use crate::vector::TelescopeDirectionVector;
use crate::AlignmentError;
use scopesim_astro::{
    equatorial_to_horizontal, horizontal_to_equatorial, EquatorialCoordinates, GeographicLocation,
    HorizontalCoordinates,
};
use serde::{Deserialize, Serialize};

/// Rough orientation of the mount's fixed axis, used while no alignment model
/// is available
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ApproximateAlignment {
    /// Alt-az style mount, fixed axis pointing at the zenith
    #[default]
    Zenith,
    /// Equatorial mount aligned on the north celestial pole
    NorthCelestialPole,
    /// Equatorial mount aligned on the south celestial pole
    SouthCelestialPole,
}

/// Converts between celestial coordinates and mechanical mount coordinates
pub struct CoordinateConverter {
    database: AlignmentDatabase,
    model: Box<dyn AlignmentModel>,
    approximate: ApproximateAlignment,
    model_ready: bool,
}

impl CoordinateConverter {
    /// Create a converter around an injected alignment model
    pub fn new(model: Box<dyn AlignmentModel>, approximate: ApproximateAlignment) -> Self {
        Self {
            database: AlignmentDatabase::new(),
            model,
            approximate,
            model_ready: false,
        }
    }

    /// Create a converter backed by the built-in single-point model
    pub fn with_default_model(approximate: ApproximateAlignment) -> Self {
        Self::new(Box::new(crate::model::SinglePointModel::new()), approximate)
    }

    /// Number of recorded sync points
    pub fn sync_point_count(&self) -> usize {
        self.database.len()
    }

    /// True while conversions are served by the alignment model
    pub fn model_ready(&self) -> bool {
        self.model_ready
    }

    /// Forget all sync points and drop back to the approximate conversion
    pub fn clear_sync_points(&mut self) {
        self.database.clear();
        self.model_ready = self.model.initialise(&[]);
    }

    /// Record a sync point taken at the given mechanical position and rebuild
    /// the model from the full database
    pub fn sync(
        &mut self,
        equatorial: &EquatorialCoordinates,
        mechanical: &HorizontalCoordinates,
        location: &GeographicLocation,
        julian_date: f64,
    ) -> Result<(), AlignmentError> {
        let point = SyncPoint {
            observation_julian_date: julian_date,
            right_ascension_hours: equatorial.right_ascension_hours,
            declination_degrees: equatorial.declination_degrees,
            telescope_direction: TelescopeDirectionVector::from_altaz(
                mechanical.altitude_degrees,
                mechanical.azimuth_degrees,
            ),
        };
        self.database.try_add(point)?;
        self.rebuild_model(location);
        Ok(())
    }

    fn rebuild_model(&mut self, location: &GeographicLocation) {
        let pairs: Vec<ReferencePair> = self
            .database
            .points()
            .iter()
            .map(|point| {
                let equatorial = EquatorialCoordinates {
                    right_ascension_hours: point.right_ascension_hours,
                    declination_degrees: point.declination_degrees,
                };
                let horizontal = equatorial_to_horizontal(
                    &equatorial,
                    location,
                    point.observation_julian_date,
                );
                ReferencePair {
                    apparent: TelescopeDirectionVector::from_altaz(
                        horizontal.altitude_degrees,
                        horizontal.azimuth_degrees,
                    ),
                    mount: point.telescope_direction,
                }
            })
            .collect();
        self.model_ready = self.model.initialise(&pairs);
        tracing::debug!(
            "Alignment model rebuilt from {} sync points (ready: {})",
            pairs.len(),
            self.model_ready
        );
    }

    /// Convert celestial coordinates to the mechanical frame.
    ///
    /// `julian_offset_days` shifts the evaluation time; the tracking loop uses
    /// it to aim slightly ahead of the sky.
    pub fn celestial_to_mechanical(
        &self,
        equatorial: &EquatorialCoordinates,
        location: &GeographicLocation,
        julian_date: f64,
        julian_offset_days: f64,
    ) -> HorizontalCoordinates {
        let horizontal =
            equatorial_to_horizontal(equatorial, location, julian_date + julian_offset_days);
        let apparent = TelescopeDirectionVector::from_altaz(
            horizontal.altitude_degrees,
            horizontal.azimuth_degrees,
        );
        let mount = match self.model.mount_from_apparent(&apparent) {
            Some(mount) => mount,
            None => {
                tracing::trace!("Alignment model unavailable, using approximate conversion");
                self.approximate_to_mount(&apparent, location)
            }
        };
        let (altitude, azimuth) = mount.to_altaz();
        HorizontalCoordinates {
            altitude_degrees: altitude,
            azimuth_degrees: azimuth,
        }
    }

    /// Convert a mechanical position back to celestial coordinates
    pub fn mechanical_to_celestial(
        &self,
        mechanical: &HorizontalCoordinates,
        location: &GeographicLocation,
        julian_date: f64,
    ) -> EquatorialCoordinates {
        let mount = TelescopeDirectionVector::from_altaz(
            mechanical.altitude_degrees,
            mechanical.azimuth_degrees,
        );
        let apparent = match self.model.apparent_from_mount(&mount) {
            Some(apparent) => apparent,
            None => self.approximate_to_apparent(&mount, location),
        };
        let (altitude, azimuth) = apparent.to_altaz();
        let horizontal = HorizontalCoordinates {
            altitude_degrees: altitude,
            azimuth_degrees: azimuth,
        };
        horizontal_to_equatorial(&horizontal, location, julian_date)
    }

    fn approximate_to_mount(
        &self,
        apparent: &TelescopeDirectionVector,
        location: &GeographicLocation,
    ) -> TelescopeDirectionVector {
        match self.approximate {
            ApproximateAlignment::Zenith => *apparent,
            ApproximateAlignment::NorthCelestialPole => {
                apparent.rotate_around_y(location.latitude_degrees - 90.0)
            }
            ApproximateAlignment::SouthCelestialPole => {
                apparent.rotate_around_y(location.latitude_degrees + 90.0)
            }
        }
    }

    fn approximate_to_apparent(
        &self,
        mount: &TelescopeDirectionVector,
        location: &GeographicLocation,
    ) -> TelescopeDirectionVector {
        match self.approximate {
            ApproximateAlignment::Zenith => *mount,
            ApproximateAlignment::NorthCelestialPole => {
                mount.rotate_around_y(90.0 - location.latitude_degrees)
            }
            ApproximateAlignment::SouthCelestialPole => {
                mount.rotate_around_y(-90.0 - location.latitude_degrees)
            }
        }
    }
}
