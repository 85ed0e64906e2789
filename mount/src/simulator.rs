//! Mount state machine
//!
//! Owns the two axes and the coordinate converter and advances them through
//! discrete ticks. Goto targets are converted once at command time; tracking
//! re-derives a fresh correction every tick.

use crate::axis::{Axis, AxisDirection, AxisSnapshot, SimulatedAxis};
use crate::config::MountConfig;
use crate::encoder::{wrap, EncoderRange};
use crate::error::{MountError, MountResult};
use scopesim_alignment::{AlignmentModel, CoordinateConverter};
use scopesim_astro::time::julian_date_now;
use scopesim_astro::{EquatorialCoordinates, GeographicLocation, HorizontalCoordinates};
use serde::{Deserialize, Serialize};
use std::fmt;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Overall motion state of the mount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackState {
    /// No commanded motion
    Idle,
    /// A goto is in progress
    Slewing,
    /// Following a celestial target
    Tracking,
}

impl fmt::Display for TrackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackState::Idle => write!(f, "idle"),
            TrackState::Slewing => write!(f, "slewing"),
            TrackState::Tracking => write!(f, "tracking"),
        }
    }
}

/// What a completed goto leads into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CoordinateMode {
    /// Stop after the slew
    Slew,
    /// Keep following the target after the slew
    #[default]
    Track,
}

/// Start or stop a manual axis motion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MotionAction {
    Start,
    Stop,
}

/// Full snapshot of the simulated mount
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MountStatus {
    pub track_state: TrackState,
    pub coordinate_mode: CoordinateMode,
    /// Where the mount points on the celestial sphere
    pub celestial: EquatorialCoordinates,
    /// Mechanical axis angles in degrees
    pub horizontal: HorizontalCoordinates,
    pub azimuth: AxisSnapshot,
    pub altitude: AxisSnapshot,
    pub sync_point_count: usize,
    pub julian_date: f64,
}

/// Discrete-time simulation of a two-axis telescope mount
pub struct MountSimulator {
    config: MountConfig,
    azimuth: SimulatedAxis,
    altitude: SimulatedAxis,
    converter: CoordinateConverter,
    location: GeographicLocation,
    track_state: TrackState,
    coordinate_mode: CoordinateMode,
    tracking_target: Option<EquatorialCoordinates>,
}

impl MountSimulator {
    /// Build a simulator backed by the built-in single-point alignment model
    pub fn new(config: MountConfig) -> MountResult<Self> {
        let converter = CoordinateConverter::with_default_model(config.alignment);
        Self::build(config, converter)
    }

    /// Build a simulator around an injected alignment model
    pub fn with_model(config: MountConfig, model: Box<dyn AlignmentModel>) -> MountResult<Self> {
        let converter = CoordinateConverter::new(model, config.alignment);
        Self::build(config, converter)
    }

    fn build(config: MountConfig, converter: CoordinateConverter) -> MountResult<Self> {
        config.validate()?;
        let rate = config.slew_rate_microsteps();
        let azimuth = SimulatedAxis::new(
            EncoderRange::Wrapping {
                revolution_steps: config.microsteps_per_revolution,
            },
            rate,
        );
        let altitude = SimulatedAxis::new(
            EncoderRange::Clamped {
                min_steps: config.altitude_min_steps(),
                max_steps: config.altitude_max_steps(),
            },
            rate,
        );
        let location = config.location;
        Ok(Self {
            config,
            azimuth,
            altitude,
            converter,
            location,
            track_state: TrackState::Idle,
            coordinate_mode: CoordinateMode::default(),
            tracking_target: None,
        })
    }

    pub fn config(&self) -> &MountConfig {
        &self.config
    }

    pub fn location(&self) -> GeographicLocation {
        self.location
    }

    pub fn track_state(&self) -> TrackState {
        self.track_state
    }

    pub fn coordinate_mode(&self) -> CoordinateMode {
        self.coordinate_mode
    }

    pub fn is_slewing(&self) -> bool {
        self.track_state == TrackState::Slewing
    }

    pub fn is_tracking(&self) -> bool {
        self.track_state == TrackState::Tracking
    }

    pub fn sync_point_count(&self) -> usize {
        self.converter.sync_point_count()
    }

    /// Choose what a completed goto leads into. Takes effect when a slew
    /// finishes, not retroactively.
    pub fn set_coordinate_mode(&mut self, mode: CoordinateMode) {
        self.coordinate_mode = mode;
    }

    /// Move the observer. Later conversions use the new location; recorded
    /// sync points keep the sky positions they were taken at.
    pub fn set_location(&mut self, location: GeographicLocation) {
        tracing::info!("Observer location set to {location}");
        self.location = location;
    }

    /// Forget all sync points and fall back to the approximate conversion
    pub fn clear_sync_points(&mut self) {
        self.converter.clear_sync_points();
    }

    /// Mechanical axis angles derived from the encoder positions
    pub fn current_mechanical(&self) -> HorizontalCoordinates {
        let per_degree = self.config.microsteps_per_degree();
        HorizontalCoordinates {
            altitude_degrees: self.altitude.position() as f64 / per_degree,
            azimuth_degrees: self.azimuth.position() as f64 / per_degree,
        }
    }

    /// Celestial coordinates the mount points at
    pub fn current_celestial_at(&self, julian_date: f64) -> EquatorialCoordinates {
        self.converter
            .mechanical_to_celestial(&self.current_mechanical(), &self.location, julian_date)
    }

    /// Slew to a celestial target.
    ///
    /// The target is converted once, here. Fails without touching any state
    /// when the converted position falls outside the mount's range. The
    /// target is kept for tracking only when the coordinate mode asks for
    /// tracking at command time.
    pub fn goto_at(
        &mut self,
        target: EquatorialCoordinates,
        julian_date: f64,
    ) -> MountResult<()> {
        let horizontal =
            self.converter
                .celestial_to_mechanical(&target, &self.location, julian_date, 0.0);
        let (azimuth_steps, altitude_steps) = self.mechanical_to_steps(&horizontal)?;
        tracing::info!(
            "Goto {target}: mechanical {horizontal}, azimuth {azimuth_steps} steps, altitude {altitude_steps} steps"
        );
        let rate = self.config.slew_rate_microsteps();
        self.azimuth.slew_to(azimuth_steps, rate);
        self.altitude.slew_to(altitude_steps, rate);
        if self.coordinate_mode == CoordinateMode::Track {
            self.tracking_target = Some(target);
        }
        self.track_state = TrackState::Slewing;
        Ok(())
    }

    /// Record that the current mechanical position corresponds to the given
    /// celestial coordinates, and track them from here on
    pub fn sync_at(
        &mut self,
        target: EquatorialCoordinates,
        julian_date: f64,
    ) -> MountResult<()> {
        let mechanical = self.current_mechanical();
        self.converter
            .sync(&target, &mechanical, &self.location, julian_date)?;
        self.tracking_target = Some(target);
        tracing::info!(
            "Synced {target} at mechanical {mechanical} ({} sync points)",
            self.converter.sync_point_count()
        );
        Ok(())
    }

    /// Stop both axes where they are. Safe to call repeatedly.
    pub fn abort(&mut self) {
        self.azimuth.stop();
        self.altitude.stop();
        self.track_state = TrackState::Idle;
        tracing::info!("Motion aborted");
    }

    /// Start or stop a manual slew on one axis at the configured rate
    pub fn move_axis(&mut self, axis: Axis, direction: AxisDirection, action: MotionAction) {
        let rate = self.config.slew_rate_microsteps();
        match action {
            MotionAction::Start => {
                tracing::debug!("Manual {direction} slew started on the {axis} axis");
                self.axis_mut(axis).slew(direction, rate);
            }
            MotionAction::Stop => {
                tracing::debug!("Manual slew stopped on the {axis} axis");
                self.axis_mut(axis).stop();
            }
        }
    }

    /// Advance the simulation by `dt_secs`, evaluated at `julian_date`
    pub fn tick_at(&mut self, dt_secs: f64, julian_date: f64) -> MountStatus {
        self.azimuth.tick(dt_secs);
        self.altitude.tick(dt_secs);
        match self.track_state {
            TrackState::Idle => {}
            TrackState::Slewing => {
                if self.azimuth.is_stopped() && self.altitude.is_stopped() {
                    self.finish_slew();
                }
            }
            TrackState::Tracking => self.apply_tracking_correction(julian_date),
        }
        let status = self.status_at(julian_date);
        tracing::trace!(
            "Tick {dt_secs:.3}s: {} at {}",
            status.celestial,
            status.horizontal
        );
        status
    }

    /// Snapshot without advancing the simulation
    pub fn status_at(&self, julian_date: f64) -> MountStatus {
        let horizontal = self.current_mechanical();
        MountStatus {
            track_state: self.track_state,
            coordinate_mode: self.coordinate_mode,
            celestial: self
                .converter
                .mechanical_to_celestial(&horizontal, &self.location, julian_date),
            horizontal,
            azimuth: self.azimuth.snapshot(),
            altitude: self.altitude.snapshot(),
            sync_point_count: self.converter.sync_point_count(),
            julian_date,
        }
    }

    /// Slew to a celestial target, evaluated at the system clock
    pub fn goto(&mut self, target: EquatorialCoordinates) -> MountResult<()> {
        self.goto_at(target, julian_date_now())
    }

    /// Sync on a celestial target, evaluated at the system clock
    pub fn sync(&mut self, target: EquatorialCoordinates) -> MountResult<()> {
        self.sync_at(target, julian_date_now())
    }

    /// Advance the simulation by `dt_secs` at the system clock
    pub fn tick(&mut self, dt_secs: f64) -> MountStatus {
        self.tick_at(dt_secs, julian_date_now())
    }

    /// Snapshot at the system clock
    pub fn status(&self) -> MountStatus {
        self.status_at(julian_date_now())
    }

    fn axis(&self, axis: Axis) -> &SimulatedAxis {
        match axis {
            Axis::Azimuth => &self.azimuth,
            Axis::Altitude => &self.altitude,
        }
    }

    fn axis_mut(&mut self, axis: Axis) -> &mut SimulatedAxis {
        match axis {
            Axis::Azimuth => &mut self.azimuth,
            Axis::Altitude => &mut self.altitude,
        }
    }

    /// Convert a mechanical target to encoder step targets, rejecting
    /// positions the mount cannot reach
    fn mechanical_to_steps(&self, horizontal: &HorizontalCoordinates) -> MountResult<(i64, i64)> {
        let altitude = horizontal.altitude_degrees;
        if altitude < self.config.altitude_min_degrees
            || altitude > self.config.altitude_max_degrees
        {
            return Err(MountError::TargetOutOfRange {
                axis: Axis::Altitude,
                value: altitude,
                min: self.config.altitude_min_degrees,
                max: self.config.altitude_max_degrees,
            });
        }
        let mut azimuth = horizontal.azimuth_degrees;
        if azimuth.abs() > 360.0 {
            return Err(MountError::TargetOutOfRange {
                axis: Axis::Azimuth,
                value: azimuth,
                min: -360.0,
                max: 360.0,
            });
        }
        if azimuth < 0.0 {
            azimuth += 360.0;
        }
        let per_degree = self.config.microsteps_per_degree();
        let altitude_steps = (altitude * per_degree) as i64;
        let azimuth_steps = wrap(
            (azimuth * per_degree) as i64,
            self.config.microsteps_per_revolution,
        );
        Ok((azimuth_steps, altitude_steps))
    }

    fn finish_slew(&mut self) {
        if self.coordinate_mode == CoordinateMode::Track && self.tracking_target.is_some() {
            tracing::info!("Slew complete, tracking");
            self.track_state = TrackState::Tracking;
        } else {
            tracing::info!("Slew complete");
            self.track_state = TrackState::Idle;
        }
    }

    /// Re-aim both axes at where the tracked target will be one tick from now
    fn apply_tracking_correction(&mut self, julian_date: f64) {
        let target = match self.tracking_target {
            Some(target) => target,
            None => return,
        };
        let period_secs = self.config.tick_period_secs();
        let horizontal = self.converter.celestial_to_mechanical(
            &target,
            &self.location,
            julian_date,
            period_secs / SECONDS_PER_DAY,
        );
        let (azimuth_steps, altitude_steps) = match self.mechanical_to_steps(&horizontal) {
            Ok(steps) => steps,
            Err(err) => {
                tracing::warn!("Tracking target moved outside the mount's range: {err}");
                self.azimuth.stop();
                self.altitude.stop();
                return;
            }
        };
        self.correct_axis(Axis::Azimuth, azimuth_steps, period_secs);
        self.correct_axis(Axis::Altitude, altitude_steps, period_secs);
    }

    fn correct_axis(&mut self, axis: Axis, target_steps: i64, period_secs: f64) {
        let offset = target_steps - self.axis(axis).position();
        if offset == 0 {
            self.axis_mut(axis).stop();
            return;
        }
        // A rate of offset/period lands on the target in exactly one tick
        let rate = offset.abs() as f64 / period_secs;
        let direction = if offset > 0 {
            AxisDirection::Forward
        } else {
            AxisDirection::Reverse
        };
        self.axis_mut(axis).slew(direction, rate);
    }
}
