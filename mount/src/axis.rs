//! Single-axis slew state machine
//!
//! Motion is acceleration-free: each tick moves the whole-step part of
//! `dt * rate` and a target slew snaps exactly onto the target on arrival.

use crate::encoder::{wrap, Encoder, EncoderRange, StepOutcome};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one of the two mount axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    Azimuth,
    Altitude,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Azimuth => write!(f, "azimuth"),
            Axis::Altitude => write!(f, "altitude"),
        }
    }
}

/// Motion state of an axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AxisStatus {
    /// Holding position
    Stopped,
    /// Continuous motion at the commanded rate
    Slewing,
    /// Moving toward a target position
    SlewingTo,
}

/// Direction of motion along an axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AxisDirection {
    /// Toward increasing encoder positions
    Forward,
    /// Toward decreasing encoder positions
    Reverse,
}

impl fmt::Display for AxisDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AxisDirection::Forward => write!(f, "forward"),
            AxisDirection::Reverse => write!(f, "reverse"),
        }
    }
}

/// Serializable snapshot of one axis
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AxisSnapshot {
    pub status: AxisStatus,
    pub direction: AxisDirection,
    pub rate_microsteps_per_sec: f64,
    pub position_microsteps: i64,
    pub target_microsteps: i64,
}

/// One simulated mount axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulatedAxis {
    status: AxisStatus,
    direction: AxisDirection,
    /// Slew rate in microsteps per second
    rate: f64,
    target: i64,
    encoder: Encoder,
}

impl SimulatedAxis {
    /// New axis, stopped at position zero
    pub fn new(range: EncoderRange, default_rate: f64) -> Self {
        Self {
            status: AxisStatus::Stopped,
            direction: AxisDirection::Forward,
            rate: default_rate,
            target: 0,
            encoder: Encoder::new(range),
        }
    }

    pub fn status(&self) -> AxisStatus {
        self.status
    }

    pub fn direction(&self) -> AxisDirection {
        self.direction
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn position(&self) -> i64 {
        self.encoder.position()
    }

    pub fn target(&self) -> i64 {
        self.target
    }

    pub fn is_stopped(&self) -> bool {
        self.status == AxisStatus::Stopped
    }

    pub fn snapshot(&self) -> AxisSnapshot {
        AxisSnapshot {
            status: self.status,
            direction: self.direction,
            rate_microsteps_per_sec: self.rate,
            position_microsteps: self.encoder.position(),
            target_microsteps: self.target,
        }
    }

    /// Begin a target slew. A target equal to the current position stops the
    /// axis without moving.
    ///
    /// A wrapping axis takes the shorter way around; a clamped axis moves
    /// straight toward the target.
    pub fn slew_to(&mut self, target: i64, rate: f64) {
        let target = match self.encoder.range() {
            EncoderRange::Wrapping { revolution_steps } => wrap(target, revolution_steps),
            EncoderRange::Clamped {
                min_steps,
                max_steps,
            } => target.clamp(min_steps, max_steps),
        };
        let position = self.encoder.position();
        if target == position {
            self.status = AxisStatus::Stopped;
            return;
        }
        self.direction = match self.encoder.range() {
            EncoderRange::Wrapping { revolution_steps } => {
                let forward_steps = wrap(target - position, revolution_steps);
                if forward_steps < revolution_steps / 2 {
                    AxisDirection::Forward
                } else {
                    AxisDirection::Reverse
                }
            }
            EncoderRange::Clamped { .. } => {
                if target > position {
                    AxisDirection::Forward
                } else {
                    AxisDirection::Reverse
                }
            }
        };
        self.target = target;
        self.rate = rate;
        self.status = AxisStatus::SlewingTo;
    }

    /// Begin continuous motion
    pub fn slew(&mut self, direction: AxisDirection, rate: f64) {
        self.direction = direction;
        self.rate = rate;
        self.status = AxisStatus::Slewing;
    }

    /// Stop without moving
    pub fn stop(&mut self) {
        self.status = AxisStatus::Stopped;
    }

    /// Advance the simulation by `dt_secs` of motion
    pub fn tick(&mut self, dt_secs: f64) {
        match self.status {
            AxisStatus::Stopped => {}
            AxisStatus::Slewing => self.tick_slewing(dt_secs),
            AxisStatus::SlewingTo => self.tick_slewing_to(dt_secs),
        }
    }

    fn step_count(&self, dt_secs: f64) -> i64 {
        (dt_secs * self.rate) as i64
    }

    fn signed(&self, steps: i64) -> i64 {
        match self.direction {
            AxisDirection::Forward => steps,
            AxisDirection::Reverse => -steps,
        }
    }

    fn tick_slewing(&mut self, dt_secs: f64) {
        let steps = self.step_count(dt_secs);
        if self.encoder.advance(self.signed(steps)) == StepOutcome::HitLimit {
            tracing::debug!("Continuous slew ran into the axis limit, stopping");
            self.status = AxisStatus::Stopped;
        }
    }

    fn tick_slewing_to(&mut self, dt_secs: f64) {
        let steps = self.step_count(dt_secs);
        match self.encoder.range() {
            EncoderRange::Wrapping { revolution_steps } => {
                if steps >= revolution_steps {
                    // Swept a whole turn, so the target was certainly crossed
                    self.arrive();
                    return;
                }
                let old_position = self.encoder.position();
                self.encoder.advance(self.signed(steps));
                if self.passed_target(old_position, self.encoder.position()) {
                    self.arrive();
                }
            }
            EncoderRange::Clamped { .. } => {
                let remaining = (self.target - self.encoder.position()).abs();
                if steps >= remaining {
                    self.arrive();
                } else {
                    self.encoder.advance(self.signed(steps));
                }
            }
        }
    }

    /// Whether the target fell inside the arc swept between the two positions
    fn passed_target(&self, old_position: i64, new_position: i64) -> bool {
        let target = self.target;
        match self.direction {
            AxisDirection::Forward => {
                if new_position < old_position {
                    // The sweep crossed the wrap point
                    target > old_position || target <= new_position
                } else {
                    target > old_position && target <= new_position
                }
            }
            AxisDirection::Reverse => {
                if new_position > old_position {
                    target < old_position || target >= new_position
                } else {
                    target < old_position && target >= new_position
                }
            }
        }
    }

    fn arrive(&mut self) {
        self.encoder.set(self.target);
        self.status = AxisStatus::Stopped;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REVOLUTION: i64 = 1_000_000;

    fn wrapping_axis(rate: f64) -> SimulatedAxis {
        SimulatedAxis::new(
            EncoderRange::Wrapping {
                revolution_steps: REVOLUTION,
            },
            rate,
        )
    }

    fn clamped_axis(rate: f64) -> SimulatedAxis {
        SimulatedAxis::new(
            EncoderRange::Clamped {
                min_steps: -250_000,
                max_steps: 250_000,
            },
            rate,
        )
    }

    #[test]
    fn test_new_axis_is_stopped_at_zero() {
        let axis = wrapping_axis(5_000.0);
        assert_eq!(axis.status(), AxisStatus::Stopped);
        assert_eq!(axis.position(), 0);
        assert_eq!(axis.direction(), AxisDirection::Forward);
    }

    #[test]
    fn test_slew_to_current_position_stays_stopped() {
        let mut axis = wrapping_axis(5_000.0);
        axis.slew_to(0, 5_000.0);
        assert_eq!(axis.status(), AxisStatus::Stopped);
        axis.tick(1.0);
        assert_eq!(axis.position(), 0);
    }

    #[test]
    fn test_goto_converges_in_expected_ticks() {
        // 10_000 steps at 3_000 steps/sec: three full ticks plus arrival
        let mut axis = wrapping_axis(3_000.0);
        axis.slew_to(10_000, 3_000.0);
        assert_eq!(axis.status(), AxisStatus::SlewingTo);
        assert_eq!(axis.direction(), AxisDirection::Forward);

        axis.tick(1.0);
        assert_eq!(axis.position(), 3_000);
        axis.tick(1.0);
        assert_eq!(axis.position(), 6_000);
        axis.tick(1.0);
        assert_eq!(axis.position(), 9_000);
        assert_eq!(axis.status(), AxisStatus::SlewingTo);

        axis.tick(1.0);
        assert_eq!(axis.position(), 10_000);
        assert_eq!(axis.status(), AxisStatus::Stopped);
    }

    #[test]
    fn test_wrapping_axis_takes_short_way_around() {
        let mut axis = wrapping_axis(5_000.0);
        axis.slew_to(999_000, 5_000.0);
        // Reverse through the wrap point is only 1_000 steps away
        assert_eq!(axis.direction(), AxisDirection::Reverse);

        axis.tick(1.0);
        assert_eq!(axis.position(), 999_000);
        assert_eq!(axis.status(), AxisStatus::Stopped);
    }

    #[test]
    fn test_arrival_across_wrap_point_snaps_to_target() {
        let mut axis = wrapping_axis(5_000.0);
        axis.slew(AxisDirection::Forward, 2_000.0);
        axis.tick(1.0);
        assert_eq!(axis.position(), 2_000);

        // 7_000 steps away going reverse through the wrap point
        axis.slew_to(995_000, 5_000.0);
        assert_eq!(axis.direction(), AxisDirection::Reverse);

        axis.tick(1.0);
        assert_eq!(axis.position(), 997_000);
        assert_eq!(axis.status(), AxisStatus::SlewingTo);

        axis.tick(1.0);
        assert_eq!(axis.position(), 995_000);
        assert_eq!(axis.status(), AxisStatus::Stopped);
    }

    #[test]
    fn test_full_revolution_in_one_tick_arrives() {
        let mut axis = wrapping_axis(2_000_000.0);
        axis.slew_to(123_456, 2_000_000.0);
        axis.tick(1.0);
        assert_eq!(axis.position(), 123_456);
        assert_eq!(axis.status(), AxisStatus::Stopped);
    }

    #[test]
    fn test_zero_elapsed_tick_does_not_move_or_arrive() {
        let mut axis = wrapping_axis(5_000.0);
        axis.slew_to(10_000, 5_000.0);
        axis.tick(0.0);
        assert_eq!(axis.position(), 0);
        assert_eq!(axis.status(), AxisStatus::SlewingTo);
    }

    #[test]
    fn test_clamped_goto_moves_by_comparison() {
        let mut axis = clamped_axis(5_000.0);
        axis.slew_to(-20_000, 5_000.0);
        assert_eq!(axis.direction(), AxisDirection::Reverse);

        axis.tick(1.0);
        assert_eq!(axis.position(), -5_000);
        axis.tick(10.0);
        assert_eq!(axis.position(), -20_000);
        assert_eq!(axis.status(), AxisStatus::Stopped);
    }

    #[test]
    fn test_clamped_target_is_limited_to_range() {
        let mut axis = clamped_axis(5_000.0);
        axis.slew_to(400_000, 5_000.0);
        assert_eq!(axis.target(), 250_000);
    }

    #[test]
    fn test_continuous_slew_wraps() {
        let mut axis = wrapping_axis(5_000.0);
        axis.slew(AxisDirection::Reverse, 5_000.0);
        axis.tick(1.0);
        assert_eq!(axis.position(), REVOLUTION - 5_000);
        assert_eq!(axis.status(), AxisStatus::Slewing);
    }

    #[test]
    fn test_continuous_slew_stops_at_clamp_limit() {
        let mut axis = clamped_axis(100_000.0);
        axis.slew(AxisDirection::Forward, 100_000.0);
        axis.tick(1.0);
        assert_eq!(axis.position(), 100_000);
        assert_eq!(axis.status(), AxisStatus::Slewing);

        axis.tick(2.0);
        assert_eq!(axis.position(), 250_000);
        assert_eq!(axis.status(), AxisStatus::Stopped);
    }

    #[test]
    fn test_stop_holds_position() {
        let mut axis = wrapping_axis(5_000.0);
        axis.slew(AxisDirection::Forward, 5_000.0);
        axis.tick(1.0);
        axis.stop();
        let position = axis.position();
        axis.tick(5.0);
        assert_eq!(axis.position(), position);
        assert_eq!(axis.status(), AxisStatus::Stopped);
    }

    #[test]
    fn test_fractional_steps_truncate() {
        let mut axis = wrapping_axis(1_000.0);
        axis.slew(AxisDirection::Forward, 1_000.0);
        axis.tick(0.0015);
        // 1.5 steps truncates to 1
        assert_eq!(axis.position(), 1);
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let mut axis = wrapping_axis(5_000.0);
        axis.slew_to(10_000, 4_000.0);
        let snapshot = axis.snapshot();
        assert_eq!(snapshot.status, AxisStatus::SlewingTo);
        assert_eq!(snapshot.target_microsteps, 10_000);
        assert_eq!(snapshot.rate_microsteps_per_sec, 4_000.0);
        assert_eq!(snapshot.position_microsteps, 0);
    }
}
