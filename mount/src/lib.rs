//! Discrete-time simulation of a two-axis telescope mount
//!
//! Features:
//! - Integer microstep encoders with wrapping and clamped range policies
//! - Per-axis slew state machines with exact arrival on target
//! - Goto / sync / abort / manual motion across idle, slewing and tracking
//! - Tokio tick driver with a command channel and broadcast position events

pub mod axis;
pub mod config;
pub mod driver;
pub mod encoder;
pub mod error;
pub mod interface;
pub mod simulator;

pub use axis::{Axis, AxisDirection, AxisSnapshot, AxisStatus, SimulatedAxis};
pub use config::MountConfig;
pub use driver::{MountCommand, MountDriver, MountEvent, MountHandle};
pub use encoder::{Encoder, EncoderRange, StepOutcome};
pub use error::{MountError, MountResult};
pub use interface::Mount;
pub use simulator::{CoordinateMode, MotionAction, MountSimulator, MountStatus, TrackState};

pub use scopesim_astro::{EquatorialCoordinates, GeographicLocation, HorizontalCoordinates};
