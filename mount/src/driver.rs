//! Async tick driver
//!
//! Runs the simulator on a tokio interval and serves commands from a channel,
//! so commands apply between ticks instead of waiting for the next one.
//! Position and state changes go out on a broadcast channel.

use crate::axis::{Axis, AxisDirection};
use crate::config::MountConfig;
use crate::error::{MountError, MountResult};
use crate::simulator::{CoordinateMode, MotionAction, MountSimulator, MountStatus, TrackState};
use scopesim_astro::{EquatorialCoordinates, GeographicLocation, HorizontalCoordinates};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tokio::sync::{broadcast, mpsc, oneshot};

const COMMAND_CHANNEL_SIZE: usize = 32;
const EVENT_CHANNEL_SIZE: usize = 256;

/// Commands accepted by the driver task
#[derive(Debug)]
pub enum MountCommand {
    Goto {
        target: EquatorialCoordinates,
        reply: oneshot::Sender<MountResult<()>>,
    },
    Sync {
        target: EquatorialCoordinates,
        reply: oneshot::Sender<MountResult<()>>,
    },
    Abort {
        reply: oneshot::Sender<()>,
    },
    MoveAxis {
        axis: Axis,
        direction: AxisDirection,
        action: MotionAction,
        reply: oneshot::Sender<()>,
    },
    SetLocation {
        location: GeographicLocation,
        reply: oneshot::Sender<()>,
    },
    SetCoordinateMode {
        mode: CoordinateMode,
        reply: oneshot::Sender<()>,
    },
    Status {
        reply: oneshot::Sender<MountStatus>,
    },
    Shutdown,
}

/// Events broadcast by the driver task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum MountEvent {
    /// Where the mount points, published every tick
    Position {
        celestial: EquatorialCoordinates,
        horizontal: HorizontalCoordinates,
        julian_date: f64,
    },
    /// The overall motion state changed
    TrackStateChanged { state: TrackState },
    /// The driver task exited
    Stopped,
}

/// Owns the simulator and drives it from a tokio task
pub struct MountDriver {
    simulator: MountSimulator,
    tick_period: Duration,
    command_rx: mpsc::Receiver<MountCommand>,
    event_tx: broadcast::Sender<MountEvent>,
    last_tick: Option<Instant>,
}

impl MountDriver {
    /// Build a driver and its handle from a configuration
    pub fn new(config: MountConfig) -> MountResult<(Self, MountHandle)> {
        let simulator = MountSimulator::new(config)?;
        Ok(Self::with_simulator(simulator))
    }

    /// Build a driver around an existing simulator
    pub fn with_simulator(simulator: MountSimulator) -> (Self, MountHandle) {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_CHANNEL_SIZE);
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_SIZE);
        let driver = Self {
            tick_period: simulator.config().tick_period,
            simulator,
            command_rx,
            event_tx: event_tx.clone(),
            last_tick: None,
        };
        let handle = MountHandle {
            command_tx,
            event_tx,
        };
        (driver, handle)
    }

    /// Build a driver, spawn its task and return the handle.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(config: MountConfig) -> MountResult<MountHandle> {
        let (driver, handle) = Self::new(config)?;
        tokio::spawn(driver.run());
        Ok(handle)
    }

    /// Drive the simulator until shutdown or until every handle is dropped
    pub async fn run(mut self) {
        tracing::info!("Mount driver started, tick period {:?}", self.tick_period);
        let mut ticker = tokio::time::interval(self.tick_period);
        loop {
            tokio::select! {
                _ = ticker.tick() => self.tick(),
                command = self.command_rx.recv() => match command {
                    Some(command) => {
                        if self.handle_command(command) {
                            break;
                        }
                    }
                    None => break,
                },
            }
        }
        self.simulator.abort();
        let _ = self.event_tx.send(MountEvent::Stopped);
        tracing::info!("Mount driver stopped");
    }

    fn tick(&mut self) {
        let now = Instant::now();
        // The first tick carries no elapsed time
        let dt_secs = match self.last_tick {
            Some(last) => (now - last).as_secs_f64(),
            None => 0.0,
        };
        self.last_tick = Some(now);

        let before = self.simulator.track_state();
        let status = self.simulator.tick(dt_secs);
        if status.track_state != before {
            self.publish_track_state(status.track_state);
        }
        let _ = self.event_tx.send(MountEvent::Position {
            celestial: status.celestial,
            horizontal: status.horizontal,
            julian_date: status.julian_date,
        });
    }

    /// Returns true when the driver should shut down
    fn handle_command(&mut self, command: MountCommand) -> bool {
        match command {
            MountCommand::Goto { target, reply } => {
                let before = self.simulator.track_state();
                let result = self.simulator.goto(target);
                self.publish_if_changed(before);
                let _ = reply.send(result);
            }
            MountCommand::Sync { target, reply } => {
                let _ = reply.send(self.simulator.sync(target));
            }
            MountCommand::Abort { reply } => {
                let before = self.simulator.track_state();
                self.simulator.abort();
                self.publish_if_changed(before);
                let _ = reply.send(());
            }
            MountCommand::MoveAxis {
                axis,
                direction,
                action,
                reply,
            } => {
                self.simulator.move_axis(axis, direction, action);
                let _ = reply.send(());
            }
            MountCommand::SetLocation { location, reply } => {
                self.simulator.set_location(location);
                let _ = reply.send(());
            }
            MountCommand::SetCoordinateMode { mode, reply } => {
                self.simulator.set_coordinate_mode(mode);
                let _ = reply.send(());
            }
            MountCommand::Status { reply } => {
                let _ = reply.send(self.simulator.status());
            }
            MountCommand::Shutdown => return true,
        }
        false
    }

    fn publish_if_changed(&self, before: TrackState) {
        let state = self.simulator.track_state();
        if state != before {
            self.publish_track_state(state);
        }
    }

    fn publish_track_state(&self, state: TrackState) {
        tracing::debug!("Track state changed to {state}");
        let _ = self.event_tx.send(MountEvent::TrackStateChanged { state });
    }
}

/// Cloneable handle for talking to a running driver task
#[derive(Clone)]
pub struct MountHandle {
    command_tx: mpsc::Sender<MountCommand>,
    event_tx: broadcast::Sender<MountEvent>,
}

impl MountHandle {
    async fn send(&self, command: MountCommand) -> MountResult<()> {
        self.command_tx
            .send(command)
            .await
            .map_err(|_| MountError::DriverStopped)
    }

    /// Slew to a celestial target
    pub async fn goto(&self, target: EquatorialCoordinates) -> MountResult<()> {
        let (reply, rx) = oneshot::channel();
        self.send(MountCommand::Goto { target, reply }).await?;
        rx.await.map_err(|_| MountError::DriverStopped)?
    }

    /// Sync the current position onto a celestial target
    pub async fn sync(&self, target: EquatorialCoordinates) -> MountResult<()> {
        let (reply, rx) = oneshot::channel();
        self.send(MountCommand::Sync { target, reply }).await?;
        rx.await.map_err(|_| MountError::DriverStopped)?
    }

    /// Stop all motion
    pub async fn abort(&self) -> MountResult<()> {
        let (reply, rx) = oneshot::channel();
        self.send(MountCommand::Abort { reply }).await?;
        rx.await.map_err(|_| MountError::DriverStopped)
    }

    /// Start or stop a manual slew on one axis
    pub async fn move_axis(
        &self,
        axis: Axis,
        direction: AxisDirection,
        action: MotionAction,
    ) -> MountResult<()> {
        let (reply, rx) = oneshot::channel();
        self.send(MountCommand::MoveAxis {
            axis,
            direction,
            action,
            reply,
        })
        .await?;
        rx.await.map_err(|_| MountError::DriverStopped)
    }

    /// Move the observer
    pub async fn set_location(&self, location: GeographicLocation) -> MountResult<()> {
        let (reply, rx) = oneshot::channel();
        self.send(MountCommand::SetLocation { location, reply }).await?;
        rx.await.map_err(|_| MountError::DriverStopped)
    }

    /// Choose what a completed goto leads into
    pub async fn set_coordinate_mode(&self, mode: CoordinateMode) -> MountResult<()> {
        let (reply, rx) = oneshot::channel();
        self.send(MountCommand::SetCoordinateMode { mode, reply }).await?;
        rx.await.map_err(|_| MountError::DriverStopped)
    }

    /// Snapshot of the simulated mount
    pub async fn status(&self) -> MountResult<MountStatus> {
        let (reply, rx) = oneshot::channel();
        self.send(MountCommand::Status { reply }).await?;
        rx.await.map_err(|_| MountError::DriverStopped)
    }

    /// Subscribe to position and state events
    pub fn subscribe(&self) -> broadcast::Receiver<MountEvent> {
        self.event_tx.subscribe()
    }

    /// Stop the driver task
    pub async fn shutdown(&self) -> MountResult<()> {
        self.send(MountCommand::Shutdown).await
    }
}
