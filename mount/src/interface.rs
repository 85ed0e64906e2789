//! Device-facing mount control trait
//!
//! Client code talks to a `dyn Mount` and never learns whether a simulator or
//! real hardware sits behind it.

use crate::axis::{Axis, AxisDirection};
use crate::driver::MountHandle;
use crate::error::MountResult;
use crate::simulator::{MotionAction, TrackState};
use async_trait::async_trait;
use scopesim_astro::{EquatorialCoordinates, GeographicLocation};

/// Control surface of a two-axis telescope mount
#[async_trait]
pub trait Mount: Send + Sync {
    /// Slew to a celestial target
    async fn goto(&self, target: EquatorialCoordinates) -> MountResult<()>;

    /// Declare that the mount currently points at the given target
    async fn sync(&self, target: EquatorialCoordinates) -> MountResult<()>;

    /// Stop all motion
    async fn abort(&self) -> MountResult<()>;

    /// Start or stop a manual slew on one axis
    async fn move_axis(
        &self,
        axis: Axis,
        direction: AxisDirection,
        action: MotionAction,
    ) -> MountResult<()>;

    /// Move the observer
    async fn set_location(&self, location: GeographicLocation) -> MountResult<()>;

    /// Celestial coordinates the mount points at
    async fn coordinates(&self) -> MountResult<EquatorialCoordinates>;

    async fn is_slewing(&self) -> MountResult<bool>;

    async fn is_tracking(&self) -> MountResult<bool>;
}

#[async_trait]
impl Mount for MountHandle {
    async fn goto(&self, target: EquatorialCoordinates) -> MountResult<()> {
        MountHandle::goto(self, target).await
    }

    async fn sync(&self, target: EquatorialCoordinates) -> MountResult<()> {
        MountHandle::sync(self, target).await
    }

    async fn abort(&self) -> MountResult<()> {
        MountHandle::abort(self).await
    }

    async fn move_axis(
        &self,
        axis: Axis,
        direction: AxisDirection,
        action: MotionAction,
    ) -> MountResult<()> {
        MountHandle::move_axis(self, axis, direction, action).await
    }

    async fn set_location(&self, location: GeographicLocation) -> MountResult<()> {
        MountHandle::set_location(self, location).await
    }

    async fn coordinates(&self) -> MountResult<EquatorialCoordinates> {
        Ok(self.status().await?.celestial)
    }

    async fn is_slewing(&self) -> MountResult<bool> {
        Ok(self.status().await?.track_state == TrackState::Slewing)
    }

    async fn is_tracking(&self) -> MountResult<bool> {
        Ok(self.status().await?.track_state == TrackState::Tracking)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MountConfig;
    use crate::driver::MountDriver;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_mount_trait_object() {
        let mut config = MountConfig::default();
        config.location = GeographicLocation::new(40.0, -74.0, 10.0);
        config.tick_period = Duration::from_secs(60);
        let handle = MountDriver::spawn(config).unwrap();

        let mount: Arc<dyn Mount> = Arc::new(handle.clone());
        mount.sync(EquatorialCoordinates::new(6.0, 45.0)).await.unwrap();

        let coordinates = mount.coordinates().await.unwrap();
        assert!((coordinates.declination_degrees - 45.0).abs() < 1e-6);
        assert!((coordinates.right_ascension_hours - 6.0).abs() < 1e-3);

        assert!(!mount.is_slewing().await.unwrap());
        assert!(!mount.is_tracking().await.unwrap());

        mount.abort().await.unwrap();
        handle.shutdown().await.unwrap();
    }
}
