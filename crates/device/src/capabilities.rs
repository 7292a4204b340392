use std::sync::Arc;

use async_trait::async_trait;
use model::point::GeoPoint;

use crate::haptics::{Haptics, NoHaptics};
use crate::location::{LocationError, LocationProvider, LocationWatch, PositionOptions, WatchId};
use crate::media::{CameraConstraints, CameraStream, MediaCapture, MediaError};

/// Stand-in for devices without location support.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableLocation;

#[async_trait]
impl LocationProvider for UnavailableLocation {
    async fn current_fix(&self, _options: PositionOptions) -> Result<GeoPoint, LocationError> {
        Err(LocationError::Unsupported)
    }

    async fn watch(&self, _options: PositionOptions) -> Result<LocationWatch, LocationError> {
        Err(LocationError::Unsupported)
    }

    fn clear_watch(&self, _id: WatchId) {}
}

/// Stand-in for devices without a camera.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableMedia;

#[async_trait]
impl MediaCapture for UnavailableMedia {
    async fn request_stream(
        &self,
        _constraints: CameraConstraints,
    ) -> Result<Box<dyn CameraStream>, MediaError> {
        Err(MediaError::Unsupported)
    }
}

/// The device capabilities a session works with, decided once up front.
#[derive(Clone)]
pub struct Devices {
    pub location: Arc<dyn LocationProvider>,
    pub media: Arc<dyn MediaCapture>,
    pub haptics: Arc<dyn Haptics>,
}

impl Devices {
    pub fn detect(
        location: Option<Arc<dyn LocationProvider>>,
        media: Option<Arc<dyn MediaCapture>>,
        haptics: Option<Arc<dyn Haptics>>,
    ) -> Self {
        let location = location.unwrap_or_else(|| {
            log::info!("no location provider, GPS capture disabled");
            Arc::new(UnavailableLocation)
        });
        let media = media.unwrap_or_else(|| {
            log::info!("no media capture, camera capture disabled");
            Arc::new(UnavailableMedia)
        });
        let haptics = haptics.unwrap_or_else(|| {
            log::debug!("no vibration support");
            Arc::new(NoHaptics)
        });
        Self {
            location,
            media,
            haptics,
        }
    }
}

impl std::fmt::Debug for Devices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Devices").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::{acquire_fix, WATCH_OPTIONS};
    use crate::media::CameraGuard;

    #[tokio::test(start_paused = true)]
    async fn missing_capabilities_fail_cleanly() {
        let devices = Devices::detect(None, None, None);
        assert!(matches!(
            acquire_fix(devices.location.as_ref()).await,
            Err(LocationError::Unsupported)
        ));
        assert!(matches!(
            devices.location.watch(WATCH_OPTIONS).await,
            Err(LocationError::Unsupported)
        ));
        assert!(matches!(
            CameraGuard::acquire(devices.media.as_ref()).await,
            Err(MediaError::Unsupported)
        ));
        devices.haptics.vibrate(&[50]);
    }
}
