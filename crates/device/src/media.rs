use std::{error::Error, fmt};

use async_trait::async_trait;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    /// Rear camera, pointing away from the user.
    Environment,
    User,
}

/// Requested camera properties. `None` leaves the choice to the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CameraConstraints {
    pub facing: Option<Facing>,
    pub ideal_width: Option<u32>,
    pub ideal_height: Option<u32>,
}

impl CameraConstraints {
    pub const fn rear(ideal: Option<(u32, u32)>) -> Self {
        match ideal {
            Some((width, height)) => Self {
                facing: Some(Facing::Environment),
                ideal_width: Some(width),
                ideal_height: Some(height),
            },
            None => Self {
                facing: Some(Facing::Environment),
                ideal_width: None,
                ideal_height: None,
            },
        }
    }

    pub const fn any() -> Self {
        Self {
            facing: None,
            ideal_width: None,
            ideal_height: None,
        }
    }
}

/// Tried in order, the first stream granted wins.
pub const CAMERA_FALLBACKS: [CameraConstraints; 4] = [
    CameraConstraints::rear(Some((1280, 720))),
    CameraConstraints::rear(Some((1920, 1080))),
    CameraConstraints::rear(None),
    CameraConstraints::any(),
];

#[derive(Debug)]
pub enum MediaError {
    PermissionDenied,
    NotFound,
    Overconstrained,
    /// The device can not capture video at all.
    Unsupported,
    Other(Box<dyn Error + Send + Sync>),
}

impl MediaError {
    pub fn other<T: Error + Send + Sync + 'static>(why: T) -> Self {
        Self::Other(Box::new(why))
    }
}

impl fmt::Display for MediaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PermissionDenied => write!(f, "camera permission denied"),
            Self::NotFound => write!(f, "no camera found"),
            Self::Overconstrained => write!(f, "no camera satisfies the requested constraints"),
            Self::Unsupported => write!(f, "camera is not available on this device"),
            Self::Other(why) => write!(f, "camera error: {}", why),
        }
    }
}

impl Error for MediaError {}

/// A live video stream. Stopping it releases every track.
pub trait CameraStream: Send + Sync {
    fn stop(&mut self);

    fn is_live(&self) -> bool;
}

#[async_trait]
pub trait MediaCapture: Send + Sync {
    async fn request_stream(
        &self,
        constraints: CameraConstraints,
    ) -> Result<Box<dyn CameraStream>, MediaError>;
}

/// Owns a camera stream and stops it when released or dropped.
pub struct CameraGuard {
    stream: Option<Box<dyn CameraStream>>,
}

impl CameraGuard {
    /// Requests a stream with each of [`CAMERA_FALLBACKS`] in turn. Fails with
    /// the error of the last request.
    pub async fn acquire(media: &dyn MediaCapture) -> Result<Self, MediaError> {
        let mut last_error = MediaError::NotFound;
        for constraints in CAMERA_FALLBACKS {
            match media.request_stream(constraints).await {
                Ok(stream) => {
                    log::debug!("camera stream granted for {:?}", constraints);
                    return Ok(Self {
                        stream: Some(stream),
                    });
                }
                Err(why) => {
                    log::debug!("camera request {:?} failed: {}", constraints, why);
                    last_error = why;
                }
            }
        }
        Err(last_error)
    }

    pub fn is_live(&self) -> bool {
        self.stream.as_ref().is_some_and(|stream| stream.is_live())
    }

    pub fn release(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.stop();
            log::debug!("camera stream stopped");
        }
    }
}

impl Drop for CameraGuard {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for CameraGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CameraGuard")
            .field("live", &self.is_live())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulated::SimulatedCamera;

    #[tokio::test]
    async fn falls_back_until_a_stream_is_granted() {
        let camera = SimulatedCamera::accepting(|constraints| constraints.ideal_width.is_none());
        let guard = CameraGuard::acquire(&camera).await.unwrap();
        assert!(guard.is_live());
        assert_eq!(camera.requests(), CAMERA_FALLBACKS[..3].to_vec());
    }

    #[tokio::test]
    async fn reports_last_error_when_nothing_works() {
        let camera = SimulatedCamera::denying();
        let result = CameraGuard::acquire(&camera).await;
        assert!(matches!(result, Err(MediaError::PermissionDenied)));
        assert_eq!(camera.requests().len(), 4);
        assert_eq!(camera.live_streams(), 0);
    }

    #[tokio::test]
    async fn stream_stops_on_release_and_drop() {
        let camera = SimulatedCamera::new();
        let mut guard = CameraGuard::acquire(&camera).await.unwrap();
        assert_eq!(camera.live_streams(), 1);
        guard.release();
        assert_eq!(camera.live_streams(), 0);

        let guard = CameraGuard::acquire(&camera).await.unwrap();
        assert_eq!(camera.live_streams(), 1);
        drop(guard);
        assert_eq!(camera.live_streams(), 0);
    }
}
