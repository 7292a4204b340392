use std::{error::Error, fmt, sync::Arc, time::Duration};

use async_trait::async_trait;
use model::point::GeoPoint;
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionOptions {
    pub high_accuracy: bool,
    pub timeout: Duration,
    pub maximum_age: Duration,
}

impl PositionOptions {
    pub const fn new(high_accuracy: bool, timeout_ms: u64, maximum_age_ms: u64) -> Self {
        Self {
            high_accuracy,
            timeout: Duration::from_millis(timeout_ms),
            maximum_age: Duration::from_millis(maximum_age_ms),
        }
    }
}

/// One-shot fix attempts, tried in order until one succeeds.
pub const FIX_ATTEMPTS: [PositionOptions; 3] = [
    PositionOptions::new(true, 15_000, 0),
    PositionOptions::new(true, 30_000, 5_000),
    PositionOptions::new(false, 10_000, 10_000),
];

pub const FIX_RETRY_DELAY: Duration = Duration::from_secs(1);

pub const WATCH_OPTIONS: PositionOptions = PositionOptions::new(true, 15_000, 1_000);

#[derive(Debug)]
pub enum LocationError {
    PermissionDenied,
    PositionUnavailable,
    Timeout,
    /// The device has no location capability at all.
    Unsupported,
    Other(Box<dyn Error + Send + Sync>),
}

impl LocationError {
    pub fn other<T: Error + Send + Sync + 'static>(why: T) -> Self {
        Self::Other(Box::new(why))
    }
}

impl fmt::Display for LocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PermissionDenied => write!(f, "location permission denied"),
            Self::PositionUnavailable => write!(f, "location information unavailable"),
            Self::Timeout => write!(f, "location request timed out"),
            Self::Unsupported => write!(f, "location is not available on this device"),
            Self::Other(why) => write!(f, "location error: {}", why),
        }
    }
}

impl Error for LocationError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WatchId(pub u64);

/// A running subscription to position updates. Updates arrive in the order
/// the provider produced them.
#[derive(Debug)]
pub struct LocationWatch {
    pub id: WatchId,
    pub updates: mpsc::Receiver<Result<GeoPoint, LocationError>>,
}

#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn current_fix(&self, options: PositionOptions) -> Result<GeoPoint, LocationError>;

    async fn watch(&self, options: PositionOptions) -> Result<LocationWatch, LocationError>;

    fn clear_watch(&self, id: WatchId);
}

/// Gets a single fix, walking through [`FIX_ATTEMPTS`] with a pause between
/// attempts. Fails with the error of the last attempt.
pub async fn acquire_fix(provider: &dyn LocationProvider) -> Result<GeoPoint, LocationError> {
    let mut last_error = LocationError::PositionUnavailable;
    for (attempt, options) in FIX_ATTEMPTS.iter().enumerate() {
        if attempt > 0 {
            tokio::time::sleep(FIX_RETRY_DELAY).await;
        }
        match provider.current_fix(*options).await {
            Ok(fix) => return Ok(fix),
            Err(why) => {
                log::warn!("location fix attempt {} failed: {}", attempt + 1, why);
                last_error = why;
            }
        }
    }
    Err(last_error)
}

/// Owns a location subscription and clears it when released or dropped.
pub struct WatchGuard {
    provider: Arc<dyn LocationProvider>,
    watch: Option<LocationWatch>,
}

impl WatchGuard {
    pub async fn start(
        provider: Arc<dyn LocationProvider>,
        options: PositionOptions,
    ) -> Result<Self, LocationError> {
        let watch = provider.watch(options).await?;
        log::debug!("location watch {:?} started", watch.id);
        Ok(Self {
            provider,
            watch: Some(watch),
        })
    }

    /// Next update, `None` once the provider closed the stream or the guard
    /// was released.
    pub async fn next(&mut self) -> Option<Result<GeoPoint, LocationError>> {
        match self.watch.as_mut() {
            Some(watch) => watch.updates.recv().await,
            None => None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.watch.is_some()
    }

    pub fn release(&mut self) {
        if let Some(watch) = self.watch.take() {
            log::debug!("location watch {:?} cleared", watch.id);
            self.provider.clear_watch(watch.id);
        }
    }
}

impl Drop for WatchGuard {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for WatchGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchGuard")
            .field("watch", &self.watch.as_ref().map(|watch| watch.id))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulated::ScriptedLocation;

    fn fix() -> GeoPoint {
        GeoPoint::new(51.2993, 3.2218, 0).with_accuracy(4.0)
    }

    #[tokio::test(start_paused = true)]
    async fn first_successful_attempt_wins() {
        let provider = ScriptedLocation::new();
        provider.push_fix(Err(LocationError::Timeout));
        provider.push_fix(Ok(fix()));

        let started = tokio::time::Instant::now();
        let result = acquire_fix(&provider).await.unwrap();
        assert_eq!(result, fix());
        assert_eq!(provider.fix_requests(), FIX_ATTEMPTS[..2].to_vec());
        assert!(started.elapsed() >= FIX_RETRY_DELAY);
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_after_three_attempts() {
        let provider = ScriptedLocation::new();
        provider.push_fix(Err(LocationError::Timeout));
        provider.push_fix(Err(LocationError::PositionUnavailable));
        provider.push_fix(Err(LocationError::PermissionDenied));

        let result = acquire_fix(&provider).await;
        assert!(matches!(result, Err(LocationError::PermissionDenied)));
        assert_eq!(provider.fix_requests(), FIX_ATTEMPTS.to_vec());
    }

    #[tokio::test]
    async fn dropping_the_guard_clears_the_watch() {
        let provider = Arc::new(ScriptedLocation::new());
        provider.push_update(Ok(fix()));
        let mut guard = WatchGuard::start(provider.clone(), WATCH_OPTIONS)
            .await
            .unwrap();
        assert_eq!(guard.next().await.unwrap().unwrap(), fix());
        assert_eq!(provider.active_watches(), 1);

        drop(guard);
        assert_eq!(provider.active_watches(), 0);
    }

    #[tokio::test]
    async fn released_guard_yields_nothing() {
        let provider = Arc::new(ScriptedLocation::new());
        let mut guard = WatchGuard::start(provider.clone(), WATCH_OPTIONS)
            .await
            .unwrap();
        guard.release();
        assert!(!guard.is_active());
        assert!(guard.next().await.is_none());
        assert_eq!(provider.cleared().len(), 1);
    }
}
