//! Scripted devices for tests and the playground binary.

use std::{
    collections::{HashMap, VecDeque},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex, MutexGuard,
    },
};

use async_trait::async_trait;
use model::point::GeoPoint;
use tokio::sync::mpsc;

use crate::haptics::Haptics;
use crate::location::{LocationError, LocationProvider, LocationWatch, PositionOptions, WatchId};
use crate::media::{CameraConstraints, CameraStream, MediaCapture, MediaError};

const WATCH_BUFFER: usize = 64;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[derive(Default)]
struct LocationScript {
    fixes: VecDeque<Result<GeoPoint, LocationError>>,
    pending_updates: Vec<Result<GeoPoint, LocationError>>,
    watches: HashMap<WatchId, mpsc::Sender<Result<GeoPoint, LocationError>>>,
    next_watch: u64,
    fix_requests: Vec<PositionOptions>,
    cleared: Vec<WatchId>,
}

/// Location provider answering from a script.
///
/// Fix requests consume [`push_fix`](Self::push_fix) results in order and
/// fail with `PositionUnavailable` once the script is exhausted. Updates
/// pushed before a watch starts are delivered as soon as it does; later ones
/// go to every running watch.
#[derive(Default)]
pub struct ScriptedLocation {
    script: Mutex<LocationScript>,
}

impl ScriptedLocation {
    pub fn new() -> Self {
        Self::default()
    }

    /// A provider whose fix is `start` and whose watch walks `steps` times by
    /// `step_degrees` of latitude, one second apart.
    pub fn walking_north(start: GeoPoint, steps: usize, step_degrees: f64) -> Self {
        let provider = Self::new();
        provider.push_fix(Ok(start));
        for step in 1..=steps {
            let point = GeoPoint {
                latitude: start.latitude + step_degrees * step as f64,
                timestamp_ms: start.timestamp_ms + 1_000 * step as i64,
                ..start
            };
            provider.push_update(Ok(point));
        }
        provider
    }

    pub fn push_fix(&self, fix: Result<GeoPoint, LocationError>) {
        lock(&self.script).fixes.push_back(fix);
    }

    pub fn push_update(&self, update: Result<GeoPoint, LocationError>) {
        let mut script = lock(&self.script);
        match script.watches.values().next() {
            Some(sender) => {
                if let Err(why) = sender.try_send(update) {
                    log::warn!("dropping simulated location update: {}", why);
                }
            }
            None => script.pending_updates.push(update),
        }
    }

    pub fn fix_requests(&self) -> Vec<PositionOptions> {
        lock(&self.script).fix_requests.clone()
    }

    pub fn active_watches(&self) -> usize {
        lock(&self.script).watches.len()
    }

    pub fn cleared(&self) -> Vec<WatchId> {
        lock(&self.script).cleared.clone()
    }
}

#[async_trait]
impl LocationProvider for ScriptedLocation {
    async fn current_fix(&self, options: PositionOptions) -> Result<GeoPoint, LocationError> {
        let mut script = lock(&self.script);
        script.fix_requests.push(options);
        script
            .fixes
            .pop_front()
            .unwrap_or(Err(LocationError::PositionUnavailable))
    }

    async fn watch(&self, _options: PositionOptions) -> Result<LocationWatch, LocationError> {
        let mut script = lock(&self.script);
        let pending = std::mem::take(&mut script.pending_updates);
        let (sender, updates) = mpsc::channel(WATCH_BUFFER.max(pending.len()));
        for update in pending {
            if let Err(why) = sender.try_send(update) {
                log::warn!("dropping simulated location update: {}", why);
            }
        }
        script.next_watch += 1;
        let id = WatchId(script.next_watch);
        script.watches.insert(id, sender);
        Ok(LocationWatch { id, updates })
    }

    fn clear_watch(&self, id: WatchId) {
        let mut script = lock(&self.script);
        script.watches.remove(&id);
        script.cleared.push(id);
    }
}

type Acceptor = Box<dyn Fn(&CameraConstraints) -> Result<(), MediaError> + Send + Sync>;

/// Camera that grants or refuses stream requests through a predicate and
/// counts the streams still running.
pub struct SimulatedCamera {
    accept: Acceptor,
    requests: Mutex<Vec<CameraConstraints>>,
    live: Arc<AtomicUsize>,
}

impl SimulatedCamera {
    pub fn new() -> Self {
        Self::with_acceptor(Box::new(|_| Ok(())))
    }

    /// Grants only requests `predicate` agrees with; others are
    /// overconstrained.
    pub fn accepting<F>(predicate: F) -> Self
    where
        F: Fn(&CameraConstraints) -> bool + Send + Sync + 'static,
    {
        Self::with_acceptor(Box::new(move |constraints| {
            if predicate(constraints) {
                Ok(())
            } else {
                Err(MediaError::Overconstrained)
            }
        }))
    }

    pub fn denying() -> Self {
        Self::with_acceptor(Box::new(|_| Err(MediaError::PermissionDenied)))
    }

    fn with_acceptor(accept: Acceptor) -> Self {
        Self {
            accept,
            requests: Mutex::new(Vec::new()),
            live: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn requests(&self) -> Vec<CameraConstraints> {
        lock(&self.requests).clone()
    }

    pub fn live_streams(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }
}

impl Default for SimulatedCamera {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MediaCapture for SimulatedCamera {
    async fn request_stream(
        &self,
        constraints: CameraConstraints,
    ) -> Result<Box<dyn CameraStream>, MediaError> {
        lock(&self.requests).push(constraints);
        (self.accept)(&constraints)?;
        self.live.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(SimulatedStream {
            live: self.live.clone(),
            stopped: false,
        }))
    }
}

struct SimulatedStream {
    live: Arc<AtomicUsize>,
    stopped: bool,
}

impl CameraStream for SimulatedStream {
    fn stop(&mut self) {
        if !self.stopped {
            self.stopped = true;
            self.live.fetch_sub(1, Ordering::SeqCst);
        }
    }

    fn is_live(&self) -> bool {
        !self.stopped
    }
}

/// Remembers every pattern it was asked to play.
#[derive(Debug, Default)]
pub struct RecordingHaptics {
    patterns: Mutex<Vec<Vec<u32>>>,
}

impl RecordingHaptics {
    pub fn patterns(&self) -> Vec<Vec<u32>> {
        lock(&self.patterns).clone()
    }

    pub fn last(&self) -> Option<Vec<u32>> {
        lock(&self.patterns).last().cloned()
    }
}

impl Haptics for RecordingHaptics {
    fn vibrate(&self, durations: &[u32]) {
        lock(&self.patterns).push(durations.to_vec());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::WATCH_OPTIONS;

    #[tokio::test]
    async fn updates_keep_their_order() {
        let start = GeoPoint::new(51.2993, 3.2218, 0);
        let provider = ScriptedLocation::walking_north(start, 3, 0.0001);
        let mut watch = provider.watch(WATCH_OPTIONS).await.unwrap();
        let mut latitudes = Vec::new();
        for _ in 0..3 {
            latitudes.push(watch.updates.recv().await.unwrap().unwrap().latitude);
        }
        assert!(latitudes.windows(2).all(|pair| pair[0] < pair[1]));

        provider.push_update(Err(LocationError::Timeout));
        assert!(matches!(
            watch.updates.recv().await,
            Some(Err(LocationError::Timeout))
        ));
    }

    #[tokio::test]
    async fn exhausted_script_has_no_fix() {
        let provider = ScriptedLocation::new();
        assert!(matches!(
            provider.current_fix(WATCH_OPTIONS).await,
            Err(LocationError::PositionUnavailable)
        ));
    }
}
