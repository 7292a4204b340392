//! Point capture shared by measuring and marking: the state machine, the
//! device resources it holds and the live readouts.

use analysis::LivePath;
use chrono::Utc;
use device::{
    location::{self, WATCH_OPTIONS},
    CameraGuard, Devices, HapticPattern, LocationError, WatchGuard,
};
use model::{
    measurement::CaptureMode,
    point::{GeoPoint, ScreenPoint},
};
use overlay::{OverlayFrame, OverlayInput, OverlayRenderer, Tool, Viewport};

use crate::config::SessionConfig;
use crate::error::{Result, SessionError};

/// Fewer points than this have no distance.
pub const MIN_POINTS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Capturing,
    Finalizing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Started,
    AlreadyCapturing,
}

/// What a capture handed over when it was stopped.
#[derive(Debug)]
pub(crate) struct Captured {
    pub mode: CaptureMode,
    pub track: LivePath<GeoPoint>,
}

pub struct Capture {
    config: SessionConfig,
    devices: Devices,
    overlay: OverlayRenderer,
    state: SessionState,
    mode: CaptureMode,
    track: LivePath<GeoPoint>,
    walking_path: LivePath<ScreenPoint>,
    last_fix: Option<GeoPoint>,
    watch: Option<WatchGuard>,
    camera: Option<CameraGuard>,
    status: String,
    error: Option<String>,
}

impl Capture {
    pub fn new(config: SessionConfig, devices: Devices) -> Self {
        Self {
            overlay: OverlayRenderer::new(config.viewport),
            config,
            devices,
            state: SessionState::Idle,
            mode: CaptureMode::Gps,
            track: LivePath::new(),
            walking_path: LivePath::new(),
            last_fix: None,
            watch: None,
            camera: None,
            status: String::new(),
            error: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn mode(&self) -> CaptureMode {
        self.mode
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn point_count(&self) -> usize {
        self.track.len()
    }

    pub fn track(&self) -> &[GeoPoint] {
        self.track.points()
    }

    /// Travelled distance of the track so far.
    pub fn live_distance_meters(&self) -> f64 {
        self.track.cumulative()
    }

    /// Straightness of the walking path in camera mode, of the track
    /// otherwise.
    pub fn straightness(&self) -> f64 {
        match self.mode {
            CaptureMode::Camera => self.walking_path.straightness(),
            CaptureMode::Gps => self.track.straightness(),
        }
    }

    pub fn is_watching(&self) -> bool {
        self.watch.as_ref().is_some_and(WatchGuard::is_active)
    }

    pub fn is_camera_live(&self) -> bool {
        self.camera.as_ref().is_some_and(CameraGuard::is_live)
    }

    pub fn overlay_input(&self) -> OverlayInput<'_> {
        OverlayInput {
            walking_path: &self.walking_path,
            scale: self.config.pixel_scale,
        }
    }

    pub fn overlay(&self) -> &OverlayRenderer {
        &self.overlay
    }

    pub fn overlay_mut(&mut self) -> &mut OverlayRenderer {
        &mut self.overlay
    }

    pub fn render(&self, elapsed_secs: f64) -> OverlayFrame {
        self.overlay.render(self.overlay_input(), elapsed_secs)
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.overlay.resize(viewport);
    }

    pub fn toggle_tool(&mut self, tool: Tool) -> bool {
        self.devices.haptics.play(HapticPattern::ToolToggle);
        self.overlay.toggle_tool(tool)
    }

    pub(crate) fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
        log::debug!("status: {}", self.status);
    }

    pub(crate) fn haptic(&self, pattern: HapticPattern) {
        self.devices.haptics.play(pattern);
    }

    pub async fn start(&mut self, mode: CaptureMode) -> Result<StartOutcome> {
        if self.state != SessionState::Idle {
            log::debug!("start ignored, capture already running");
            return Ok(StartOutcome::AlreadyCapturing);
        }
        self.state = SessionState::Capturing;
        self.mode = mode;
        self.track.clear();
        self.walking_path.clear();
        self.error = None;
        self.haptic(HapticPattern::Start);

        let started = match mode {
            CaptureMode::Gps => self.start_gps().await,
            CaptureMode::Camera => self.start_camera().await,
        };
        match started {
            Ok(()) => Ok(StartOutcome::Started),
            Err(why) => {
                self.release();
                self.state = SessionState::Idle;
                Err(why)
            }
        }
    }

    async fn start_gps(&mut self) -> Result<()> {
        self.set_status("Acquiring GPS position...");
        let fix = location::acquire_fix(self.devices.location.as_ref()).await;
        let fix = match fix {
            Ok(fix) => fix,
            Err(why) => return Err(self.start_failed(why.into(), HapticPattern::StartFailure)),
        };
        self.track.push(fix);
        self.last_fix = Some(fix);
        self.set_status(match fix.accuracy_meters {
            Some(accuracy) => format!("GPS active. Accuracy: {:.1}m", accuracy),
            None => "GPS active.".to_owned(),
        });
        self.haptic(HapticPattern::GpsFix);

        let watch = WatchGuard::start(self.devices.location.clone(), WATCH_OPTIONS).await;
        match watch {
            Ok(watch) => {
                self.watch = Some(watch);
                Ok(())
            }
            Err(why) => Err(self.start_failed(why.into(), HapticPattern::StartFailure)),
        }
    }

    async fn start_camera(&mut self) -> Result<()> {
        self.set_status("Activating camera...");
        let camera = CameraGuard::acquire(self.devices.media.as_ref()).await;
        match camera {
            Ok(camera) => {
                self.camera = Some(camera);
                self.set_status("Camera active. Tap the screen to capture points.");
                Ok(())
            }
            Err(why) => {
                log::warn!("camera unavailable: {}", why);
                Err(self.start_failed(why.into(), HapticPattern::CameraFailure))
            }
        }
    }

    fn start_failed(&mut self, why: SessionError, pattern: HapticPattern) -> SessionError {
        log::warn!("capture could not start: {}", why);
        self.error = Some(format!("Could not start: {}", why));
        self.set_status("Capture not started.");
        self.haptic(pattern);
        why
    }

    /// Records a tap at viewport coordinates. Only counts while capturing in
    /// camera mode; returns the number of points captured so far.
    ///
    /// Each tap also becomes a geo point offset from the base by
    /// `tap_degrees_per_pixel` per pixel, about 1.1m per pixel at the
    /// default. The filed distance is measured along those points, while the
    /// overlay badges measure the screen path with the much smaller
    /// [`PixelScale`](analysis::scale::PixelScale). The two readouts are
    /// expected to differ by orders of magnitude.
    pub fn tap(&mut self, x: f64, y: f64) -> Option<usize> {
        if self.state != SessionState::Capturing || self.mode != CaptureMode::Camera {
            log::trace!("tap at ({}, {}) ignored", x, y);
            return None;
        }
        let now = Utc::now().timestamp_millis();
        self.walking_path.push(ScreenPoint::new(x, y, now));

        let base = self
            .last_fix
            .map(|fix| fix.coordinate())
            .unwrap_or(self.config.base_position);
        let degrees = self.config.tap_degrees_per_pixel;
        let point = GeoPoint::new(base.latitude + y * degrees, base.longitude + x * degrees, now)
            .with_accuracy(self.config.tap_accuracy_meters);
        self.track.push(point);

        let count = self.track.len();
        self.set_status(format!("Point {} captured", count));
        self.haptic(HapticPattern::Tap);
        Some(count)
    }

    /// Applies one update of the location watch. Errors are reported and
    /// the watch stays up.
    pub fn apply_location_update(&mut self, update: std::result::Result<GeoPoint, LocationError>) {
        if self.state != SessionState::Capturing || self.mode != CaptureMode::Gps {
            log::trace!("location update outside a GPS capture ignored");
            return;
        }
        match update {
            Ok(point) => {
                self.track.push(point);
                self.last_fix = Some(point);
                let count = self.track.len();
                self.set_status(match point.accuracy_meters {
                    Some(accuracy) => {
                        format!("GPS active. Accuracy: {:.1}m - {} points", accuracy, count)
                    }
                    None => format!("GPS active. {} points", count),
                });
            }
            Err(why) => {
                log::warn!("location watch error: {}", why);
                self.error = Some(format!("GPS tracking error: {}", why));
                self.haptic(HapticPattern::WatchError);
            }
        }
    }

    /// Waits for the next watch update and applies it. `false` once there is
    /// no running watch or it ended.
    pub async fn next_location_update(&mut self) -> bool {
        let update = match self.watch.as_mut() {
            Some(watch) => watch.next().await,
            None => None,
        };
        match update {
            Some(update) => {
                self.apply_location_update(update);
                true
            }
            None => false,
        }
    }

    /// Drops the points captured so far and keeps capturing.
    pub fn reset(&mut self) -> bool {
        if self.state != SessionState::Capturing {
            return false;
        }
        self.track.clear();
        self.walking_path.clear();
        self.error = None;
        self.set_status("Capture reset.");
        true
    }

    fn release(&mut self) {
        if let Some(mut watch) = self.watch.take() {
            watch.release();
        }
        if let Some(mut camera) = self.camera.take() {
            camera.release();
            self.set_status("Camera stopped.");
        }
    }

    /// Leaves `Capturing`: releases the devices and hands over the track.
    /// `None` when nothing was being captured.
    pub(crate) fn begin_finalizing(&mut self) -> Option<Captured> {
        if self.state != SessionState::Capturing {
            log::debug!("stop ignored, nothing is being captured");
            return None;
        }
        self.state = SessionState::Finalizing;
        self.release();
        self.haptic(HapticPattern::Stop);
        self.walking_path.clear();
        Some(Captured {
            mode: self.mode,
            track: std::mem::take(&mut self.track),
        })
    }

    pub(crate) fn end_finalizing(&mut self, status: impl Into<String>) {
        self.state = SessionState::Idle;
        self.set_status(status);
    }

    pub(crate) fn fail_finalizing(&mut self, why: &SessionError) {
        log::error!("capture result lost: {}", why);
        self.error = Some(why.to_string());
        self.state = SessionState::Idle;
        self.set_status("Result could not be saved.");
        self.haptic(HapticPattern::StartFailure);
    }
}

impl std::fmt::Debug for Capture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Capture")
            .field("state", &self.state)
            .field("mode", &self.mode)
            .field("points", &self.track.len())
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}
