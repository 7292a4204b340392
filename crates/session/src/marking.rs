use device::{Devices, HapticPattern, LocationError};
use model::{
    field::Field,
    marked_line::{LineKind, MarkedLine},
    measurement::CaptureMode,
    point::GeoPoint,
    WithId,
};
use overlay::{OverlayFrame, OverlayInput, Tool};
use store::{StoreHandle, StoreRef};
use utility::id::Id;

use crate::capture::{Capture, SessionState, StartOutcome, MIN_POINTS};
use crate::config::SessionConfig;
use crate::error::{Result, SessionError};
use crate::StopOutcome;

/// Walks a line on the pitch and files it as a completed [`MarkedLine`].
#[derive(Debug)]
pub struct MarkingSession {
    capture: Capture,
    store: StoreHandle,
    pub line_kind: LineKind,
    /// Field credited with the line, the active one when `None`.
    pub field: Option<Id<Field>>,
}

impl MarkingSession {
    pub fn new(config: SessionConfig, devices: Devices, store: StoreHandle) -> Self {
        Self {
            capture: Capture::new(config, devices),
            store,
            line_kind: LineKind::Horizontal,
            field: None,
        }
    }

    pub fn with_line_kind(mut self, line_kind: LineKind) -> Self {
        self.line_kind = line_kind;
        self
    }

    pub fn with_field(mut self, field: Id<Field>) -> Self {
        self.field = Some(field);
        self
    }

    pub async fn start(&mut self, mode: CaptureMode) -> Result<StartOutcome> {
        self.capture.start(mode).await
    }

    pub fn tap(&mut self, x: f64, y: f64) -> Option<usize> {
        self.capture.tap(x, y)
    }

    pub fn apply_location_update(&mut self, update: std::result::Result<GeoPoint, LocationError>) {
        self.capture.apply_location_update(update)
    }

    pub async fn next_location_update(&mut self) -> bool {
        self.capture.next_location_update().await
    }

    pub fn reset(&mut self) -> bool {
        self.capture.reset()
    }

    /// Stops capturing. With enough points a line named after its position
    /// in the list is added and the field's marking count goes up by one.
    pub async fn stop(&mut self) -> Result<StopOutcome<MarkedLine>> {
        let Some(captured) = self.capture.begin_finalizing() else {
            return Ok(StopOutcome::NotCapturing);
        };
        let points = captured.track.len();
        if points < MIN_POINTS {
            self.capture
                .end_finalizing("Marking stopped. At least 2 points are required.");
            return Ok(StopOutcome::InsufficientData { points });
        }

        let length = captured.track.cumulative();
        let committed = self
            .store
            .record_marking(self.field.clone(), self.line_kind, length)
            .await;
        match committed {
            Ok(WithId { id, content: line }) => {
                log::info!("line {} filed: {:.2}m over {} points", id, length, points);
                self.capture
                    .end_finalizing(format!("{} completed: {:.2}m", line.name, length));
                self.capture.haptic(HapticPattern::Success);
                Ok(StopOutcome::Committed { id, record: line })
            }
            Err(why) => {
                let why = SessionError::from(why);
                self.capture.fail_finalizing(&why);
                Err(why)
            }
        }
    }

    pub fn state(&self) -> SessionState {
        self.capture.state()
    }

    pub fn status(&self) -> &str {
        self.capture.status()
    }

    pub fn error(&self) -> Option<&str> {
        self.capture.error()
    }

    pub fn point_count(&self) -> usize {
        self.capture.point_count()
    }

    pub fn live_distance_meters(&self) -> f64 {
        self.capture.live_distance_meters()
    }

    pub fn straightness(&self) -> f64 {
        self.capture.straightness()
    }

    pub fn overlay_input(&self) -> OverlayInput<'_> {
        self.capture.overlay_input()
    }

    pub fn render(&self, elapsed_secs: f64) -> OverlayFrame {
        self.capture.render(elapsed_secs)
    }

    pub fn toggle_tool(&mut self, tool: Tool) -> bool {
        self.capture.toggle_tool(tool)
    }

    pub fn capture(&self) -> &Capture {
        &self.capture
    }

    pub fn capture_mut(&mut self) -> &mut Capture {
        &mut self.capture
    }
}
