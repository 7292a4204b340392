use chrono::Utc;
use device::{Devices, HapticPattern, LocationError};
use model::{
    field::Field,
    measurement::{CaptureMode, Measurement, MeasurementKind},
    point::GeoPoint,
};
use overlay::{OverlayFrame, OverlayInput, Tool};
use store::{StoreHandle, StoreRef};
use utility::id::Id;

use crate::capture::{Capture, SessionState, StartOutcome, MIN_POINTS};
use crate::config::SessionConfig;
use crate::error::{Result, SessionError};
use crate::StopOutcome;

/// The measurement a session fills in. A stored measurement with the same
/// name is replaced.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementTarget {
    pub name: String,
    pub kind: MeasurementKind,
    pub tolerance_meters: f64,
}

impl MeasurementTarget {
    pub fn new(name: impl Into<String>, kind: MeasurementKind, tolerance_meters: f64) -> Self {
        Self {
            name: name.into(),
            kind,
            tolerance_meters,
        }
    }
}

impl Default for MeasurementTarget {
    fn default() -> Self {
        Self::new("Total length", MeasurementKind::Line, 0.5)
    }
}

/// Walks a distance and files it as a [`Measurement`].
#[derive(Debug)]
pub struct MeasurementSession {
    capture: Capture,
    store: StoreHandle,
    pub target: MeasurementTarget,
    /// Field credited with the result, the active one when `None`.
    pub field: Option<Id<Field>>,
}

impl MeasurementSession {
    pub fn new(config: SessionConfig, devices: Devices, store: StoreHandle) -> Self {
        Self {
            capture: Capture::new(config, devices),
            store,
            target: MeasurementTarget::default(),
            field: None,
        }
    }

    pub fn with_target(mut self, target: MeasurementTarget) -> Self {
        self.target = target;
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

    /// Stops capturing. With enough points the distance is filed under the
    /// target name and the field's measurement count goes up by one.
    pub async fn stop(&mut self) -> Result<StopOutcome<Measurement>> {
        let Some(captured) = self.capture.begin_finalizing() else {
            return Ok(StopOutcome::NotCapturing);
        };
        let points = captured.track.len();
        if points < MIN_POINTS {
            self.capture
                .end_finalizing("Measurement stopped. At least 2 points are required.");
            return Ok(StopOutcome::InsufficientData { points });
        }

        let distance = captured.track.cumulative();
        let measurement = Measurement::new(
            self.target.name.clone(),
            self.target.kind,
            distance,
            self.target.tolerance_meters,
            Utc::now(),
            Some(captured.mode),
        );
        let committed = self
            .store
            .record_measurement(self.field.clone(), measurement.clone())
            .await;
        match committed {
            Ok(id) => {
                log::info!(
                    "measurement {} filed: {:.2}m over {} points, compliant: {}",
                    id,
                    distance,
                    points,
                    measurement.is_fifa_compliant()
                );
                self.capture
                    .end_finalizing(format!("Measurement completed: {:.2}m", distance));
                self.capture.haptic(HapticPattern::Success);
                Ok(StopOutcome::Committed {
                    id,
                    record: measurement,
                })
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

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use device::{
        simulated::{RecordingHaptics, ScriptedLocation, SimulatedCamera},
        Haptics, LocationProvider, MediaCapture,
    };
    use store::{MemoryStorage, StoreActor};

    use super::*;

    struct Rig {
        session: MeasurementSession,
        store: StoreHandle,
        location: Arc<ScriptedLocation>,
        camera: Arc<SimulatedCamera>,
        haptics: Arc<RecordingHaptics>,
    }

    fn rig(location: ScriptedLocation) -> Rig {
        let location = Arc::new(location);
        let camera = Arc::new(SimulatedCamera::new());
        let haptics = Arc::new(RecordingHaptics::default());
        let devices = Devices::detect(
            Some(location.clone() as Arc<dyn LocationProvider>),
            Some(camera.clone() as Arc<dyn MediaCapture>),
            Some(haptics.clone() as Arc<dyn Haptics>),
        );
        let store = StoreActor::spawn(Arc::new(MemoryStorage::new()), "test");
        Rig {
            session: MeasurementSession::new(SessionConfig::default(), devices, store.clone()),
            store,
            location,
            camera,
            haptics,
        }
    }

    fn lissewege() -> GeoPoint {
        GeoPoint::new(51.2993, 3.2218, 0).with_accuracy(5.0)
    }

    #[tokio::test]
    async fn three_gps_points_make_a_compliant_measurement() {
        let mut rig = rig(ScriptedLocation::walking_north(lissewege(), 2, 0.0001));
        let before = rig.store.snapshot().await.unwrap();
        let active = before.active_field.clone().unwrap();

        rig.session.start(CaptureMode::Gps).await.unwrap();
        while rig.session.point_count() < 3 {
            assert!(rig.session.next_location_update().await);
        }
        let outcome = rig.session.stop().await.unwrap();

        let StopOutcome::Committed { id, record } = outcome else {
            panic!("expected a committed measurement");
        };
        assert!((record.distance_meters() - 22.2).abs() < 1.0);
        assert!(record.is_fifa_compliant());
        assert_eq!(record.capture_mode(), Some(CaptureMode::Gps));
        assert_eq!(rig.session.status(), format!("Measurement completed: {:.2}m", record.distance_meters()));
        assert_eq!(rig.session.state(), SessionState::Idle);
        assert_eq!(rig.location.active_watches(), 0);
        assert_eq!(
            rig.haptics.last(),
            Some(HapticPattern::Success.durations().to_vec())
        );

        let after = rig.store.snapshot().await.unwrap();
        let stored = after.measurements.iter().find(|m| m.id == id).unwrap();
        assert_eq!(stored.content.name(), "Total length");
        assert_eq!(after.measurements.len(), before.measurements.len());
        let field = after.fields.iter().find(|field| field.id == active).unwrap();
        assert_eq!(field.content.statistics.total_measurements, 1);
        assert!(field.content.statistics.last_measurement_at.is_some());
    }

    #[tokio::test]
    async fn new_target_names_are_appended() {
        let mut rig = rig(ScriptedLocation::new());
        rig.session.target = MeasurementTarget::new("Goal width", MeasurementKind::Line, 0.05);
        let before = rig.store.snapshot().await.unwrap().measurements.len();

        rig.session.start(CaptureMode::Camera).await.unwrap();
        rig.session.tap(100.0, 100.0);
        rig.session.tap(100.0, 400.0);
        let outcome = rig.session.stop().await.unwrap();

        let StopOutcome::Committed { record, .. } = outcome else {
            panic!("expected a committed measurement");
        };
        assert_eq!(record.capture_mode(), Some(CaptureMode::Camera));
        assert!(record.distance_meters() > 300.0);
        assert_eq!(rig.camera.live_streams(), 0);
        let measurements = rig.store.snapshot().await.unwrap().measurements;
        assert_eq!(measurements.len(), before + 1);
    }

    #[tokio::test]
    async fn a_single_point_is_not_enough() {
        let mut rig = rig(ScriptedLocation::walking_north(lissewege(), 0, 0.0));
        let before = rig.store.snapshot().await.unwrap();

        rig.session.start(CaptureMode::Gps).await.unwrap();
        let outcome = rig.session.stop().await.unwrap();

        assert_eq!(outcome, StopOutcome::InsufficientData { points: 1 });
        assert_eq!(
            rig.session.status(),
            "Measurement stopped. At least 2 points are required."
        );
        assert_eq!(rig.store.snapshot().await.unwrap(), before);
    }

    #[tokio::test]
    async fn stop_without_start_does_nothing() {
        let mut rig = rig(ScriptedLocation::new());
        assert_eq!(rig.session.stop().await.unwrap(), StopOutcome::NotCapturing);
        assert!(rig.haptics.patterns().is_empty());
    }

    #[tokio::test]
    async fn unknown_field_fails_the_commit_and_returns_to_idle() {
        let mut rig = rig(ScriptedLocation::new());
        rig.session.field = Some(Id::new("field-gone".to_owned()));
        rig.session.start(CaptureMode::Camera).await.unwrap();
        rig.session.tap(0.0, 0.0);
        rig.session.tap(0.0, 50.0);

        let result = rig.session.stop().await;
        assert!(matches!(result, Err(SessionError::Store(_))));
        assert_eq!(rig.session.state(), SessionState::Idle);
        assert!(rig.session.error().is_some());
        assert_eq!(rig.camera.live_streams(), 0);
    }
}
