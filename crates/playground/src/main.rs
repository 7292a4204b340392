use std::sync::Arc;

use analysis::compliance::{PitchEnvelope, DEFAULT_PITCH_TOLERANCE};
use device::{
    simulated::{RecordingHaptics, ScriptedLocation, SimulatedCamera},
    Devices, Haptics, LocationProvider, MediaCapture,
};
use model::{
    marked_line::LineKind,
    measurement::{CaptureMode, MeasurementKind},
    point::GeoPoint,
    template,
};
use overlay::Tool;
use session::{MarkingSession, MeasurementSession, MeasurementTarget, SessionConfig, StopOutcome};
use store::{StorageConfig, StoreActor, StoreRef};
use utility::format::format_distance;

#[tokio::main]
async fn main() {
    env_logger::init();

    // store
    let storage_config = StorageConfig::from_env();
    let store = StoreActor::spawn(Arc::new(storage_config.file_storage()), storage_config.key.clone());
    let config = SessionConfig::from_env().expect("invalid session configuration in env.");

    // devices
    let start = GeoPoint::new(
        config.base_position.latitude,
        config.base_position.longitude,
        0,
    )
    .with_accuracy(4.0);
    let devices = Devices::detect(
        Some(Arc::new(ScriptedLocation::walking_north(start, 10, 0.0001)) as Arc<dyn LocationProvider>),
        Some(Arc::new(SimulatedCamera::new()) as Arc<dyn MediaCapture>),
        Some(Arc::new(RecordingHaptics::default()) as Arc<dyn Haptics>),
    );

    // gps measurement
    let mut measuring = MeasurementSession::new(config, devices.clone(), store.clone())
        .with_target(MeasurementTarget::new("Penalty area depth", MeasurementKind::Area, 0.3));
    measuring.start(CaptureMode::Gps).await.unwrap();
    while measuring.point_count() < 11 && measuring.next_location_update().await {
        println!("{} ({})", measuring.status(), format_distance(measuring.live_distance_meters()));
    }
    match measuring.stop().await.unwrap() {
        StopOutcome::Committed { id, record } => println!(
            "measurement {}: {:.2}m, compliant: {}",
            id,
            record.distance_meters(),
            record.is_fifa_compliant()
        ),
        other => println!("no measurement: {:?}", other),
    }

    // camera marking
    let mut marking = MarkingSession::new(config, devices, store.clone()).with_line_kind(LineKind::Vertical);
    for tool in [Tool::PathTracker, Tool::StraightnessChecker, Tool::LiveMeasurement] {
        marking.toggle_tool(tool);
    }
    marking.start(CaptureMode::Camera).await.unwrap();
    for (x, y) in [(195.0, 700.0), (197.0, 560.0), (194.0, 420.0), (196.0, 280.0)] {
        marking.tap(x, y);
    }
    let frame = marking.render(1.0);
    println!("overlay: {}", serde_json::to_string_pretty(&frame).unwrap());
    println!("straightness: {:.1}%", marking.straightness());
    match marking.stop().await.unwrap() {
        StopOutcome::Committed { id, record } => {
            println!("line {}: {} {:.2}m", id, record.name, record.length_meters)
        }
        other => println!("no line: {:?}", other),
    }

    // pitch check against the active field
    let state = store.snapshot().await.unwrap();
    if let Some(field) = state.active_field() {
        let envelope: PitchEnvelope = field.content.dimensions.envelope();
        let verdict = envelope.check(105.0, 68.0, DEFAULT_PITCH_TOLERANCE);
        println!("{}: {:?}, compliant: {}", field.content.name, verdict, verdict.is_compliant());
    }
    if let Some(template) = template::builtin_template("fifa_11_competition") {
        println!("{}: {:?}", template.content.name, template.content.deviation(104.2, 68.9));
    }

    // backup
    let export = store.export().await.unwrap();
    log::info!("exported {} fields", export.fields.len());
    println!("{} ({} bytes)", export.file_name(), export.to_pretty_json().unwrap().len());
}
