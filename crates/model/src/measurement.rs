use analysis::compliance;
use chrono::{DateTime, SubsecRound, Utc};
use schemars::{gen::SchemaGenerator, schema::Schema, JsonSchema};
use serde::{Deserialize, Serialize};
use utility::id::{HasId, Id};

use crate::{ExampleData, WithId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum MeasurementKind {
    Line,
    Circle,
    Semicircle,
    Area,
    Arc,
}

/// Where a distance came from. Camera distances rest on a fixed pixel scale
/// and are estimates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum CaptureMode {
    Gps,
    Camera,
}

/// A measured distance and its FIFA verdict.
///
/// The verdict is derived from distance and tolerance whenever either is set,
/// including on deserialization, so a stored flag can never disagree with
/// the numbers next to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "MeasurementRecord", from = "MeasurementRecord")]
pub struct Measurement {
    name: String,
    kind: MeasurementKind,
    distance_meters: f64,
    tolerance_meters: f64,
    is_fifa_compliant: bool,
    captured_at: DateTime<Utc>,
    capture_mode: Option<CaptureMode>,
}

/// Wire shape of a [`Measurement`].
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementRecord {
    pub name: String,
    pub kind: MeasurementKind,
    pub distance_meters: f64,
    pub tolerance_meters: f64,
    #[serde(rename = "isFIFACompliant", default)]
    pub is_fifa_compliant: bool,
    #[serde(with = "utility::serde::epoch_millis")]
    #[schemars(schema_with = "utility::serde::epoch_millis::schema")]
    pub captured_at: DateTime<Utc>,
    pub capture_mode: Option<CaptureMode>,
}

impl HasId for Measurement {
    type IdType = String;
}

impl Measurement {
    pub const ID_PREFIX: &'static str = "measurement";

    /// `captured_at` is kept at millisecond precision, the precision it is
    /// stored with.
    pub fn new(
        name: impl Into<String>,
        kind: MeasurementKind,
        distance_meters: f64,
        tolerance_meters: f64,
        captured_at: DateTime<Utc>,
        capture_mode: Option<CaptureMode>,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            distance_meters,
            tolerance_meters,
            is_fifa_compliant: compliance::is_within_tolerance(distance_meters, tolerance_meters),
            captured_at: captured_at.trunc_subsecs(3),
            capture_mode,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> MeasurementKind {
        self.kind
    }

    pub fn distance_meters(&self) -> f64 {
        self.distance_meters
    }

    pub fn tolerance_meters(&self) -> f64 {
        self.tolerance_meters
    }

    pub fn is_fifa_compliant(&self) -> bool {
        self.is_fifa_compliant
    }

    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    pub fn capture_mode(&self) -> Option<CaptureMode> {
        self.capture_mode
    }

    pub fn with_distance(
        self,
        distance_meters: f64,
        captured_at: DateTime<Utc>,
        capture_mode: CaptureMode,
    ) -> Self {
        Self::new(
            self.name,
            self.kind,
            distance_meters,
            self.tolerance_meters,
            captured_at,
            Some(capture_mode),
        )
    }

    pub fn apply(self, patch: MeasurementPatch) -> Self {
        Self::new(
            patch.name.unwrap_or(self.name),
            patch.kind.unwrap_or(self.kind),
            patch.distance_meters.unwrap_or(self.distance_meters),
            patch.tolerance_meters.unwrap_or(self.tolerance_meters),
            self.captured_at,
            self.capture_mode,
        )
    }
}

/// Partial update of a [`Measurement`]. There is no way to set the verdict.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeasurementPatch {
    pub name: Option<String>,
    pub kind: Option<MeasurementKind>,
    pub distance_meters: Option<f64>,
    pub tolerance_meters: Option<f64>,
}

impl From<Measurement> for MeasurementRecord {
    fn from(measurement: Measurement) -> Self {
        Self {
            name: measurement.name,
            kind: measurement.kind,
            distance_meters: measurement.distance_meters,
            tolerance_meters: measurement.tolerance_meters,
            is_fifa_compliant: measurement.is_fifa_compliant,
            captured_at: measurement.captured_at,
            capture_mode: measurement.capture_mode,
        }
    }
}

impl From<MeasurementRecord> for Measurement {
    fn from(record: MeasurementRecord) -> Self {
        Measurement::new(
            record.name,
            record.kind,
            record.distance_meters,
            record.tolerance_meters,
            record.captured_at,
            record.capture_mode,
        )
    }
}

impl JsonSchema for Measurement {
    fn schema_name() -> String {
        "Measurement".to_owned()
    }

    fn json_schema(gen: &mut SchemaGenerator) -> Schema {
        MeasurementRecord::json_schema(gen)
    }
}

impl ExampleData for Measurement {
    fn example_data() -> Self {
        Self::new(
            "Penalty spot distance",
            MeasurementKind::Line,
            11.02,
            0.1,
            DateTime::<Utc>::UNIX_EPOCH,
            Some(CaptureMode::Gps),
        )
    }
}

/// Measurements seeded into an empty store, nothing measured yet.
pub fn default_measurements(now: DateTime<Utc>) -> Vec<WithId<Measurement>> {
    [
        ("Total length", MeasurementKind::Line, 0.5),
        ("Total width", MeasurementKind::Line, 0.5),
        ("North penalty area", MeasurementKind::Area, 0.3),
        ("South penalty area", MeasurementKind::Area, 0.3),
        ("Centre circle", MeasurementKind::Circle, 0.1),
    ]
    .into_iter()
    .map(|(name, kind, tolerance)| {
        WithId::new(
            Id::generate(Measurement::ID_PREFIX),
            Measurement::new(name, kind, 0.0, tolerance, now, None),
        )
    })
    .collect()
}
