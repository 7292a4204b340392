use analysis::compliance::PitchEnvelope;
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::id::{HasId, Id};

use crate::{ExampleData, WithId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum FieldKind {
    Football11,
    Football7,
    Football5,
    Custom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum FieldStatus {
    Active,
    Inactive,
    Maintenance,
}

/// Regulation dimensions for a field kind, in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FifaConfiguration {
    pub length_min: f64,
    pub length_max: f64,
    pub width_min: f64,
    pub width_max: f64,
    pub penalty_area_length: f64,
    pub penalty_area_width: f64,
    pub goal_area_length: f64,
    pub goal_area_width: f64,
    pub centre_circle_radius: f64,
    pub penalty_arc_radius: f64,
}

impl FifaConfiguration {
    pub fn for_kind(kind: FieldKind) -> Self {
        match kind {
            FieldKind::Football11 => Self {
                length_min: 100.0,
                length_max: 110.0,
                width_min: 64.0,
                width_max: 75.0,
                penalty_area_length: 16.5,
                penalty_area_width: 40.32,
                goal_area_length: 5.5,
                goal_area_width: 18.32,
                centre_circle_radius: 9.15,
                penalty_arc_radius: 9.15,
            },
            FieldKind::Football7 => Self {
                length_min: 50.0,
                length_max: 70.0,
                width_min: 30.0,
                width_max: 50.0,
                penalty_area_length: 13.0,
                penalty_area_width: 30.0,
                goal_area_length: 4.0,
                goal_area_width: 12.0,
                centre_circle_radius: 6.0,
                penalty_arc_radius: 6.0,
            },
            FieldKind::Football5 => Self {
                length_min: 25.0,
                length_max: 42.0,
                width_min: 15.0,
                width_max: 25.0,
                penalty_area_length: 6.0,
                penalty_area_width: 15.0,
                goal_area_length: 2.0,
                goal_area_width: 6.0,
                centre_circle_radius: 3.0,
                penalty_arc_radius: 3.0,
            },
            FieldKind::Custom => Self {
                length_min: 0.0,
                length_max: 0.0,
                width_min: 0.0,
                width_max: 0.0,
                penalty_area_length: 0.0,
                penalty_area_width: 0.0,
                goal_area_length: 0.0,
                goal_area_width: 0.0,
                centre_circle_radius: 0.0,
                penalty_arc_radius: 0.0,
            },
        }
    }

    pub fn envelope(&self) -> PitchEnvelope {
        PitchEnvelope::new(
            self.length_min..=self.length_max,
            self.width_min..=self.width_max,
        )
    }
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FieldStatistics {
    pub total_measurements: u32,
    pub total_markings: u32,
    pub last_measurement_at: Option<DateTime<Utc>>,
    pub last_marking_at: Option<DateTime<Utc>>,
}

impl FieldStatistics {
    pub fn record_measurement(&mut self, at: DateTime<Utc>) {
        self.total_measurements += 1;
        self.last_measurement_at = Some(at);
    }

    pub fn record_marking(&mut self, at: DateTime<Utc>) {
        self.total_markings += 1;
        self.last_marking_at = Some(at);
    }
}

/// A physical pitch that measurements and markings are filed under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub name: String,
    pub description: String,
    pub kind: FieldKind,
    pub status: FieldStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub dimensions: FifaConfiguration,
    pub statistics: FieldStatistics,
}

impl HasId for Field {
    type IdType = String;
}

impl Field {
    pub const ID_PREFIX: &'static str = "field";

    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        kind: FieldKind,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            kind,
            status: FieldStatus::Active,
            created_at: now,
            updated_at: now,
            dimensions: FifaConfiguration::for_kind(kind),
            statistics: FieldStatistics::default(),
        }
    }

    /// Applies `patch` and bumps `updated_at`. Changing the kind resets the
    /// dimensions to that kind's regulation values.
    pub fn apply(&mut self, patch: FieldPatch, now: DateTime<Utc>) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(kind) = patch.kind {
            self.kind = kind;
            self.dimensions = FifaConfiguration::for_kind(kind);
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(dimensions) = patch.dimensions {
            self.dimensions = dimensions;
        }
        self.updated_at = now;
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub kind: Option<FieldKind>,
    pub status: Option<FieldStatus>,
    pub dimensions: Option<FifaConfiguration>,
}

impl ExampleData for Field {
    fn example_data() -> Self {
        Self::new(
            "Jan Breydel training pitch",
            "Grass, floodlit",
            FieldKind::Football11,
            DateTime::<Utc>::UNIX_EPOCH,
        )
    }
}

pub fn default_fields(now: DateTime<Utc>) -> Vec<WithId<Field>> {
    vec![
        WithId::new(
            Id::generate(Field::ID_PREFIX),
            Field::new("Main field", "Full size match pitch", FieldKind::Football11, now),
        ),
        WithId::new(
            Id::generate(Field::ID_PREFIX),
            Field::new("Secondary field", "Seven-a-side training pitch", FieldKind::Football7, now),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use analysis::compliance::AxisVerdict;

    use super::*;

    #[test]
    fn statistics_only_grow() {
        let mut stats = FieldStatistics::default();
        let at = Utc::now();
        stats.record_measurement(at);
        stats.record_measurement(at);
        stats.record_marking(at);
        assert_eq!(stats.total_measurements, 2);
        assert_eq!(stats.total_markings, 1);
        assert_eq!(stats.last_marking_at, Some(at));
    }

    #[test]
    fn seven_a_side_envelope() {
        let envelope = FifaConfiguration::for_kind(FieldKind::Football7).envelope();
        let verdict = envelope.check(65.0, 55.0, 0.0);
        assert_eq!(verdict.length, AxisVerdict::Within);
        assert_eq!(verdict.width, AxisVerdict::TooLong);
    }

    #[test]
    fn changing_kind_resets_dimensions() {
        let mut field = Field::example_data();
        let later = Utc::now();
        field.apply(
            FieldPatch {
                kind: Some(FieldKind::Football5),
                ..Default::default()
            },
            later,
        );
        assert_eq!(field.dimensions.length_max, 42.0);
        assert_eq!(field.updated_at, later);
        assert_eq!(field.created_at, DateTime::<Utc>::UNIX_EPOCH);
    }

    #[test]
    fn defaults_are_active() {
        let fields = default_fields(Utc::now());
        assert_eq!(fields.len(), 2);
        assert!(fields.iter().all(|f| f.content.status == FieldStatus::Active));
        assert!(fields[0].id.raw_ref::<str>().starts_with("field_"));
    }

    #[test]
    fn serializes_kind_like_the_stored_documents() {
        let json = serde_json::to_value(Field::example_data()).unwrap();
        assert_eq!(json["kind"], "football11");
        assert!(json["statistics"].get("lastMeasurementAt").is_none());
    }
}
