use chrono::{DateTime, Utc};
use model::{
    field::{self, Field, FieldPatch},
    find_by_id,
    marked_line::{self, AnchorPosition, LineKind, MarkedLine, MarkedLinePatch},
    measurement::{self, Measurement, MeasurementPatch},
    WithId,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::id::Id;

use crate::error::{Result, StoreError};

/// Everything the app keeps between launches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct AppState {
    pub fields: Vec<WithId<Field>>,
    pub active_field: Option<Id<Field>>,
    pub marked_lines: Vec<WithId<MarkedLine>>,
    pub measurements: Vec<WithId<Measurement>>,
}

impl AppState {
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.marked_lines.is_empty() && self.measurements.is_empty()
    }

    /// Fills every empty collection with its default records. The first
    /// default field becomes active when none is. `true` when anything was
    /// filled in.
    pub fn seed_defaults(&mut self, now: DateTime<Utc>) -> bool {
        let mut seeded = false;
        if self.fields.is_empty() {
            self.fields = field::default_fields(now);
            log::info!("seeded {} default fields", self.fields.len());
            seeded = true;
        }
        if self.active_field.is_none() && !self.fields.is_empty() {
            self.active_field = self.fields.first().map(|field| field.id.clone());
            seeded = true;
        }
        if self.marked_lines.is_empty() {
            self.marked_lines = marked_line::default_lines();
            log::info!("seeded {} default lines", self.marked_lines.len());
            seeded = true;
        }
        if self.measurements.is_empty() {
            self.measurements = measurement::default_measurements(now);
            log::info!("seeded {} default measurements", self.measurements.len());
            seeded = true;
        }
        seeded
    }

    // fields

    pub fn active_field(&self) -> Option<&WithId<Field>> {
        self.active_field
            .as_ref()
            .and_then(|id| find_by_id(&self.fields, id))
    }

    pub fn add_field(&mut self, field: Field) -> Id<Field> {
        let id = Id::generate(Field::ID_PREFIX);
        self.fields.push(WithId::new(id.clone(), field));
        id
    }

    pub fn update_field(&mut self, id: &Id<Field>, patch: FieldPatch, now: DateTime<Utc>) -> Result<()> {
        self.field_mut(id)?.apply(patch, now);
        Ok(())
    }

    pub fn remove_field(&mut self, id: &Id<Field>) -> Result<WithId<Field>> {
        let index = self
            .fields
            .iter()
            .position(|field| &field.id == id)
            .ok_or_else(|| StoreError::not_found("field", id))?;
        if self.active_field.as_ref() == Some(id) {
            self.active_field = None;
        }
        Ok(self.fields.remove(index))
    }

    pub fn clear_fields(&mut self) {
        self.fields.clear();
        self.active_field = None;
    }

    pub fn set_active_field(&mut self, id: Option<Id<Field>>) -> Result<()> {
        if let Some(id) = &id {
            if find_by_id(&self.fields, id).is_none() {
                return Err(StoreError::not_found("field", id));
            }
        }
        self.active_field = id;
        Ok(())
    }

    fn field_mut(&mut self, id: &Id<Field>) -> Result<&mut Field> {
        self.fields
            .iter_mut()
            .find(|field| &field.id == id)
            .map(|field| &mut field.content)
            .ok_or_else(|| StoreError::not_found("field", id))
    }

    /// The field a session result is filed under: `target` if given, the
    /// active field otherwise. `Ok(None)` when neither exists.
    fn statistics_target(&self, target: Option<&Id<Field>>) -> Result<Option<Id<Field>>> {
        match target {
            Some(id) => find_by_id(&self.fields, id)
                .map(|field| Some(field.id.clone()))
                .ok_or_else(|| StoreError::not_found("field", id)),
            None => Ok(self.active_field().map(|field| field.id.clone())),
        }
    }

    // marked lines

    pub fn add_line(&mut self, line: MarkedLine) -> Id<MarkedLine> {
        let id = Id::next_after(self.marked_lines.iter().map(|line| &line.id));
        self.marked_lines.push(WithId::new(id, line));
        id
    }

    pub fn update_line(&mut self, id: Id<MarkedLine>, patch: MarkedLinePatch) -> Result<()> {
        self.line_mut(id)?.apply(patch);
        Ok(())
    }

    pub fn complete_line(&mut self, id: Id<MarkedLine>) -> Result<()> {
        self.line_mut(id)?.complete();
        Ok(())
    }

    pub fn remove_line(&mut self, id: Id<MarkedLine>) -> Result<WithId<MarkedLine>> {
        let index = self
            .marked_lines
            .iter()
            .position(|line| line.id == id)
            .ok_or_else(|| StoreError::not_found("line", id))?;
        Ok(self.marked_lines.remove(index))
    }

    pub fn reset_marking(&mut self) {
        self.marked_lines.clear();
    }

    fn line_mut(&mut self, id: Id<MarkedLine>) -> Result<&mut MarkedLine> {
        self.marked_lines
            .iter_mut()
            .find(|line| line.id == id)
            .map(|line| &mut line.content)
            .ok_or_else(|| StoreError::not_found("line", id))
    }

    // measurements

    pub fn add_measurement(&mut self, measurement: Measurement) -> Id<Measurement> {
        let id = Id::generate(Measurement::ID_PREFIX);
        self.measurements.push(WithId::new(id.clone(), measurement));
        id
    }

    pub fn update_measurement(&mut self, id: &Id<Measurement>, patch: MeasurementPatch) -> Result<()> {
        let record = self
            .measurements
            .iter_mut()
            .find(|measurement| &measurement.id == id)
            .ok_or_else(|| StoreError::not_found("measurement", id))?;
        record.content = record.content.clone().apply(patch);
        Ok(())
    }

    pub fn remove_measurement(&mut self, id: &Id<Measurement>) -> Result<WithId<Measurement>> {
        let index = self
            .measurements
            .iter()
            .position(|measurement| &measurement.id == id)
            .ok_or_else(|| StoreError::not_found("measurement", id))?;
        Ok(self.measurements.remove(index))
    }

    /// Replaces the measurement carrying the same name, keeping its id, or
    /// appends a new one.
    pub fn upsert_measurement(&mut self, measurement: Measurement) -> Id<Measurement> {
        match self
            .measurements
            .iter_mut()
            .find(|existing| existing.content.name() == measurement.name())
        {
            Some(existing) => {
                existing.content = measurement;
                existing.id.clone()
            }
            None => self.add_measurement(measurement),
        }
    }

    // session results

    /// Files a finished measurement and counts it on the target field. Fails
    /// without writing anything when `field` names an unknown field.
    pub fn record_measurement(
        &mut self,
        field: Option<&Id<Field>>,
        measurement: Measurement,
        at: DateTime<Utc>,
    ) -> Result<Id<Measurement>> {
        let target = self.statistics_target(field)?;
        let id = self.upsert_measurement(measurement);
        match target {
            Some(field) => self.field_mut(&field)?.statistics.record_measurement(at),
            None => log::debug!("measurement {} filed without a field", id),
        }
        Ok(id)
    }

    /// Files a walked line as the next numbered, centre-anchored and
    /// completed line, then counts it on the target field like
    /// [`record_measurement`](Self::record_measurement).
    pub fn record_marking(
        &mut self,
        field: Option<&Id<Field>>,
        kind: LineKind,
        length_meters: f64,
        at: DateTime<Utc>,
    ) -> Result<WithId<MarkedLine>> {
        let target = self.statistics_target(field)?;
        let line = MarkedLine::completed(
            format!("Line {}", self.marked_lines.len() + 1),
            kind,
            AnchorPosition::Center,
            length_meters,
        );
        let id = self.add_line(line.clone());
        match target {
            Some(field) => self.field_mut(&field)?.statistics.record_marking(at),
            None => log::debug!("line {} filed without a field", id),
        }
        Ok(WithId::new(id, line))
    }
}

#[cfg(test)]
mod tests {
    use model::{
        field::{FieldKind, FieldStatus},
        measurement::{CaptureMode, MeasurementKind},
        ExampleData,
    };

    use super::*;

    fn seeded() -> AppState {
        let mut state = AppState::default();
        state.seed_defaults(Utc::now());
        state
    }

    #[test]
    fn seeding_fills_only_empty_collections() {
        let mut state = AppState::default();
        let custom = state.add_field(Field::example_data());
        state.seed_defaults(Utc::now());
        assert_eq!(state.fields.len(), 1);
        assert_eq!(state.active_field, Some(custom));
        assert_eq!(state.marked_lines.len(), 5);
        assert_eq!(state.measurements.len(), 5);
    }

    #[test]
    fn default_fields_are_seeded_with_main_active() {
        let state = seeded();
        assert_eq!(state.fields.len(), 2);
        assert_eq!(state.active_field().unwrap().content.name, "Main field");
        assert_eq!(state.fields[1].content.kind, FieldKind::Football7);
    }

    #[test]
    fn line_ids_continue_after_the_largest() {
        let mut state = seeded();
        state.remove_line(Id::new(2)).unwrap();
        let id = state.add_line(MarkedLine::example_data());
        assert_eq!(id, Id::new(6));
        assert!(state.remove_line(Id::new(2)).is_err());
    }

    #[test]
    fn completing_a_line_sets_full_progress() {
        let mut state = seeded();
        state.complete_line(Id::new(1)).unwrap();
        let line = find_by_id(&state.marked_lines, &Id::new(1)).unwrap();
        assert!(line.content.is_complete);
        assert_eq!(line.content.progress_percent, 100.0);
        assert!(matches!(
            state.complete_line(Id::new(42)),
            Err(StoreError::NotFound { kind: "line", .. })
        ));
    }

    #[test]
    fn removing_the_active_field_clears_the_reference() {
        let mut state = seeded();
        let active = state.active_field.clone().unwrap();
        state.remove_field(&active).unwrap();
        assert!(state.active_field.is_none());
        assert_eq!(state.fields.len(), 1);
    }

    #[test]
    fn unknown_field_can_not_become_active() {
        let mut state = seeded();
        let before = state.active_field.clone();
        assert!(state.set_active_field(Some(Id::new("field_nope".to_owned()))).is_err());
        assert_eq!(state.active_field, before);
        state.set_active_field(None).unwrap();
        assert!(state.active_field().is_none());
    }

    #[test]
    fn update_field_applies_patch() {
        let mut state = seeded();
        let id = state.fields[1].id.clone();
        state
            .update_field(
                &id,
                FieldPatch {
                    status: Some(FieldStatus::Maintenance),
                    ..Default::default()
                },
                Utc::now(),
            )
            .unwrap();
        assert_eq!(state.fields[1].content.status, FieldStatus::Maintenance);
    }

    #[test]
    fn recording_a_measurement_replaces_by_name_and_counts() {
        let mut state = seeded();
        let now = Utc::now();
        let before = state.measurements.len();
        let existing = state.measurements[0].id.clone();

        let measured = Measurement::new(
            "Total length",
            MeasurementKind::Line,
            104.8,
            0.5,
            now,
            Some(CaptureMode::Gps),
        );
        let id = state.record_measurement(None, measured, now).unwrap();

        assert_eq!(id, existing);
        assert_eq!(state.measurements.len(), before);
        assert_eq!(state.measurements[0].content.distance_meters(), 104.8);
        let stats = &state.active_field().unwrap().content.statistics;
        assert_eq!(stats.total_measurements, 1);
        assert_eq!(stats.last_measurement_at, Some(now));
    }

    #[test]
    fn new_measurement_names_are_appended() {
        let mut state = seeded();
        let now = Utc::now();
        state
            .record_measurement(None, Measurement::example_data(), now)
            .unwrap();
        assert_eq!(state.measurements.len(), 6);
    }

    #[test]
    fn recording_for_an_unknown_field_writes_nothing() {
        let mut state = seeded();
        let before = state.clone();
        let result = state.record_marking(
            Some(&Id::new("field_gone".to_owned())),
            LineKind::Horizontal,
            12.0,
            Utc::now(),
        );
        assert!(result.is_err());
        assert_eq!(state, before);
    }

    #[test]
    fn marking_counts_on_the_named_field() {
        let mut state = seeded();
        let secondary = state.fields[1].id.clone();
        let line = state
            .record_marking(Some(&secondary), LineKind::Vertical, 30.0, Utc::now())
            .unwrap();
        assert_eq!(line.id, Id::new(6));
        assert_eq!(line.content.name, "Line 6");
        assert_eq!(line.content.anchor_position, AnchorPosition::Center);
        assert!(line.content.is_complete);
        assert_eq!(state.fields[1].content.statistics.total_markings, 1);
        assert_eq!(state.fields[0].content.statistics.total_markings, 0);
    }

    #[test]
    fn results_without_any_field_are_still_filed() {
        let mut state = AppState::default();
        let line = state
            .record_marking(None, LineKind::Vertical, 3.0, Utc::now())
            .unwrap();
        assert_eq!(line.id, Id::new(1));
        assert_eq!(line.content.name, "Line 1");
    }

    #[test]
    fn measurement_updates_recompute_the_verdict() {
        let mut state = seeded();
        let id = state.measurements[4].id.clone();
        state
            .update_measurement(
                &id,
                MeasurementPatch {
                    distance_meters: Some(9.15),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(state.measurements[4].content.is_fifa_compliant());
        state.remove_measurement(&id).unwrap();
        assert_eq!(state.measurements.len(), 4);
    }

    #[test]
    fn reset_and_clear() {
        let mut state = seeded();
        state.reset_marking();
        assert!(state.marked_lines.is_empty());
        state.clear_fields();
        assert!(state.fields.is_empty());
        assert!(state.active_field.is_none());
    }
}
