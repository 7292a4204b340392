use chrono::{DateTime, Utc};
use model::{field::Field, find_by_id, marked_line::MarkedLine, measurement::Measurement, WithId};
use schemars::{schema::RootSchema, JsonSchema};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};
use utility::id::Id;

use crate::error::{Result, StoreError};
use crate::state::AppState;

/// The downloadable backup of the whole state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub fields: Vec<WithId<Field>>,
    pub active_field: Option<Id<Field>>,
    pub marked_lines: Vec<WithId<MarkedLine>>,
    pub measurements: Vec<WithId<Measurement>>,
    pub exported_at: DateTime<Utc>,
}

impl ExportDocument {
    pub fn new(state: &AppState, exported_at: DateTime<Utc>) -> Self {
        Self {
            fields: state.fields.clone(),
            active_field: state.active_field.clone(),
            marked_lines: state.marked_lines.clone(),
            measurements: state.measurements.clone(),
            exported_at,
        }
    }

    pub fn to_pretty_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// `pitchmark-YYYY-MM-DD.json` for the export date.
    pub fn file_name(&self) -> String {
        format!("pitchmark-{}.json", self.exported_at.format("%Y-%m-%d"))
    }
}

pub fn export_schema() -> RootSchema {
    schemars::schema_for!(ExportDocument)
}

fn read_key<T: DeserializeOwned>(key: &'static str, value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|why| StoreError::InvalidImport { key, why })
}

/// Merges an import document into `current` and returns the result.
///
/// Each recognized top-level key that is present replaces its collection,
/// an explicit `null` for `activeField` included. Other keys are skipped.
/// A recognized key holding a value of the wrong shape fails the whole
/// import, `current` is never touched.
pub fn import(current: &AppState, document: &str) -> Result<AppState> {
    let document: Map<String, Value> = serde_json::from_str(document)?;
    let mut next = current.clone();
    for (key, value) in document {
        match key.as_str() {
            "fields" => next.fields = read_key("fields", value)?,
            "activeField" => next.active_field = read_key("activeField", value)?,
            "markedLines" => next.marked_lines = read_key("markedLines", value)?,
            "measurements" => next.measurements = read_key("measurements", value)?,
            _ => log::debug!("import: ignoring unrecognized key `{}`", key),
        }
    }
    if let Some(active) = &next.active_field {
        if find_by_id(&next.fields, active).is_none() {
            log::warn!("import: active field {} is not among the fields", active);
        }
    }
    Ok(next)
}
