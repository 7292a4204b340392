use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::id::{HasId, Id};

use crate::{ExampleData, WithId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum LineKind {
    Horizontal,
    Vertical,
    Circular,
    Rectangular,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum AnchorPosition {
    Top,
    Bottom,
    Left,
    Right,
    Center,
}

/// A line to be painted on the pitch and how far the marking has come.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MarkedLine {
    pub name: String,
    pub kind: LineKind,
    pub length_meters: f64,
    pub is_complete: bool,
    pub progress_percent: f64,
    pub anchor_position: AnchorPosition,
    pub color: Option<String>,
}

impl HasId for MarkedLine {
    type IdType = i64;
}

impl MarkedLine {
    pub fn new(name: impl Into<String>, kind: LineKind, anchor_position: AnchorPosition) -> Self {
        Self {
            name: name.into(),
            kind,
            length_meters: 0.0,
            is_complete: false,
            progress_percent: 0.0,
            anchor_position,
            color: None,
        }
    }

    pub fn completed(
        name: impl Into<String>,
        kind: LineKind,
        anchor_position: AnchorPosition,
        length_meters: f64,
    ) -> Self {
        let mut line = Self::new(name, kind, anchor_position);
        line.length_meters = length_meters;
        line.complete();
        line
    }

    pub fn complete(&mut self) {
        self.is_complete = true;
        self.progress_percent = 100.0;
    }

    pub fn set_progress(&mut self, percent: f64) {
        self.progress_percent = percent.clamp(0.0, 100.0);
    }

    pub fn apply(&mut self, patch: MarkedLinePatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(length_meters) = patch.length_meters {
            self.length_meters = length_meters;
        }
        if let Some(progress) = patch.progress_percent {
            self.set_progress(progress);
        }
        if let Some(anchor_position) = patch.anchor_position {
            self.anchor_position = anchor_position;
        }
        if let Some(color) = patch.color {
            self.color = Some(color);
        }
    }
}

/// Partial update of a [`MarkedLine`]. Completion goes through
/// [`MarkedLine::complete`] only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkedLinePatch {
    pub name: Option<String>,
    pub kind: Option<LineKind>,
    pub length_meters: Option<f64>,
    pub progress_percent: Option<f64>,
    pub anchor_position: Option<AnchorPosition>,
    pub color: Option<String>,
}

impl ExampleData for MarkedLine {
    fn example_data() -> Self {
        Self::completed("Halfway line", LineKind::Horizontal, AnchorPosition::Center, 68.0)
    }
}

/// Lines seeded into an empty store: both goal lines, both touchlines and the
/// centre circle, none of them marked yet.
pub fn default_lines() -> Vec<WithId<MarkedLine>> {
    [
        ("North goal line", LineKind::Horizontal, AnchorPosition::Top),
        ("South goal line", LineKind::Horizontal, AnchorPosition::Bottom),
        ("Left touchline", LineKind::Vertical, AnchorPosition::Left),
        ("Right touchline", LineKind::Vertical, AnchorPosition::Right),
        ("Centre circle", LineKind::Circular, AnchorPosition::Center),
    ]
    .into_iter()
    .zip(1..)
    .map(|((name, kind, anchor), id)| WithId::new(Id::new(id), MarkedLine::new(name, kind, anchor)))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completing_forces_full_progress() {
        let mut line = MarkedLine::new("Penalty arc", LineKind::Circular, AnchorPosition::Top);
        line.set_progress(40.0);
        line.complete();
        assert!(line.is_complete);
        assert_eq!(line.progress_percent, 100.0);
    }

    #[test]
    fn progress_is_clamped() {
        let mut line = MarkedLine::example_data();
        line.apply(MarkedLinePatch {
            progress_percent: Some(140.0),
            ..Default::default()
        });
        assert_eq!(line.progress_percent, 100.0);
        line.set_progress(-3.0);
        assert_eq!(line.progress_percent, 0.0);
    }

    #[test]
    fn default_set_is_incomplete_and_numbered() {
        let lines = default_lines();
        assert_eq!(lines.len(), 5);
        assert!(lines
            .iter()
            .all(|line| !line.content.is_complete && line.content.length_meters == 0.0));
        let ids = lines.iter().map(|line| line.id.raw()).collect::<Vec<_>>();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        assert_eq!(lines[4].content.kind, LineKind::Circular);
    }

    #[test]
    fn serializes_enums_in_camel_case() {
        let json = serde_json::to_value(MarkedLine::example_data()).unwrap();
        assert_eq!(json["kind"], "horizontal");
        assert_eq!(json["anchorPosition"], "center");
        assert_eq!(json["isComplete"], true);
        assert!(json.get("color").is_none());
    }
}
