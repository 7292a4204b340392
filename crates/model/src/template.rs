use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::id::{HasId, Id};

use crate::field::FieldKind;
use crate::WithId;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AreaSize {
    pub length: f64,
    pub width: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PitchDimensions {
    pub length: f64,
    pub width: f64,
    pub penalty_area: AreaSize,
    pub goal_area: AreaSize,
    pub centre_circle_radius: f64,
    pub penalty_arc_radius: f64,
    pub penalty_spot: f64,
    pub corner_arc: f64,
}

/// Reference dimensions a pitch can be laid out and checked against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PitchTemplate {
    pub name: String,
    pub kind: Option<FieldKind>,
    pub dimensions: PitchDimensions,
    pub tolerance_meters: f64,
    pub certified: bool,
}

impl HasId for PitchTemplate {
    type IdType = String;
}

/// Signed difference between a measured pitch and a template.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TemplateDeviation {
    pub length_meters: f64,
    pub width_meters: f64,
    pub within_tolerance: bool,
}

impl PitchTemplate {
    pub fn deviation(&self, length_meters: f64, width_meters: f64) -> TemplateDeviation {
        let length = length_meters - self.dimensions.length;
        let width = width_meters - self.dimensions.width;
        TemplateDeviation {
            length_meters: length,
            width_meters: width,
            within_tolerance: length.abs() <= self.tolerance_meters
                && width.abs() <= self.tolerance_meters,
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn template(
    id: &str,
    name: &str,
    kind: Option<FieldKind>,
    (length, width): (f64, f64),
    penalty_area: (f64, f64),
    goal_area: (f64, f64),
    (radius, penalty_spot): (f64, f64),
    tolerance_meters: f64,
    certified: bool,
) -> WithId<PitchTemplate> {
    WithId::new(
        Id::new(id.to_owned()),
        PitchTemplate {
            name: name.to_owned(),
            kind,
            dimensions: PitchDimensions {
                length,
                width,
                penalty_area: AreaSize {
                    length: penalty_area.0,
                    width: penalty_area.1,
                },
                goal_area: AreaSize {
                    length: goal_area.0,
                    width: goal_area.1,
                },
                centre_circle_radius: radius,
                penalty_arc_radius: radius,
                penalty_spot,
                corner_arc: 1.0,
            },
            tolerance_meters,
            certified,
        },
    )
}

pub fn builtin_templates() -> Vec<WithId<PitchTemplate>> {
    vec![
        template(
            "fifa_11_competition",
            "Football 11 - Competition",
            Some(FieldKind::Football11),
            (105.0, 68.0),
            (16.5, 40.32),
            (5.5, 18.32),
            (9.15, 11.0),
            0.5,
            true,
        ),
        template(
            "fifa_11_recreational",
            "Football 11 - Recreational",
            Some(FieldKind::Football11),
            (100.0, 64.0),
            (16.5, 40.32),
            (5.5, 18.32),
            (9.15, 11.0),
            1.0,
            false,
        ),
        template(
            "fifa_7_official",
            "Football 7 - Official",
            Some(FieldKind::Football7),
            (65.0, 45.0),
            (13.0, 32.0),
            (5.0, 16.0),
            (6.0, 9.0),
            0.3,
            true,
        ),
        template(
            "fifa_5_indoor",
            "Football 5 - Indoor",
            Some(FieldKind::Football5),
            (40.0, 20.0),
            (10.0, 20.0),
            (3.0, 12.0),
            (3.0, 6.0),
            0.2,
            true,
        ),
        // Futsal has no field kind of its own.
        template(
            "futsal_official",
            "Futsal - Official",
            None,
            (40.0, 20.0),
            (6.0, 20.0),
            (2.0, 16.0),
            (3.0, 6.0),
            0.1,
            true,
        ),
    ]
}

pub fn builtin_template(id: &str) -> Option<WithId<PitchTemplate>> {
    builtin_templates()
        .into_iter()
        .find(|template| template.id.raw_ref::<str>() == id)
}
