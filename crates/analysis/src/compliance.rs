use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// Tolerance applied to the pitch envelope when none is given.
pub const DEFAULT_PITCH_TOLERANCE: f64 = 5.0;

pub const FIFA_LENGTH_M: RangeInclusive<f64> = 100.0..=110.0;
pub const FIFA_WIDTH_M: RangeInclusive<f64> = 64.0..=75.0;

/// Compliance rule stored on every measurement: the measured distance has to
/// reach the tolerance. A minimum bound only, not the pitch envelope of
/// [`is_pitch_dimension_compliant`].
pub fn is_within_tolerance(measured_meters: f64, tolerance_meters: f64) -> bool {
    measured_meters >= tolerance_meters
}

/// Two sided check against the FIFA pitch envelope (100-110 m by 64-75 m)
/// widened by `tolerance_meters` on every side.
pub fn is_pitch_dimension_compliant(
    length_meters: f64,
    width_meters: f64,
    tolerance_meters: f64,
) -> bool {
    PitchEnvelope::fifa()
        .check(length_meters, width_meters, tolerance_meters)
        .is_compliant()
}

pub fn pitch_area(length_meters: f64, width_meters: f64) -> f64 {
    length_meters * width_meters
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PitchEnvelope {
    pub length: RangeInclusive<f64>,
    pub width: RangeInclusive<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AxisVerdict {
    TooShort,
    Within,
    TooLong,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PitchCompliance {
    pub length: AxisVerdict,
    pub width: AxisVerdict,
}

impl PitchCompliance {
    pub fn is_compliant(&self) -> bool {
        self.length == AxisVerdict::Within && self.width == AxisVerdict::Within
    }
}

impl PitchEnvelope {
    pub fn new(length: RangeInclusive<f64>, width: RangeInclusive<f64>) -> Self {
        Self { length, width }
    }

    pub fn fifa() -> Self {
        Self::new(FIFA_LENGTH_M, FIFA_WIDTH_M)
    }

    pub fn check(
        &self,
        length_meters: f64,
        width_meters: f64,
        tolerance_meters: f64,
    ) -> PitchCompliance {
        PitchCompliance {
            length: verdict(&self.length, length_meters, tolerance_meters),
            width: verdict(&self.width, width_meters, tolerance_meters),
        }
    }
}

fn verdict(range: &RangeInclusive<f64>, value: f64, tolerance: f64) -> AxisVerdict {
    if value < range.start() - tolerance {
        AxisVerdict::TooShort
    } else if value > range.end() + tolerance {
        AxisVerdict::TooLong
    } else {
        AxisVerdict::Within
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_pitch_is_compliant() {
        assert!(is_pitch_dimension_compliant(105.0, 68.0, DEFAULT_PITCH_TOLERANCE));
    }

    #[test]
    fn short_pitch_is_rejected() {
        assert!(!is_pitch_dimension_compliant(80.0, 68.0, DEFAULT_PITCH_TOLERANCE));
    }

    #[test]
    fn tolerance_widens_both_ends() {
        assert!(is_pitch_dimension_compliant(95.0, 59.0, 5.0));
        assert!(is_pitch_dimension_compliant(115.0, 80.0, 5.0));
        assert!(!is_pitch_dimension_compliant(115.1, 68.0, 5.0));
        assert!(!is_pitch_dimension_compliant(105.0, 58.9, 5.0));
        assert!(!is_pitch_dimension_compliant(99.0, 68.0, 0.0));
    }

    #[test]
    fn envelope_reports_which_axis_failed() {
        let result = PitchEnvelope::fifa().check(80.0, 90.0, 5.0);
        assert_eq!(result.length, AxisVerdict::TooShort);
        assert_eq!(result.width, AxisVerdict::TooLong);
        assert!(!result.is_compliant());
    }

    #[test]
    fn measurement_rule_is_a_minimum_bound() {
        assert!(is_within_tolerance(22.2, 0.5));
        assert!(is_within_tolerance(0.5, 0.5));
        assert!(!is_within_tolerance(0.0, 0.5));
    }

    #[test]
    fn area_multiplies_sides() {
        assert_eq!(pitch_area(105.0, 68.0), 7140.0);
    }
}
