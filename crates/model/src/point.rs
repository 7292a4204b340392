use analysis::Metric;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::geo::{self, GeoCoordinate};

/// A position fix, either reported by the location provider or synthesized
/// from a screen tap.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp_ms: i64,
    pub accuracy_meters: Option<f64>,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64, timestamp_ms: i64) -> Self {
        Self {
            latitude,
            longitude,
            timestamp_ms,
            accuracy_meters: None,
        }
    }

    pub fn with_accuracy(self, accuracy_meters: f64) -> Self {
        Self {
            accuracy_meters: Some(accuracy_meters),
            ..self
        }
    }

    pub fn coordinate(&self) -> GeoCoordinate {
        GeoCoordinate {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }

    pub fn distance_meters(&self, other: &GeoPoint) -> f64 {
        geo::haversine_distance(
            self.latitude,
            self.longitude,
            other.latitude,
            other.longitude,
        )
    }

    /// Signal quality in percent, `None` when the fix carries no accuracy.
    pub fn signal(&self) -> Option<f64> {
        self.accuracy_meters.map(geo::signal_from_accuracy)
    }
}

impl Metric for GeoPoint {
    fn distance_to(&self, other: &Self) -> f64 {
        self.distance_meters(other)
    }
}

/// A tap position on the camera view, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
    pub timestamp_ms: i64,
}

impl ScreenPoint {
    pub fn new(x: f64, y: f64, timestamp_ms: i64) -> Self {
        Self { x, y, timestamp_ms }
    }
}

impl Metric for ScreenPoint {
    fn distance_to(&self, other: &Self) -> f64 {
        ((other.x - self.x).powi(2) + (other.y - self.y).powi(2)).sqrt()
    }
}
