use serde::{Deserialize, Serialize};

/// Conversion from screen pixels to an estimated distance in meters.
///
/// This is a placeholder factor, not a calibration: nothing about the camera,
/// its height or a reference object goes into it. Camera-mode distances built
/// on it are estimates and must not be reported with GPS-mode precision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PixelScale {
    meters_per_pixel: f64,
}

impl PixelScale {
    pub const DEFAULT_METERS_PER_PIXEL: f64 = 0.001;

    /// `None` unless the factor is finite and positive.
    pub fn new(meters_per_pixel: f64) -> Option<Self> {
        (meters_per_pixel.is_finite() && meters_per_pixel > 0.0)
            .then_some(Self { meters_per_pixel })
    }

    pub fn meters_per_pixel(&self) -> f64 {
        self.meters_per_pixel
    }

    pub fn to_meters(&self, pixels: f64) -> f64 {
        pixels * self.meters_per_pixel
    }
}

impl Default for PixelScale {
    fn default() -> Self {
        Self {
            meters_per_pixel: Self::DEFAULT_METERS_PER_PIXEL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_maps_a_thousand_pixels_to_a_meter() {
        assert_eq!(PixelScale::default().to_meters(1000.0), 1.0);
    }

    #[test]
    fn rejects_nonsense_factors() {
        assert!(PixelScale::new(0.0).is_none());
        assert!(PixelScale::new(-0.5).is_none());
        assert!(PixelScale::new(f64::NAN).is_none());
        assert_eq!(PixelScale::new(0.01).unwrap().to_meters(250.0), 2.5);
    }
}
