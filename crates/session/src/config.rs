use std::{env, fmt, num::ParseFloatError};

use analysis::PixelScale;
use overlay::Viewport;
use utility::geo::GeoCoordinate;

/// Lissewege, Brugge.
pub const DEFAULT_BASE_POSITION: GeoCoordinate = GeoCoordinate {
    latitude: 51.2993,
    longitude: 3.2218,
};
pub const DEFAULT_TAP_DEGREES_PER_PIXEL: f64 = 1e-5;
pub const DEFAULT_TAP_ACCURACY_METERS: f64 = 3.0;
pub const DEFAULT_VIEWPORT: Viewport = Viewport {
    width: 390.0,
    height: 844.0,
};

#[derive(Debug)]
pub enum ConfigError {
    Malformed { key: &'static str, why: ParseFloatError },
    /// The value parsed but is outside what the key allows.
    OutOfRange { key: &'static str, value: f64 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed { key, why } => write!(f, "{} is not a number: {}", key, why),
            Self::OutOfRange { key, value } => write!(f, "{} is out of range: {}", key, value),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Malformed { why, .. } => Some(why),
            Self::OutOfRange { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionConfig {
    /// Meters per pixel of the walking path. A placeholder, not a
    /// calibration.
    pub pixel_scale: PixelScale,
    /// Where synthesized tap points are anchored when no fix is known.
    pub base_position: GeoCoordinate,
    pub tap_degrees_per_pixel: f64,
    pub tap_accuracy_meters: f64,
    pub viewport: Viewport,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            pixel_scale: PixelScale::default(),
            base_position: DEFAULT_BASE_POSITION,
            tap_degrees_per_pixel: DEFAULT_TAP_DEGREES_PER_PIXEL,
            tap_accuracy_meters: DEFAULT_TAP_ACCURACY_METERS,
            viewport: DEFAULT_VIEWPORT,
        }
    }
}

impl SessionConfig {
    /// Reads `PITCHMARK_PIXEL_SCALE`, `PITCHMARK_BASE_LATITUDE`,
    /// `PITCHMARK_BASE_LONGITUDE` and `PITCHMARK_TAP_DEGREES_PER_PIXEL`.
    /// Unset keys keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &'static str| -> Result<Option<f64>, ConfigError> {
            match lookup(key) {
                Some(value) if !value.trim().is_empty() => value
                    .trim()
                    .parse()
                    .map(Some)
                    .map_err(|why| ConfigError::Malformed { key, why }),
                _ => Ok(None),
            }
        };

        let mut config = Self::default();
        if let Some(scale) = read("PITCHMARK_PIXEL_SCALE")? {
            config.pixel_scale = PixelScale::new(scale).ok_or(ConfigError::OutOfRange {
                key: "PITCHMARK_PIXEL_SCALE",
                value: scale,
            })?;
        }
        if let Some(latitude) = read("PITCHMARK_BASE_LATITUDE")? {
            if !(-90.0..=90.0).contains(&latitude) {
                return Err(ConfigError::OutOfRange {
                    key: "PITCHMARK_BASE_LATITUDE",
                    value: latitude,
                });
            }
            config.base_position.latitude = latitude;
        }
        if let Some(longitude) = read("PITCHMARK_BASE_LONGITUDE")? {
            if !(-180.0..=180.0).contains(&longitude) {
                return Err(ConfigError::OutOfRange {
                    key: "PITCHMARK_BASE_LONGITUDE",
                    value: longitude,
                });
            }
            config.base_position.longitude = longitude;
        }
        if let Some(degrees) = read("PITCHMARK_TAP_DEGREES_PER_PIXEL")? {
            if !(degrees.is_finite() && degrees > 0.0) {
                return Err(ConfigError::OutOfRange {
                    key: "PITCHMARK_TAP_DEGREES_PER_PIXEL",
                    value: degrees,
                });
            }
            config.tap_degrees_per_pixel = degrees;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn unset_keys_keep_defaults() {
        let config = SessionConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, SessionConfig::default());
        assert_eq!(config.pixel_scale.meters_per_pixel(), 0.001);
        assert_eq!(config.base_position, DEFAULT_BASE_POSITION);
    }

    #[test]
    fn values_are_parsed() {
        let config = SessionConfig::from_lookup(lookup(&[
            ("PITCHMARK_PIXEL_SCALE", "0.004"),
            ("PITCHMARK_BASE_LATITUDE", " 40.4168 "),
            ("PITCHMARK_BASE_LONGITUDE", "-3.7038"),
            ("PITCHMARK_TAP_DEGREES_PER_PIXEL", "2e-5"),
        ]))
        .unwrap();
        assert_eq!(config.pixel_scale.meters_per_pixel(), 0.004);
        assert_eq!(config.base_position.latitude, 40.4168);
        assert_eq!(config.base_position.longitude, -3.7038);
        assert_eq!(config.tap_degrees_per_pixel, 2e-5);
    }

    #[test]
    fn malformed_values_are_errors() {
        let result = SessionConfig::from_lookup(lookup(&[("PITCHMARK_PIXEL_SCALE", "one")]));
        assert!(matches!(
            result,
            Err(ConfigError::Malformed {
                key: "PITCHMARK_PIXEL_SCALE",
                ..
            })
        ));

        let result = SessionConfig::from_lookup(lookup(&[("PITCHMARK_BASE_LATITUDE", "91")]));
        assert!(matches!(result, Err(ConfigError::OutOfRange { .. })));
    }
}
