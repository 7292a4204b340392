use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

pub fn to_radians(degrees: f64) -> f64 {
    degrees * std::f64::consts::PI / 180.0
}

pub fn to_degrees(radians: f64) -> f64 {
    radians * 180.0 / std::f64::consts::PI
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeoCoordinate {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PixelCoordinate {
    pub x: f64,
    pub y: f64,
}

/// Rectangular latitude/longitude window mapped onto a canvas. The canvas
/// y axis grows downwards, so `lat_max` sits on the top edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lng_min: f64,
    pub lng_max: f64,
}

impl BoundingBox {
    pub fn new(lat_min: f64, lat_max: f64, lng_min: f64, lng_max: f64) -> Self {
        Self {
            lat_min,
            lat_max,
            lng_min,
            lng_max,
        }
    }

    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        (self.lat_min..=self.lat_max).contains(&latitude)
            && (self.lng_min..=self.lng_max).contains(&longitude)
    }
}

pub fn calculate_bounding_box(
    lat: f64,
    lon: f64,
    radius_m: f64,
) -> BoundingBox {
    let lat_rad = to_radians(lat);
    let lon_rad = to_radians(lon);

    // latitude bounds
    let min_lat = lat_rad - radius_m / EARTH_RADIUS_M;
    let max_lat = lat_rad + radius_m / EARTH_RADIUS_M;

    // longitude bounds shrink towards the poles
    let min_lon = lon_rad - radius_m / (EARTH_RADIUS_M * lat_rad.cos());
    let max_lon = lon_rad + radius_m / (EARTH_RADIUS_M * lat_rad.cos());

    BoundingBox::new(
        to_degrees(min_lat),
        to_degrees(max_lat),
        to_degrees(min_lon),
        to_degrees(max_lon),
    )
}

/// Great circle distance in meters.
pub fn haversine_distance(
    latitude_1: f64,
    longitude_1: f64,
    latitude_2: f64,
    longitude_2: f64,
) -> f64 {
    let lat1_rad = to_radians(latitude_1);
    let lat2_rad = to_radians(latitude_2);
    let dlat = to_radians(latitude_2 - latitude_1);
    let dlon = to_radians(longitude_2 - longitude_1);

    let a = (dlat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}

pub fn pixels_to_geo(
    x: f64,
    y: f64,
    bbox: &BoundingBox,
    canvas_width: f64,
    canvas_height: f64,
) -> GeoCoordinate {
    let longitude = bbox.lng_min + (x / canvas_width) * (bbox.lng_max - bbox.lng_min);
    let latitude = bbox.lat_max - (y / canvas_height) * (bbox.lat_max - bbox.lat_min);
    GeoCoordinate {
        latitude,
        longitude,
    }
}

pub fn geo_to_pixels(
    latitude: f64,
    longitude: f64,
    bbox: &BoundingBox,
    canvas_width: f64,
    canvas_height: f64,
) -> PixelCoordinate {
    let x = ((longitude - bbox.lng_min) / (bbox.lng_max - bbox.lng_min)) * canvas_width;
    let y = ((bbox.lat_max - latitude) / (bbox.lat_max - bbox.lat_min)) * canvas_height;
    PixelCoordinate { x, y }
}

/// Rough signal quality in percent derived from the reported accuracy radius.
pub fn signal_from_accuracy(accuracy_m: f64) -> f64 {
    (100.0 - accuracy_m).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISSEWEGE: (f64, f64) = (51.2993, 3.2218);

    #[test]
    fn distance_to_self_is_zero() {
        for (lat, lon) in [LISSEWEGE, (0.0, 0.0), (-33.86, 151.2), (89.9, -179.9)] {
            assert_eq!(haversine_distance(lat, lon, lat, lon), 0.0);
        }
    }

    #[test]
    fn distance_is_symmetric() {
        let (lat, lon) = LISSEWEGE;
        let there = haversine_distance(lat, lon, 48.8566, 2.3522);
        let back = haversine_distance(48.8566, 2.3522, lat, lon);
        assert!((there - back).abs() < 1e-6);
    }

    #[test]
    fn distance_covers_centimeters_to_continents() {
        let (lat, lon) = LISSEWEGE;
        // 1e-7 degrees of latitude is about 1.1 cm
        let tiny = haversine_distance(lat, lon, lat + 1e-7, lon);
        assert!((tiny - 0.0111).abs() < 0.001, "got {tiny}");

        // one thousandth of a degree of latitude is about 111 m
        let short = haversine_distance(lat, lon, lat + 0.001, lon);
        assert!((short - 111.19).abs() < 0.1, "got {short}");

        // Brugge to New York is roughly 5 800 km
        let long = haversine_distance(lat, lon, 40.7128, -74.0060);
        assert!((long - 5_797_000.0).abs() < 5_000.0, "got {long}");
    }

    #[test]
    fn degree_conversions_are_inverse() {
        assert!((to_radians(180.0) - std::f64::consts::PI).abs() < 1e-15);
        assert!((to_degrees(std::f64::consts::FRAC_PI_2) - 90.0).abs() < 1e-12);
        assert!((to_degrees(to_radians(51.2993)) - 51.2993).abs() < 1e-12);
    }

    #[test]
    fn pixel_mapping_round_trips_inside_the_box() {
        let bbox = BoundingBox::new(51.29, 51.31, 3.21, 3.23);
        let (width, height) = (390.0, 844.0);
        for (x, y) in [(1.0, 1.0), (195.0, 422.0), (389.5, 843.0), (12.25, 700.75)] {
            let geo = pixels_to_geo(x, y, &bbox, width, height);
            assert!(bbox.contains(geo.latitude, geo.longitude));
            let pixel = geo_to_pixels(geo.latitude, geo.longitude, &bbox, width, height);
            assert!((pixel.x - x).abs() < 1e-6, "x {} vs {}", pixel.x, x);
            assert!((pixel.y - y).abs() < 1e-6, "y {} vs {}", pixel.y, y);
        }
    }

    #[test]
    fn top_left_pixel_is_north_west_corner() {
        let bbox = BoundingBox::new(10.0, 20.0, 30.0, 40.0);
        let geo = pixels_to_geo(0.0, 0.0, &bbox, 100.0, 100.0);
        assert_eq!(geo.latitude, 20.0);
        assert_eq!(geo.longitude, 30.0);
    }

    #[test]
    fn bounding_box_encloses_radius() {
        let (lat, lon) = LISSEWEGE;
        let bbox = calculate_bounding_box(lat, lon, 500.0);
        let north = haversine_distance(lat, lon, bbox.lat_max, lon);
        let east = haversine_distance(lat, lon, lat, bbox.lng_max);
        assert!((north - 500.0).abs() < 1.0);
        assert!((east - 500.0).abs() < 1.0);
    }

    #[test]
    fn signal_never_negative() {
        assert_eq!(signal_from_accuracy(3.0), 97.0);
        assert_eq!(signal_from_accuracy(250.0), 0.0);
    }
}
