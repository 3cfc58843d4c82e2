//! Sample point records.

use serde::{Deserialize, Serialize};

/// Kind tag carried by every emitted point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointKind {
    /// Ocean current vector.
    #[default]
    Current,
}

/// One down-sampled current vector at a grid location.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplePoint {
    /// Latitude in degrees north.
    #[serde(alias = "lat")]
    pub latitude: f64,
    /// Longitude in degrees east.
    #[serde(alias = "lon")]
    pub longitude: f64,
    /// Eastward velocity component.
    pub u: f64,
    /// Northward velocity component.
    pub v: f64,
    /// Vector magnitude.
    pub speed: f64,
    /// Angle counter-clockwise from east, in `[0, 360)`.
    #[serde(alias = "direction")]
    pub direction_degrees: f64,
    /// Always [`PointKind::Current`].
    #[serde(alias = "type", default)]
    pub kind: PointKind,
}

impl SamplePoint {
    /// Build a point from a location and its velocity components.
    pub fn new(latitude: f64, longitude: f64, u: f64, v: f64) -> Self {
        Self {
            latitude,
            longitude,
            u,
            v,
            speed: speed(u, v),
            direction_degrees: direction_degrees(u, v),
            kind: PointKind::Current,
        }
    }
}

/// Magnitude of a velocity vector.
pub fn speed(u: f64, v: f64) -> f64 {
    u.hypot(v)
}

/// Direction of a velocity vector in degrees, normalized into `[0, 360)`.
pub fn direction_degrees(u: f64, v: f64) -> f64 {
    let direction = v.atan2(u).to_degrees();
    if direction < 0.0 {
        // tiny negatives round up to 360.0
        let wrapped = direction + 360.0;
        if wrapped >= 360.0 { 0.0 } else { wrapped }
    } else {
        // folds -0.0 into 0.0
        direction + 0.0
    }
}

/// Whether a location lies within the valid latitude/longitude range.
///
/// Both bounds are inclusive.
pub fn in_valid_range(latitude: f64, longitude: f64) -> bool {
    (-90.0..=90.0).contains(&latitude) && (-180.0..=180.0).contains(&longitude)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_quadrants() {
        assert!((direction_degrees(1.0, 0.0) - 0.0).abs() < 1e-9);
        assert!((direction_degrees(0.0, 1.0) - 90.0).abs() < 1e-9);
        assert!((direction_degrees(-1.0, 0.0) - 180.0).abs() < 1e-9);
        assert!((direction_degrees(1.0, -1.0) - 315.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_vector() {
        let p = SamplePoint::new(10.0, 20.0, 0.0, 0.0);
        assert_eq!(p.speed, 0.0);
        assert_eq!(p.direction_degrees, 0.0);
    }

    #[test]
    fn test_negative_zero_direction() {
        // atan2(-0.0, 1.0) is -0.0
        let d = direction_degrees(1.0, -0.0);
        assert_eq!(d, 0.0);
        assert!(d.is_sign_positive());
        let d = direction_degrees(1.0, -1e-300);
        assert!((0.0..360.0).contains(&d));
    }

    #[test]
    fn test_range_bounds() {
        assert!(in_valid_range(-90.0, 180.0));
        assert!(in_valid_range(90.0, -180.0));
        assert!(!in_valid_range(90.0001, 0.0));
        assert!(!in_valid_range(0.0, 180.5));
        assert!(!in_valid_range(f64::NAN, 0.0));
    }

    #[test]
    fn test_serialized_field_names() {
        let p = SamplePoint::new(1.5, -2.5, 0.3, 0.4);
        let json = serde_json::to_value(p).unwrap();
        let obj = json.as_object().unwrap();
        let mut keys: Vec<&str> = obj.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            ["direction_degrees", "kind", "latitude", "longitude", "speed", "u", "v"]
        );
        assert_eq!(obj["kind"], "current");
    }

    #[test]
    fn test_legacy_keys_accepted() {
        let text = r#"{"lat":1.0,"lon":2.0,"u":0.0,"v":1.0,"speed":1.0,"direction":90.0,"type":"current"}"#;
        let p: SamplePoint = serde_json::from_str(text).unwrap();
        assert_eq!(p.latitude, 1.0);
        assert_eq!(p.longitude, 2.0);
        assert_eq!(p.direction_degrees, 90.0);
        assert_eq!(p.kind, PointKind::Current);
    }
}
