//! Latitude/longitude pairs in degrees.

use serde::{Deserialize, Serialize};

/// A point on the globe, in degrees.
///
/// Values are taken as given. Out-of-range input still projects to a
/// well-defined point because the projection is built from trigonometric
/// functions; callers that want canonical values use [`GeoCoordinate::clamped`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoCoordinate {
    /// Degrees north of the equator, nominally in `[-90, 90]`.
    #[serde(alias = "lat")]
    pub latitude: f32,
    /// Degrees east of Greenwich, nominally in `[-180, 180]`.
    #[serde(alias = "lng", alias = "lon")]
    pub longitude: f32,
}

impl GeoCoordinate {
    pub const fn new(latitude: f32, longitude: f32) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Clamp latitude to `[-90, 90]` and wrap longitude into `[-180, 180)`.
    pub fn clamped(self) -> Self {
        let latitude = self.latitude.clamp(-90.0, 90.0);
        let longitude = (self.longitude + 180.0).rem_euclid(360.0) - 180.0;
        Self {
            latitude,
            longitude,
        }
    }

    /// Latitude in radians.
    pub fn latitude_rad(&self) -> f32 {
        self.latitude.to_radians()
    }

    /// Longitude in radians.
    pub fn longitude_rad(&self) -> f32 {
        self.longitude.to_radians()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamped_limits_latitude() {
        let c = GeoCoordinate::new(123.0, 10.0).clamped();
        assert_eq!(c.latitude, 90.0);
        let c = GeoCoordinate::new(-95.0, 10.0).clamped();
        assert_eq!(c.latitude, -90.0);
    }

    #[test]
    fn test_clamped_wraps_longitude() {
        let c = GeoCoordinate::new(0.0, 190.0).clamped();
        assert!((c.longitude - -170.0).abs() < 1e-4, "got {}", c.longitude);
        let c = GeoCoordinate::new(0.0, -540.0).clamped();
        assert!((c.longitude - -180.0).abs() < 1e-4, "got {}", c.longitude);
        let c = GeoCoordinate::new(0.0, 45.0).clamped();
        assert_eq!(c.longitude, 45.0);
    }

    #[test]
    fn test_deserialize_short_field_names() {
        let c: GeoCoordinate = ron::from_str("(lat: 35.5, lng: -106.25)").unwrap();
        assert_eq!(c, GeoCoordinate::new(35.5, -106.25));
        let c: GeoCoordinate = ron::from_str("(latitude: 1.0, longitude: 2.0)").unwrap();
        assert_eq!(c, GeoCoordinate::new(1.0, 2.0));
    }
}
