use serde::{Deserialize, Serialize};

use crate::serde::deserialize_lenient_f64;

/// Mean Earth radius used by [`haversine_km`].
const EARTH_RADIUS_KM: f64 = 6371.0;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Formats the pair as `"lat, lng"`, the form the backend stores for point locations.
    pub fn display_pair(&self) -> String {
        format!("{}, {}", self.latitude, self.longitude)
    }
}

/// A single candidate returned by the geocoding service.
///
/// Nominatim encodes both coordinates as decimal strings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GeocodeMatch {
    #[serde(deserialize_with = "deserialize_lenient_f64")]
    pub lat: f64,
    #[serde(deserialize_with = "deserialize_lenient_f64")]
    pub lon: f64,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl From<&GeocodeMatch> for Coordinates {
    fn from(m: &GeocodeMatch) -> Self {
        Coordinates::new(m.lat, m.lon)
    }
}

/// Normalizes an address into its cache key.
///
/// Only surrounding whitespace is removed; the key is otherwise verbatim and
/// case-sensitive. Returns `None` for blank input.
pub fn normalize_address(address: &str) -> Option<&str> {
    let trimmed = address.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Great-circle distance between two points, in kilometers.
pub fn haversine_km(a: Coordinates, b: Coordinates) -> f64 {
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.latitude.to_radians().cos() * b.latitude.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_address_trims() {
        assert_eq!(
            normalize_address("  221B Baker Street, London \n"),
            Some("221B Baker Street, London")
        );
    }

    #[test]
    fn test_normalize_address_blank() {
        assert_eq!(normalize_address(""), None);
        assert_eq!(normalize_address("   \t"), None);
    }

    #[test]
    fn test_normalize_address_is_case_sensitive() {
        assert_ne!(
            normalize_address("baker street"),
            normalize_address("Baker Street")
        );
    }

    #[test]
    fn test_geocode_match_parses_nominatim_strings() {
        let json = r#"[{"lat": "51.5237629", "lon": "-0.1584743", "display_name": "221B, Baker Street"}]"#;
        let matches: Vec<GeocodeMatch> = serde_json::from_str(json).unwrap();
        let coords = Coordinates::from(&matches[0]);
        assert_eq!(coords, Coordinates::new(51.5237629, -0.1584743));
    }

    #[test]
    fn test_haversine_same_point_is_zero() {
        let p = Coordinates::new(40.4168, -3.7038);
        assert!(haversine_km(p, p).abs() < 1e-9);
    }

    #[test]
    fn test_haversine_madrid_barcelona() {
        let madrid = Coordinates::new(40.4168, -3.7038);
        let barcelona = Coordinates::new(41.3874, 2.1686);
        let d = haversine_km(madrid, barcelona);
        assert!((d - 505.0).abs() < 5.0, "got {d}");
    }

    #[test]
    fn test_display_pair() {
        assert_eq!(Coordinates::new(1.5, -2.25).display_pair(), "1.5, -2.25");
    }
}
