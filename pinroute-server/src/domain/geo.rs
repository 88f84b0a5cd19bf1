//! Geographic point type.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when constructing an invalid [`GeoPoint`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid coordinate: {reason}")]
pub struct InvalidGeoPoint {
    reason: &'static str,
}

/// A WGS84 latitude/longitude pair.
///
/// Latitude is always within `-90..=90` and longitude within `-180..=180`.
/// This type guarantees that any `GeoPoint` value is valid by construction,
/// including values deserialized from JSON.
///
/// # Examples
///
/// ```
/// use pinroute_server::domain::GeoPoint;
///
/// let tower = GeoPoint::new(35.6586, 139.7454).unwrap();
/// assert_eq!(tower.lat(), 35.6586);
///
/// // Out of range is rejected
/// assert!(GeoPoint::new(91.0, 0.0).is_err());
/// assert!(GeoPoint::new(0.0, -180.5).is_err());
///
/// // The "lat,lng" text form used by location inputs
/// let station = GeoPoint::parse("35.681236, 139.767125").unwrap();
/// assert_eq!(station.lng(), 139.767125);
/// ```
#[derive(Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGeoPoint")]
pub struct GeoPoint {
    lat: f64,
    lng: f64,
}

/// Unvalidated wire form of a [`GeoPoint`].
#[derive(Deserialize)]
struct RawGeoPoint {
    lat: f64,
    lng: f64,
}

impl TryFrom<RawGeoPoint> for GeoPoint {
    type Error = InvalidGeoPoint;

    fn try_from(raw: RawGeoPoint) -> Result<Self, Self::Error> {
        GeoPoint::new(raw.lat, raw.lng)
    }
}

impl GeoPoint {
    /// Create a point, validating both coordinates.
    pub fn new(lat: f64, lng: f64) -> Result<Self, InvalidGeoPoint> {
        if !lat.is_finite() || !lng.is_finite() {
            return Err(InvalidGeoPoint {
                reason: "coordinates must be finite",
            });
        }

        if !(-90.0..=90.0).contains(&lat) {
            return Err(InvalidGeoPoint {
                reason: "latitude must be between -90 and 90",
            });
        }

        if !(-180.0..=180.0).contains(&lng) {
            return Err(InvalidGeoPoint {
                reason: "longitude must be between -180 and 180",
            });
        }

        Ok(GeoPoint { lat, lng })
    }

    /// Parse the `"lat,lng"` text form.
    ///
    /// Whitespace around either number is ignored. Anything that is not
    /// exactly two comma-separated numbers is rejected.
    pub fn parse(s: &str) -> Result<Self, InvalidGeoPoint> {
        let (lat, lng) = s.split_once(',').ok_or(InvalidGeoPoint {
            reason: "expected \"lat,lng\"",
        })?;

        let lat: f64 = lat.trim().parse().map_err(|_| InvalidGeoPoint {
            reason: "latitude is not a number",
        })?;
        let lng: f64 = lng.trim().parse().map_err(|_| InvalidGeoPoint {
            reason: "longitude is not a number",
        })?;

        GeoPoint::new(lat, lng)
    }

    /// Latitude in degrees.
    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude in degrees.
    pub fn lng(&self) -> f64 {
        self.lng
    }

    /// The `"lat,lng"` form accepted by the provider APIs.
    pub fn to_query_string(&self) -> String {
        format!("{},{}", self.lat, self.lng)
    }
}

impl fmt::Debug for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GeoPoint({}, {})", self.lat, self.lng)
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}
