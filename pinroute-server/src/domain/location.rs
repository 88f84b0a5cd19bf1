//! Locations as users enter them: a point, or free text.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::GeoPoint;

/// A location given either as coordinates or as free text.
///
/// On the wire this is either `{"lat": .., "lng": ..}` or a plain string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Location {
    Point(GeoPoint),
    Text(String),
}

impl Location {
    /// Interpret user input: `"lat,lng"` becomes a point, anything else
    /// stays text (trimmed).
    pub fn parse(input: &str) -> Self {
        match GeoPoint::parse(input) {
            Ok(point) => Location::Point(point),
            Err(_) => Location::Text(input.trim().to_string()),
        }
    }

    /// Promote text in `"lat,lng"` form to a point.
    pub fn normalized(self) -> Self {
        match self {
            Location::Text(text) => Location::parse(&text),
            point => point,
        }
    }

    /// The point, if this location already is one.
    pub fn as_point(&self) -> Option<GeoPoint> {
        match self {
            Location::Point(p) => Some(*p),
            Location::Text(_) => None,
        }
    }

    /// Whether this is text with nothing but whitespace.
    pub fn is_blank(&self) -> bool {
        matches!(self, Location::Text(t) if t.trim().is_empty())
    }

    /// Value for provider query parameters (`origin=`, `destination=`).
    pub fn to_query_string(&self) -> String {
        match self {
            Location::Point(p) => p.to_query_string(),
            Location::Text(t) => t.clone(),
        }
    }
}

impl From<GeoPoint> for Location {
    fn from(point: GeoPoint) -> Self {
        Location::Point(point)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Point(p) => write!(f, "{p}"),
            Location::Text(t) => f.write_str(t),
        }
    }
}
