//! Data transfer objects for web requests and responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{GeoPoint, InvalidGeoPoint, Location, Pin, TravelMode};
use crate::resolve::ResolveMode;
use crate::routing::{Comparison, ComparisonEntry, PartialFailure, SortKey, Waypoint};

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,

    /// Which maps provider is in use (`google` or `mock`)
    pub provider: &'static str,

    /// Whether the provider has credentials
    pub configured: bool,

    /// Responses in the provider cache (live provider only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cached_responses: Option<u64>,
}

/// Request to resolve a location query.
#[derive(Debug, Deserialize)]
pub struct ResolveLocationRequest {
    /// Free text, `"lat,lng"`, or `{lat, lng}`
    pub query: Location,

    #[serde(default)]
    pub mode: ResolveMode,
}

/// An intermediate point in a comparison request.
#[derive(Debug, Deserialize)]
pub struct WaypointInput {
    pub lat: f64,
    pub lng: f64,

    /// Pass-through points are routed via, not stopped at
    #[serde(default = "default_stopover")]
    pub stopover: bool,
}

fn default_stopover() -> bool {
    true
}

impl WaypointInput {
    pub fn to_waypoint(&self) -> Result<Waypoint, InvalidGeoPoint> {
        let location = GeoPoint::new(self.lat, self.lng)?;
        Ok(if self.stopover {
            Waypoint::stopover(location)
        } else {
            Waypoint::pass_through(location)
        })
    }
}

/// Request to compare routes between two locations.
#[derive(Debug, Deserialize)]
pub struct CompareRoutesRequest {
    pub origin: Location,
    pub destination: Location,

    /// Modes to compare, in display order
    pub modes: Vec<TravelMode>,

    #[serde(default)]
    pub waypoints: Vec<WaypointInput>,

    #[serde(default)]
    pub optimize_waypoints: bool,

    #[serde(default)]
    pub sort: SortKey,

    /// RFC 3339 departure for transit; now when absent
    #[serde(default)]
    pub departure_time: Option<DateTime<Utc>>,
}

/// Modes that failed while others succeeded.
#[derive(Debug, Serialize)]
pub struct PartialFailureResult {
    pub failed_modes: Vec<TravelMode>,

    /// Warning for the user
    pub message: String,

    /// One line per failed mode
    pub details: Vec<String>,
}

impl PartialFailureResult {
    pub fn from_partial_failure(partial: &PartialFailure) -> Self {
        Self {
            failed_modes: partial.failed_modes(),
            message: partial.message(),
            details: partial.failures.iter().map(|f| f.user_message()).collect(),
        }
    }
}

/// Response for route comparison.
#[derive(Debug, Serialize)]
pub struct CompareRoutesResponse {
    pub entries: Vec<ComparisonEntry>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub partial_failure: Option<PartialFailureResult>,
}

impl CompareRoutesResponse {
    pub fn from_comparison(comparison: Comparison) -> Self {
        let partial_failure = comparison
            .partial_failure
            .as_ref()
            .map(PartialFailureResult::from_partial_failure);
        Self {
            entries: comparison.entries,
            partial_failure,
        }
    }
}

/// Request to route through the stored pins.
#[derive(Debug, Deserialize)]
pub struct PinRouteRequest {
    pub travel_mode: TravelMode,

    /// Let the provider reorder the interior pins
    #[serde(default)]
    pub optimize: bool,
}

/// A route through the pins.
#[derive(Debug, Clone, Serialize)]
pub struct PinRoute {
    /// Generation of the request that produced this route
    pub generation: u64,

    pub travel_mode: TravelMode,

    /// Pins in visiting order
    pub pins: Vec<Pin>,

    /// Visiting order as indices into the stored pin list
    pub visit_order: Vec<usize>,

    pub route: ComparisonEntry,
}

/// Response for pin routing.
#[derive(Debug, Serialize)]
pub struct PinRouteResponse {
    #[serde(flatten)]
    pub route: PinRoute,

    /// False when a newer request superseded this one
    pub published: bool,
}

/// Request to place a pin.
#[derive(Debug, Deserialize)]
pub struct NewPinRequest {
    pub lat: f64,
    pub lng: f64,

    #[serde(default)]
    pub address: String,
}

/// Response listing pins.
#[derive(Debug, Serialize)]
pub struct PinListResponse {
    pub pins: Vec<Pin>,
}

/// Response for deletions by timestamp.
#[derive(Debug, Serialize)]
pub struct RemovedResponse {
    pub removed: usize,
}

/// Default width of photos linked from place details.
pub const DEFAULT_PHOTO_WIDTH: u32 = 400;

/// Query string of a photo request.
#[derive(Debug, Deserialize)]
pub struct PhotoQuery {
    #[serde(default = "default_photo_width")]
    pub maxwidth: u32,
}

fn default_photo_width() -> u32 {
    DEFAULT_PHOTO_WIDTH
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Machine-readable error kind
    pub error: &'static str,

    /// Message for the user
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn compare_request_defaults() {
        let req: CompareRoutesRequest = serde_json::from_value(json!({
            "origin": "東京タワー",
            "destination": {"lat": 35.6812, "lng": 139.7671},
            "modes": ["DRIVING", "WALKING"]
        }))
        .unwrap();

        assert_eq!(req.origin, Location::Text("東京タワー".into()));
        assert!(matches!(req.destination, Location::Point(_)));
        assert_eq!(req.modes, vec![TravelMode::Driving, TravelMode::Walking]);
        assert!(req.waypoints.is_empty());
        assert!(!req.optimize_waypoints);
        assert_eq!(req.sort, SortKey::RequestOrder);
        assert!(req.departure_time.is_none());
    }

    #[test]
    fn compare_request_departure_time() {
        let req: CompareRoutesRequest = serde_json::from_value(json!({
            "origin": "東京タワー",
            "destination": "東京駅",
            "modes": ["TRANSIT"],
            "departure_time": "2026-04-01T09:30:00+09:00"
        }))
        .unwrap();

        assert_eq!(req.departure_time.unwrap().timestamp(), 1775003400);
    }

    #[test]
    fn photo_width_defaults() {
        let query: PhotoQuery = serde_json::from_value(json!({})).unwrap();
        assert_eq!(query.maxwidth, DEFAULT_PHOTO_WIDTH);
    }

    #[test]
    fn waypoint_input_validates() {
        let input: WaypointInput =
            serde_json::from_value(json!({"lat": 35.67, "lng": 139.76})).unwrap();
        assert!(input.to_waypoint().unwrap().stopover);

        let input: WaypointInput =
            serde_json::from_value(json!({"lat": 95.0, "lng": 139.76, "stopover": false}))
                .unwrap();
        assert!(input.to_waypoint().is_err());
    }

    #[test]
    fn resolve_request_mode_defaults_to_geocode() {
        let req: ResolveLocationRequest =
            serde_json::from_value(json!({"query": "東京駅"})).unwrap();
        assert_eq!(req.mode, ResolveMode::Geocode);

        let req: ResolveLocationRequest =
            serde_json::from_value(json!({"query": "ラーメン", "mode": "place_search"})).unwrap();
        assert_eq!(req.mode, ResolveMode::PlaceSearch);
    }
}
