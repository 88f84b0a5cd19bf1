//! Google Maps web service response DTOs.
//!
//! These types map directly to the Geocoding, Places Text Search, Place
//! Details and Directions JSON responses. They use `Option` and `#[serde(default)]`
//! liberally because the services omit fields rather than sending nulls.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Top-level `status` field shared by all three services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProviderStatus {
    Ok,
    ZeroResults,
    NotFound,
    MaxWaypointsExceeded,
    MaxRouteLengthExceeded,
    InvalidRequest,
    OverQueryLimit,
    RequestDenied,
    UnknownError,
    /// Any status this client does not know about.
    Other(String),
}

impl ProviderStatus {
    /// The wire value of this status.
    pub fn as_str(&self) -> &str {
        match self {
            ProviderStatus::Ok => "OK",
            ProviderStatus::ZeroResults => "ZERO_RESULTS",
            ProviderStatus::NotFound => "NOT_FOUND",
            ProviderStatus::MaxWaypointsExceeded => "MAX_WAYPOINTS_EXCEEDED",
            ProviderStatus::MaxRouteLengthExceeded => "MAX_ROUTE_LENGTH_EXCEEDED",
            ProviderStatus::InvalidRequest => "INVALID_REQUEST",
            ProviderStatus::OverQueryLimit => "OVER_QUERY_LIMIT",
            ProviderStatus::RequestDenied => "REQUEST_DENIED",
            ProviderStatus::UnknownError => "UNKNOWN_ERROR",
            ProviderStatus::Other(s) => s,
        }
    }

    /// Whether the response carries usable results.
    pub fn is_ok(&self) -> bool {
        matches!(self, ProviderStatus::Ok)
    }

    /// Localized message shown to the user for a routing failure.
    pub fn directions_message(&self) -> &'static str {
        match self {
            ProviderStatus::NotFound => "指定された場所が見つかりませんでした",
            ProviderStatus::ZeroResults => "経路が見つかりませんでした",
            ProviderStatus::MaxWaypointsExceeded => "経由地の数が多すぎます",
            ProviderStatus::MaxRouteLengthExceeded => "経路が長すぎます",
            ProviderStatus::InvalidRequest => "無効なリクエストです",
            ProviderStatus::OverQueryLimit => "APIのリクエスト制限を超えました",
            ProviderStatus::RequestDenied => "リクエストが拒否されました",
            ProviderStatus::UnknownError => "不明なエラーが発生しました",
            ProviderStatus::Ok | ProviderStatus::Other(_) => "エラーが発生しました",
        }
    }

    /// Localized message shown to the user for a search failure.
    pub fn search_message(&self) -> &'static str {
        match self {
            ProviderStatus::ZeroResults => "結果が見つかりませんでした",
            ProviderStatus::OverQueryLimit => {
                "APIのリクエスト制限を超えました。しばらくしてからお試しください"
            }
            ProviderStatus::RequestDenied => "リクエストが拒否されました",
            ProviderStatus::InvalidRequest => "無効なリクエストです",
            ProviderStatus::UnknownError => "不明なエラーが発生しました",
            ProviderStatus::NotFound => "指定された場所が見つかりませんでした",
            _ => "エラーが発生しました",
        }
    }
}

impl From<String> for ProviderStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "OK" => ProviderStatus::Ok,
            "ZERO_RESULTS" => ProviderStatus::ZeroResults,
            "NOT_FOUND" => ProviderStatus::NotFound,
            "MAX_WAYPOINTS_EXCEEDED" => ProviderStatus::MaxWaypointsExceeded,
            "MAX_ROUTE_LENGTH_EXCEEDED" => ProviderStatus::MaxRouteLengthExceeded,
            "INVALID_REQUEST" => ProviderStatus::InvalidRequest,
            "OVER_QUERY_LIMIT" => ProviderStatus::OverQueryLimit,
            "REQUEST_DENIED" => ProviderStatus::RequestDenied,
            "UNKNOWN_ERROR" => ProviderStatus::UnknownError,
            _ => ProviderStatus::Other(s),
        }
    }
}

impl From<ProviderStatus> for String {
    fn from(status: ProviderStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for ProviderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `{lat, lng}` pair as sent by the provider (not yet validated).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// Geometry block of geocoding and place results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub location: LatLng,
}

// ============================================================================
// Geocoding
// ============================================================================

/// Response from the Geocoding API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodeResponse {
    pub status: ProviderStatus,

    #[serde(default)]
    pub results: Vec<GeocodeResult>,

    /// Human-readable detail for non-OK statuses.
    pub error_message: Option<String>,
}

/// One geocoding candidate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodeResult {
    pub formatted_address: String,
    pub geometry: Geometry,
    pub place_id: Option<String>,
}

// ============================================================================
// Places Text Search
// ============================================================================

/// Response from the Places Text Search API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacesResponse {
    pub status: ProviderStatus,

    #[serde(default)]
    pub results: Vec<PlaceResult>,

    pub error_message: Option<String>,
}

/// One place candidate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceResult {
    pub name: String,

    /// Full address (text search).
    pub formatted_address: Option<String>,

    /// Short address (nearby search).
    pub vicinity: Option<String>,

    pub geometry: Geometry,
    pub place_id: Option<String>,
    pub rating: Option<f64>,

    #[serde(default)]
    pub types: Vec<String>,
}

impl PlaceResult {
    /// Best available address for display.
    pub fn address(&self) -> Option<&str> {
        self.formatted_address
            .as_deref()
            .or(self.vicinity.as_deref())
    }
}

// ============================================================================
// Place Details
// ============================================================================

/// Response from the Place Details API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceDetailsResponse {
    pub status: ProviderStatus,

    /// Absent unless the status is `OK`.
    pub result: Option<PlaceDetailsResult>,

    pub error_message: Option<String>,
}

/// The requested fields of one place. Every field is optional because
/// only the fields asked for (and known for the place) are sent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlaceDetailsResult {
    pub place_id: Option<String>,

    #[serde(default)]
    pub name: String,

    pub formatted_address: Option<String>,
    pub formatted_phone_number: Option<String>,
    pub international_phone_number: Option<String>,
    pub website: Option<String>,

    /// Google Maps page for the place.
    pub url: Option<String>,

    pub rating: Option<f64>,
    pub user_ratings_total: Option<u32>,

    /// 0 (free) to 4 (very expensive).
    pub price_level: Option<u8>,

    pub opening_hours: Option<OpeningHoursDto>,

    #[serde(default)]
    pub photos: Vec<PhotoDto>,

    #[serde(default)]
    pub reviews: Vec<ReviewDto>,

    pub geometry: Option<Geometry>,

    #[serde(default)]
    pub types: Vec<String>,

    pub wheelchair_accessible_entrance: Option<bool>,

    /// `OPERATIONAL`, `CLOSED_TEMPORARILY` or `CLOSED_PERMANENTLY`.
    pub business_status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpeningHoursDto {
    pub open_now: Option<bool>,

    /// One line per day, already localized (e.g. `月曜日: 11時00分～22時00分`).
    #[serde(default)]
    pub weekday_text: Vec<String>,

    #[serde(default)]
    pub periods: Vec<OpeningPeriod>,
}

/// One opening interval. Places open around the clock have no `close`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpeningPeriod {
    pub open: DayTime,
    pub close: Option<DayTime>,
}

/// Day of week (0 = Sunday) and `HHMM` local time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayTime {
    pub day: u8,
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoDto {
    pub photo_reference: String,
    pub width: u32,
    pub height: u32,

    #[serde(default)]
    pub html_attributions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewDto {
    #[serde(default)]
    pub author_name: String,
    pub author_url: Option<String>,
    pub profile_photo_url: Option<String>,
    pub rating: Option<f64>,
    pub relative_time_description: Option<String>,

    #[serde(default)]
    pub text: String,

    /// Seconds since the epoch.
    pub time: Option<i64>,
}

// ============================================================================
// Directions
// ============================================================================

/// Response from the Directions API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectionsResponse {
    pub status: ProviderStatus,

    #[serde(default)]
    pub routes: Vec<DirectionsRoute>,

    pub error_message: Option<String>,
}

/// One route alternative. Index 0 is the primary route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectionsRoute {
    #[serde(default)]
    pub summary: String,

    #[serde(default)]
    pub legs: Vec<DirectionsLeg>,

    #[serde(default)]
    pub warnings: Vec<String>,

    /// Order in which the (possibly optimized) waypoints are visited.
    #[serde(default)]
    pub waypoint_order: Vec<usize>,

    pub overview_polyline: Option<Polyline>,
    pub copyrights: Option<String>,

    /// Route-level fare (transit only, where available).
    pub fare: Option<FareDto>,
}

/// Encoded polyline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Polyline {
    pub points: String,
}

/// A value with its display text (`distance`, `duration`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextValue {
    pub text: String,
    pub value: u64,
}

/// A time with its display text (`departure_time`, `arrival_time`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeText {
    pub text: String,
    pub time_zone: Option<String>,
    /// Seconds since the Unix epoch.
    pub value: Option<i64>,
}

/// A fare quote.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FareDto {
    pub currency: String,
    pub value: f64,
    pub text: String,
}

/// One leg between consecutive stops.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectionsLeg {
    pub distance: TextValue,
    pub duration: TextValue,

    #[serde(default)]
    pub start_address: String,

    #[serde(default)]
    pub end_address: String,

    #[serde(default)]
    pub steps: Vec<DirectionsStep>,

    /// Leg-level fare, as exposed by some client libraries.
    pub fare: Option<FareDto>,
}

/// One instruction-level step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectionsStep {
    /// Instruction with inline HTML markup.
    #[serde(default, alias = "instructions")]
    pub html_instructions: String,

    pub distance: TextValue,
    pub duration: TextValue,

    /// Upper-case travel mode name, e.g. "WALKING".
    pub travel_mode: Option<String>,

    /// Present on transit steps only.
    #[serde(alias = "transit")]
    pub transit_details: Option<TransitDetailsDto>,
}

/// Transit block of a step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitDetailsDto {
    pub arrival_stop: Stop,
    pub departure_stop: Stop,
    pub arrival_time: TimeText,
    pub departure_time: TimeText,
    pub headsign: Option<String>,
    pub line: TransitLine,

    #[serde(default)]
    pub num_stops: u32,
}

/// A transit stop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stop {
    pub name: String,
    pub location: Option<LatLng>,
}

/// A transit line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitLine {
    pub name: Option<String>,
    pub short_name: Option<String>,
    pub vehicle: Option<Vehicle>,
}

/// Vehicle operating a transit line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub vehicle_type: Option<String>,
}
