//! Google Maps web service HTTP client.
//!
//! Provides async methods for the Geocoding, Places Text Search, Place
//! Details, Place Photo and Directions services. Handles the API key, concurrency limiting and
//! status-code mapping; response statuses are left to the caller.

use std::sync::Arc;

use reqwest::header::{ACCEPT_LANGUAGE, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use tokio::sync::{Semaphore, SemaphorePermit};

use crate::resolve::{Geocoder, PlaceDetailsProvider, PlaceSearcher};
use crate::routing::{Departure, DirectionsProvider, DirectionsQuery, Waypoint};

use super::error::ProviderError;
use super::types::{DirectionsResponse, GeocodeResponse, PlaceDetailsResponse, PlacesResponse};

/// Default base URL for the Maps web services.
const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 5;

/// Longest response body kept in a JSON error.
const ERROR_BODY_LIMIT: usize = 500;

/// Fields requested from Place Details. Each field is billed, so only
/// what the detail view shows is asked for.
const DETAIL_FIELDS: &[&str] = &[
    "place_id",
    "name",
    "formatted_address",
    "formatted_phone_number",
    "international_phone_number",
    "website",
    "url",
    "rating",
    "user_ratings_total",
    "price_level",
    "opening_hours",
    "photos",
    "reviews",
    "geometry",
    "types",
    "wheelchair_accessible_entrance",
    "business_status",
];

/// Widest photo the Place Photo service returns.
const MAX_PHOTO_WIDTH: u32 = 1600;

/// An image fetched from the Place Photo service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoData {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Configuration for the Maps client.
#[derive(Debug, Clone)]
pub struct GoogleMapsConfig {
    /// API key for authentication
    pub api_key: String,
    /// Base URL for the API (defaults to production)
    pub base_url: String,
    /// Language for geocoding and place results
    pub language: String,
    /// Region bias for geocoding and place results
    pub region: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl GoogleMapsConfig {
    /// Create a new config with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            language: "ja".to_string(),
            region: "jp".to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the result language and region bias.
    pub fn with_locale(mut self, language: impl Into<String>, region: impl Into<String>) -> Self {
        self.language = language.into();
        self.region = region.into();
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Google Maps web service client.
///
/// Uses a semaphore to limit concurrent requests. A client built without
/// an API key can be constructed but every call fails with
/// [`ProviderError::NotConfigured`].
#[derive(Debug, Clone)]
pub struct GoogleMapsClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    language: String,
    region: String,
    semaphore: Arc<Semaphore>,
}

impl GoogleMapsClient {
    /// Create a new client with the given configuration.
    pub fn new(config: GoogleMapsConfig) -> Result<Self, ProviderError> {
        let mut headers = HeaderMap::new();

        let language = HeaderValue::from_str(&config.language)
            .map_err(|_| ProviderError::NotConfigured("invalid language tag".to_string()))?;
        headers.insert(ACCEPT_LANGUAGE, language);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
            language: config.language,
            region: config.region,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent)),
        })
    }

    /// Whether an API key is present.
    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// Geocode a free-text address.
    pub async fn geocode_address(&self, address: &str) -> Result<GeocodeResponse, ProviderError> {
        let params = vec![
            ("address", address.to_string()),
            ("language", self.language.clone()),
            ("region", self.region.clone()),
        ];
        self.get_json("geocode/json", params).await
    }

    /// Search places by free text.
    pub async fn search_places(&self, query: &str) -> Result<PlacesResponse, ProviderError> {
        let params = vec![
            ("query", query.to_string()),
            ("language", self.language.clone()),
            ("region", self.region.clone()),
        ];
        self.get_json("place/textsearch/json", params).await
    }

    /// Fetch the detail fields of one place.
    pub async fn get_place_details(
        &self,
        place_id: &str,
    ) -> Result<PlaceDetailsResponse, ProviderError> {
        let params = vec![
            ("place_id", place_id.to_string()),
            ("fields", DETAIL_FIELDS.join(",")),
            ("language", self.language.clone()),
        ];
        self.get_json("place/details/json", params).await
    }

    /// Fetch a place photo no wider than `max_width` pixels.
    ///
    /// The service answers with a redirect to the image, which is followed.
    pub async fn get_place_photo(
        &self,
        reference: &str,
        max_width: u32,
    ) -> Result<PhotoData, ProviderError> {
        let params = vec![
            ("photo_reference", reference.to_string()),
            ("maxwidth", max_width.clamp(1, MAX_PHOTO_WIDTH).to_string()),
        ];

        let _permit = self.acquire().await?;
        let response = self.send("place/photo", params).await?;

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = response.bytes().await?.to_vec();

        Ok(PhotoData {
            content_type,
            bytes,
        })
    }

    /// Request directions for one mode.
    pub async fn get_directions(
        &self,
        query: &DirectionsQuery,
    ) -> Result<DirectionsResponse, ProviderError> {
        self.get_json("directions/json", directions_params(query)).await
    }

    /// Perform a GET against `path` and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: Vec<(&'static str, String)>,
    ) -> Result<T, ProviderError> {
        let _permit = self.acquire().await?;
        let response = self.send(path, params).await?;
        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| ProviderError::Json {
            message: e.to_string(),
            body: Some(body.chars().take(ERROR_BODY_LIMIT).collect()),
        })
    }

    /// Wait for a request slot. Fails at once without an API key.
    async fn acquire(&self) -> Result<SemaphorePermit<'_>, ProviderError> {
        if !self.is_configured() {
            return Err(ProviderError::NotConfigured(
                "GOOGLE_MAPS_API_KEY is not set".to_string(),
            ));
        }

        self.semaphore
            .acquire()
            .await
            .map_err(|_| ProviderError::Transport("semaphore closed".to_string()))
    }

    /// Send a GET with the key appended, mapping HTTP failures to errors.
    async fn send(
        &self,
        path: &str,
        mut params: Vec<(&'static str, String)>,
    ) -> Result<reqwest::Response, ProviderError> {
        params.push(("key", self.api_key.clone()));
        let url = format!("{}/{}", self.base_url, path);

        tracing::debug!(path, "provider request");

        let response = self.http.get(&url).query(&params).send().await?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(ProviderError::Unauthorized);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(response)
    }
}

impl Geocoder for GoogleMapsClient {
    async fn geocode(&self, address: &str) -> Result<GeocodeResponse, ProviderError> {
        self.geocode_address(address).await
    }
}

impl PlaceSearcher for GoogleMapsClient {
    async fn text_search(&self, query: &str) -> Result<PlacesResponse, ProviderError> {
        self.search_places(query).await
    }
}

impl PlaceDetailsProvider for GoogleMapsClient {
    async fn place_details(&self, place_id: &str) -> Result<PlaceDetailsResponse, ProviderError> {
        self.get_place_details(place_id).await
    }
}

impl DirectionsProvider for GoogleMapsClient {
    async fn directions(
        &self,
        query: &DirectionsQuery,
    ) -> Result<DirectionsResponse, ProviderError> {
        self.get_directions(query).await
    }
}

/// Query parameters for a Directions request, excluding the key.
fn directions_params(query: &DirectionsQuery) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("origin", query.origin.to_query_string()),
        ("destination", query.destination.to_query_string()),
        ("mode", query.mode.query_value().to_string()),
        ("language", query.language.clone()),
        ("region", query.region.clone()),
    ];

    if !query.waypoints.is_empty() {
        params.push((
            "waypoints",
            waypoints_param(&query.waypoints, query.optimize_waypoints),
        ));
    }

    if let Some(transit) = &query.transit {
        let departure = match transit.departure {
            Departure::Now => "now".to_string(),
            Departure::At(at) => at.timestamp().to_string(),
        };
        params.push(("departure_time", departure));

        if !transit.vehicle_modes.is_empty() {
            params.push(("transit_mode", transit.vehicle_modes.join("|")));
        }
        params.push((
            "transit_routing_preference",
            transit.routing_preference.clone(),
        ));
    }

    params
}

/// Encode waypoints as `optimize:true|lat,lng|via:lat,lng`.
fn waypoints_param(waypoints: &[Waypoint], optimize: bool) -> String {
    let mut parts = Vec::with_capacity(waypoints.len() + 1);
    if optimize {
        parts.push("optimize:true".to_string());
    }
    for waypoint in waypoints {
        let point = waypoint.location.to_query_string();
        if waypoint.stopover {
            parts.push(point);
        } else {
            parts.push(format!("via:{point}"));
        }
    }
    parts.join("|")
}
