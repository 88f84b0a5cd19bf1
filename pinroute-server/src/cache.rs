//! Caching layer for Maps API responses.
//!
//! Geocoding and place search answers for the same text are stable over
//! minutes, so both are cached by their trimmed query text, and place
//! details by place id. Directions are never cached: transit results depend
//! on the departure time.
//!
//! Only definitive answers (`OK` and `ZERO_RESULTS`) are cached; quota and
//! denial statuses are transient and must be retried.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;

use crate::google::{
    DirectionsResponse, GeocodeResponse, GoogleMapsClient, PlaceDetailsResponse, PlacesResponse,
    ProviderError, ProviderStatus,
};
use crate::resolve::{Geocoder, PlaceDetailsProvider, PlaceSearcher};
use crate::routing::{DirectionsProvider, DirectionsQuery};

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries per service.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(10 * 60),
            max_capacity: 1000,
        }
    }
}

/// Whether a response with this status may be served from cache.
fn is_cacheable(status: &ProviderStatus) -> bool {
    matches!(status, ProviderStatus::Ok | ProviderStatus::ZeroResults)
}

/// Normalize query text into a cache key.
fn cache_key(text: &str) -> String {
    text.trim().to_string()
}

/// Cache for search and place details responses.
pub struct MapsCache {
    geocode: MokaCache<String, Arc<GeocodeResponse>>,
    places: MokaCache<String, Arc<PlacesResponse>>,
    details: MokaCache<String, Arc<PlaceDetailsResponse>>,
}

impl MapsCache {
    /// Create a new cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let geocode = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();
        let places = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();
        let details = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self {
            geocode,
            places,
            details,
        }
    }

    pub async fn get_geocode(&self, address: &str) -> Option<Arc<GeocodeResponse>> {
        self.geocode.get(&cache_key(address)).await
    }

    /// Cache a geocoding response if its status is definitive.
    pub async fn insert_geocode(&self, address: &str, response: Arc<GeocodeResponse>) {
        if is_cacheable(&response.status) {
            self.geocode.insert(cache_key(address), response).await;
        }
    }

    pub async fn get_places(&self, query: &str) -> Option<Arc<PlacesResponse>> {
        self.places.get(&cache_key(query)).await
    }

    /// Cache a place search response if its status is definitive.
    pub async fn insert_places(&self, query: &str, response: Arc<PlacesResponse>) {
        if is_cacheable(&response.status) {
            self.places.insert(cache_key(query), response).await;
        }
    }

    pub async fn get_details(&self, place_id: &str) -> Option<Arc<PlaceDetailsResponse>> {
        self.details.get(&cache_key(place_id)).await
    }

    /// Cache a place details response if its status is definitive.
    pub async fn insert_details(&self, place_id: &str, response: Arc<PlaceDetailsResponse>) {
        if is_cacheable(&response.status) {
            self.details.insert(cache_key(place_id), response).await;
        }
    }

    /// Approximate number of cached responses, for the health endpoint.
    pub fn entry_count(&self) -> u64 {
        self.geocode.entry_count() + self.places.entry_count() + self.details.entry_count()
    }
}

/// Maps client with caching.
///
/// Wraps a `GoogleMapsClient` and caches geocoding, place search and
/// place details responses.
pub struct CachedMapsClient {
    client: GoogleMapsClient,
    cache: MapsCache,
}

impl CachedMapsClient {
    /// Create a new cached client.
    pub fn new(client: GoogleMapsClient, cache_config: &CacheConfig) -> Self {
        Self {
            client,
            cache: MapsCache::new(cache_config),
        }
    }

    /// Access the underlying client for operations that bypass cache.
    pub fn client(&self) -> &GoogleMapsClient {
        &self.client
    }

    pub fn cache_entry_count(&self) -> u64 {
        self.cache.entry_count()
    }
}

impl Geocoder for CachedMapsClient {
    async fn geocode(&self, address: &str) -> Result<GeocodeResponse, ProviderError> {
        if let Some(cached) = self.cache.get_geocode(address).await {
            tracing::debug!(address, "geocode cache hit");
            return Ok((*cached).clone());
        }

        let response = self.client.geocode_address(address).await?;
        self.cache
            .insert_geocode(address, Arc::new(response.clone()))
            .await;
        Ok(response)
    }
}

impl PlaceSearcher for CachedMapsClient {
    async fn text_search(&self, query: &str) -> Result<PlacesResponse, ProviderError> {
        if let Some(cached) = self.cache.get_places(query).await {
            tracing::debug!(query, "place search cache hit");
            return Ok((*cached).clone());
        }

        let response = self.client.search_places(query).await?;
        self.cache
            .insert_places(query, Arc::new(response.clone()))
            .await;
        Ok(response)
    }
}

impl PlaceDetailsProvider for CachedMapsClient {
    async fn place_details(&self, place_id: &str) -> Result<PlaceDetailsResponse, ProviderError> {
        if let Some(cached) = self.cache.get_details(place_id).await {
            tracing::debug!(place_id, "place details cache hit");
            return Ok((*cached).clone());
        }

        let response = self.client.get_place_details(place_id).await?;
        self.cache
            .insert_details(place_id, Arc::new(response.clone()))
            .await;
        Ok(response)
    }
}

impl DirectionsProvider for CachedMapsClient {
    async fn directions(
        &self,
        query: &DirectionsQuery,
    ) -> Result<DirectionsResponse, ProviderError> {
        self.client.get_directions(query).await
    }
}
