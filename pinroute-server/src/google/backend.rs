//! Runtime choice between the live and mock providers.

use crate::cache::CachedMapsClient;
use crate::resolve::{Geocoder, PlaceDetailsProvider, PlaceSearcher};
use crate::routing::{DirectionsProvider, DirectionsQuery};

use super::client::PhotoData;
use super::error::ProviderError;
use super::mock::MockMapsProvider;
use super::types::{DirectionsResponse, GeocodeResponse, PlaceDetailsResponse, PlacesResponse};

/// The provider the server talks to.
pub enum MapsBackend {
    /// Google Maps web services, with search caching.
    Live(CachedMapsClient),
    /// Fixture-backed provider for offline development.
    Mock(MockMapsProvider),
}

impl MapsBackend {
    /// Short name for logs and the health endpoint.
    pub fn name(&self) -> &'static str {
        match self {
            MapsBackend::Live(_) => "google",
            MapsBackend::Mock(_) => "mock",
        }
    }

    /// Whether requests can reach a provider at all.
    pub fn is_configured(&self) -> bool {
        match self {
            MapsBackend::Live(client) => client.client().is_configured(),
            MapsBackend::Mock(_) => true,
        }
    }

    /// Responses held in the search cache; the mock has none.
    pub fn cached_responses(&self) -> Option<u64> {
        match self {
            MapsBackend::Live(client) => Some(client.cache_entry_count()),
            MapsBackend::Mock(_) => None,
        }
    }

    /// Fetch a place photo. Fixtures carry no images, so the mock is
    /// always unavailable here.
    pub async fn place_photo(
        &self,
        reference: &str,
        max_width: u32,
    ) -> Result<PhotoData, ProviderError> {
        match self {
            MapsBackend::Live(client) => {
                client.client().get_place_photo(reference, max_width).await
            }
            MapsBackend::Mock(_) => Err(ProviderError::NotConfigured(
                "mock provider serves no photos".to_string(),
            )),
        }
    }
}

impl Geocoder for MapsBackend {
    async fn geocode(&self, address: &str) -> Result<GeocodeResponse, ProviderError> {
        match self {
            MapsBackend::Live(client) => client.geocode(address).await,
            MapsBackend::Mock(mock) => mock.geocode(address).await,
        }
    }
}

impl PlaceSearcher for MapsBackend {
    async fn text_search(&self, query: &str) -> Result<PlacesResponse, ProviderError> {
        match self {
            MapsBackend::Live(client) => client.text_search(query).await,
            MapsBackend::Mock(mock) => mock.text_search(query).await,
        }
    }
}

impl PlaceDetailsProvider for MapsBackend {
    async fn place_details(&self, place_id: &str) -> Result<PlaceDetailsResponse, ProviderError> {
        match self {
            MapsBackend::Live(client) => client.place_details(place_id).await,
            MapsBackend::Mock(mock) => mock.place_details(place_id).await,
        }
    }
}

impl DirectionsProvider for MapsBackend {
    async fn directions(
        &self,
        query: &DirectionsQuery,
    ) -> Result<DirectionsResponse, ProviderError> {
        match self {
            MapsBackend::Live(client) => client.directions(query).await,
            MapsBackend::Mock(mock) => mock.directions(query).await,
        }
    }
}
