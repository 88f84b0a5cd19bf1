//! Mock Maps provider for testing without API access.
//!
//! Serves scripted responses for geocoding, place search, place details and
//! directions, and records every directions query it receives so tests can
//! assert on call counts and request parameters.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio::sync::RwLock;

use crate::domain::TravelMode;
use crate::resolve::{Geocoder, PlaceDetailsProvider, PlaceSearcher};
use crate::routing::{DirectionsProvider, DirectionsQuery};

use super::error::ProviderError;
use super::types::{
    DirectionsResponse, GeocodeResponse, PlaceDetailsResponse, PlacesResponse, ProviderStatus,
};

/// A scripted outcome for one mock endpoint.
#[derive(Debug, Clone)]
pub enum MockReply<T> {
    /// Answer with this response body.
    Respond(T),
    /// Fail as if the network dropped the request.
    TransportFailure(String),
    /// Fail as if the provider were not configured.
    Unavailable,
}

impl<T: Clone> MockReply<T> {
    fn produce(&self) -> Result<T, ProviderError> {
        match self {
            MockReply::Respond(body) => Ok(body.clone()),
            MockReply::TransportFailure(msg) => Err(ProviderError::Transport(msg.clone())),
            MockReply::Unavailable => Err(ProviderError::NotConfigured(
                "mock provider unavailable".to_string(),
            )),
        }
    }
}

#[derive(Default)]
struct Script {
    geocode: HashMap<String, MockReply<GeocodeResponse>>,
    places: HashMap<String, MockReply<PlacesResponse>>,
    details: HashMap<String, MockReply<PlaceDetailsResponse>>,
    directions: HashMap<TravelMode, MockReply<DirectionsResponse>>,
    delays: HashMap<TravelMode, Duration>,
}

#[derive(Default)]
struct Calls {
    geocode: AtomicUsize,
    places: AtomicUsize,
    details: AtomicUsize,
    directions: AtomicUsize,
}

/// Mock provider that serves scripted responses.
///
/// Queries with no script answer `ZERO_RESULTS`.
#[derive(Clone, Default)]
pub struct MockMapsProvider {
    script: Arc<RwLock<Script>>,
    calls: Arc<Calls>,
    queries: Arc<RwLock<Vec<DirectionsQuery>>>,
}

impl MockMapsProvider {
    /// Create an empty mock; every query answers `ZERO_RESULTS`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock by loading JSON files from a directory.
    ///
    /// Expects directions responses named `{MODE}.json` (e.g.
    /// `TRANSIT.json`, `DRIVING.json`), and optionally `geocode.json` and
    /// `places.json`, each an object from query text to response, and
    /// `details.json`, an object from place id to response.
    pub fn from_dir(data_dir: impl AsRef<Path>) -> Result<Self, ProviderError> {
        let data_dir = data_dir.as_ref();
        let mut script = Script::default();

        let entries = std::fs::read_dir(data_dir).map_err(|e| {
            ProviderError::NotConfigured(format!(
                "failed to read mock data directory {data_dir:?}: {e}"
            ))
        })?;

        for entry in entries {
            let path = entry
                .map_err(|e| ProviderError::Transport(format!("failed to read entry: {e}")))?
                .path();
            if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }

            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            let json = std::fs::read_to_string(&path).map_err(|e| {
                ProviderError::Transport(format!("failed to read {path:?}: {e}"))
            })?;

            match stem {
                "geocode" => {
                    let replies: HashMap<String, GeocodeResponse> = parse_fixture(&json)?;
                    script.geocode.extend(
                        replies
                            .into_iter()
                            .map(|(query, body)| (query, MockReply::Respond(body))),
                    );
                }
                "places" => {
                    let replies: HashMap<String, PlacesResponse> = parse_fixture(&json)?;
                    script.places.extend(
                        replies
                            .into_iter()
                            .map(|(query, body)| (query, MockReply::Respond(body))),
                    );
                }
                "details" => {
                    let replies: HashMap<String, PlaceDetailsResponse> = parse_fixture(&json)?;
                    script.details.extend(
                        replies
                            .into_iter()
                            .map(|(place_id, body)| (place_id, MockReply::Respond(body))),
                    );
                }
                other => {
                    let Ok(mode) = TravelMode::parse(other) else {
                        tracing::warn!(file = ?path, "ignoring unrecognised mock fixture");
                        continue;
                    };
                    let body: DirectionsResponse = parse_fixture(&json)?;
                    script.directions.insert(mode, MockReply::Respond(body));
                }
            }
        }

        if script.directions.is_empty() {
            return Err(ProviderError::NotConfigured(format!(
                "no directions fixtures found in {data_dir:?}"
            )));
        }

        Ok(Self {
            script: Arc::new(RwLock::new(script)),
            ..Self::default()
        })
    }

    /// Script the geocoding reply for an address.
    pub async fn set_geocode(&self, address: &str, reply: MockReply<GeocodeResponse>) {
        self.script
            .write()
            .await
            .geocode
            .insert(address.to_string(), reply);
    }

    /// Script the place search reply for a query.
    pub async fn set_places(&self, query: &str, reply: MockReply<PlacesResponse>) {
        self.script
            .write()
            .await
            .places
            .insert(query.to_string(), reply);
    }

    /// Script the place details reply for a place id.
    pub async fn set_details(&self, place_id: &str, reply: MockReply<PlaceDetailsResponse>) {
        self.script
            .write()
            .await
            .details
            .insert(place_id.to_string(), reply);
    }

    /// Script the directions reply for a mode.
    pub async fn set_directions(&self, mode: TravelMode, reply: MockReply<DirectionsResponse>) {
        self.script.write().await.directions.insert(mode, reply);
    }

    /// Delay every directions reply for `mode`.
    pub async fn set_delay(&self, mode: TravelMode, delay: Duration) {
        self.script.write().await.delays.insert(mode, delay);
    }

    pub fn geocode_calls(&self) -> usize {
        self.calls.geocode.load(Ordering::SeqCst)
    }

    pub fn place_search_calls(&self) -> usize {
        self.calls.places.load(Ordering::SeqCst)
    }

    pub fn details_calls(&self) -> usize {
        self.calls.details.load(Ordering::SeqCst)
    }

    pub fn directions_calls(&self) -> usize {
        self.calls.directions.load(Ordering::SeqCst)
    }

    /// Every directions query received so far, in arrival order.
    pub async fn directions_queries(&self) -> Vec<DirectionsQuery> {
        self.queries.read().await.clone()
    }
}

fn parse_fixture<T: serde::de::DeserializeOwned>(json: &str) -> Result<T, ProviderError> {
    serde_json::from_str(json).map_err(|e| ProviderError::Json {
        message: e.to_string(),
        body: None,
    })
}

impl Geocoder for MockMapsProvider {
    async fn geocode(&self, address: &str) -> Result<GeocodeResponse, ProviderError> {
        self.calls.geocode.fetch_add(1, Ordering::SeqCst);
        match self.script.read().await.geocode.get(address) {
            Some(reply) => reply.produce(),
            None => Ok(GeocodeResponse {
                status: ProviderStatus::ZeroResults,
                results: Vec::new(),
                error_message: None,
            }),
        }
    }
}

impl PlaceSearcher for MockMapsProvider {
    async fn text_search(&self, query: &str) -> Result<PlacesResponse, ProviderError> {
        self.calls.places.fetch_add(1, Ordering::SeqCst);
        match self.script.read().await.places.get(query) {
            Some(reply) => reply.produce(),
            None => Ok(PlacesResponse {
                status: ProviderStatus::ZeroResults,
                results: Vec::new(),
                error_message: None,
            }),
        }
    }
}

impl PlaceDetailsProvider for MockMapsProvider {
    async fn place_details(&self, place_id: &str) -> Result<PlaceDetailsResponse, ProviderError> {
        self.calls.details.fetch_add(1, Ordering::SeqCst);
        match self.script.read().await.details.get(place_id) {
            Some(reply) => reply.produce(),
            None => Ok(PlaceDetailsResponse {
                status: ProviderStatus::ZeroResults,
                result: None,
                error_message: None,
            }),
        }
    }
}

impl DirectionsProvider for MockMapsProvider {
    async fn directions(
        &self,
        query: &DirectionsQuery,
    ) -> Result<DirectionsResponse, ProviderError> {
        self.calls.directions.fetch_add(1, Ordering::SeqCst);
        self.queries.write().await.push(query.clone());

        let (reply, delay) = {
            let script = self.script.read().await;
            (
                script.directions.get(&query.mode).cloned(),
                script.delays.get(&query.mode).copied(),
            )
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        match reply {
            Some(reply) => reply.produce(),
            None => Ok(DirectionsResponse {
                status: ProviderStatus::ZeroResults,
                routes: Vec::new(),
                error_message: None,
            }),
        }
    }
}
