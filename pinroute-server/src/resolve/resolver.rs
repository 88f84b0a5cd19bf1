//! Location resolution.
//!
//! Turns a free-text query or a coordinate into a canonical point with a
//! label. Coordinates resolve to themselves without touching the network.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::domain::{GeoPoint, Location};
use crate::google::{
    GeocodeResponse, GeocodeResult, LatLng, PlaceResult, PlacesResponse, ProviderError,
    ProviderStatus,
};

use super::error::ResolutionError;

/// Capability for geocoding one address.
pub trait Geocoder {
    /// A response with a non-`OK` status is still `Ok` here.
    fn geocode(
        &self,
        address: &str,
    ) -> impl Future<Output = Result<GeocodeResponse, ProviderError>> + Send;
}

/// Capability for free-text place search.
pub trait PlaceSearcher {
    /// A response with a non-`OK` status is still `Ok` here.
    fn text_search(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<PlacesResponse, ProviderError>> + Send;
}

/// How a text query is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolveMode {
    /// Address lookup; the first candidate wins.
    #[default]
    Geocode,
    /// Place search; every candidate is returned.
    PlaceSearch,
}

/// A query resolved to a point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLocation {
    pub point: GeoPoint,

    /// Place name, or the formatted address for geocoding results.
    pub label: String,

    pub address: Option<String>,
    pub place_id: Option<String>,
}

/// Outcome of a successful resolution.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Resolution {
    /// A coordinate, or the first geocoding candidate.
    Single { location: ResolvedLocation },

    /// Place search: all candidates, with the first focused.
    Places {
        focused: ResolvedLocation,
        candidates: Vec<ResolvedLocation>,
    },
}

impl Resolution {
    /// The location to center on and offer as a pin.
    pub fn focused(&self) -> &ResolvedLocation {
        match self {
            Resolution::Single { location } => location,
            Resolution::Places { focused, .. } => focused,
        }
    }

    /// Every candidate, focused first.
    pub fn candidates(&self) -> &[ResolvedLocation] {
        match self {
            Resolution::Single { location } => std::slice::from_ref(location),
            Resolution::Places { candidates, .. } => candidates,
        }
    }
}

/// First result of a search, as kept in history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FirstResult {
    #[serde(default)]
    pub name: String,
    pub address: Option<String>,
    pub lat: f64,
    pub lng: f64,
}

/// A completed search, handed to the [`SearchRecorder`].
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRecord {
    pub query: String,
    pub mode: ResolveMode,
    pub results: usize,
    pub first_result: Option<FirstResult>,
}

/// Sink for completed searches.
pub trait SearchRecorder: Send + Sync {
    fn record_search(&self, record: SearchRecord);
}

/// Resolves location queries against a provider.
pub struct LocationResolver<'a, P> {
    provider: &'a P,
    recorder: Option<&'a dyn SearchRecorder>,
}

impl<'a, P> LocationResolver<'a, P>
where
    P: Geocoder + PlaceSearcher + Sync,
{
    pub fn new(provider: &'a P) -> Self {
        Self {
            provider,
            recorder: None,
        }
    }

    /// Record every search that yields results.
    pub fn with_recorder(mut self, recorder: &'a dyn SearchRecorder) -> Self {
        self.recorder = Some(recorder);
        self
    }

    /// Resolve `query` using `mode` for text.
    pub async fn resolve(
        &self,
        query: &Location,
        mode: ResolveMode,
    ) -> Result<Resolution, ResolutionError> {
        let text = match query.clone().normalized() {
            Location::Point(point) => {
                return Ok(Resolution::Single {
                    location: ResolvedLocation {
                        point,
                        label: point.to_string(),
                        address: None,
                        place_id: None,
                    },
                });
            }
            Location::Text(text) => text,
        };

        let text = text.trim();
        if text.is_empty() {
            return Err(ResolutionError::ZeroResults {
                query: String::new(),
            });
        }

        let resolution = match mode {
            ResolveMode::Geocode => self.geocode(text).await?,
            ResolveMode::PlaceSearch => self.search(text).await?,
        };

        if let Some(recorder) = self.recorder {
            let focused = resolution.focused();
            recorder.record_search(SearchRecord {
                query: text.to_string(),
                mode,
                results: resolution.candidates().len(),
                first_result: Some(FirstResult {
                    name: focused.label.clone(),
                    address: focused.address.clone(),
                    lat: focused.point.lat(),
                    lng: focused.point.lng(),
                }),
            });
        }

        Ok(resolution)
    }

    async fn geocode(&self, text: &str) -> Result<Resolution, ResolutionError> {
        let response = self.provider.geocode(text).await?;
        check_status(response.status, response.error_message, text)?;

        let location = response
            .results
            .iter()
            .find_map(from_geocode)
            .ok_or_else(|| zero_results(text))?;

        Ok(Resolution::Single { location })
    }

    async fn search(&self, text: &str) -> Result<Resolution, ResolutionError> {
        let response = self.provider.text_search(text).await?;
        check_status(response.status, response.error_message, text)?;

        let candidates: Vec<ResolvedLocation> =
            response.results.iter().filter_map(from_place).collect();

        let focused = candidates.first().cloned().ok_or_else(|| zero_results(text))?;

        Ok(Resolution::Places {
            focused,
            candidates,
        })
    }
}

fn zero_results(text: &str) -> ResolutionError {
    ResolutionError::ZeroResults {
        query: text.to_string(),
    }
}

fn check_status(
    status: ProviderStatus,
    detail: Option<String>,
    text: &str,
) -> Result<(), ResolutionError> {
    match status {
        ProviderStatus::Ok => Ok(()),
        ProviderStatus::ZeroResults => Err(zero_results(text)),
        other => Err(ResolutionError::refused(other, detail)),
    }
}

fn to_point(location: &LatLng) -> Option<GeoPoint> {
    match GeoPoint::new(location.lat, location.lng) {
        Ok(point) => Some(point),
        Err(err) => {
            let (lat, lng) = (location.lat, location.lng);
            tracing::warn!(lat, lng, %err, "skipping invalid candidate");
            None
        }
    }
}

fn from_geocode(result: &GeocodeResult) -> Option<ResolvedLocation> {
    Some(ResolvedLocation {
        point: to_point(&result.geometry.location)?,
        label: result.formatted_address.clone(),
        address: Some(result.formatted_address.clone()),
        place_id: result.place_id.clone(),
    })
}

fn from_place(result: &PlaceResult) -> Option<ResolvedLocation> {
    Some(ResolvedLocation {
        point: to_point(&result.geometry.location)?,
        label: result.name.clone(),
        address: result.address().map(str::to_string),
        place_id: result.place_id.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::google::{MockMapsProvider, MockReply};
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorded(Mutex<Vec<SearchRecord>>);

    impl SearchRecorder for Recorded {
        fn record_search(&self, record: SearchRecord) {
            self.0.lock().unwrap().push(record);
        }
    }

    fn fixtures() -> MockMapsProvider {
        MockMapsProvider::from_dir("data/mock").unwrap()
    }

    #[tokio::test]
    async fn point_is_identity_without_network() {
        let mock = fixtures();
        let recorded = Recorded::default();
        let resolver = LocationResolver::new(&mock).with_recorder(&recorded);

        let point = GeoPoint::new(35.6586, 139.7454).unwrap();
        let resolution = resolver
            .resolve(&Location::Point(point), ResolveMode::Geocode)
            .await
            .unwrap();

        assert_eq!(resolution.focused().point, point);
        assert_eq!(mock.geocode_calls(), 0);
        assert_eq!(mock.place_search_calls(), 0);
        assert!(recorded.0.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn coordinate_text_is_identity() {
        let mock = fixtures();
        let resolver = LocationResolver::new(&mock);

        let resolution = resolver
            .resolve(&Location::Text("35.6812, 139.7671".into()), ResolveMode::PlaceSearch)
            .await
            .unwrap();

        assert_eq!(resolution.focused().point.lat(), 35.6812);
        assert_eq!(mock.place_search_calls(), 0);
    }

    #[tokio::test]
    async fn geocode_takes_first_and_records() {
        let mock = fixtures();
        let recorded = Recorded::default();
        let resolver = LocationResolver::new(&mock).with_recorder(&recorded);

        let resolution = resolver
            .resolve(&Location::Text(" 東京駅 ".into()), ResolveMode::Geocode)
            .await
            .unwrap();

        let focused = resolution.focused();
        assert_eq!(focused.point.lat(), 35.6812362);
        assert!(focused.label.contains("千代田区"));
        assert_eq!(resolution.candidates().len(), 1);

        let records = recorded.0.lock().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].query, "東京駅");
        assert_eq!(records[0].mode, ResolveMode::Geocode);
        assert_eq!(records[0].results, 1);
    }

    #[tokio::test]
    async fn place_search_returns_all_candidates() {
        let mock = fixtures();
        let resolver = LocationResolver::new(&mock);

        let resolution = resolver
            .resolve(&Location::Text("ラーメン 東京駅".into()), ResolveMode::PlaceSearch)
            .await
            .unwrap();

        let Resolution::Places {
            focused,
            candidates,
        } = &resolution
        else {
            panic!("expected place results");
        };
        assert_eq!(candidates.len(), 3);
        assert_eq!(focused, &candidates[0]);
        assert_eq!(focused.label, "六厘舎 東京駅");
        // Falls back to vicinity when there is no formatted address
        assert_eq!(candidates[2].address.as_deref(), Some("千代田区丸の内１丁目"));
    }

    #[tokio::test]
    async fn blank_text_is_zero_results_without_network() {
        let mock = fixtures();
        let resolver = LocationResolver::new(&mock);

        let err = resolver
            .resolve(&Location::Text("   ".into()), ResolveMode::Geocode)
            .await
            .unwrap_err();

        assert!(matches!(err, ResolutionError::ZeroResults { .. }));
        assert_eq!(mock.geocode_calls(), 0);
    }

    #[tokio::test]
    async fn zero_results_not_recorded() {
        let mock = fixtures();
        let recorded = Recorded::default();
        let resolver = LocationResolver::new(&mock).with_recorder(&recorded);

        let err = resolver
            .resolve(&Location::Text("存在しない場所".into()), ResolveMode::Geocode)
            .await
            .unwrap_err();

        assert_eq!(err.user_message(), "結果が見つかりませんでした");
        assert!(recorded.0.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn refusal_and_transport_classified() {
        let mock = MockMapsProvider::new();
        mock.set_geocode(
            "denied",
            MockReply::Respond(GeocodeResponse {
                status: ProviderStatus::RequestDenied,
                results: Vec::new(),
                error_message: Some("API key invalid".into()),
            }),
        )
        .await;
        mock.set_places("offline", MockReply::TransportFailure("timeout".into()))
            .await;
        mock.set_geocode("unconfigured", MockReply::Unavailable).await;

        let resolver = LocationResolver::new(&mock);

        let err = resolver
            .resolve(&Location::Text("denied".into()), ResolveMode::Geocode)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ResolutionError::ProviderUnavailable {
                status: Some(ProviderStatus::RequestDenied),
                ..
            }
        ));

        let err = resolver
            .resolve(&Location::Text("offline".into()), ResolveMode::PlaceSearch)
            .await
            .unwrap_err();
        assert!(matches!(err, ResolutionError::TransportFailure(_)));

        let err = resolver
            .resolve(&Location::Text("unconfigured".into()), ResolveMode::Geocode)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ResolutionError::ProviderUnavailable { status: None, .. }
        ));
    }
}
