//! Per-mode route fetching.
//!
//! Issues one provider request per requested travel mode, concurrently,
//! and keeps each mode's outcome in its own slot so one failing mode never
//! affects another.

use std::future::Future;

use futures::future::join_all;

use crate::domain::{RouteSummary, TravelMode};
use crate::google::{DirectionsResponse, ProviderError, normalize};

use super::config::RoutingConfig;
use super::error::{ModeFailure, RouteModeError};
use super::request::{DirectionsQuery, RouteRequest};

/// Capability for requesting directions.
///
/// This abstraction allows the fetcher to be tested with mock data.
pub trait DirectionsProvider {
    /// Request directions for one mode.
    ///
    /// A response with a non-`OK` status is still `Ok` here.
    fn directions(
        &self,
        query: &DirectionsQuery,
    ) -> impl Future<Output = Result<DirectionsResponse, ProviderError>> + Send;
}

/// The outcome for one requested mode.
#[derive(Debug, Clone, PartialEq)]
pub struct ModeResult {
    pub mode: TravelMode,
    pub outcome: Result<RouteSummary, RouteModeError>,
}

/// Outcomes for every requested mode, in request order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FetchResults {
    results: Vec<ModeResult>,
}

impl FetchResults {
    pub fn new(results: Vec<ModeResult>) -> Self {
        Self { results }
    }

    /// All outcomes, in request order.
    pub fn iter(&self) -> impl Iterator<Item = &ModeResult> {
        self.results.iter()
    }

    /// Outcome for one mode, if it was requested.
    pub fn get(&self, mode: TravelMode) -> Option<&Result<RouteSummary, RouteModeError>> {
        self.results
            .iter()
            .find(|r| r.mode == mode)
            .map(|r| &r.outcome)
    }

    /// Successful routes, in request order.
    pub fn successes(&self) -> impl Iterator<Item = &RouteSummary> {
        self.results.iter().filter_map(|r| r.outcome.as_ref().ok())
    }

    /// Failed modes with their errors, in request order.
    pub fn failures(&self) -> Vec<ModeFailure> {
        self.results
            .iter()
            .filter_map(|r| {
                r.outcome.as_ref().err().map(|error| ModeFailure {
                    mode: r.mode,
                    error: error.clone(),
                })
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Fetches routes for every mode of a request.
pub struct RouteFetcher<'a, P> {
    provider: &'a P,
    config: &'a RoutingConfig,
}

impl<'a, P: DirectionsProvider + Sync> RouteFetcher<'a, P> {
    pub fn new(provider: &'a P, config: &'a RoutingConfig) -> Self {
        Self { provider, config }
    }

    /// Fetch all requested modes concurrently.
    ///
    /// Never fails as a whole; see [`FetchResults`] for per-mode outcomes.
    pub async fn fetch_all(&self, request: &RouteRequest) -> FetchResults {
        let fetches = request
            .modes()
            .iter()
            .map(|&mode| self.fetch_mode(request, mode));

        let results = join_all(fetches).await;
        FetchResults::new(results)
    }

    async fn fetch_mode(&self, request: &RouteRequest, mode: TravelMode) -> ModeResult {
        let query = request.query_for(mode, self.config);
        let outcome = self.request_route(&query).await;

        match &outcome {
            Ok(summary) => tracing::debug!(
                %mode,
                distance_meters = summary.distance_meters,
                duration_seconds = summary.duration_seconds,
                "route fetched"
            ),
            Err(error) => tracing::warn!(%mode, %error, "route fetch failed"),
        }

        ModeResult { mode, outcome }
    }

    async fn request_route(&self, query: &DirectionsQuery) -> Result<RouteSummary, RouteModeError> {
        let response = self.provider.directions(query).await?;

        if !response.status.is_ok() {
            return Err(RouteModeError::Status {
                status: response.status,
                detail: response.error_message,
            });
        }

        Ok(normalize(&response, query.mode)?)
    }
}
