//! Multi-modal route comparison.
//!
//! This module implements the core of the engine: given an origin, a
//! destination and optional waypoints, fetch one route per travel mode,
//! normalize each, and assemble a comparison that survives some modes
//! failing.
//!
//! The pipeline is:
//! 1. [`RouteRequest`] validates the request locally (no network on error)
//! 2. [`RouteFetcher`] issues one provider request per mode, concurrently
//! 3. [`compare`] drops failed modes and derives sortable fields

mod compare;
mod config;
mod error;
mod fetch;
mod generation;
mod request;
mod sequence;


pub use compare::{Comparison, ComparisonEntry, PartialFailure, SortKey, compare};
pub use config::RoutingConfig;
pub use error::{CompareError, ModeFailure, RouteModeError, TRANSIT_CAVEAT, ValidationError};
pub use fetch::{DirectionsProvider, FetchResults, ModeResult, RouteFetcher};
pub use generation::{LatestResult, RequestGeneration, Ticket};
pub use request::{
    Departure, DirectionsQuery, MAX_ROUTE_POINTS, MAX_WAYPOINTS, RouteRequest, TransitOptions,
    Waypoint,
};
pub use sequence::{build_request, visit_order};

/// Fetch every requested mode and compare the results.
pub async fn compare_routes<P: DirectionsProvider + Sync>(
    provider: &P,
    config: &RoutingConfig,
    request: &RouteRequest,
) -> Result<Comparison, CompareError> {
    let results = RouteFetcher::new(provider, config).fetch_all(request).await;
    compare(&results)
}
