//! Route requests and their per-mode provider queries.

use chrono::{DateTime, Utc};

use crate::domain::{GeoPoint, Location, TravelMode};

use super::config::RoutingConfig;
use super::error::ValidationError;

/// Most points one provider request may contain, origin and destination included.
pub const MAX_ROUTE_POINTS: usize = 25;

/// Most intermediate waypoints one provider request may contain.
pub const MAX_WAYPOINTS: usize = MAX_ROUTE_POINTS - 2;

/// An intermediate point on a route.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    pub location: GeoPoint,

    /// Whether the route must stop here, rather than merely pass by.
    pub stopover: bool,
}

impl Waypoint {
    /// A mandatory stop.
    pub fn stopover(location: GeoPoint) -> Self {
        Self {
            location,
            stopover: true,
        }
    }

    /// A point the route passes through without stopping.
    pub fn pass_through(location: GeoPoint) -> Self {
        Self {
            location,
            stopover: false,
        }
    }
}

/// A validated request to compare routes across travel modes.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteRequest {
    origin: Location,
    destination: Location,
    modes: Vec<TravelMode>,
    waypoints: Vec<Waypoint>,
    optimize_waypoints: bool,
    departure: Departure,
}

impl RouteRequest {
    /// Create a request, validating it locally.
    ///
    /// Duplicate modes are collapsed, keeping the first occurrence; the
    /// order of `modes` is the display order of the comparison.
    pub fn new(
        origin: Location,
        destination: Location,
        modes: impl IntoIterator<Item = TravelMode>,
        waypoints: Vec<Waypoint>,
        optimize_waypoints: bool,
    ) -> Result<Self, ValidationError> {
        let origin = origin.normalized();
        let destination = destination.normalized();

        if origin.is_blank() {
            return Err(ValidationError::EmptyEndpoint("origin"));
        }
        if destination.is_blank() {
            return Err(ValidationError::EmptyEndpoint("destination"));
        }

        if waypoints.len() > MAX_WAYPOINTS {
            return Err(ValidationError::TooManyWaypoints {
                count: waypoints.len() + 2,
                max: MAX_ROUTE_POINTS,
            });
        }

        let mut unique = Vec::new();
        for mode in modes {
            if !unique.contains(&mode) {
                unique.push(mode);
            }
        }

        Ok(Self {
            origin,
            destination,
            modes: unique,
            waypoints,
            optimize_waypoints,
            departure: Departure::Now,
        })
    }

    /// A point-to-point request without waypoints.
    pub fn direct(
        origin: Location,
        destination: Location,
        modes: impl IntoIterator<Item = TravelMode>,
    ) -> Result<Self, ValidationError> {
        Self::new(origin, destination, modes, Vec::new(), false)
    }

    pub fn origin(&self) -> &Location {
        &self.origin
    }

    pub fn destination(&self) -> &Location {
        &self.destination
    }

    /// Requested modes, in request order.
    pub fn modes(&self) -> &[TravelMode] {
        &self.modes
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn optimize_waypoints(&self) -> bool {
        self.optimize_waypoints
    }

    /// Depart transit journeys at `at` instead of now. Other modes ignore it.
    pub fn departing_at(mut self, at: DateTime<Utc>) -> Self {
        self.departure = Departure::At(at);
        self
    }

    /// Build the provider query for one mode.
    ///
    /// Optimization is only requested when there are at least two
    /// waypoints to reorder. Transit queries depart now unless a departure
    /// time was set.
    pub fn query_for(&self, mode: TravelMode, config: &RoutingConfig) -> DirectionsQuery {
        let transit = (mode == TravelMode::Transit).then(|| TransitOptions {
            departure: self.departure,
            vehicle_modes: config.transit_modes.clone(),
            routing_preference: config.transit_routing_preference.clone(),
        });

        DirectionsQuery {
            origin: self.origin.clone(),
            destination: self.destination.clone(),
            waypoints: self.waypoints.clone(),
            optimize_waypoints: self.optimize_waypoints && self.waypoints.len() >= 2,
            mode,
            language: config.language.clone(),
            region: config.region.clone(),
            transit,
        }
    }
}

/// When a transit journey should depart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Departure {
    Now,
    At(DateTime<Utc>),
}

/// Transit-only request options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitOptions {
    pub departure: Departure,
    pub vehicle_modes: Vec<String>,
    pub routing_preference: String,
}

/// One provider request: a route request narrowed to a single mode.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionsQuery {
    pub origin: Location,
    pub destination: Location,
    pub waypoints: Vec<Waypoint>,
    pub optimize_waypoints: bool,
    pub mode: TravelMode,
    pub language: String,
    pub region: String,
    pub transit: Option<TransitOptions>,
}
