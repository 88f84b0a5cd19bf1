//! Google Maps web service client.
//!
//! This module provides an HTTP client for the Geocoding, Places Text
//! Search, Place Details, Place Photo and Directions services, a fixture-backed mock, and the
//! conversion from Directions responses to the canonical route model.
//!
//! Key characteristics of these services:
//! - Every response carries a top-level `status`; HTTP 200 with a non-`OK`
//!   status is the normal way of reporting "no result"
//! - Distances are meters and durations seconds, each paired with a
//!   localized display text
//! - Waypoint optimization reports the visiting order in `waypoint_order`

mod backend;
mod client;
mod convert;
mod error;
mod mock;
mod types;

pub use backend::MapsBackend;
pub use client::{GoogleMapsClient, GoogleMapsConfig, PhotoData};
pub use convert::{NormalizeError, normalize};
pub use error::ProviderError;
pub use mock::{MockMapsProvider, MockReply};
pub use types::{
    DayTime, DirectionsLeg, DirectionsResponse, DirectionsRoute, DirectionsStep, FareDto,
    GeocodeResponse, GeocodeResult, Geometry, LatLng, OpeningHoursDto, OpeningPeriod, PhotoDto,
    PlaceDetailsResponse, PlaceDetailsResult, PlaceResult, PlacesResponse, Polyline,
    ProviderStatus, ReviewDto, Stop, TextValue, TimeText, TransitDetailsDto, TransitLine, Vehicle,
};
