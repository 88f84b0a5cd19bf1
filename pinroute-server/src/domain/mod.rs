//! Domain types for the route comparison engine.
//!
//! This module contains the core value types shared by every layer:
//! validated coordinates, travel modes, pins, and the canonical route
//! model. Types that carry invariants enforce them at construction time,
//! so code that receives them can trust their validity.

mod geo;
mod location;
mod pin;
mod route;
mod travel_mode;

pub use geo::{GeoPoint, InvalidGeoPoint};
pub use location::Location;
pub use pin::{Pin, new_pin_id};
pub use route::{Fare, Leg, RouteSummary, Step, TransitDetail};
pub use travel_mode::{TravelMode, UnknownTravelMode};
