//! Route requests built from an ordered pin list.
//!
//! The first pin is the origin, the last the destination, and every pin in
//! between a stopover. When the provider optimizes the interior order, the
//! returned `waypoint_order` is mapped back to pin positions.

use crate::domain::{Location, Pin, TravelMode};

use super::error::ValidationError;
use super::request::{MAX_ROUTE_POINTS, RouteRequest, Waypoint};

/// Build a single-mode route request visiting `pins` in order.
pub fn build_request(
    pins: &[Pin],
    mode: TravelMode,
    optimize: bool,
) -> Result<RouteRequest, ValidationError> {
    let (first, last) = match pins {
        [first, .., last] => (first, last),
        _ => {
            return Err(ValidationError::InsufficientWaypoints { count: pins.len() });
        }
    };

    if pins.len() > MAX_ROUTE_POINTS {
        return Err(ValidationError::TooManyWaypoints {
            count: pins.len(),
            max: MAX_ROUTE_POINTS,
        });
    }

    let waypoints = pins[1..pins.len() - 1]
        .iter()
        .map(|pin| Waypoint::stopover(pin.location))
        .collect();

    RouteRequest::new(
        Location::Point(first.location),
        Location::Point(last.location),
        [mode],
        waypoints,
        optimize,
    )
}

/// Order in which the pins are visited, as indices into the pin list.
///
/// `waypoint_order` indexes the interior pins. Anything that is not a
/// permutation of them (including an empty order) means input order.
pub fn visit_order(pin_count: usize, waypoint_order: &[usize]) -> Vec<usize> {
    if pin_count < 2 {
        return (0..pin_count).collect();
    }

    let interior = pin_count - 2;
    let mut order = Vec::with_capacity(pin_count);
    order.push(0);

    if is_permutation(waypoint_order, interior) {
        order.extend(waypoint_order.iter().map(|i| i + 1));
    } else {
        order.extend(1..=interior);
    }

    order.push(pin_count - 1);
    order
}

fn is_permutation(order: &[usize], len: usize) -> bool {
    if order.len() != len {
        return false;
    }
    let mut seen = vec![false; len];
    for &i in order {
        if i >= len || seen[i] {
            return false;
        }
        seen[i] = true;
    }
    true
}
