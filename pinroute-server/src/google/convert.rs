//! Conversion from Directions DTOs to the canonical route model.
//!
//! Only the primary route (index 0) is kept. Legs are kept in response
//! order and their raw meter/second values summed into the totals; display
//! text always comes from the provider.

use crate::domain::{Fare, Leg, RouteSummary, Step, TransitDetail, TravelMode};

use super::types::{DirectionsLeg, DirectionsResponse, DirectionsStep, FareDto, TransitDetailsDto};

/// Separator used when composing a total's text from several legs.
const LEG_TEXT_SEPARATOR: &str = " + ";

/// Error during DTO to domain conversion.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NormalizeError {
    /// The response contains no route at all
    #[error("response contains no routes")]
    NoRoutes,

    /// The primary route has no legs
    #[error("primary route contains no legs")]
    NoLegs,
}

/// Convert a Directions response into a [`RouteSummary`] for `mode`.
///
/// The caller is responsible for checking the response status first; this
/// only looks at the route payload.
pub fn normalize(
    raw: &DirectionsResponse,
    mode: TravelMode,
) -> Result<RouteSummary, NormalizeError> {
    let route = raw.routes.first().ok_or(NormalizeError::NoRoutes)?;

    if route.legs.is_empty() {
        return Err(NormalizeError::NoLegs);
    }

    let legs: Vec<Leg> = route.legs.iter().map(|leg| convert_leg(leg, mode)).collect();

    let distance_meters = route.legs.iter().map(|leg| leg.distance.value).sum();
    let duration_seconds = route.legs.iter().map(|leg| leg.duration.value).sum();

    let distance_text = join_texts(route.legs.iter().map(|leg| leg.distance.text.as_str()));
    let duration_text = join_texts(route.legs.iter().map(|leg| leg.duration.text.as_str()));

    // Fare is route-level in the web service, leg-level in some clients
    let fare = route
        .fare
        .as_ref()
        .or_else(|| route.legs[0].fare.as_ref())
        .map(convert_fare);

    Ok(RouteSummary {
        mode,
        distance_meters,
        distance_text,
        duration_seconds,
        duration_text,
        fare,
        legs,
        warnings: route.warnings.clone(),
        waypoint_order: route.waypoint_order.clone(),
        overview_polyline: route.overview_polyline.as_ref().map(|p| p.points.clone()),
        copyrights: route.copyrights.clone(),
    })
}

/// Compose a total's display text from per-leg texts.
///
/// A single leg's text is used verbatim.
fn join_texts<'a>(texts: impl Iterator<Item = &'a str>) -> String {
    texts.collect::<Vec<_>>().join(LEG_TEXT_SEPARATOR)
}

fn convert_leg(leg: &DirectionsLeg, route_mode: TravelMode) -> Leg {
    Leg {
        start_address: leg.start_address.clone(),
        end_address: leg.end_address.clone(),
        distance_meters: leg.distance.value,
        distance_text: leg.distance.text.clone(),
        duration_seconds: leg.duration.value,
        duration_text: leg.duration.text.clone(),
        steps: leg
            .steps
            .iter()
            .map(|step| convert_step(step, route_mode))
            .collect(),
    }
}

/// Convert one step. Unknown step modes fall back to the route's mode.
fn convert_step(step: &DirectionsStep, route_mode: TravelMode) -> Step {
    let mode = step
        .travel_mode
        .as_deref()
        .and_then(|m| TravelMode::parse(m).ok())
        .unwrap_or(route_mode);

    Step {
        instruction_html: step.html_instructions.clone(),
        distance_text: step.distance.text.clone(),
        duration_text: step.duration.text.clone(),
        mode,
        transit: step.transit_details.as_ref().map(convert_transit),
    }
}

fn convert_transit(details: &TransitDetailsDto) -> TransitDetail {
    let line_name = details
        .line
        .short_name
        .as_deref()
        .filter(|s| !s.is_empty())
        .or(details.line.name.as_deref())
        .unwrap_or_default()
        .to_string();

    TransitDetail {
        line_name,
        departure_stop: details.departure_stop.name.clone(),
        arrival_stop: details.arrival_stop.name.clone(),
        departure_time_text: details.departure_time.text.clone(),
        arrival_time_text: details.arrival_time.text.clone(),
        num_stops: details.num_stops,
        headsign: details.headsign.clone(),
        vehicle_type: details
            .line
            .vehicle
            .as_ref()
            .and_then(|v| v.vehicle_type.clone()),
    }
}

fn convert_fare(fare: &FareDto) -> Fare {
    Fare {
        amount: fare.value,
        currency_code: fare.currency.clone(),
        text: fare.text.clone(),
    }
}
