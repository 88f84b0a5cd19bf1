//! Canonical, provider-agnostic route model.
//!
//! Every distance and duration carries both the raw numeric value (meters,
//! seconds) and the display text the provider supplied. The text is never
//! recomputed from the number: provider text may use locale-specific units
//! and rounding.

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use super::TravelMode;

/// A fare quoted by the provider (transit routes only, and not everywhere).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fare {
    /// Amount in the currency's unit (e.g. yen).
    pub amount: f64,
    /// ISO 4217 currency code.
    pub currency_code: String,
    /// Display text, e.g. "¥200".
    pub text: String,
}

/// Public-transport details of a single step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitDetail {
    /// Short line name, falling back to the full name.
    pub line_name: String,
    pub departure_stop: String,
    pub arrival_stop: String,
    pub departure_time_text: String,
    pub arrival_time_text: String,
    pub num_stops: u32,
    pub headsign: Option<String>,
    /// Provider vehicle type, e.g. "SUBWAY", "BUS".
    pub vehicle_type: Option<String>,
}

/// One instruction-level segment within a leg.
///
/// Serializes with two derived fields, `instruction_text` and `icon`, so
/// clients need not strip markup or classify lines themselves.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Step {
    /// Instruction with the provider's inline markup left intact.
    pub instruction_html: String,
    pub distance_text: String,
    pub duration_text: String,
    pub mode: TravelMode,
    pub transit: Option<TransitDetail>,
}

impl Step {
    /// The instruction as plain text, with markup removed.
    pub fn instruction_text(&self) -> String {
        let mut text = String::with_capacity(self.instruction_html.len());
        let mut in_tag = false;
        for c in self.instruction_html.chars() {
            match c {
                '<' => in_tag = true,
                '>' if in_tag => in_tag = false,
                _ if !in_tag => text.push(c),
                _ => {}
            }
        }
        text.replace("&nbsp;", " ").replace("&amp;", "&")
    }

    /// Icon for the step list.
    ///
    /// Transit steps are classified by line name (JR and train lines, metro,
    /// buses); other steps use their travel mode.
    pub fn icon(&self) -> &'static str {
        if let Some(transit) = &self.transit {
            let line = transit.line_name.to_lowercase();
            if line.contains("jr") || line.contains("電車") {
                return "🚃";
            }
            if line.contains("地下鉄") || line.contains("metro") {
                return "🚇";
            }
            if line.contains("バス") {
                return "🚌";
            }
            return "🚉";
        }

        match self.mode {
            TravelMode::Walking => "🚶",
            TravelMode::Driving => "🚗",
            TravelMode::Bicycling => "🚴",
            TravelMode::Transit => "➡️",
        }
    }
}

impl Serialize for Step {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Step", 7)?;
        state.serialize_field("instruction_html", &self.instruction_html)?;
        state.serialize_field("instruction_text", &self.instruction_text())?;
        state.serialize_field("distance_text", &self.distance_text)?;
        state.serialize_field("duration_text", &self.duration_text)?;
        state.serialize_field("mode", &self.mode)?;
        state.serialize_field("icon", self.icon())?;
        state.serialize_field("transit", &self.transit)?;
        state.end()
    }
}

/// The portion of a route between two consecutive stops.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leg {
    pub start_address: String,
    pub end_address: String,
    pub distance_meters: u64,
    pub distance_text: String,
    pub duration_seconds: u64,
    pub duration_text: String,
    pub steps: Vec<Step>,
}

/// The normalized result of one route request for one travel mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSummary {
    pub mode: TravelMode,

    /// Total distance in meters, summed over all legs.
    pub distance_meters: u64,
    pub distance_text: String,

    /// Total duration in seconds, summed over all legs.
    pub duration_seconds: u64,
    pub duration_text: String,

    pub fare: Option<Fare>,

    /// Legs in the order the provider travels them.
    pub legs: Vec<Leg>,

    pub warnings: Vec<String>,

    /// Provider's visiting order of the interior waypoints, as indices into
    /// the request's waypoint list. Identity unless optimization reordered
    /// them.
    pub waypoint_order: Vec<usize>,

    /// Encoded overview polyline for the map surface.
    pub overview_polyline: Option<String>,

    pub copyrights: Option<String>,
}

impl RouteSummary {
    /// Total number of steps across all legs.
    pub fn step_count(&self) -> usize {
        self.legs.iter().map(|leg| leg.steps.len()).sum()
    }

    /// Iterate over every step of every leg, in travel order.
    pub fn steps(&self) -> impl Iterator<Item = &Step> {
        self.legs.iter().flat_map(|leg| leg.steps.iter())
    }

    /// Whether any step rides public transport.
    pub fn uses_transit(&self) -> bool {
        self.steps().any(|step| step.transit.is_some())
    }
}
