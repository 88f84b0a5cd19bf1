//! Travel modes supported by the routing provider.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an unknown travel mode.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown travel mode: {0}")]
pub struct UnknownTravelMode(pub String);

/// A way of getting from one place to another.
///
/// Serialized with the provider's upper-case names (`"DRIVING"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TravelMode {
    Driving,
    Walking,
    Bicycling,
    Transit,
}

impl TravelMode {
    /// All modes, in the order the comparison form offers them.
    pub const ALL: [TravelMode; 4] = [
        TravelMode::Transit,
        TravelMode::Driving,
        TravelMode::Walking,
        TravelMode::Bicycling,
    ];

    /// Parse a mode name, case-insensitively.
    pub fn parse(s: &str) -> Result<Self, UnknownTravelMode> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DRIVING" => Ok(TravelMode::Driving),
            "WALKING" => Ok(TravelMode::Walking),
            "BICYCLING" => Ok(TravelMode::Bicycling),
            "TRANSIT" => Ok(TravelMode::Transit),
            _ => Err(UnknownTravelMode(s.to_string())),
        }
    }

    /// The upper-case provider name.
    pub fn as_str(&self) -> &'static str {
        match self {
            TravelMode::Driving => "DRIVING",
            TravelMode::Walking => "WALKING",
            TravelMode::Bicycling => "BICYCLING",
            TravelMode::Transit => "TRANSIT",
        }
    }

    /// The lower-case value of the Directions web service `mode` parameter.
    pub fn query_value(&self) -> &'static str {
        match self {
            TravelMode::Driving => "driving",
            TravelMode::Walking => "walking",
            TravelMode::Bicycling => "bicycling",
            TravelMode::Transit => "transit",
        }
    }

    /// Display label shown next to comparison entries.
    pub fn label(&self) -> &'static str {
        match self {
            TravelMode::Driving => "車",
            TravelMode::Walking => "徒歩",
            TravelMode::Bicycling => "自転車",
            TravelMode::Transit => "公共交通機関",
        }
    }

    /// Icon shown next to comparison entries.
    pub fn icon(&self) -> &'static str {
        match self {
            TravelMode::Driving => "🚗",
            TravelMode::Walking => "🚶",
            TravelMode::Bicycling => "🚴",
            TravelMode::Transit => "🚇",
        }
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(TravelMode::parse("DRIVING"), Ok(TravelMode::Driving));
        assert_eq!(TravelMode::parse("walking"), Ok(TravelMode::Walking));
        assert_eq!(TravelMode::parse(" Transit "), Ok(TravelMode::Transit));
        assert!(TravelMode::parse("FLYING").is_err());
    }

    #[test]
    fn parse_roundtrips_as_str() {
        for mode in TravelMode::ALL {
            assert_eq!(TravelMode::parse(mode.as_str()), Ok(mode));
        }
    }

    #[test]
    fn serde_uses_provider_names() {
        let json = serde_json::to_string(&TravelMode::Bicycling).unwrap();
        assert_eq!(json, "\"BICYCLING\"");

        let mode: TravelMode = serde_json::from_str("\"TRANSIT\"").unwrap();
        assert_eq!(mode, TravelMode::Transit);
    }

    #[test]
    fn query_values_are_lowercase() {
        for mode in TravelMode::ALL {
            assert_eq!(mode.query_value(), mode.as_str().to_ascii_lowercase());
        }
    }
}
