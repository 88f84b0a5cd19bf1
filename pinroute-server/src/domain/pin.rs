//! User-placed map pins.

use serde::{Deserialize, Serialize};

use super::GeoPoint;

/// A pin dropped on the map, by click or by picking a search result.
///
/// Serialized flat as `{id, lat, lng, address}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pin {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Where the pin sits.
    #[serde(flatten)]
    pub location: GeoPoint,

    /// Address or label shown in the pin list.
    pub address: String,
}

impl Pin {
    /// Create a pin with a freshly generated id.
    pub fn new(location: GeoPoint, address: impl Into<String>) -> Self {
        Self {
            id: new_pin_id(),
            location,
            address: address.into(),
        }
    }

    /// Latitude of the pin.
    pub fn lat(&self) -> f64 {
        self.location.lat()
    }

    /// Longitude of the pin.
    pub fn lng(&self) -> f64 {
        self.location.lng()
    }
}

/// Generate a new unique pin id.
pub fn new_pin_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point() -> GeoPoint {
        GeoPoint::new(35.6586, 139.7454).unwrap()
    }

    #[test]
    fn new_pins_get_distinct_ids() {
        let a = Pin::new(point(), "東京タワー");
        let b = Pin::new(point(), "東京タワー");
        assert_ne!(a.id, b.id);
        assert!(!a.id.is_empty());
    }

    #[test]
    fn serializes_flat() {
        let pin = Pin {
            id: "p1".to_string(),
            location: point(),
            address: "Tokyo Tower".to_string(),
        };

        let json = serde_json::to_value(&pin).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "p1",
                "lat": 35.6586,
                "lng": 139.7454,
                "address": "Tokyo Tower",
            })
        );

        let back: Pin = serde_json::from_value(json).unwrap();
        assert_eq!(back, pin);
    }

    #[test]
    fn rejects_invalid_coordinates() {
        let json = serde_json::json!({"id": "p1", "lat": 200.0, "lng": 0.0, "address": "x"});
        assert!(serde_json::from_value::<Pin>(json).is_err());
    }
}
