//! Routing configuration.

/// Vehicle types requested for transit routes.
const DEFAULT_TRANSIT_MODES: [&str; 4] = ["bus", "rail", "subway", "train"];

/// Configuration parameters for route requests.
#[derive(Debug, Clone)]
pub struct RoutingConfig {
    /// Language for instructions and display text.
    pub language: String,

    /// Region bias (ccTLD).
    pub region: String,

    /// Vehicle types allowed for transit routes.
    pub transit_modes: Vec<String>,

    /// Transit routing preference.
    pub transit_routing_preference: String,
}

impl RoutingConfig {
    /// Create a new configuration with the given language and region.
    pub fn new(language: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            region: region.into(),
            ..Self::default()
        }
    }

    /// Set the transit routing preference.
    pub fn with_transit_routing_preference(mut self, preference: impl Into<String>) -> Self {
        self.transit_routing_preference = preference.into();
        self
    }

    /// Set the allowed transit vehicle types.
    pub fn with_transit_modes<I, S>(mut self, modes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.transit_modes = modes.into_iter().map(Into::into).collect();
        self
    }
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            language: "ja".to_string(),
            region: "jp".to_string(),
            transit_modes: DEFAULT_TRANSIT_MODES.iter().map(|m| m.to_string()).collect(),
            transit_routing_preference: "fewer_transfers".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = RoutingConfig::default();

        assert_eq!(config.language, "ja");
        assert_eq!(config.region, "jp");
        assert_eq!(config.transit_modes, vec!["bus", "rail", "subway", "train"]);
        assert_eq!(config.transit_routing_preference, "fewer_transfers");
    }

    #[test]
    fn custom_config() {
        let config = RoutingConfig::new("en", "uk")
            .with_transit_routing_preference("less_walking")
            .with_transit_modes(["rail"]);

        assert_eq!(config.language, "en");
        assert_eq!(config.region, "uk");
        assert_eq!(config.transit_modes, vec!["rail"]);
        assert_eq!(config.transit_routing_preference, "less_walking");
    }
}
