//! Server configuration from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

/// Default directory for the pin store.
pub const DEFAULT_DATA_DIR: &str = "data/store";

/// Default listen address.
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:3000";

/// Error returned for an unusable configuration value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {name}: {message}")]
pub struct ConfigError {
    pub name: &'static str,
    pub message: String,
}

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Google Maps API key (`GOOGLE_MAPS_API_KEY`); empty when unset
    pub api_key: String,

    /// Pin store directory (`PINROUTE_DATA_DIR`)
    pub data_dir: PathBuf,

    /// Listen address (`PINROUTE_LISTEN_ADDR`)
    pub listen_addr: SocketAddr,

    /// Serve fixtures from this directory instead of calling Google
    /// (`PINROUTE_MOCK_DIR`)
    pub mock_dir: Option<PathBuf>,

    /// Mirror store writes to this directory (`PINROUTE_MIRROR_DIR`)
    pub mirror_dir: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let listen_addr = non_empty("PINROUTE_LISTEN_ADDR")
            .unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string());
        let listen_addr = listen_addr.trim().parse::<SocketAddr>().map_err(|e| ConfigError {
            name: "PINROUTE_LISTEN_ADDR",
            message: format!("{listen_addr:?}: {e}"),
        })?;

        Ok(Self {
            api_key: non_empty("GOOGLE_MAPS_API_KEY").unwrap_or_default(),
            data_dir: non_empty("PINROUTE_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
            listen_addr,
            mock_dir: non_empty("PINROUTE_MOCK_DIR").map(PathBuf::from),
            mirror_dir: non_empty("PINROUTE_MIRROR_DIR").map(PathBuf::from),
        })
    }
}
