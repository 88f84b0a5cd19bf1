//! Application state for the web layer.

use std::sync::Arc;

use crate::google::MapsBackend;
use crate::routing::{LatestResult, RoutingConfig};
use crate::store::PinStore;

use super::dto::PinRoute;

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Maps provider (live or mock)
    pub maps: Arc<MapsBackend>,

    /// Pins and histories
    pub store: Arc<PinStore>,

    /// Route request configuration
    pub routing: Arc<RoutingConfig>,

    /// Most recent route through the pins
    pub latest_route: Arc<LatestResult<PinRoute>>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(maps: MapsBackend, store: PinStore, routing: RoutingConfig) -> Self {
        Self {
            maps: Arc::new(maps),
            store: Arc::new(store),
            routing: Arc::new(routing),
            latest_route: Arc::new(LatestResult::new()),
        }
    }
}
