use std::sync::Arc;

use pinroute_server::cache::{CacheConfig, CachedMapsClient};
use pinroute_server::config::AppConfig;
use pinroute_server::google::{GoogleMapsClient, GoogleMapsConfig, MapsBackend, MockMapsProvider};
use pinroute_server::logging::{LoggingConfig, init_logging};
use pinroute_server::routing::RoutingConfig;
use pinroute_server::store::{FileStore, PinStore, RemoteMirror};
use pinroute_server::web::{AppState, create_router};

#[tokio::main]
async fn main() {
    init_logging(&LoggingConfig::from_env());

    let config = AppConfig::from_env().expect("Invalid configuration");

    let maps = match &config.mock_dir {
        Some(dir) => {
            let mock = MockMapsProvider::from_dir(dir).expect("Failed to load mock fixtures");
            tracing::info!(dir = %dir.display(), "using mock maps provider");
            MapsBackend::Mock(mock)
        }
        None => {
            if config.api_key.is_empty() {
                tracing::warn!("GOOGLE_MAPS_API_KEY not set. Provider calls will fail.");
            }
            let client = GoogleMapsClient::new(GoogleMapsConfig::new(&config.api_key))
                .expect("Failed to create Google Maps client");
            MapsBackend::Live(CachedMapsClient::new(client, &CacheConfig::default()))
        }
    };

    let mut store = PinStore::new(Arc::new(FileStore::new(&config.data_dir)));
    if let Some(dir) = &config.mirror_dir {
        tracing::info!(dir = %dir.display(), "mirroring store writes");
        store = store.with_mirror(RemoteMirror::new("file", Arc::new(FileStore::new(dir))));
    }

    let state = AppState::new(maps, store, RoutingConfig::default());
    let app = create_router(state);

    let addr = config.listen_addr;
    tracing::info!(
        %addr,
        data_dir = %config.data_dir.display(),
        "pinroute server listening"
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listen address");
    axum::serve(listener, app).await.expect("Server error");
}
