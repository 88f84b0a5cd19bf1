//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{delete, get, post},
};

use crate::domain::{GeoPoint, Pin};
use crate::resolve::{LocationResolver, PlaceDetail, Resolution, ResolutionError, place_details};
use crate::routing::{
    CompareError, RouteRequest, ValidationError, build_request, compare_routes, visit_order,
};
use crate::store::{ExportBundle, ImportSummary, PinHistoryEntry, SearchHistoryEntry, StoreError};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/locations/resolve", post(resolve_location))
        .route("/api/places/:place_id", get(place_detail))
        .route("/api/photos/:reference", get(place_photo))
        .route("/api/routes/compare", post(compare_route_modes))
        .route("/api/pins/route", post(route_pins))
        .route("/api/pins/route/latest", get(latest_pin_route))
        .route("/api/pins", get(list_pins).post(add_pin).delete(clear_pins))
        .route("/api/pins/:id", delete(delete_pin))
        .route("/api/history", delete(clear_history))
        .route("/api/history/pins", get(pin_history))
        .route("/api/history/pins/:timestamp", delete(delete_pin_history))
        .route("/api/history/searches", get(search_history))
        .route(
            "/api/history/searches/:timestamp",
            delete(delete_search_history),
        )
        .route("/api/export", get(export))
        .route("/api/import", post(import))
        .route("/api/data", delete(clear_all))
        .with_state(state)
}

/// Health check endpoint.
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        provider: state.maps.name(),
        configured: state.maps.is_configured(),
        cached_responses: state.maps.cached_responses(),
    })
}

/// Resolve a query to coordinates, recording the search.
async fn resolve_location(
    State(state): State<AppState>,
    Json(req): Json<ResolveLocationRequest>,
) -> Result<Json<Resolution>, AppError> {
    let resolver = LocationResolver::new(state.maps.as_ref()).with_recorder(state.store.as_ref());
    let resolution = resolver.resolve(&req.query, req.mode).await?;
    Ok(Json(resolution))
}

/// Details of one place, with each photo linked through [`place_photo`].
async fn place_detail(
    State(state): State<AppState>,
    Path(place_id): Path<String>,
) -> Result<Json<PlaceDetail>, AppError> {
    let mut detail = place_details(state.maps.as_ref(), &place_id).await?;
    for photo in &mut detail.photos {
        photo.url = Some(format!(
            "/api/photos/{}?maxwidth={DEFAULT_PHOTO_WIDTH}",
            photo.reference
        ));
    }
    Ok(Json(detail))
}

/// Proxy a place photo so the API key stays on the server.
async fn place_photo(
    State(state): State<AppState>,
    Path(reference): Path<String>,
    Query(query): Query<PhotoQuery>,
) -> Result<impl IntoResponse, AppError> {
    let photo = state
        .maps
        .place_photo(&reference, query.maxwidth)
        .await
        .map_err(ResolutionError::from)?;
    Ok(([(header::CONTENT_TYPE, photo.content_type)], photo.bytes))
}

/// Compare routes between two locations across travel modes.
async fn compare_route_modes(
    State(state): State<AppState>,
    Json(req): Json<CompareRoutesRequest>,
) -> Result<Json<CompareRoutesResponse>, AppError> {
    let waypoints = req
        .waypoints
        .iter()
        .map(WaypointInput::to_waypoint)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| AppError::BadRequest {
            message: format!("Invalid waypoint: {e}"),
        })?;

    let mut request = RouteRequest::new(
        req.origin,
        req.destination,
        req.modes,
        waypoints,
        req.optimize_waypoints,
    )?;
    if let Some(at) = req.departure_time {
        request = request.departing_at(at);
    }

    let comparison = compare_routes(state.maps.as_ref(), &state.routing, &request)
        .await?
        .sorted_by(req.sort);

    Ok(Json(CompareRoutesResponse::from_comparison(comparison)))
}

/// Route through the stored pins in one travel mode.
///
/// Only the newest request publishes its route as the latest. The ticket is
/// taken before the pins are read, so a pin change at any point after the
/// read invalidates it.
async fn route_pins(
    State(state): State<AppState>,
    Json(req): Json<PinRouteRequest>,
) -> Result<Json<PinRouteResponse>, AppError> {
    let ticket = state.latest_route.begin();
    let pins = state.store.pins();
    let request = build_request(&pins, req.travel_mode, req.optimize)?;

    let comparison = compare_routes(state.maps.as_ref(), &state.routing, &request).await?;
    let entry = comparison
        .entries
        .into_iter()
        .next()
        .ok_or_else(|| AppError::Internal {
            message: "comparison succeeded without a route".to_string(),
        })?;

    let order = visit_order(pins.len(), &entry.summary.waypoint_order);
    let route = PinRoute {
        generation: ticket.value(),
        travel_mode: req.travel_mode,
        pins: order.iter().map(|&i| pins[i].clone()).collect(),
        visit_order: order,
        route: entry,
    };

    let published = state.latest_route.publish(ticket, route.clone()).await;
    Ok(Json(PinRouteResponse { route, published }))
}

/// The most recently published pin route.
async fn latest_pin_route(State(state): State<AppState>) -> Result<Json<PinRoute>, AppError> {
    state
        .latest_route
        .latest()
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound {
            message: "ルートはまだ計算されていません".to_string(),
        })
}

async fn list_pins(State(state): State<AppState>) -> Json<PinListResponse> {
    Json(PinListResponse {
        pins: state.store.pins(),
    })
}

async fn add_pin(
    State(state): State<AppState>,
    Json(req): Json<NewPinRequest>,
) -> Result<(StatusCode, Json<Pin>), AppError> {
    let location = GeoPoint::new(req.lat, req.lng).map_err(|e| AppError::BadRequest {
        message: format!("Invalid pin: {e}"),
    })?;

    // Default the label to the coordinates, as a map click does
    let address = match req.address.trim() {
        "" => location.to_string(),
        address => address.to_string(),
    };

    let pin = state.store.add_pin(location, address)?;
    state.latest_route.clear().await;
    Ok((StatusCode::CREATED, Json(pin)))
}

async fn delete_pin(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Pin>, AppError> {
    let pin = state.store.delete_pin(&id)?;
    state.latest_route.clear().await;
    Ok(Json(pin))
}

async fn clear_pins(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.store.clear_pins()?;
    state.latest_route.clear().await;
    Ok(StatusCode::NO_CONTENT)
}

async fn pin_history(State(state): State<AppState>) -> Json<Vec<PinHistoryEntry>> {
    Json(state.store.pin_history())
}

async fn delete_pin_history(
    State(state): State<AppState>,
    Path(timestamp): Path<i64>,
) -> Result<Json<RemovedResponse>, AppError> {
    let removed = state.store.delete_pin_history(timestamp)?;
    Ok(Json(RemovedResponse { removed }))
}

async fn search_history(State(state): State<AppState>) -> Json<Vec<SearchHistoryEntry>> {
    Json(state.store.search_history())
}

async fn delete_search_history(
    State(state): State<AppState>,
    Path(timestamp): Path<i64>,
) -> Result<Json<RemovedResponse>, AppError> {
    let removed = state.store.delete_search_history(timestamp)?;
    Ok(Json(RemovedResponse { removed }))
}

async fn clear_history(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.store.clear_history()?;
    Ok(StatusCode::NO_CONTENT)
}

/// Remove pins and both histories.
async fn clear_all(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.store.clear_all()?;
    state.latest_route.clear().await;
    Ok(StatusCode::NO_CONTENT)
}

async fn export(State(state): State<AppState>) -> Json<ExportBundle> {
    Json(state.store.export())
}

async fn import(
    State(state): State<AppState>,
    Json(value): Json<serde_json::Value>,
) -> Result<Json<ImportSummary>, AppError> {
    let summary = state.store.import(value)?;
    if summary.pins.is_some() {
        state.latest_route.clear().await;
    }
    Ok(Json(summary))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    NoRoute { message: String },
    Unavailable { message: String },
    Upstream { message: String },
    Internal { message: String },
}

impl From<ValidationError> for AppError {
    fn from(e: ValidationError) -> Self {
        AppError::BadRequest {
            message: e.user_message(),
        }
    }
}

impl From<CompareError> for AppError {
    fn from(e: CompareError) -> Self {
        match e {
            CompareError::NoModesRequested => AppError::BadRequest {
                message: e.guidance(),
            },
            CompareError::AllModesFailed { .. } => AppError::NoRoute {
                message: e.guidance(),
            },
        }
    }
}

impl From<ResolutionError> for AppError {
    fn from(e: ResolutionError) -> Self {
        let message = e.user_message().to_string();
        match e {
            ResolutionError::ZeroResults { .. } => AppError::NotFound { message },
            ResolutionError::ProviderUnavailable { reason, .. } => {
                tracing::warn!(%reason, "search provider unavailable");
                AppError::Unavailable { message }
            }
            ResolutionError::TransportFailure(reason) => {
                tracing::warn!(%reason, "search request failed");
                AppError::Upstream { message }
            }
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::PinNotFound(_) => AppError::NotFound {
                message: e.to_string(),
            },
            e if e.is_client_error() => AppError::BadRequest {
                message: e.to_string(),
            },
            e => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl AppError {
    fn parts(self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, "bad_request", message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, "not_found", message),
            AppError::NoRoute { message } => {
                (StatusCode::UNPROCESSABLE_ENTITY, "no_route", message)
            }
            AppError::Unavailable { message } => {
                (StatusCode::SERVICE_UNAVAILABLE, "provider_unavailable", message)
            }
            AppError::Upstream { message } => {
                (StatusCode::BAD_GATEWAY, "upstream_failure", message)
            }
            AppError::Internal { message } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal", message)
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, error, message) = self.parts();

        if status.is_server_error() {
            tracing::error!(%status, error, %message, "request failed");
        } else {
            tracing::debug!(%status, error, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error, message });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::{Body, to_bytes};
    use axum::http::{Method, Request};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::cache::{CacheConfig, CachedMapsClient};
    use crate::domain::TravelMode;
    use crate::google::{GoogleMapsClient, GoogleMapsConfig, MapsBackend, MockMapsProvider};
    use crate::routing::{Departure, RoutingConfig, TRANSIT_CAVEAT};
    use crate::store::{MemoryStore, PinStore};

    fn state_with(maps: MapsBackend) -> AppState {
        AppState::new(
            maps,
            PinStore::new(Arc::new(MemoryStore::new())),
            RoutingConfig::default(),
        )
    }

    fn mock_state() -> AppState {
        state_with(MapsBackend::Mock(
            MockMapsProvider::from_dir("data/mock").unwrap(),
        ))
    }

    async fn send(
        state: &AppState,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = create_router(state.clone()).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn health_reports_provider() {
        let state = mock_state();
        let (status, body) = send(&state, Method::GET, "/health", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["provider"], "mock");
        assert_eq!(body["configured"], true);
        assert!(body.get("cached_responses").is_none());
    }

    #[tokio::test]
    async fn health_reports_live_cache_size() {
        let client = GoogleMapsClient::new(GoogleMapsConfig::new("key")).unwrap();
        let state = state_with(MapsBackend::Live(CachedMapsClient::new(
            client,
            &CacheConfig::default(),
        )));

        let (_, body) = send(&state, Method::GET, "/health", None).await;
        assert_eq!(body["provider"], "google");
        assert_eq!(body["cached_responses"], 0);
    }

    #[tokio::test]
    async fn place_details_link_photos_through_server() {
        let state = mock_state();
        let (status, body) = send(&state, Method::GET, "/api/places/ChIJrameni1", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "六厘舎 東京駅");
        assert_eq!(body["opening_hours"]["is_open_now"], true);
        assert_eq!(body["reviews"].as_array().unwrap().len(), 5);
        assert_eq!(body["reviews"][0]["author_name"], "伊藤");
        assert_eq!(body["photos"][0]["url"], "/api/photos/AUc7tXrameni1a?maxwidth=400");
        // Nothing in the body leaks a provider key
        assert!(!body.to_string().contains("key="));
    }

    #[tokio::test]
    async fn unknown_place_is_not_found() {
        let state = mock_state();
        let (status, body) = send(&state, Method::GET, "/api/places/ChIJnowhere", None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "not_found");
    }

    #[tokio::test]
    async fn photos_unavailable_without_live_provider() {
        let state = mock_state();
        let (status, body) = send(
            &state,
            Method::GET,
            "/api/photos/AUc7tXrameni1a?maxwidth=800",
            None,
        )
        .await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"], "provider_unavailable");
    }

    #[tokio::test]
    async fn resolve_records_search_history() {
        let state = mock_state();
        let (status, body) = send(
            &state,
            Method::POST,
            "/api/locations/resolve",
            Some(json!({"query": "東京駅"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["kind"], "single");
        assert_eq!(body["location"]["point"]["lat"], 35.6812362);

        let (_, history) = send(&state, Method::GET, "/api/history/searches", None).await;
        assert_eq!(history.as_array().unwrap().len(), 1);
        assert_eq!(history[0]["query"], "東京駅");
        assert_eq!(history[0]["type"], "geocode");
    }

    #[tokio::test]
    async fn resolve_point_skips_history() {
        let state = mock_state();
        let (status, body) = send(
            &state,
            Method::POST,
            "/api/locations/resolve",
            Some(json!({"query": {"lat": 35.6586, "lng": 139.7454}})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["location"]["point"]["lng"], 139.7454);
        assert!(state.store.search_history().is_empty());
    }

    #[tokio::test]
    async fn resolve_zero_results_is_not_found() {
        let state = mock_state();
        let (status, body) = send(
            &state,
            Method::POST,
            "/api/locations/resolve",
            Some(json!({"query": "存在しない場所"})),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "not_found");
    }

    #[tokio::test]
    async fn resolve_without_api_key_is_unavailable() {
        let client = GoogleMapsClient::new(GoogleMapsConfig::new("")).unwrap();
        let state = state_with(MapsBackend::Live(CachedMapsClient::new(
            client,
            &CacheConfig::default(),
        )));

        let (status, body) = send(
            &state,
            Method::POST,
            "/api/locations/resolve",
            Some(json!({"query": "東京駅"})),
        )
        .await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"], "provider_unavailable");
    }

    #[tokio::test]
    async fn compare_driving_and_walking() {
        let state = mock_state();
        let (status, body) = send(
            &state,
            Method::POST,
            "/api/routes/compare",
            Some(json!({
                "origin": "東京タワー",
                "destination": "東京駅",
                "modes": ["DRIVING", "WALKING"]
            })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let entries = body["entries"].as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["mode"], "DRIVING");
        assert_eq!(entries[0]["distance_km"], 4.4);
        assert_eq!(entries[0]["duration_minutes"], 14);
        assert_eq!(entries[1]["mode"], "WALKING");
        assert!(body.get("partial_failure").is_none());

        assert_eq!(entries[0]["uses_transit"], false);
        let steps = entries[0]["legs"][0]["steps"].as_array().unwrap();
        assert_eq!(entries[0]["step_count"], steps.len());
        assert_eq!(steps[0]["instruction_text"], "北東に進む");
        assert_eq!(steps[0]["icon"], "🚗");
    }

    #[tokio::test]
    async fn compare_with_departure_time() {
        let mock = MockMapsProvider::from_dir("data/mock").unwrap();
        let state = state_with(MapsBackend::Mock(mock.clone()));

        let (status, _) = send(
            &state,
            Method::POST,
            "/api/routes/compare",
            Some(json!({
                "origin": "東京タワー",
                "destination": "東京駅",
                "modes": ["TRANSIT"],
                "departure_time": "2026-04-01T09:30:00+09:00"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let queries = mock.directions_queries().await;
        let departure = queries[0].transit.as_ref().unwrap().departure;
        let Departure::At(at) = departure else {
            panic!("expected a scheduled departure, got {departure:?}");
        };
        assert_eq!(at.timestamp(), 1775003400);
    }

    #[tokio::test]
    async fn compare_without_modes_is_bad_request() {
        let state = mock_state();
        let (status, _) = send(
            &state,
            Method::POST,
            "/api/routes/compare",
            Some(json!({"origin": "A", "destination": "B", "modes": []})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn compare_all_failed_gives_guidance() {
        let state = state_with(MapsBackend::Mock(MockMapsProvider::new()));
        let (status, body) = send(
            &state,
            Method::POST,
            "/api/routes/compare",
            Some(json!({"origin": "A", "destination": "B", "modes": ["TRANSIT"]})),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "no_route");
        assert!(body["message"].as_str().unwrap().contains(TRANSIT_CAVEAT));
    }

    #[tokio::test]
    async fn pin_lifecycle_and_routing() {
        let state = mock_state();

        let (status, tower) = send(
            &state,
            Method::POST,
            "/api/pins",
            Some(json!({"lat": 35.6586, "lng": 139.7454, "address": "東京タワー"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        send(
            &state,
            Method::POST,
            "/api/pins",
            Some(json!({"lat": 35.6812, "lng": 139.7671})),
        )
        .await;

        let (_, list) = send(&state, Method::GET, "/api/pins", None).await;
        let pins = list["pins"].as_array().unwrap();
        assert_eq!(pins.len(), 2);
        assert_eq!(pins[1]["address"], "35.6812,139.7671");

        let (status, route) = send(
            &state,
            Method::POST,
            "/api/pins/route",
            Some(json!({"travel_mode": "DRIVING"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(route["published"], true);
        assert_eq!(route["visit_order"], json!([0, 1]));
        assert_eq!(route["pins"][0]["id"], tower["id"]);

        let (status, latest) = send(&state, Method::GET, "/api/pins/route/latest", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(latest["generation"], route["generation"]);

        let uri = format!("/api/pins/{}", tower["id"].as_str().unwrap());
        let (status, _) = send(&state, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(&state, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        // Changing the pins drops the published route
        let (status, _) = send(&state, Method::GET, "/api/pins/route/latest", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, history) = send(&state, Method::GET, "/api/history/pins", None).await;
        assert_eq!(history.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn pin_change_while_routing_discards_route() {
        let mock = MockMapsProvider::from_dir("data/mock").unwrap();
        mock.set_delay(TravelMode::Driving, Duration::from_millis(200)).await;
        let state = state_with(MapsBackend::Mock(mock));
        state
            .store
            .add_pin(GeoPoint::new(35.6586, 139.7454).unwrap(), "東京タワー")
            .unwrap();
        state
            .store
            .add_pin(GeoPoint::new(35.6812, 139.7671).unwrap(), "東京駅")
            .unwrap();

        let in_flight = tokio::spawn({
            let state = state.clone();
            async move {
                send(
                    &state,
                    Method::POST,
                    "/api/pins/route",
                    Some(json!({"travel_mode": "DRIVING"})),
                )
                .await
            }
        });

        tokio::time::sleep(Duration::from_millis(50)).await;
        let (status, _) = send(
            &state,
            Method::POST,
            "/api/pins",
            Some(json!({"lat": 35.6717, "lng": 139.7650, "address": "銀座"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, route) = in_flight.await.unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(route["published"], false);

        let (status, _) = send(&state, Method::GET, "/api/pins/route/latest", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn route_request_taken_after_pin_change_publishes() {
        let state = mock_state();
        state
            .store
            .add_pin(GeoPoint::new(35.6586, 139.7454).unwrap(), "東京タワー")
            .unwrap();
        state
            .store
            .add_pin(GeoPoint::new(35.6812, 139.7671).unwrap(), "東京駅")
            .unwrap();

        // A stale ticket from before the change must not block the new route.
        let stale = state.latest_route.begin();
        state.latest_route.clear().await;

        let (status, route) = send(
            &state,
            Method::POST,
            "/api/pins/route",
            Some(json!({"travel_mode": "DRIVING"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(route["published"], true);
        assert!(route["generation"].as_u64().unwrap() > stale.value());
    }

    #[tokio::test]
    async fn pin_route_needs_two_pins() {
        let state = mock_state();
        send(
            &state,
            Method::POST,
            "/api/pins",
            Some(json!({"lat": 35.6586, "lng": 139.7454})),
        )
        .await;

        let (status, body) = send(
            &state,
            Method::POST,
            "/api/pins/route",
            Some(json!({"travel_mode": "WALKING"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "ルート計算には最低2つのピンが必要です");
    }

    #[tokio::test]
    async fn invalid_pin_is_rejected() {
        let state = mock_state();
        let (status, _) = send(
            &state,
            Method::POST,
            "/api/pins",
            Some(json!({"lat": 135.0, "lng": 0.0})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn history_deletion_by_timestamp() {
        let state = mock_state();
        let pin = state
            .store
            .add_pin(GeoPoint::new(35.0, 139.0).unwrap(), "A")
            .unwrap();
        let timestamp = state.store.pin_history()[0].timestamp;

        let uri = format!("/api/history/pins/{timestamp}");
        let (status, body) = send(&state, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["removed"], 1);

        let (status, _) = send(&state, Method::DELETE, "/api/history", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(state.store.pins(), vec![pin]);
    }

    #[tokio::test]
    async fn clear_all_data() {
        let state = mock_state();
        state
            .store
            .add_pin(GeoPoint::new(35.6586, 139.7454).unwrap(), "東京タワー")
            .unwrap();
        state
            .store
            .add_pin(GeoPoint::new(35.6812, 139.7671).unwrap(), "東京駅")
            .unwrap();
        send(
            &state,
            Method::POST,
            "/api/locations/resolve",
            Some(json!({"query": "東京駅"})),
        )
        .await;
        let (_, route) = send(
            &state,
            Method::POST,
            "/api/pins/route",
            Some(json!({"travel_mode": "DRIVING"})),
        )
        .await;
        assert_eq!(route["published"], true);

        let (status, _) = send(&state, Method::DELETE, "/api/data", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        assert!(state.store.pins().is_empty());
        assert!(state.store.pin_history().is_empty());
        assert!(state.store.search_history().is_empty());
        let (status, _) = send(&state, Method::GET, "/api/pins/route/latest", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn legacy_import_then_export() {
        let state = mock_state();
        let (status, summary) = send(
            &state,
            Method::POST,
            "/api/import",
            Some(json!([
                {"id": 1, "lat": 35.6586, "lng": 139.7454, "address": "東京タワー"},
                {"id": 2, "lat": 35.6812, "lng": 139.7671, "address": "東京駅"},
                {"id": 3, "lat": 35.6717, "lng": 139.7650, "address": "銀座"}
            ])),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(summary["format"], "legacy_pin_list");
        assert_eq!(summary["pins"], 3);

        let (status, bundle) = send(&state, Method::GET, "/api/export", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(bundle["format"], "pinroute-backup");
        assert_eq!(bundle["pins"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn unrecognized_import_is_bad_request() {
        let state = mock_state();
        let (status, body) = send(
            &state,
            Method::POST,
            "/api/import",
            Some(json!({"format": "something-else"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "bad_request");
    }
}
