//! # Speed Camera REST API
//!
//! Thin HTTP layer over the camera store.
//!
//! ## Endpoints
//!
//! - `GET /points`: every camera record
//! - `POST /points`: add a record (`CityName` and `limit` required)
//! - `GET /stats?limit=&search=`: dashboard analytics
//! - `GET /health`: liveness probe
//!
//! ```text
//! ┌───────────────────────────────┐
//! │        Axum HTTP Server       │
//! └───────────────────────────────┘
//!                │
//!                ▼
//! ┌───────────────────────────────┐
//! │  AppState (CameraRepository)  │
//! └───────────────────────────────┘
//!                │
//!                ▼
//! ┌───────────────────────────────┐
//! │   JSON document {"points"}    │
//! └───────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;

use axum::{
    Json, Router,
    extract::{Query, State, rejection::JsonRejection},
    http::{HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use speedcam_analytics::{AnalyticsEngine, AnalyticsReport, SpeedLimitFilter};
use speedcam_domain::CameraRecord;
use speedcam_store::SharedCameraRepository;

pub use config::Config;
pub use error::{ApiError, ApiResult};

/// Application state for Axum handlers
#[derive(Clone)]
pub struct AppState {
    pub repo: SharedCameraRepository,
}

/// Query string of the analytics endpoint
#[derive(Debug, Default, Deserialize)]
pub struct StatsQuery {
    /// Speed limit, or `All`
    pub limit: Option<String>,
    /// Case-insensitive city/address search
    pub search: Option<String>,
}

/// List every camera record
pub async fn list_points(State(state): State<AppState>) -> ApiResult<Json<Vec<CameraRecord>>> {
    let points = state.repo.list().await?;
    tracing::debug!(count = points.len(), "Listed camera records");
    Ok(Json(points))
}

/// Add a camera record
pub async fn create_point(
    State(state): State<AppState>,
    payload: Result<Json<CameraRecord>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<CameraRecord>)> {
    let Json(record) = payload?;
    let created = state.repo.create(record).await?;
    tracing::info!(city = %created.city_name, limit = %created.speed_limit, "Camera record created");
    Ok((StatusCode::CREATED, Json(created)))
}

/// Dashboard analytics for a speed-limit filter and search term
pub async fn stats(
    State(state): State<AppState>,
    Query(query): Query<StatsQuery>,
) -> ApiResult<Json<AnalyticsReport>> {
    let points = state.repo.list().await?;
    let filter = SpeedLimitFilter::from_param(query.limit.as_deref());
    let search = query.search.unwrap_or_default();

    let report = AnalyticsEngine::new(&points).generate_report(&filter, &search);
    Ok(Json(report))
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    "OK"
}

fn cors_layer(config: &Config) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    if config.allows_any_origin() {
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!(origin = %o, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    cors.allow_origin(AllowOrigin::list(origins))
}

/// Build the Axum router
pub fn build_router(repo: SharedCameraRepository, config: &Config) -> Router {
    let state = AppState { repo };

    Router::new()
        .route("/points", get(list_points).post(create_point))
        .route("/stats", get(stats))
        .route("/health", get(health_check))
        .route("/", get(|| async { "Speed Camera API" }))
        .with_state(state)
        .layer(cors_layer(config))
        .layer(TraceLayer::new_for_http())
}

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
