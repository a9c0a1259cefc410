use crate::infra::{AppState, MemoryService};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde_json::json;
use std::sync::Arc;
use tracing::warn;
use vendor_intake::workflows::onboarding::onboarding_router;

/// Operational endpoints plus the onboarding API. Without a service every
/// `/api/v1` route answers 503.
pub(crate) fn with_onboarding_routes(service: Option<Arc<MemoryService>>) -> axum::Router {
    let api = match service {
        Some(service) => onboarding_router(service),
        None => axum::Router::new()
            .route("/api/v1/*rest", axum::routing::any(persistence_disabled))
            .route("/api/v1", axum::routing::any(persistence_disabled)),
    };

    api.route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn persistence_disabled() -> impl IntoResponse {
    warn!("onboarding route called without a configured store");
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(json!({ "error": "persistence disabled" })),
    )
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready", "persistence": state.persistence_enabled })
    } else {
        json!({ "status": "initializing", "persistence": state.persistence_enabled })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
