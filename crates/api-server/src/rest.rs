//! Shared handler state, error responses and operational endpoints.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use promo_core::PromoError;
use promo_landing_page::{PageRenderer, SessionRegistry};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::error;

/// Shared application state for all handlers.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<SessionRegistry>,
    pub renderer: Arc<PageRenderer>,
    pub node_id: String,
    pub start_time: Instant,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: &str, message: impl Into<String>) -> Self {
        Self {
            error: error.to_string(),
            message: message.into(),
        }
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> axum::response::Response {
        (StatusCode::INTERNAL_SERVER_ERROR, Json(self)).into_response()
    }
}

/// Map a domain error onto an HTTP status and JSON body.
pub fn api_error(err: PromoError) -> (StatusCode, Json<ErrorResponse>) {
    match err {
        PromoError::SessionNotFound(id) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("session_not_found", format!("no session {id}"))),
        ),
        PromoError::ClaimUnavailable(reason) => (
            StatusCode::CONFLICT,
            Json(ErrorResponse::new("claim_unavailable", reason)),
        ),
        PromoError::SessionCapacity(max) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse::new(
                "too_many_sessions",
                format!("session limit of {max} reached"),
            )),
        ),
        other => {
            error!(error = %other, "Request failed");
            metrics::counter!("api.errors").increment(1);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("internal_error", "Internal processing error")),
            )
        }
    }
}

/// GET /health — Health check endpoint.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        node_id: state.node_id.clone(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        active_sessions: state.registry.len(),
        provider: state.registry.provider_name().to_string(),
    })
}

/// GET /ready — Readiness probe for Kubernetes.
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    if state.start_time.elapsed().as_secs() > 0 {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// GET /live — Liveness probe for Kubernetes.
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub node_id: String,
    pub uptime_secs: u64,
    pub active_sessions: usize,
    pub provider: String,
}
