//! Browser-facing landing page routes.

use axum::extract::{Path, RawQuery, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use promo_core::PromoError;
use promo_landing_page::LandingQuery;
use tracing::{debug, warn};
use url::form_urlencoded;
use uuid::Uuid;

use crate::rest::AppState;

/// GET /?campaignId=..&voucherId=.. — open the page from a QR code.
pub async fn landing(State(state): State<AppState>, RawQuery(raw): RawQuery) -> Response {
    let query = raw
        .as_deref()
        .map(|q| LandingQuery::from_pairs(form_urlencoded::parse(q.as_bytes())))
        .unwrap_or_default();

    match state.registry.mount(query) {
        Ok(session) => Redirect::to(&session_path(session.id())).into_response(),
        Err(e) => {
            warn!(error = %e, "Could not open landing session");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Html(state.renderer.render_not_found()),
            )
                .into_response()
        }
    }
}

/// GET /s/:id — the session's current view.
pub async fn session_page(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    match state.registry.get(&id) {
        Ok(session) => Html(state.renderer.render(id, &session.view())).into_response(),
        Err(_) => (StatusCode::NOT_FOUND, Html(state.renderer.render_not_found())).into_response(),
    }
}

/// POST /s/:id/claim — the Claim Now button.
pub async fn claim_form(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    let session = match state.registry.get(&id) {
        Ok(session) => session,
        Err(_) => {
            return (StatusCode::NOT_FOUND, Html(state.renderer.render_not_found()))
                .into_response()
        }
    };

    match session.spawn_claim() {
        Ok(()) => {}
        Err(PromoError::ClaimUnavailable(reason)) => {
            // Double submits and stale buttons land here; the page shows
            // whatever the session is doing now.
            debug!(session_id = %id, reason = %reason, "Claim click ignored");
        }
        Err(e) => warn!(session_id = %id, error = %e, "Claim click failed"),
    }
    Redirect::to(&session_path(id)).into_response()
}

fn session_path(id: Uuid) -> String {
    format!("/s/{id}")
}
