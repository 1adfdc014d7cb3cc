//! JSON API over page sessions.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use promo_landing_page::{LandingQuery, SessionSnapshot};
use uuid::Uuid;

use crate::rest::{api_error, AppState, ErrorResponse};

type ApiResult<T> = Result<T, (StatusCode, Json<ErrorResponse>)>;

/// POST /v1/sessions — mount a session from a JSON query.
pub async fn create_session(
    State(state): State<AppState>,
    Json(query): Json<LandingQuery>,
) -> ApiResult<(StatusCode, Json<SessionSnapshot>)> {
    let query = LandingQuery::new(query.campaign_id.as_deref(), query.voucher_id.as_deref());
    let session = state.registry.mount(query).map_err(api_error)?;
    Ok((StatusCode::CREATED, Json(session.snapshot())))
}

/// GET /v1/sessions/:id — current phase and view.
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<SessionSnapshot>> {
    let session = state.registry.get(&id).map_err(api_error)?;
    Ok(Json(session.snapshot()))
}

/// POST /v1/sessions/:id/claim — claim and wait for the provider's answer.
pub async fn claim(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<SessionSnapshot>> {
    let session = state.registry.get(&id).map_err(api_error)?;
    session.claim().await.map_err(api_error)?;
    Ok(Json(session.snapshot()))
}

/// DELETE /v1/sessions/:id — unmount.
pub async fn delete_session(State(state): State<AppState>, Path(id): Path<Uuid>) -> StatusCode {
    if state.registry.unmount(&id) {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}
