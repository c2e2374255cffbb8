//! Focus sessions.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use starcrunch_core::validation::{validate_entity_id, validate_focus_minutes, validate_user_id};
use starcrunch_core::{defaults, FocusSessionRepository, SessionKind, UserRepository};

use super::{json_body, require_user};
use crate::{ApiError, AppState};

#[derive(Debug, Deserialize)]
pub struct StartFocusBody {
    pub kind: String,
    /// Minutes; the kind's default when absent.
    pub duration: Option<i64>,
}

pub async fn list_sessions(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    require_user(&state, &user_id).await?;
    let sessions = state
        .db
        .focus_sessions
        .list(&user_id, defaults::FOCUS_PAGE_LIMIT)
        .await?;
    Ok(Json(sessions))
}

pub async fn start_session(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    payload: Result<Json<StartFocusBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    validate_user_id(&user_id)?;
    let body = json_body(payload)?;
    let kind: SessionKind = body.kind.parse()?;
    let minutes = validate_focus_minutes(kind, body.duration)?;

    state.db.users.ensure(&user_id).await?;
    let session = state.db.focus_sessions.start(&user_id, kind, minutes).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

pub async fn complete_session(
    State(state): State<AppState>,
    Path((user_id, session_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    validate_user_id(&user_id)?;
    validate_entity_id("focus session", &session_id)?;
    let session = state
        .db
        .focus_sessions
        .complete(&user_id, &session_id)
        .await?;
    Ok(Json(session))
}
