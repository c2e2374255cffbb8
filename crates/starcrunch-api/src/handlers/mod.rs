//! HTTP handlers, one module per resource.
//!
//! Every handler validates path and body input before touching the
//! database, so malformed requests fail fast with 400.

pub mod dashboard;
pub mod emotes;
pub mod focus;
pub mod health;
pub mod notes;
pub mod preferences;
pub mod rules;
pub mod stats;
pub mod tasks;

use axum::{extract::rejection::JsonRejection, Json};

use starcrunch_core::validation::validate_user_id;
use starcrunch_core::{User, UserRepository};

use crate::{ApiError, AppState};

/// Load an existing user; unknown users are 404 on read paths.
pub(crate) async fn require_user(state: &AppState, user_id: &str) -> Result<User, ApiError> {
    validate_user_id(user_id)?;
    state
        .db
        .users
        .get(user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("User {} not found", user_id)))
}

/// Unwrap a JSON body, turning extractor rejections into 400s.
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|e| ApiError::BadRequest(e.body_text()))
}
