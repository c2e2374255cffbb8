//! Daily notes, one per user and date.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use starcrunch_core::validation::{validate_date_key, validate_note_text, validate_user_id};
use starcrunch_core::{defaults, DailyNoteRepository, UserRepository};

use super::{json_body, require_user};
use crate::{ApiError, AppState};

#[derive(Debug, Deserialize)]
pub struct UpsertNoteBody {
    #[serde(alias = "date")]
    pub date_key: String,
    #[serde(default)]
    pub notes: String,
}

pub async fn list_notes(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    require_user(&state, &user_id).await?;
    let notes = state.db.notes.list(&user_id, defaults::PAGE_LIMIT).await?;
    Ok(Json(notes))
}

/// Create or replace the note for a date.
///
/// # Returns
/// - 200 with the stored note
/// - 400 for a malformed date or oversized text
pub async fn upsert_note(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    payload: Result<Json<UpsertNoteBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    validate_user_id(&user_id)?;
    let body = json_body(payload)?;
    validate_date_key(&body.date_key)?;
    validate_note_text(&body.notes)?;

    state.db.users.ensure(&user_id).await?;
    let note = state
        .db
        .notes
        .upsert(&user_id, &body.date_key, &body.notes)
        .await?;
    Ok(Json(note))
}

pub async fn get_note(
    State(state): State<AppState>,
    Path((user_id, date_key)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    validate_user_id(&user_id)?;
    validate_date_key(&date_key)?;
    let note = state.db.notes.fetch(&user_id, &date_key).await?;
    Ok(Json(note))
}

pub async fn delete_note(
    State(state): State<AppState>,
    Path((user_id, date_key)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    validate_user_id(&user_id)?;
    validate_date_key(&date_key)?;
    state.db.notes.delete(&user_id, &date_key).await?;
    Ok(StatusCode::NO_CONTENT)
}
