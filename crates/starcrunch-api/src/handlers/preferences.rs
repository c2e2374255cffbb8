//! User preferences: excluded times and per-category defaults.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::IntoResponse,
    Json,
};

use starcrunch_core::scheduling::validate_excluded_times;
use starcrunch_core::validation::{validate_duration, validate_user_id};
use starcrunch_core::{UserPreferences, UserRepository};

use super::{json_body, require_user};
use crate::{ApiError, AppState};

pub async fn get_preferences(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let user = require_user(&state, &user_id).await?;
    Ok(Json(user.preferences))
}

/// Replace the whole preferences record.
///
/// # Returns
/// - 200 with the stored preferences
/// - 400 for unparseable excluded ranges or out-of-range durations
pub async fn put_preferences(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    payload: Result<Json<UserPreferences>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    validate_user_id(&user_id)?;
    let prefs = json_body(payload)?;
    validate_excluded_times(&prefs.excluded_times)?;
    for minutes in prefs.task_durations.values() {
        validate_duration(i64::from(*minutes))?;
    }

    state.db.users.ensure(&user_id).await?;
    let user = state.db.users.update_preferences(&user_id, &prefs).await?;
    Ok(Json(user.preferences))
}
