use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};

use starcrunch_core::StatsRepository;

use super::require_user;
use crate::{ApiError, AppState};

/// Task totals plus today's focus sessions.
pub async fn get_stats(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    require_user(&state, &user_id).await?;
    let stats = state.db.stats.user_stats(&user_id).await?;
    Ok(Json(stats))
}
