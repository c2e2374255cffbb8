//! Learning rules: stored categorization corrections.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use starcrunch_core::validation::{require_field, validate_entity_id, validate_user_id};
use starcrunch_core::{CreateLearningRuleRequest, LearningRuleRepository, UserRepository};

use super::{json_body, require_user};
use crate::{ApiError, AppState};

pub async fn list_rules(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    require_user(&state, &user_id).await?;
    let rules = state.db.learning_rules.list(&user_id).await?;
    Ok(Json(rules))
}

pub async fn create_rule(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    payload: Result<Json<CreateLearningRuleRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    validate_user_id(&user_id)?;
    let req = json_body(payload)?;
    require_field("rule_type", &req.rule_type)?;
    require_field("pattern", &req.pattern)?;
    require_field("action", &req.action)?;

    state.db.users.ensure(&user_id).await?;
    let rule = state.db.learning_rules.insert(&user_id, req).await?;
    Ok((StatusCode::CREATED, Json(rule)))
}

pub async fn delete_rule(
    State(state): State<AppState>,
    Path((user_id, rule_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    validate_user_id(&user_id)?;
    validate_entity_id("rule", &rule_id)?;
    state.db.learning_rules.delete(&user_id, &rule_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
