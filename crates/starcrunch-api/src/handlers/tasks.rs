//! Task CRUD.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Local;
use serde::Deserialize;

use starcrunch_core::parser::{parse_weekday, weekday_name};
use starcrunch_core::validation::{
    validate_duration, validate_entity_id, validate_task_text, validate_user_id,
};
use starcrunch_core::{
    defaults, ListTasksFilter, PreferredPeriod, Task, TaskCategory, TaskPriority, TaskRepository,
    UpdateTaskRequest,
};

use super::{json_body, require_user};
use crate::services::TaskOverrides;
use crate::{ApiError, AppState};

#[derive(Debug, Deserialize)]
pub struct ListTasksQuery {
    pub completed: Option<bool>,
    pub limit: Option<i64>,
}

/// List a user's tasks, newest first.
///
/// # Returns
/// - 200 with the tasks
/// - 404 if the user has never used Starcrunch
pub async fn list_tasks(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<ListTasksQuery>,
) -> Result<impl IntoResponse, ApiError> {
    require_user(&state, &user_id).await?;
    let limit = query
        .limit
        .unwrap_or(defaults::PAGE_LIMIT)
        .clamp(1, defaults::PAGE_LIMIT);
    let tasks = state
        .db
        .tasks
        .list(
            &user_id,
            ListTasksFilter {
                completed: query.completed,
                limit: Some(limit),
            },
        )
        .await?;
    Ok(Json(tasks))
}

/// Dashboard form input. Any field besides `text` overrides inference.
#[derive(Debug, Deserialize)]
pub struct CreateTaskBody {
    pub text: String,
    pub category: Option<String>,
    pub priority: Option<String>,
    pub duration: Option<i64>,
    pub scheduled_time: Option<String>,
    pub scheduled_day: Option<String>,
    pub preferred_time: Option<String>,
}

impl CreateTaskBody {
    fn overrides(&self) -> Result<TaskOverrides, ApiError> {
        fn non_empty(v: &Option<String>) -> Option<&str> {
            v.as_deref().filter(|s| !s.trim().is_empty())
        }
        Ok(TaskOverrides {
            category: non_empty(&self.category).map(str::parse::<TaskCategory>).transpose()?,
            priority: non_empty(&self.priority).map(str::parse::<TaskPriority>).transpose()?,
            duration: self.duration,
            scheduled_time: self.scheduled_time.clone(),
            scheduled_day: self.scheduled_day.clone(),
            preferred_time: non_empty(&self.preferred_time).map(str::parse::<PreferredPeriod>).transpose()?,
        })
    }
}

/// Create one task through the planning pipeline.
///
/// # Returns
/// - 201 with the stored task
/// - 400 for empty text or invalid overrides
pub async fn create_task(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    payload: Result<Json<CreateTaskBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    validate_user_id(&user_id)?;
    let body = json_body(payload)?;
    validate_task_text(&body.text)?;
    let overrides = body.overrides()?;

    let today = Local::now().date_naive();
    let task = state
        .planner
        .create(&user_id, body.text.trim(), overrides, today)
        .await?;
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn get_task(
    State(state): State<AppState>,
    Path((user_id, task_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    validate_user_id(&user_id)?;
    validate_entity_id("task", &task_id)?;
    let task = state.db.tasks.fetch(&user_id, &task_id).await?;
    Ok(Json(task))
}

/// Partial update. Absent fields are left alone; `null` clears the
/// schedule fields.
pub async fn update_task(
    State(state): State<AppState>,
    Path((user_id, task_id)): Path<(String, String)>,
    payload: Result<Json<UpdateTaskRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    validate_user_id(&user_id)?;
    validate_entity_id("task", &task_id)?;
    let mut update = json_body(payload)?;

    if update.is_empty() {
        return Err(ApiError::BadRequest("No fields to update".to_string()));
    }
    if let Some(text) = &update.text {
        validate_task_text(text)?;
        update.text = Some(text.trim().to_string());
    }
    if let Some(minutes) = update.duration {
        validate_duration(i64::from(minutes))?;
    }
    if let Some(Some(day)) = &update.scheduled_day {
        let weekday = parse_weekday(day)
            .ok_or_else(|| ApiError::BadRequest(format!("Unknown day '{}'", day)))?;
        update.scheduled_day = Some(Some(weekday_name(weekday).to_string()));
    }

    let task = state.db.tasks.update(&user_id, &task_id, update).await?;
    Ok(Json(task))
}

pub async fn delete_task(
    State(state): State<AppState>,
    Path((user_id, task_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    validate_user_id(&user_id)?;
    validate_entity_id("task", &task_id)?;
    state.db.tasks.delete(&user_id, &task_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn complete_task(
    State(state): State<AppState>,
    Path((user_id, task_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    set_completed(state, user_id, task_id, true).await
}

pub async fn reopen_task(
    State(state): State<AppState>,
    Path((user_id, task_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    set_completed(state, user_id, task_id, false).await
}

async fn set_completed(
    state: AppState,
    user_id: String,
    task_id: String,
    completed: bool,
) -> Result<Json<Task>, ApiError> {
    validate_user_id(&user_id)?;
    validate_entity_id("task", &task_id)?;
    let task = state
        .db
        .tasks
        .set_completed(&user_id, &task_id, completed)
        .await?;
    Ok(Json(task))
}
