//! # starcrunch-api
//!
//! HTTP server for Starcrunch: the JSON API used by the dashboard, the
//! Discord interactions endpoint and the dashboard page itself.

pub mod config;
pub mod discord;
pub mod error;
pub mod handlers;
pub mod services;

use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use uuid::Uuid;

use starcrunch_db::Database;

pub use discord::DiscordState;
pub use error::ApiError;
pub use services::Planner;

/// Largest accepted request body.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub planner: Planner,
    /// `None` when `DISCORD_PUBLIC_KEY` is unset.
    pub discord: Option<Arc<DiscordState>>,
}

impl AppState {
    pub fn new(db: Database, planner: Planner, discord: Option<DiscordState>) -> Self {
        Self {
            db,
            planner,
            discord: discord.map(Arc::new),
        }
    }
}

/// Request ID generator using UUIDv7 (time-ordered).
#[derive(Clone, Default)]
pub struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

/// Build the application router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    use handlers::{dashboard, emotes, focus, health, notes, preferences, rules, stats, tasks};

    Router::new()
        .route("/", get(dashboard::index))
        .route("/dashboard/:user_id", get(dashboard::user_dashboard))
        .route("/health", get(health::health_check))
        .route("/api/v1/emotes", get(emotes::list_emotes))
        .route("/discord/interactions", post(discord::interactions))
        // Per-user resources
        .route(
            "/api/v1/users/:user_id/tasks",
            get(tasks::list_tasks).post(tasks::create_task),
        )
        .route(
            "/api/v1/users/:user_id/tasks/:task_id",
            get(tasks::get_task)
                .put(tasks::update_task)
                .delete(tasks::delete_task),
        )
        .route(
            "/api/v1/users/:user_id/tasks/:task_id/complete",
            post(tasks::complete_task),
        )
        .route(
            "/api/v1/users/:user_id/tasks/:task_id/reopen",
            post(tasks::reopen_task),
        )
        .route(
            "/api/v1/users/:user_id/notes",
            get(notes::list_notes).post(notes::upsert_note),
        )
        .route(
            "/api/v1/users/:user_id/notes/:date_key",
            get(notes::get_note).delete(notes::delete_note),
        )
        .route("/api/v1/users/:user_id/stats", get(stats::get_stats))
        .route(
            "/api/v1/users/:user_id/preferences",
            get(preferences::get_preferences).put(preferences::put_preferences),
        )
        .route(
            "/api/v1/users/:user_id/focus-sessions",
            get(focus::list_sessions).post(focus::start_session),
        )
        .route(
            "/api/v1/users/:user_id/focus-sessions/:session_id/complete",
            post(focus::complete_session),
        )
        .route(
            "/api/v1/users/:user_id/rules",
            get(rules::list_rules).post(rules::create_rule),
        )
        .route("/api/v1/users/:user_id/rules/:rule_id", delete(rules::delete_rule))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer(CorsLayer::permissive())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .with_state(state)
}
