//! Router tests driven through `tower::ServiceExt::oneshot`.
//!
//! The database pool is lazy and points nowhere, so these cover the paths
//! that answer before any query: validation, health, emotes, the dashboard
//! page and the Discord endpoint. Tests that need PostgreSQL are ignored:
//!
//! ```text
//! DATABASE_URL=postgres://... cargo test -p starcrunch-api -- --ignored
//! ```

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use ed25519_dalek::{Signer, SigningKey};
use serde_json::{json, Value};
use tower::ServiceExt;

use starcrunch_api::discord::client::DiscordClient;
use starcrunch_api::discord::verify::SignatureVerifier;
use starcrunch_api::{build_router, AppState, DiscordState, Planner};
use starcrunch_db::Database;
use starcrunch_inference::AiDelegate;

const USER: &str = "123456789012345678";
const TASK_ID: &str = "0192f0c1-7b3a-7000-8000-000000000001";

fn signing_key() -> SigningKey {
    SigningKey::from_bytes(&[7u8; 32])
}

fn state_with(db: Database, discord: Option<DiscordState>) -> AppState {
    let planner = Planner::new(db.clone(), AiDelegate::disabled());
    AppState::new(db, planner, discord)
}

fn discord_state() -> DiscordState {
    let public_key = hex::encode(signing_key().verifying_key().to_bytes());
    DiscordState::new(
        SignatureVerifier::from_hex(&public_key).unwrap(),
        DiscordClient::new("http://127.0.0.1:1", None).unwrap(),
    )
}

fn app(discord: bool) -> Router {
    let db = Database::connect_lazy("postgres://starcrunch@127.0.0.1:1/unused").unwrap();
    build_router(state_with(db, discord.then(discord_state)))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

async fn send_json(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let (status, body) = send(app, request).await;
    (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn with_json(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn signed_interaction(body: &Value) -> Request<Body> {
    let timestamp = "1760870400";
    let payload = body.to_string();
    let mut message = timestamp.as_bytes().to_vec();
    message.extend_from_slice(payload.as_bytes());
    let signature = signing_key().sign(&message);

    Request::builder()
        .method("POST")
        .uri("/discord/interactions")
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-signature-ed25519", hex::encode(signature.to_bytes()))
        .header("x-signature-timestamp", timestamp)
        .body(Body::from(payload))
        .unwrap()
}

// =============================================================================
// Health, emotes, dashboard
// =============================================================================

#[tokio::test]
async fn test_health_reports_version() {
    let (status, body) = send_json(app(false), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_responses_carry_request_id_and_cors() {
    let request = Request::builder()
        .uri("/health")
        .header(header::ORIGIN, "https://example.com")
        .body(Body::empty())
        .unwrap();
    let response = app(false).oneshot(request).await.unwrap();

    assert!(response.headers().contains_key("x-request-id"));
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}

#[tokio::test]
async fn test_emote_table_lists_pictograms_with_image_urls() {
    let (status, body) = send_json(app(false), get("/api/v1/emotes")).await;
    assert_eq!(status, StatusCode::OK);

    let pictograms = body["pictograms"].as_array().unwrap();
    let dino = pictograms.iter().find(|e| e["key"] == "🦕").unwrap();
    assert_eq!(dino["name"], "starcrunch");
    assert!(dino["image_url"]
        .as_str()
        .unwrap()
        .starts_with("https://cdn.discordapp.com/emojis/"));

    let rocket = pictograms.iter().find(|e| e["key"] == "🚀").unwrap();
    assert_eq!(rocket["image_url"], "/static/emotes/starcrunch2.png");
    assert!(body["named"].as_array().unwrap().iter().any(|e| e["key"] == "monday"));
}

#[tokio::test]
async fn test_dashboard_pages() {
    let (status, body) = send(app(false), get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(String::from_utf8(body).unwrap().contains("Starcrunch"));

    let (status, _) = send(app(false), get(&format!("/dashboard/{}", USER))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(app(false), get("/dashboard/not-a-user")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// Validation happens before the database
// =============================================================================

#[tokio::test]
async fn test_malformed_user_id_is_rejected() {
    for uri in [
        "/api/v1/users/abc/tasks",
        "/api/v1/users/12a/stats",
        "/api/v1/users/123456789012345678901/preferences",
    ] {
        let (status, body) = send_json(app(false), get(uri)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert!(body["error"].as_str().unwrap().contains("Invalid user id"));
    }
}

#[tokio::test]
async fn test_malformed_task_id_is_rejected() {
    let uri = format!("/api/v1/users/{}/tasks/42", USER);
    let (status, body) = send_json(app(false), get(&uri)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("task"));

    let request = Request::builder()
        .method("POST")
        .uri(format!("/api/v1/users/{}/tasks/42/complete", USER))
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(app(false), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_note_date_is_rejected() {
    let uri = format!("/api/v1/users/{}/notes/2026-13-45", USER);
    let (status, _) = send(app(false), get(&uri)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let request = with_json(
        "POST",
        &format!("/api/v1/users/{}/notes", USER),
        json!({"date_key": "yesterday", "notes": "x"}),
    );
    let (status, _) = send(app(false), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_task_requires_text() {
    let uri = format!("/api/v1/users/{}/tasks", USER);

    let (status, body) = send_json(app(false), with_json("POST", &uri, json!({"text": "   "}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Task text is required");

    let (status, _) = send(app(false), with_json("POST", &uri, json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_task_rejects_bad_overrides() {
    let uri = format!("/api/v1/users/{}/tasks", USER);

    let bad_category = json!({"text": "Clean kitchen", "category": "chores"});
    let (status, _) = send(app(false), with_json("POST", &uri, bad_category)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let bad_duration = json!({"text": "Clean kitchen", "duration": 1000});
    let (status, body) = send_json(app(false), with_json("POST", &uri, bad_duration)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("480"));
}

#[tokio::test]
async fn test_update_task_rejects_empty_and_invalid_bodies() {
    let uri = format!("/api/v1/users/{}/tasks/{}", USER, TASK_ID);

    let (status, body) = send_json(app(false), with_json("PUT", &uri, json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No fields to update");

    let (status, _) = send(app(false), with_json("PUT", &uri, json!({"duration": 2}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(app(false), with_json("PUT", &uri, json!({"scheduled_day": "someday"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_put_preferences_validates_exclusions_and_durations() {
    let uri = format!("/api/v1/users/{}/preferences", USER);

    let bad_range = json!({"excluded_times": [{"day": "monday", "time_range": "after lunch"}]});
    let (status, _) = send(app(false), with_json("PUT", &uri, bad_range)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let bad_duration = json!({"task_durations": {"cleaning": 1}});
    let (status, _) = send(app(false), with_json("PUT", &uri, bad_duration)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_focus_and_rules_validate_input() {
    let focus = format!("/api/v1/users/{}/focus-sessions", USER);
    let (status, _) = send(app(false), with_json("POST", &focus, json!({"kind": "nap"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = send(
        app(false),
        with_json("POST", &focus, json!({"kind": "deep-work", "duration": 0})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let rules = format!("/api/v1/users/{}/rules", USER);
    let rule = json!({"rule_type": "category", "pattern": "", "action": "work"});
    let (status, _) = send(app(false), with_json("POST", &rules, rule)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// Discord interactions
// =============================================================================

#[tokio::test]
async fn test_interactions_unavailable_without_public_key() {
    let (status, _) = send(app(false), signed_interaction(&json!({"type": 1}))).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_ping_with_valid_signature_gets_pong() {
    let (status, body) = send_json(app(true), signed_interaction(&json!({"type": 1}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"type": 1}));
}

#[tokio::test]
async fn test_bad_or_missing_signature_is_unauthorized() {
    let mut request = signed_interaction(&json!({"type": 1}));
    request
        .headers_mut()
        .insert("x-signature-timestamp", "1760870401".parse().unwrap());
    let (status, _) = send(app(true), request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let unsigned = with_json("POST", "/discord/interactions", json!({"type": 1}));
    let (status, _) = send(app(true), unsigned).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_help_command_replies_with_ephemeral_embed() {
    let interaction = json!({
        "type": 2,
        "id": "1",
        "application_id": "42",
        "token": "tok",
        "data": {"name": "help"},
        "member": {"user": {"id": USER}}
    });
    let (status, body) = send_json(app(true), signed_interaction(&interaction)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["type"], 4);
    assert_eq!(body["data"]["flags"], 64);
    assert!(!body["data"]["embeds"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_command_with_missing_option_explains_itself() {
    let interaction = json!({
        "type": 2,
        "data": {"name": "exclude", "options": [{"name": "day", "value": "monday"}]},
        "user": {"id": USER}
    });
    let (status, body) = send_json(app(true), signed_interaction(&interaction)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["type"], 4);
    assert!(body["data"]["content"]
        .as_str()
        .unwrap()
        .contains("time_range"));
}

#[tokio::test]
async fn test_command_without_user_is_bad_request() {
    let interaction = json!({"type": 2, "data": {"name": "help"}});
    let (status, _) = send(app(true), signed_interaction(&interaction)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// Database-backed flows
// =============================================================================

async fn live_app() -> (Router, String) {
    let db = starcrunch_db::test_fixtures::connect_test_db()
        .await
        .expect("Failed to connect to test database");
    (
        build_router(state_with(db, None)),
        starcrunch_db::test_fixtures::unique_user_id(),
    )
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL with migrated schema
async fn test_unknown_user_reads_are_not_found() {
    let (app, user) = live_app().await;
    let (status, _) = send(app, get(&format!("/api/v1/users/{}/tasks", user))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL with migrated schema
async fn test_create_complete_and_list_task() {
    let (app, user) = live_app().await;
    let tasks = format!("/api/v1/users/{}/tasks", user);

    let (status, created) = send_json(
        app.clone(),
        with_json("POST", &tasks, json!({"text": "Dentist 2pm Tuesday"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["category"], "appointment");
    assert_eq!(created["is_appointment"], true);
    assert_eq!(created["scheduled_day"], "Tuesday");
    assert_eq!(created["ai_enhanced"], false);

    let id = created["id"].as_str().unwrap();
    let request = Request::builder()
        .method("POST")
        .uri(format!("{}/{}/complete", tasks, id))
        .body(Body::empty())
        .unwrap();
    let (status, done) = send_json(app.clone(), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(done["completed"], true);
    assert!(done["completed_at"].is_string());

    let (_, pending) = send_json(app.clone(), get(&format!("{}?completed=false", tasks))).await;
    assert!(pending.as_array().unwrap().is_empty());

    let (_, stats) = send_json(app, get(&format!("/api/v1/users/{}/stats", user))).await;
    assert_eq!(stats["tasks"]["completed_tasks"], 1);
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL with migrated schema
async fn test_note_upsert_then_fetch() {
    let (app, user) = live_app().await;
    let notes = format!("/api/v1/users/{}/notes", user);

    for text in ["first", "second"] {
        let (status, _) = send(
            app.clone(),
            with_json("POST", &notes, json!({"date_key": "2026-10-19", "notes": text})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, note) = send_json(app, get(&format!("{}/2026-10-19", notes))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(note["notes"], "second");
}
