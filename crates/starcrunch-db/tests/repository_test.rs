//! Repository integration tests.
//!
//! These need a migrated PostgreSQL reachable through `DATABASE_URL`:
//!
//! ```text
//! DATABASE_URL=postgres://... cargo test -p starcrunch-db -- --ignored
//! ```

use starcrunch_core::{
    CreateLearningRuleRequest, CreateTaskRequest, DailyNoteRepository, FocusSessionRepository,
    LearningRuleRepository, ListTasksFilter, SessionKind, StatsRepository, TaskCategory,
    TaskPriority, TaskRepository, UpdateTaskRequest, UserPreferences, UserRepository,
};
use starcrunch_db::test_fixtures::{connect_test_db, unique_user_id};
use starcrunch_db::Database;

async fn setup() -> (Database, String) {
    let db = connect_test_db()
        .await
        .expect("Failed to connect to test database");
    let user_id = unique_user_id();
    db.users.ensure(&user_id).await.expect("Failed to create user");
    (db, user_id)
}

fn task(text: &str) -> CreateTaskRequest {
    CreateTaskRequest {
        text: text.to_string(),
        category: TaskCategory::Cleaning,
        priority: TaskPriority::High,
        duration: 45,
        scheduled_time: None,
        scheduled_day: Some("Monday".to_string()),
        preferred_time: None,
        is_appointment: false,
        ai_enhanced: false,
        adhd_tips: vec!["Put on music".to_string()],
        scheduling_suggestions: vec![],
    }
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL with migrated schema
async fn test_ensure_user_is_idempotent_and_seeds_defaults() {
    let (db, user_id) = setup().await;

    let again = db.users.ensure(&user_id).await.unwrap();
    assert_eq!(again.id, user_id);
    assert_eq!(again.preferences, UserPreferences::default());

    assert!(db.users.get("99999999999999999999").await.unwrap().is_none());
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL with migrated schema
async fn test_preferences_round_trip() {
    let (db, user_id) = setup().await;

    let mut prefs = UserPreferences::default();
    prefs.task_durations.insert(TaskCategory::Cleaning, 30);
    prefs
        .extra
        .insert("theme".to_string(), serde_json::json!("nebula"));

    db.users.update_preferences(&user_id, &prefs).await.unwrap();
    let user = db.users.get(&user_id).await.unwrap().unwrap();
    assert_eq!(user.preferences.duration_for(TaskCategory::Cleaning), 30);
    assert_eq!(user.preferences.extra["theme"], "nebula");
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL with migrated schema
async fn test_list_tasks_for_user_without_tasks_is_empty() {
    let (db, user_id) = setup().await;
    let tasks = db
        .tasks
        .list(&user_id, ListTasksFilter::default())
        .await
        .unwrap();
    assert!(tasks.is_empty());
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL with migrated schema
async fn test_complete_sets_and_reopen_clears_timestamp() {
    let (db, user_id) = setup().await;
    let created = db.tasks.insert(&user_id, task("Clean kitchen")).await.unwrap();
    assert!(!created.completed);
    assert!(created.completed_at.is_none());
    assert_eq!(created.adhd_tips, vec!["Put on music".to_string()]);

    let done = db.tasks.set_completed(&user_id, &created.id, true).await.unwrap();
    assert!(done.completed);
    assert!(done.completed_at.is_some());

    let reopened = db.tasks.set_completed(&user_id, &created.id, false).await.unwrap();
    assert!(!reopened.completed);
    assert!(reopened.completed_at.is_none());
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL with migrated schema
async fn test_partial_update_and_completion_via_update() {
    let (db, user_id) = setup().await;
    let created = db.tasks.insert(&user_id, task("Mop floor")).await.unwrap();

    let updated = db
        .tasks
        .update(
            &user_id,
            &created.id,
            UpdateTaskRequest {
                priority: Some(TaskPriority::Low),
                scheduled_day: Some(None),
                completed: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.priority, TaskPriority::Low);
    assert_eq!(updated.text, "Mop floor");
    assert_eq!(updated.scheduled_day, None);
    assert!(updated.completed_at.is_some());
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL with migrated schema
async fn test_tasks_are_scoped_per_user() {
    let (db, owner) = setup().await;
    let other = unique_user_id();
    db.users.ensure(&other).await.unwrap();

    let created = db.tasks.insert(&owner, task("Dust shelves")).await.unwrap();
    let err = db.tasks.fetch(&other, &created.id).await.unwrap_err();
    assert!(err.is_not_found());
    assert!(db.tasks.delete(&other, &created.id).await.is_err());
    assert!(db.tasks.fetch(&owner, &created.id).await.is_ok());
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL with migrated schema
async fn test_find_pending_by_text_ignores_case_and_completed() {
    let (db, user_id) = setup().await;
    let created = db.tasks.insert(&user_id, task("Vacuum Stairs")).await.unwrap();

    let found = db.tasks.find_pending(&user_id, "vacuum stairs").await.unwrap();
    assert_eq!(found.map(|t| t.id), Some(created.id.clone()));

    db.tasks.set_completed(&user_id, &created.id, true).await.unwrap();
    assert!(db.tasks.find_pending(&user_id, &created.id).await.unwrap().is_none());
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL with migrated schema
async fn test_note_upsert_keeps_one_row_per_date() {
    let (db, user_id) = setup().await;

    let first = db.notes.upsert(&user_id, "2026-10-19", "first").await.unwrap();
    let second = db.notes.upsert(&user_id, "2026-10-19", "second").await.unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.notes, "second");
    let notes = db.notes.list(&user_id, 10).await.unwrap();
    assert_eq!(notes.len(), 1);

    db.notes.delete(&user_id, "2026-10-19").await.unwrap();
    assert!(db.notes.fetch(&user_id, "2026-10-19").await.unwrap_err().is_not_found());
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL with migrated schema
async fn test_learning_rules_store_and_list() {
    let (db, user_id) = setup().await;
    let rule = db
        .learning_rules
        .insert(
            &user_id,
            CreateLearningRuleRequest {
                rule_type: "category".to_string(),
                pattern: "gym".to_string(),
                action: "personal".to_string(),
            },
        )
        .await
        .unwrap();

    let rules = db.learning_rules.list(&user_id).await.unwrap();
    assert_eq!(rules.len(), 1);
    assert_eq!(rules[0].pattern, "gym");

    db.learning_rules.delete(&user_id, &rule.id).await.unwrap();
    assert!(db.learning_rules.list(&user_id).await.unwrap().is_empty());
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL with migrated schema
async fn test_stats_count_tasks_and_todays_focus() {
    let (db, user_id) = setup().await;
    let a = db.tasks.insert(&user_id, task("Clean oven urgent")).await.unwrap();
    db.tasks.insert(&user_id, task("Sweep porch")).await.unwrap();
    db.tasks.set_completed(&user_id, &a.id, true).await.unwrap();

    let session = db
        .focus_sessions
        .start(&user_id, SessionKind::DeepWork, 90)
        .await
        .unwrap();
    db.focus_sessions.complete(&user_id, &session.id).await.unwrap();
    db.focus_sessions
        .start(&user_id, SessionKind::FocusInterval, 25)
        .await
        .unwrap();

    let stats = db.stats.user_stats(&user_id).await.unwrap();
    assert_eq!(stats.tasks.total_tasks, 2);
    assert_eq!(stats.tasks.completed_tasks, 1);
    assert_eq!(stats.tasks.high_priority_pending, 1);
    assert_eq!(stats.tasks.avg_duration, Some(45.0));
    assert_eq!(stats.focus.total_sessions, 2);
    assert_eq!(stats.focus.completed_sessions, 1);
    assert_eq!(stats.focus.total_focus_time, 90);
}
