//! Task planning pipeline.
//!
//! Text goes through the parser, the AI delegate and the scheduling
//! assignment before anything is written:
//!
//! ```text
//! input -> parse_tasks -> AiDelegate::enhance -> assign_all -> tasks.insert
//! ```
//!
//! The user's preferences are loaded once per request and passed down
//! explicitly.

use std::time::Instant;

use chrono::NaiveDate;
use tracing::info;

use starcrunch_core::parser::{parse_task, parse_tasks, parse_weekday, weekday_name};
use starcrunch_core::validation::{validate_duration, validate_task_text};
use starcrunch_core::{
    assign_all, CreateTaskRequest, Error, PreferredPeriod, Result, Task, TaskCategory, TaskDraft,
    TaskPriority, TaskRepository, UserPreferences, UserRepository,
};
use starcrunch_db::Database;
use starcrunch_inference::{AiDelegate, Provenance};

/// Explicit values from the dashboard form that win over inference.
#[derive(Debug, Clone, Default)]
pub struct TaskOverrides {
    pub category: Option<TaskCategory>,
    pub priority: Option<TaskPriority>,
    pub duration: Option<i64>,
    pub scheduled_time: Option<String>,
    pub scheduled_day: Option<String>,
    pub preferred_time: Option<PreferredPeriod>,
}

impl TaskOverrides {
    fn apply(self, draft: &mut TaskDraft) -> Result<()> {
        if let Some(category) = self.category {
            draft.category = category;
        }
        if let Some(priority) = self.priority {
            draft.priority = priority;
        }
        if let Some(minutes) = self.duration {
            draft.duration = Some(validate_duration(minutes)?);
        }
        if let Some(time) = self.scheduled_time.filter(|t| !t.trim().is_empty()) {
            draft.scheduled_time = Some(time.trim().to_lowercase());
            draft.is_appointment = true;
        }
        if let Some(day) = self.scheduled_day.filter(|d| !d.trim().is_empty()) {
            let weekday = parse_weekday(&day)
                .ok_or_else(|| Error::InvalidInput(format!("Unknown day '{}'", day)))?;
            draft.scheduled_day = Some(weekday_name(weekday).to_string());
        }
        if let Some(period) = self.preferred_time {
            draft.preferred_time = Some(period);
        }
        Ok(())
    }
}

/// Planned task rows before they are stored.
#[derive(Debug, Clone)]
pub struct Plan {
    pub requests: Vec<CreateTaskRequest>,
    pub provenance: Provenance,
    pub overall_suggestions: Vec<String>,
    pub motivation: Option<String>,
}

/// Stored tasks plus what the AI had to say about them.
#[derive(Debug, Clone)]
pub struct PlannedTasks {
    pub tasks: Vec<Task>,
    pub provenance: Provenance,
    pub overall_suggestions: Vec<String>,
    pub motivation: Option<String>,
}

impl PlannedTasks {
    pub fn ai_enhanced(&self) -> bool {
        self.tasks.iter().any(|t| t.ai_enhanced)
    }
}

#[derive(Clone)]
pub struct Planner {
    db: Database,
    delegate: AiDelegate,
}

impl Planner {
    pub fn new(db: Database, delegate: AiDelegate) -> Self {
        Self { db, delegate }
    }

    pub fn ai_enabled(&self) -> bool {
        self.delegate.is_enabled()
    }

    /// Enhance and schedule drafts without touching the database.
    pub async fn plan(
        &self,
        input: &str,
        drafts: Vec<TaskDraft>,
        prefs: &UserPreferences,
        today: NaiveDate,
    ) -> Plan {
        let outcome = self.delegate.enhance(input, drafts, prefs).await;
        Plan {
            requests: assign_all(outcome.drafts, prefs, today),
            provenance: outcome.provenance,
            overall_suggestions: outcome.overall_suggestions,
            motivation: outcome.motivation,
        }
    }

    /// Plan and store a comma-separated batch (the `schedule` command).
    pub async fn schedule(&self, user_id: &str, input: &str, today: NaiveDate) -> Result<PlannedTasks> {
        let drafts = parse_tasks(input, today);
        if drafts.is_empty() {
            return Err(Error::InvalidInput(
                "No tasks found. Separate tasks with commas, e.g. `Clean kitchen, Dentist 2pm Tuesday`"
                    .to_string(),
            ));
        }
        for draft in &drafts {
            validate_task_text(&draft.text)?;
        }

        let user = self.db.users.ensure(user_id).await?;
        let plan = self.plan(input, drafts, &user.preferences, today).await;
        self.store(user_id, plan).await
    }

    /// Plan and store one task, applying explicit overrides (the REST create).
    pub async fn create(
        &self,
        user_id: &str,
        text: &str,
        overrides: TaskOverrides,
        today: NaiveDate,
    ) -> Result<Task> {
        validate_task_text(text)?;
        let mut draft = parse_task(text, today);
        overrides.apply(&mut draft)?;

        let user = self.db.users.ensure(user_id).await?;
        let plan = self.plan(text, vec![draft], &user.preferences, today).await;
        let mut stored = self.store(user_id, plan).await?;
        stored
            .tasks
            .pop()
            .ok_or_else(|| Error::Internal("Planner produced no task".to_string()))
    }

    async fn store(&self, user_id: &str, plan: Plan) -> Result<PlannedTasks> {
        let start = Instant::now();
        let mut tasks = Vec::with_capacity(plan.requests.len());
        for request in plan.requests {
            tasks.push(self.db.tasks.insert(user_id, request).await?);
        }

        info!(
            subsystem = "api",
            component = "planner",
            op = "store",
            user_id,
            task_count = tasks.len(),
            provenance = %plan.provenance,
            duration_ms = start.elapsed().as_millis() as u64,
            "Tasks planned"
        );

        Ok(PlannedTasks {
            tasks,
            provenance: plan.provenance,
            overall_suggestions: plan.overall_suggestions,
            motivation: plan.motivation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use starcrunch_inference::MockBackend;

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn lazy_db() -> Database {
        Database::connect_lazy("postgres://starcrunch@localhost:1/unused").unwrap()
    }

    fn draft(text: &str) -> TaskDraft {
        parse_task(text, monday())
    }

    #[tokio::test]
    async fn test_rule_based_plan_for_appointment() {
        let planner = Planner::new(lazy_db(), AiDelegate::disabled());
        let plan = planner
            .plan(
                "Dentist 2pm Tuesday",
                vec![draft("Dentist 2pm Tuesday")],
                &UserPreferences::default(),
                monday(),
            )
            .await;

        assert!(!plan.provenance.is_ai());
        let task = &plan.requests[0];
        assert_eq!(task.category, TaskCategory::Appointment);
        assert!(task.is_appointment);
        assert_eq!(task.scheduled_time.as_deref(), Some("2pm"));
        assert_eq!(task.scheduled_day.as_deref(), Some("Tuesday"));
        assert_eq!(task.duration, 60);
        assert!(!task.ai_enhanced);
    }

    #[tokio::test]
    async fn test_ai_failure_keeps_rule_based_categorization() {
        let delegate = AiDelegate::new(
            Arc::new(MockBackend::new().failing("503")),
            Some(Arc::new(MockBackend::new().failing("503"))),
            Duration::from_secs(1),
        );
        let planner = Planner::new(lazy_db(), delegate);
        let plan = planner
            .plan(
                "Clean kitchen urgent",
                vec![draft("Clean kitchen urgent")],
                &UserPreferences::default(),
                monday(),
            )
            .await;

        let task = &plan.requests[0];
        assert!(!task.ai_enhanced);
        assert_eq!(task.category, TaskCategory::Cleaning);
        assert_eq!(task.priority, TaskPriority::High);
        assert_eq!(task.duration, 45);
        assert_eq!(task.preferred_time, Some(PreferredPeriod::Morning));
        assert!(task.scheduled_day.is_some());
        assert!(task.scheduled_time.is_none());
    }

    #[tokio::test]
    async fn test_ai_duration_wins_over_user_override() {
        let reply = r#"{"tasks":[{"category":"cleaning","duration":20,"adhd_tips":["Timer on"]}]}"#;
        let delegate = AiDelegate::new(
            Arc::new(MockBackend::new().with_model("groq").with_response(reply)),
            None,
            Duration::from_secs(1),
        );
        let planner = Planner::new(lazy_db(), delegate);
        let mut prefs = UserPreferences::default();
        prefs.task_durations.insert(TaskCategory::Cleaning, 30);

        let plan = planner
            .plan("sweep porch", vec![draft("sweep porch")], &prefs, monday())
            .await;

        assert!(plan.provenance.is_ai());
        assert_eq!(plan.requests[0].duration, 20);
        assert!(plan.requests[0].ai_enhanced);
        assert_eq!(plan.requests[0].adhd_tips, vec!["Timer on".to_string()]);
    }

    #[test]
    fn test_overrides_normalize_day_and_mark_appointment() {
        let mut d = draft("Call plumber");
        TaskOverrides {
            scheduled_time: Some(" 10AM ".to_string()),
            scheduled_day: Some("fri".to_string()),
            duration: Some(30),
            ..Default::default()
        }
        .apply(&mut d)
        .unwrap();

        assert_eq!(d.scheduled_time.as_deref(), Some("10am"));
        assert_eq!(d.scheduled_day.as_deref(), Some("Friday"));
        assert!(d.is_appointment);
        assert_eq!(d.duration, Some(30));
    }

    #[test]
    fn test_overrides_reject_bad_values() {
        let bad_day = TaskOverrides {
            scheduled_day: Some("someday".to_string()),
            ..Default::default()
        };
        assert!(bad_day.apply(&mut draft("x")).is_err());

        let bad_duration = TaskOverrides {
            duration: Some(600),
            ..Default::default()
        };
        assert!(bad_duration.apply(&mut draft("x")).is_err());
    }

    #[tokio::test]
    async fn test_schedule_rejects_empty_input_before_database() {
        let planner = Planner::new(lazy_db(), AiDelegate::disabled());
        let err = planner.schedule("123", " , ,", monday()).await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }
}
