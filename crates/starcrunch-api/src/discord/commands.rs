//! Slash command definitions and execution.

use std::time::Instant;

use chrono::{Datelike, Local, NaiveDate, Utc};
use tracing::{error, info};

use starcrunch_core::validation::{require_field, validate_duration, validate_focus_minutes};
use starcrunch_core::{
    defaults, Error, ExcludedTime, Exclusion, FocusSessionRepository, ListTasksFilter, Result,
    SessionKind, TaskCategory, TaskRepository, UserRepository,
};

use super::render;
use super::types::{CommandData, MessageData};
use crate::AppState;

/// A parsed slash command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Schedule { tasks: String },
    ShowWeek,
    Complete { task: String },
    Exclude { day: String, time_range: String },
    SetDuration { task_type: String, minutes: i64 },
    Focus { kind: String, minutes: Option<i64> },
    Help,
}

impl Command {
    pub fn from_data(data: &CommandData) -> Result<Self> {
        let string = |name: &str| -> Result<String> {
            data.string(name)
                .map(str::to_string)
                .ok_or_else(|| Error::InvalidInput(format!("Missing option `{}`", name)))
        };

        Ok(match data.name.as_str() {
            "schedule" => Command::Schedule {
                tasks: string("tasks")?,
            },
            "show_week" => Command::ShowWeek,
            "complete" => Command::Complete {
                task: string("task")?,
            },
            "exclude" => Command::Exclude {
                day: string("day")?,
                time_range: string("time_range")?,
            },
            "set_duration" => Command::SetDuration {
                task_type: string("task_type")?,
                minutes: data
                    .integer("minutes")
                    .ok_or_else(|| Error::InvalidInput("Missing option `minutes`".to_string()))?,
            },
            "focus" => Command::Focus {
                kind: data.string("kind").unwrap_or("focus-interval").to_string(),
                minutes: data.integer("minutes"),
            },
            "help" => Command::Help,
            other => {
                return Err(Error::InvalidInput(format!("Unknown command `{}`", other)));
            }
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::Schedule { .. } => "schedule",
            Command::ShowWeek => "show_week",
            Command::Complete { .. } => "complete",
            Command::Exclude { .. } => "exclude",
            Command::SetDuration { .. } => "set_duration",
            Command::Focus { .. } => "focus",
            Command::Help => "help",
        }
    }

    /// Commands that may outlive Discord's 3 second acknowledgment window.
    pub fn is_slow(&self) -> bool {
        matches!(self, Command::Schedule { .. })
    }
}

/// Run a command for a user. Failures become an ephemeral error reply.
pub async fn execute(state: &AppState, user_id: &str, command: Command) -> MessageData {
    let start = Instant::now();
    let name = command.name();
    let today = Local::now().date_naive();

    let result = run(state, user_id, command, today).await;
    let duration_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(message) => {
            info!(
                subsystem = "discord",
                component = "commands",
                command = name,
                user_id,
                duration_ms,
                success = true,
                "Command handled"
            );
            message
        }
        Err(Error::InvalidInput(msg)) => {
            info!(
                subsystem = "discord",
                component = "commands",
                command = name,
                user_id,
                duration_ms,
                success = false,
                error = %msg,
                "Command rejected"
            );
            render::error(&Error::InvalidInput(msg))
        }
        Err(e) => {
            error!(
                subsystem = "discord",
                component = "commands",
                command = name,
                user_id,
                duration_ms,
                success = false,
                error = %e,
                "Command failed"
            );
            render::error(&e)
        }
    }
}

async fn run(state: &AppState, user_id: &str, command: Command, today: NaiveDate) -> Result<MessageData> {
    match command {
        Command::Schedule { tasks } => {
            let planned = state.planner.schedule(user_id, &tasks, today).await?;
            Ok(render::scheduled(&planned))
        }
        Command::ShowWeek => {
            let pending = state
                .db
                .tasks
                .list(
                    user_id,
                    ListTasksFilter {
                        completed: Some(false),
                        limit: Some(defaults::SHOW_WEEK_PENDING_LIMIT),
                    },
                )
                .await?;
            let completed = state
                .db
                .tasks
                .list(
                    user_id,
                    ListTasksFilter {
                        completed: Some(true),
                        limit: Some(defaults::SHOW_WEEK_COMPLETED_LIMIT),
                    },
                )
                .await?;
            Ok(render::week(&pending, &completed, today.weekday()))
        }
        Command::Complete { task } => {
            require_field("Task", &task)?;
            match state.db.tasks.find_pending(user_id, task.trim()).await? {
                Some(found) => {
                    let done = state.db.tasks.set_completed(user_id, &found.id, true).await?;
                    Ok(render::completed(&done))
                }
                None => Ok(render::task_not_found()),
            }
        }
        Command::Exclude { day, time_range } => {
            Exclusion::parse(&day, &time_range)?;
            let user = state.db.users.ensure(user_id).await?;
            let mut prefs = user.preferences;
            prefs.excluded_times.push(ExcludedTime {
                day: day.trim().to_lowercase(),
                time_range: time_range.trim().to_lowercase(),
                created_at: Some(Utc::now()),
            });
            let user = state.db.users.update_preferences(user_id, &prefs).await?;
            Ok(render::excluded(
                day.trim(),
                time_range.trim(),
                &user.preferences.excluded_times,
            ))
        }
        Command::SetDuration { task_type, minutes } => {
            let category: TaskCategory = task_type.parse()?;
            let minutes = validate_duration(minutes)?;
            let user = state.db.users.ensure(user_id).await?;
            let mut prefs = user.preferences;
            prefs.task_durations.insert(category, minutes);
            let user = state.db.users.update_preferences(user_id, &prefs).await?;
            Ok(render::duration_set(category, minutes, &user.preferences))
        }
        Command::Focus { kind, minutes } => {
            let kind: SessionKind = kind.parse()?;
            let minutes = validate_focus_minutes(kind, minutes)?;
            state.db.users.ensure(user_id).await?;
            let session = state.db.focus_sessions.start(user_id, kind, minutes).await?;
            Ok(render::focus_started(&session))
        }
        Command::Help => Ok(render::help()),
    }
}

const OPTION_STRING: u8 = 3;
const OPTION_INTEGER: u8 = 4;

/// Command set uploaded by `starcrunch-commands register`.
pub fn definitions() -> serde_json::Value {
    let categories: Vec<serde_json::Value> = TaskCategory::ALL
        .iter()
        .map(|c| serde_json::json!({"name": c.label(), "value": c.as_str()}))
        .collect();

    serde_json::json!([
        {
            "name": "schedule",
            "description": "Schedule tasks with Starcrunch",
            "options": [{
                "type": OPTION_STRING,
                "name": "tasks",
                "description": "Comma-separated tasks, e.g. Clean kitchen, Dentist 2pm Tuesday",
                "required": true,
                "max_length": 2000
            }]
        },
        {
            "name": "show_week",
            "description": "Show your weekly schedule"
        },
        {
            "name": "complete",
            "description": "Mark a task as completed",
            "options": [{
                "type": OPTION_STRING,
                "name": "task",
                "description": "Task text or id",
                "required": true
            }]
        },
        {
            "name": "exclude",
            "description": "Set times when you're unavailable",
            "options": [
                {
                    "type": OPTION_STRING,
                    "name": "day",
                    "description": "Day, weekdays, weekends or daily",
                    "required": true
                },
                {
                    "type": OPTION_STRING,
                    "name": "time_range",
                    "description": "e.g. 9am-5pm or all day",
                    "required": true
                }
            ]
        },
        {
            "name": "set_duration",
            "description": "Set custom duration for task types",
            "options": [
                {
                    "type": OPTION_STRING,
                    "name": "task_type",
                    "description": "Task category",
                    "required": true,
                    "choices": categories
                },
                {
                    "type": OPTION_INTEGER,
                    "name": "minutes",
                    "description": "Minutes (5 to 480)",
                    "required": true,
                    "min_value": defaults::MIN_TASK_DURATION,
                    "max_value": defaults::MAX_TASK_DURATION
                }
            ]
        },
        {
            "name": "focus",
            "description": "Start a focus session",
            "options": [
                {
                    "type": OPTION_STRING,
                    "name": "kind",
                    "description": "Session style",
                    "required": true,
                    "choices": [
                        {"name": "Focus interval (25 min)", "value": "focus-interval"},
                        {"name": "Themed interval (45 min)", "value": "themed-interval"},
                        {"name": "Deep work (90 min)", "value": "deep-work"}
                    ]
                },
                {
                    "type": OPTION_INTEGER,
                    "name": "minutes",
                    "description": "Override the default length",
                    "required": false,
                    "min_value": 1,
                    "max_value": defaults::MAX_FOCUS_MINUTES
                }
            ]
        },
        {
            "name": "help",
            "description": "Show all available commands"
        }
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(value: serde_json::Value) -> CommandData {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_parse_schedule_and_exclude() {
        let schedule = data(serde_json::json!({
            "name": "schedule",
            "options": [{"name": "tasks", "value": "Clean kitchen, Dentist 2pm Tuesday"}]
        }));
        assert_eq!(
            Command::from_data(&schedule).unwrap(),
            Command::Schedule {
                tasks: "Clean kitchen, Dentist 2pm Tuesday".to_string()
            }
        );

        let exclude = data(serde_json::json!({
            "name": "exclude",
            "options": [{"name": "day", "value": "Monday"}, {"name": "time_range", "value": "9am-5pm"}]
        }));
        assert!(matches!(Command::from_data(&exclude).unwrap(), Command::Exclude { .. }));
    }

    #[test]
    fn test_missing_option_and_unknown_command() {
        let missing = data(serde_json::json!({"name": "complete"}));
        assert!(matches!(Command::from_data(&missing), Err(Error::InvalidInput(_))));

        let unknown = data(serde_json::json!({"name": "launch"}));
        assert!(Command::from_data(&unknown).is_err());
    }

    #[test]
    fn test_only_schedule_is_deferred() {
        assert!(Command::Schedule { tasks: String::new() }.is_slow());
        assert!(!Command::ShowWeek.is_slow());
        assert!(!Command::Help.is_slow());
    }

    #[test]
    fn test_definitions_cover_every_command() {
        let defs = definitions();
        let names: Vec<&str> = defs
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["name"].as_str().unwrap())
            .collect();
        assert_eq!(
            names,
            vec!["schedule", "show_week", "complete", "exclude", "set_duration", "focus", "help"]
        );
        assert_eq!(defs[4]["options"][0]["choices"].as_array().unwrap().len(), 6);
    }
}
