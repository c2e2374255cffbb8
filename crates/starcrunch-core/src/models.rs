//! Core data models for Starcrunch.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map as JsonMap, Value as JsonValue};

use crate::error::Error;

// =============================================================================
// ENUMERATIONS
// =============================================================================

/// Task category.
///
/// Declaration order matters: the categorizer checks keyword lists in this
/// order and the first match wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskCategory {
    Appointment,
    Cleaning,
    #[serde(alias = "errands")]
    Errand,
    Work,
    Personal,
    Generic,
}

impl TaskCategory {
    /// Every category in declaration order.
    pub const ALL: [TaskCategory; 6] = [
        TaskCategory::Appointment,
        TaskCategory::Cleaning,
        TaskCategory::Errand,
        TaskCategory::Work,
        TaskCategory::Personal,
        TaskCategory::Generic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskCategory::Appointment => "appointment",
            TaskCategory::Cleaning => "cleaning",
            TaskCategory::Errand => "errand",
            TaskCategory::Work => "work",
            TaskCategory::Personal => "personal",
            TaskCategory::Generic => "generic",
        }
    }

    /// Human-readable label for chat output.
    pub fn label(&self) -> &'static str {
        match self {
            TaskCategory::Appointment => "Appointment",
            TaskCategory::Cleaning => "Cleaning",
            TaskCategory::Errand => "Errand",
            TaskCategory::Work => "Work",
            TaskCategory::Personal => "Personal",
            TaskCategory::Generic => "Generic",
        }
    }

    /// Pictogram shown next to tasks of this category.
    pub fn pictogram(&self) -> &'static str {
        match self {
            TaskCategory::Appointment => "📅",
            TaskCategory::Cleaning => "🧹",
            TaskCategory::Errand => "🛍️",
            TaskCategory::Work => "💼",
            TaskCategory::Personal => "👤",
            TaskCategory::Generic => "📋",
        }
    }

    /// Built-in duration estimate in minutes.
    pub fn default_duration(&self) -> u32 {
        match self {
            TaskCategory::Appointment => 60,
            TaskCategory::Cleaning => 45,
            TaskCategory::Errand => 90,
            TaskCategory::Work => 120,
            TaskCategory::Personal => 60,
            TaskCategory::Generic => 60,
        }
    }

    /// Built-in preferred period of the day.
    pub fn default_period(&self) -> PreferredPeriod {
        match self {
            TaskCategory::Cleaning => PreferredPeriod::Morning,
            TaskCategory::Errand => PreferredPeriod::Afternoon,
            TaskCategory::Work => PreferredPeriod::Morning,
            TaskCategory::Personal => PreferredPeriod::Evening,
            TaskCategory::Appointment | TaskCategory::Generic => PreferredPeriod::Any,
        }
    }
}

impl fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "appointment" | "appointments" => Ok(TaskCategory::Appointment),
            "cleaning" => Ok(TaskCategory::Cleaning),
            "errand" | "errands" => Ok(TaskCategory::Errand),
            "work" => Ok(TaskCategory::Work),
            "personal" => Ok(TaskCategory::Personal),
            "generic" => Ok(TaskCategory::Generic),
            other => Err(Error::InvalidInput(format!(
                "Unknown task category '{}'. Valid categories: appointment, cleaning, errand, work, personal, generic",
                other
            ))),
        }
    }
}

/// Task priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    High,
    Medium,
    Low,
}

impl TaskPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::High => "high",
            TaskPriority::Medium => "medium",
            TaskPriority::Low => "low",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TaskPriority::High => "High",
            TaskPriority::Medium => "Medium",
            TaskPriority::Low => "Low",
        }
    }

    pub fn pictogram(&self) -> &'static str {
        match self {
            TaskPriority::High => "🔥",
            TaskPriority::Medium => "⚡",
            TaskPriority::Low => "💤",
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskPriority {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "high" => Ok(TaskPriority::High),
            "medium" => Ok(TaskPriority::Medium),
            "low" => Ok(TaskPriority::Low),
            other => Err(Error::InvalidInput(format!(
                "Unknown priority '{}'. Valid priorities: high, medium, low",
                other
            ))),
        }
    }
}

/// Part of the day (or week) a flexible task fits best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreferredPeriod {
    Morning,
    Afternoon,
    Evening,
    Weekend,
    Any,
}

impl PreferredPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PreferredPeriod::Morning => "morning",
            PreferredPeriod::Afternoon => "afternoon",
            PreferredPeriod::Evening => "evening",
            PreferredPeriod::Weekend => "weekend",
            PreferredPeriod::Any => "any",
        }
    }
}

impl fmt::Display for PreferredPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PreferredPeriod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "morning" => Ok(PreferredPeriod::Morning),
            "afternoon" => Ok(PreferredPeriod::Afternoon),
            "evening" | "night" => Ok(PreferredPeriod::Evening),
            "weekend" => Ok(PreferredPeriod::Weekend),
            "any" | "anytime" => Ok(PreferredPeriod::Any),
            other => Err(Error::InvalidInput(format!(
                "Unknown time period '{}'",
                other
            ))),
        }
    }
}

/// Kind of focus session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionKind {
    /// Short pomodoro-style interval.
    FocusInterval,
    /// Longer interval dedicated to one theme.
    ThemedInterval,
    /// Long uninterrupted block.
    DeepWork,
}

impl SessionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionKind::FocusInterval => "focus-interval",
            SessionKind::ThemedInterval => "themed-interval",
            SessionKind::DeepWork => "deep-work",
        }
    }

    /// Default session length in minutes.
    pub fn default_duration(&self) -> u32 {
        match self {
            SessionKind::FocusInterval => 25,
            SessionKind::ThemedInterval => 45,
            SessionKind::DeepWork => 90,
        }
    }
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "focus-interval" | "focus" | "pomodoro" => Ok(SessionKind::FocusInterval),
            "themed-interval" | "themed" => Ok(SessionKind::ThemedInterval),
            "deep-work" | "deep" => Ok(SessionKind::DeepWork),
            other => Err(Error::InvalidInput(format!(
                "Unknown session kind '{}'. Valid kinds: focus-interval, themed-interval, deep-work",
                other
            ))),
        }
    }
}

// =============================================================================
// USER
// =============================================================================

/// A time range the user does not want tasks scheduled in, as entered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExcludedTime {
    /// Day spec, lower-cased ("monday", "weekdays", "daily").
    pub day: String,
    /// Range text, lower-cased ("9am-5pm", "all day").
    pub time_range: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// User preferences.
///
/// The known scheduling keys are typed; any other key the dashboard stores is
/// kept verbatim in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPreferences {
    #[serde(default)]
    pub excluded_times: Vec<ExcludedTime>,
    #[serde(default)]
    pub task_durations: BTreeMap<TaskCategory, u32>,
    #[serde(default)]
    pub preferred_task_times: BTreeMap<TaskCategory, PreferredPeriod>,
    #[serde(flatten)]
    pub extra: JsonMap<String, JsonValue>,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            excluded_times: Vec::new(),
            task_durations: TaskCategory::ALL
                .iter()
                .map(|c| (*c, c.default_duration()))
                .collect(),
            preferred_task_times: TaskCategory::ALL
                .iter()
                .map(|c| (*c, c.default_period()))
                .collect(),
            extra: JsonMap::new(),
        }
    }
}

impl UserPreferences {
    /// Duration for a category: the user's override or the built-in default.
    pub fn duration_for(&self, category: TaskCategory) -> u32 {
        self.task_durations
            .get(&category)
            .copied()
            .unwrap_or_else(|| category.default_duration())
    }

    /// Preferred period for a category: the user's override or the built-in default.
    pub fn period_for(&self, category: TaskCategory) -> PreferredPeriod {
        self.preferred_task_times
            .get(&category)
            .copied()
            .unwrap_or_else(|| category.default_period())
    }
}

/// A chat platform account known to Starcrunch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Discord snowflake.
    pub id: String,
    pub preferences: UserPreferences,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// TASKS
// =============================================================================

/// A stored task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub user_id: String,
    pub text: String,
    pub category: TaskCategory,
    pub priority: TaskPriority,
    pub completed: bool,
    /// Estimated duration in minutes.
    pub duration: u32,
    pub scheduled_time: Option<String>,
    pub scheduled_day: Option<String>,
    pub preferred_time: Option<PreferredPeriod>,
    pub is_appointment: bool,
    pub ai_enhanced: bool,
    pub adhd_tips: Vec<String>,
    pub scheduling_suggestions: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

/// Request for inserting a fully planned task.
#[derive(Debug, Clone)]
pub struct CreateTaskRequest {
    pub text: String,
    pub category: TaskCategory,
    pub priority: TaskPriority,
    pub duration: u32,
    pub scheduled_time: Option<String>,
    pub scheduled_day: Option<String>,
    pub preferred_time: Option<PreferredPeriod>,
    pub is_appointment: bool,
    pub ai_enhanced: bool,
    pub adhd_tips: Vec<String>,
    pub scheduling_suggestions: Vec<String>,
}

/// Partial task update. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTaskRequest {
    pub text: Option<String>,
    pub category: Option<TaskCategory>,
    pub priority: Option<TaskPriority>,
    pub duration: Option<u32>,
    /// `Some(None)` clears the time.
    #[serde(default, deserialize_with = "double_option")]
    pub scheduled_time: Option<Option<String>>,
    /// `Some(None)` clears the day.
    #[serde(default, deserialize_with = "double_option")]
    pub scheduled_day: Option<Option<String>>,
    pub is_appointment: Option<bool>,
    pub completed: Option<bool>,
}

impl UpdateTaskRequest {
    pub fn is_empty(&self) -> bool {
        self.text.is_none()
            && self.category.is_none()
            && self.priority.is_none()
            && self.duration.is_none()
            && self.scheduled_time.is_none()
            && self.scheduled_day.is_none()
            && self.is_appointment.is_none()
            && self.completed.is_none()
    }
}

/// Distinguishes an absent field from an explicit `null`.
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// =============================================================================
// DAILY NOTES
// =============================================================================

/// Free-text note attached to one date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyNote {
    pub id: String,
    pub user_id: String,
    /// Date key as entered by the dashboard (e.g. "2026-10-19").
    pub date_key: String,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// LEARNING RULES
// =============================================================================

/// A stored user-specific categorization correction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningRule {
    pub id: String,
    pub user_id: String,
    pub rule_type: String,
    pub pattern: String,
    pub action: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateLearningRuleRequest {
    pub rule_type: String,
    pub pattern: String,
    pub action: String,
}

// =============================================================================
// FOCUS SESSIONS
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FocusSession {
    pub id: String,
    pub user_id: String,
    pub kind: SessionKind,
    /// Planned length in minutes.
    pub duration: u32,
    pub completed: bool,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

// =============================================================================
// STATS
// =============================================================================

/// Aggregate task numbers for one user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskStats {
    pub total_tasks: i64,
    pub completed_tasks: i64,
    pub high_priority_pending: i64,
    pub avg_duration: Option<f64>,
}

/// Focus numbers for the current day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FocusStats {
    pub total_sessions: i64,
    pub completed_sessions: i64,
    /// Minutes of completed focus today.
    pub total_focus_time: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserStats {
    pub tasks: TaskStats,
    pub focus: FocusStats,
}
