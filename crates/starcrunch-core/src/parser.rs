//! Natural-language task parsing.
//!
//! Splits a comma-separated task list into drafts and pulls an explicit clock
//! time and day reference out of each piece.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::categorizer::categorize;
use crate::models::{PreferredPeriod, TaskCategory, TaskPriority};

/// Clock-time patterns, tried in order against the lower-cased text.
static TIME_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(\d{1,2}):(\d{2})\s*(am|pm)",
        r"(\d{1,2})\s*(am|pm)",
        r"at\s+(\d{1,2}):(\d{2})",
        r"at\s+(\d{1,2})\s*(am|pm)",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static FULL_DAY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(monday|tuesday|wednesday|thursday|friday|saturday|sunday)").unwrap()
});

static SHORT_DAY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(mon|tues?|wed|thu|thurs?|fri|sat|sun)\b").unwrap());

static RELATIVE_DAY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(today|tomorrow|next week)\b").unwrap());

/// One parsed task before scheduling.
///
/// The enhancement fields start empty and are filled by the AI delegate when
/// it succeeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDraft {
    pub text: String,
    pub category: TaskCategory,
    pub priority: TaskPriority,
    /// Matched clock text, e.g. "2pm" or "at 10:30".
    pub scheduled_time: Option<String>,
    /// Title-cased weekday, e.g. "Tuesday".
    pub scheduled_day: Option<String>,
    pub is_appointment: bool,
    /// AI duration estimate in minutes.
    pub duration: Option<u32>,
    /// AI period suggestion.
    pub preferred_time: Option<PreferredPeriod>,
    pub adhd_tips: Vec<String>,
    pub energy_level: Option<String>,
    pub ai_enhanced: bool,
}

/// Parse a comma-separated task list.
///
/// `today` resolves relative day words ("today", "tomorrow", "next week").
pub fn parse_tasks(input: &str, today: NaiveDate) -> Vec<TaskDraft> {
    input
        .split(',')
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(|piece| parse_task(piece, today))
        .collect()
}

/// Parse a single task.
pub fn parse_task(text: &str, today: NaiveDate) -> TaskDraft {
    let lower = text.to_lowercase();
    let scheduled_time = find_time(&lower);
    let scheduled_day = find_day(&lower, today);
    let categorization = categorize(text);

    TaskDraft {
        text: text.trim().to_string(),
        category: categorization.category,
        priority: categorization.priority,
        is_appointment: scheduled_time.is_some(),
        scheduled_time,
        scheduled_day,
        duration: None,
        preferred_time: None,
        adhd_tips: Vec::new(),
        energy_level: None,
        ai_enhanced: false,
    }
}

fn find_time(lower: &str) -> Option<String> {
    TIME_PATTERNS
        .iter()
        .find_map(|re| re.find(lower))
        .map(|m| m.as_str().to_string())
}

fn find_day(lower: &str, today: NaiveDate) -> Option<String> {
    if let Some(day) = FULL_DAY.find(lower).or_else(|| SHORT_DAY.find(lower)) {
        return parse_weekday(day.as_str()).map(|wd| weekday_name(wd).to_string());
    }

    let relative = RELATIVE_DAY.find(lower)?;
    let date = match relative.as_str() {
        "today" => today,
        "tomorrow" => today + Duration::days(1),
        // The Monday after the current week
        _ => today + Duration::days(7 - i64::from(today.weekday().num_days_from_monday())),
    };
    Some(weekday_name(date.weekday()).to_string())
}

/// Parse a weekday name or common abbreviation (case-insensitive).
pub fn parse_weekday(s: &str) -> Option<Weekday> {
    match s.trim().to_lowercase().as_str() {
        "monday" | "mon" => Some(Weekday::Mon),
        "tuesday" | "tue" | "tues" => Some(Weekday::Tue),
        "wednesday" | "wed" => Some(Weekday::Wed),
        "thursday" | "thu" | "thur" | "thurs" => Some(Weekday::Thu),
        "friday" | "fri" => Some(Weekday::Fri),
        "saturday" | "sat" => Some(Weekday::Sat),
        "sunday" | "sun" => Some(Weekday::Sun),
        _ => None,
    }
}

/// Title-case English weekday name.
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}
