//! Input validation shared by the chat and HTTP surfaces.
//!
//! Every function returns [`Error::InvalidInput`] with a message fit for the
//! end user.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::defaults::{
    MAX_FOCUS_MINUTES, MAX_NOTE_LEN, MAX_TASK_DURATION, MAX_TASK_TEXT_LEN, MIN_TASK_DURATION,
};
use crate::error::{Error, Result};
use crate::models::SessionKind;

/// Platform user ids are snowflakes: 1 to 20 ASCII digits.
pub fn validate_user_id(user_id: &str) -> Result<()> {
    let ok = !user_id.is_empty() && user_id.len() <= 20 && user_id.bytes().all(|b| b.is_ascii_digit());
    if ok {
        Ok(())
    } else {
        Err(Error::InvalidInput(format!("Invalid user id '{}'", user_id)))
    }
}

/// Task, note, rule and session ids are UUID strings.
pub fn validate_entity_id(kind: &str, id: &str) -> Result<()> {
    Uuid::parse_str(id)
        .map(|_| ())
        .map_err(|_| Error::InvalidInput(format!("Invalid {} id '{}'", kind, id)))
}

/// Non-empty after trimming and not longer than the task text cap.
pub fn validate_task_text(text: &str) -> Result<()> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidInput("Task text is required".to_string()));
    }
    if trimmed.chars().count() > MAX_TASK_TEXT_LEN {
        return Err(Error::InvalidInput(format!(
            "Task text is limited to {} characters",
            MAX_TASK_TEXT_LEN
        )));
    }
    Ok(())
}

/// Per-category durations must fall within 5 to 480 minutes.
pub fn validate_duration(minutes: i64) -> Result<u32> {
    if (i64::from(MIN_TASK_DURATION)..=i64::from(MAX_TASK_DURATION)).contains(&minutes) {
        Ok(minutes as u32)
    } else {
        Err(Error::InvalidInput(format!(
            "Duration must be between {} and {} minutes (8 hours)",
            MIN_TASK_DURATION, MAX_TASK_DURATION
        )))
    }
}

/// Requested focus length, or the kind's default.
pub fn validate_focus_minutes(kind: SessionKind, minutes: Option<i64>) -> Result<u32> {
    match minutes {
        None => Ok(kind.default_duration()),
        Some(m) if (1..=i64::from(MAX_FOCUS_MINUTES)).contains(&m) => Ok(m as u32),
        Some(_) => Err(Error::InvalidInput(format!(
            "Focus sessions last between 1 and {} minutes",
            MAX_FOCUS_MINUTES
        ))),
    }
}

/// Date keys are calendar dates in `YYYY-MM-DD` form.
pub fn validate_date_key(date_key: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date_key, "%Y-%m-%d").map_err(|_| {
        Error::InvalidInput(format!(
            "Invalid date '{}', expected YYYY-MM-DD",
            date_key
        ))
    })
}

pub fn validate_note_text(notes: &str) -> Result<()> {
    if notes.chars().count() > MAX_NOTE_LEN {
        return Err(Error::InvalidInput(format!(
            "Notes are limited to {} characters",
            MAX_NOTE_LEN
        )));
    }
    Ok(())
}

/// Non-empty field with a short label for the error message.
pub fn require_field(name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(Error::InvalidInput(format!("{} is required", name)))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_focus_minutes() {
        assert_eq!(validate_focus_minutes(SessionKind::DeepWork, None).unwrap(), 90);
        assert_eq!(validate_focus_minutes(SessionKind::FocusInterval, Some(15)).unwrap(), 15);
        assert_eq!(validate_focus_minutes(SessionKind::ThemedInterval, Some(240)).unwrap(), 240);
        assert!(validate_focus_minutes(SessionKind::FocusInterval, Some(0)).is_err());
        assert!(validate_focus_minutes(SessionKind::FocusInterval, Some(600)).is_err());
    }

    #[test]
    fn test_user_id() {
        assert!(validate_user_id("123456789012345678").is_ok());
        assert!(validate_user_id("1").is_ok());
        assert!(validate_user_id("").is_err());
        assert!(validate_user_id("12345678901234567890123").is_err());
        assert!(validate_user_id("12ab").is_err());
        assert!(validate_user_id("../etc").is_err());
    }

    #[test]
    fn test_entity_id() {
        let id = crate::uuid_utils::new_id();
        assert!(validate_entity_id("task", &id).is_ok());
        let err = validate_entity_id("task", "task_1700000000").unwrap_err();
        assert_eq!(err.to_string(), "Invalid input: Invalid task id 'task_1700000000'");
    }

    #[test]
    fn test_task_text() {
        assert!(validate_task_text("Clean kitchen").is_ok());
        assert!(validate_task_text("   ").is_err());
        assert!(validate_task_text(&"x".repeat(501)).is_err());
    }

    #[test]
    fn test_duration_bounds() {
        assert_eq!(validate_duration(5).unwrap(), 5);
        assert_eq!(validate_duration(480).unwrap(), 480);
        assert!(validate_duration(4).is_err());
        assert!(validate_duration(481).is_err());
        assert!(validate_duration(-30).is_err());
    }

    #[test]
    fn test_date_key() {
        assert!(validate_date_key("2026-10-19").is_ok());
        assert!(validate_date_key("2026-02-30").is_err());
        assert!(validate_date_key("today").is_err());
    }

    #[test]
    fn test_note_text_cap() {
        assert!(validate_note_text("").is_ok());
        assert!(validate_note_text(&"n".repeat(10_001)).is_err());
    }
}
