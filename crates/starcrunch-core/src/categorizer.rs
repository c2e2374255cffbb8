//! Keyword-based task categorization.
//!
//! Matching is a case-insensitive substring test. Categories are checked in
//! declaration order and the first hit wins, so "call mom" lands in
//! `appointment` (via "call") before `personal` is ever consulted.

use crate::models::{TaskCategory, TaskPriority};

/// Keyword lists per category, in match order.
pub const CATEGORY_KEYWORDS: &[(TaskCategory, &[&str])] = &[
    (
        TaskCategory::Appointment,
        &["dentist", "doctor", "meeting", "appointment", "call", "visit", "checkup"],
    ),
    (
        TaskCategory::Cleaning,
        &["clean", "vacuum", "dishes", "laundry", "tidy", "sweep", "mop", "dust"],
    ),
    (
        TaskCategory::Errand,
        &["grocery", "shopping", "bank", "post office", "store", "pickup", "drop off"],
    ),
    (
        TaskCategory::Work,
        &["work", "project", "deadline", "presentation", "report", "email"],
    ),
    (
        TaskCategory::Personal,
        &["exercise", "workout", "read", "call mom", "call dad", "family"],
    ),
];

pub const HIGH_PRIORITY_KEYWORDS: &[&str] = &["urgent", "important", "asap", "priority", "deadline"];

pub const LOW_PRIORITY_KEYWORDS: &[&str] = &["maybe", "eventually", "when possible", "someday"];

/// Category and priority derived from text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Categorization {
    pub category: TaskCategory,
    pub priority: TaskPriority,
}

/// Categorize free text. Never fails; unknown text is generic/medium.
pub fn categorize(text: &str) -> Categorization {
    let lower = text.to_lowercase();
    Categorization {
        category: category_of(&lower),
        priority: priority_of(&lower),
    }
}

fn category_of(lower: &str) -> TaskCategory {
    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| contains_any(lower, keywords))
        .map(|(category, _)| *category)
        .unwrap_or(TaskCategory::Generic)
}

fn priority_of(lower: &str) -> TaskPriority {
    if contains_any(lower, HIGH_PRIORITY_KEYWORDS) {
        TaskPriority::High
    } else if contains_any(lower, LOW_PRIORITY_KEYWORDS) {
        TaskPriority::Low
    } else {
        TaskPriority::Medium
    }
}

fn contains_any(haystack: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| haystack.contains(k))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cleaning_keyword() {
        let c = categorize("Vacuum the living room");
        assert_eq!(c.category, TaskCategory::Cleaning);
        assert_eq!(c.priority, TaskPriority::Medium);
    }

    #[test]
    fn test_clean_kitchen_urgent() {
        let c = categorize("Clean kitchen urgent");
        assert_eq!(c.category, TaskCategory::Cleaning);
        assert_eq!(c.priority, TaskPriority::High);
    }

    #[test]
    fn test_appointment_wins_over_cleaning() {
        // Both "dentist" and "clean" match; appointment is declared first
        let c = categorize("Dentist teeth cleaning");
        assert_eq!(c.category, TaskCategory::Appointment);
    }

    #[test]
    fn test_call_mom_is_appointment() {
        assert_eq!(categorize("call mom").category, TaskCategory::Appointment);
    }

    #[test]
    fn test_substring_matching() {
        // "read" inside "spreadsheet" still counts
        assert_eq!(categorize("Spreadsheet").category, TaskCategory::Personal);
        assert_eq!(categorize("Drop off package").category, TaskCategory::Errand);
    }

    #[test]
    fn test_high_priority_regardless_of_category() {
        assert_eq!(categorize("buy milk asap").priority, TaskPriority::High);
        assert_eq!(categorize("IMPORTANT thing").priority, TaskPriority::High);
    }

    #[test]
    fn test_high_checked_before_low() {
        let c = categorize("maybe urgent");
        assert_eq!(c.priority, TaskPriority::High);
    }

    #[test]
    fn test_low_priority() {
        let c = categorize("learn guitar someday");
        assert_eq!(c.priority, TaskPriority::Low);
        assert_eq!(c.category, TaskCategory::Generic);
    }

    #[test]
    fn test_deadline_is_work_and_high() {
        let c = categorize("Tax deadline");
        assert_eq!(c.category, TaskCategory::Work);
        assert_eq!(c.priority, TaskPriority::High);
    }

    #[test]
    fn test_empty_text_is_generic_medium() {
        let c = categorize("");
        assert_eq!(c.category, TaskCategory::Generic);
        assert_eq!(c.priority, TaskPriority::Medium);
    }
}
