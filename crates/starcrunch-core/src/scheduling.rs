//! Scheduling assignment.
//!
//! Turns a [`TaskDraft`] into a [`CreateTaskRequest`] using the user's
//! preferences record: duration, preferred period, suggestions and (for
//! flexible tasks without a day) the first day in the coming week whose
//! preferred window is not swallowed by excluded ranges.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::defaults::SCHEDULING_HORIZON_DAYS;
use crate::error::{Error, Result};
use crate::models::{
    CreateTaskRequest, ExcludedTime, PreferredPeriod, TaskCategory, TaskPriority, UserPreferences,
};
use crate::parser::{parse_weekday, weekday_name, TaskDraft};

const MINUTES_PER_DAY: u32 = 24 * 60;

// =============================================================================
// EXCLUDED RANGES
// =============================================================================

/// Which days an excluded range applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DaySpec {
    Day(Weekday),
    Weekdays,
    Weekends,
    Daily,
}

impl DaySpec {
    pub fn parse(s: &str) -> Result<Self> {
        let lower = s.trim().to_lowercase();
        match lower.as_str() {
            "weekdays" | "weekday" => Ok(DaySpec::Weekdays),
            "weekends" | "weekend" => Ok(DaySpec::Weekends),
            "daily" | "everyday" | "every day" | "all" => Ok(DaySpec::Daily),
            other => parse_weekday(other).map(DaySpec::Day).ok_or_else(|| {
                Error::InvalidInput(format!(
                    "Unknown day '{}'. Use a weekday name, weekdays, weekends or daily",
                    s.trim()
                ))
            }),
        }
    }

    pub fn includes(&self, day: Weekday) -> bool {
        let weekend = matches!(day, Weekday::Sat | Weekday::Sun);
        match self {
            DaySpec::Day(d) => *d == day,
            DaySpec::Weekdays => !weekend,
            DaySpec::Weekends => weekend,
            DaySpec::Daily => true,
        }
    }
}

/// Half-open range of minutes since midnight.
///
/// A range with `end < start` runs past midnight into the next day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: u32,
    pub end: u32,
}

static RANGE_SPLIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*(?:-|–|\bto\b)\s*").unwrap());

static CLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2})(?::(\d{2}))?\s*(am|pm)?$").unwrap());

/// A clock reading before meridiem resolution.
#[derive(Debug, Clone, Copy)]
struct Clock {
    hour: u32,
    minute: u32,
    pm: Option<bool>,
}

impl Clock {
    fn parse(s: &str) -> Option<Clock> {
        let caps = CLOCK.captures(s.trim())?;
        let hour: u32 = caps.get(1)?.as_str().parse().ok()?;
        let minute: u32 = match caps.get(2) {
            Some(m) => m.as_str().parse().ok()?,
            None => 0,
        };
        let pm = caps.get(3).map(|m| m.as_str() == "pm");
        let hour_ok = match pm {
            Some(_) => (1..=12).contains(&hour),
            None => hour <= 24,
        };
        (hour_ok && minute < 60).then_some(Clock { hour, minute, pm })
    }

    fn minutes(&self, pm: Option<bool>) -> u32 {
        let hour = match pm {
            Some(true) if self.hour < 12 => self.hour + 12,
            Some(false) if self.hour == 12 => 0,
            _ => self.hour,
        };
        hour * 60 + self.minute
    }
}

impl TimeRange {
    pub const ALL_DAY: TimeRange = TimeRange {
        start: 0,
        end: MINUTES_PER_DAY,
    };

    /// Parse "9am-5pm", "09:00-17:30", "9-5pm", "10pm-7am" or "all day".
    ///
    /// A side without am/pm takes whichever meridiem keeps the range inside
    /// one day ("9-5pm" is 09:00 to 17:00, "10-7am" is 22:00 to 07:00). An
    /// end of midnight means the end of the day, and an end earlier than the
    /// start wraps overnight.
    pub fn parse(s: &str) -> Result<Self> {
        let lower = s.trim().to_lowercase();
        if matches!(lower.as_str(), "all day" | "allday" | "all-day") {
            return Ok(TimeRange::ALL_DAY);
        }

        let invalid = || {
            Error::InvalidInput(format!(
                "Invalid time range '{}'. Examples: 9am-5pm, 09:00-17:30, 10pm-7am, all day",
                s.trim()
            ))
        };

        let parts: Vec<&str> = RANGE_SPLIT.splitn(&lower, 2).collect();
        let [start, end] = parts.as_slice() else {
            return Err(invalid());
        };
        let start = Clock::parse(start).ok_or_else(invalid)?;
        let end = Clock::parse(end).ok_or_else(invalid)?;

        let (start_min, end_min) = match (start.pm, end.pm) {
            (None, Some(pm)) => {
                let e = end_of_day(end.minutes(Some(pm)));
                let s = start.minutes(Some(pm));
                if s < e {
                    (s, e)
                } else {
                    (start.minutes(Some(!pm)), e)
                }
            }
            (Some(pm), None) => {
                let s = start.minutes(Some(pm));
                let e = end_of_day(end.minutes(Some(pm)));
                if e > s {
                    (s, e)
                } else {
                    (s, end_of_day(end.minutes(Some(!pm))))
                }
            }
            (s_pm, e_pm) => (start.minutes(s_pm), end_of_day(end.minutes(e_pm))),
        };

        if start_min == end_min || start_min >= MINUTES_PER_DAY || end_min > MINUTES_PER_DAY {
            return Err(invalid());
        }
        Ok(TimeRange {
            start: start_min,
            end: end_min,
        })
    }

    pub fn wraps(&self) -> bool {
        self.end < self.start
    }

    pub fn len(&self) -> u32 {
        if self.wraps() {
            MINUTES_PER_DAY - self.start + self.end
        } else {
            self.end - self.start
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The part of the range on its own day, and the part spilling into
    /// the next day for overnight ranges.
    pub fn split_at_midnight(&self) -> (TimeRange, Option<TimeRange>) {
        if self.wraps() {
            (
                TimeRange {
                    start: self.start,
                    end: MINUTES_PER_DAY,
                },
                Some(TimeRange {
                    start: 0,
                    end: self.end,
                }),
            )
        } else {
            (*self, None)
        }
    }
}

fn end_of_day(minutes: u32) -> u32 {
    if minutes == 0 {
        MINUTES_PER_DAY
    } else {
        minutes
    }
}

/// A parsed excluded range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Exclusion {
    pub days: DaySpec,
    pub range: TimeRange,
}

impl Exclusion {
    pub fn parse(day: &str, time_range: &str) -> Result<Self> {
        Ok(Exclusion {
            days: DaySpec::parse(day)?,
            range: TimeRange::parse(time_range)?,
        })
    }

    /// Blocked minutes on `day`. An overnight range blocks the evening of
    /// each listed day and the early hours of the day after.
    pub fn blocked_on(&self, day: Weekday) -> Vec<TimeRange> {
        let (same_day, next_day) = self.range.split_at_midnight();
        let mut blocked = Vec::with_capacity(2);
        if self.days.includes(day) {
            blocked.push(same_day);
        }
        if let Some(spill) = next_day {
            if self.days.includes(day.pred()) {
                blocked.push(spill);
            }
        }
        blocked
    }
}

impl TryFrom<&ExcludedTime> for Exclusion {
    type Error = Error;

    fn try_from(value: &ExcludedTime) -> Result<Self> {
        Exclusion::parse(&value.day, &value.time_range)
    }
}

/// Reject preferences whose excluded ranges do not parse.
pub fn validate_excluded_times(excluded: &[ExcludedTime]) -> Result<()> {
    excluded.iter().try_for_each(|e| Exclusion::try_from(e).map(|_| ()))
}

// =============================================================================
// PERIOD WINDOWS
// =============================================================================

/// Window for a preferred period in minutes since midnight.
pub fn period_window(period: PreferredPeriod) -> TimeRange {
    let (start_h, end_h) = match period {
        PreferredPeriod::Morning => (8, 12),
        PreferredPeriod::Afternoon => (12, 17),
        PreferredPeriod::Evening => (17, 21),
        PreferredPeriod::Weekend | PreferredPeriod::Any => (8, 21),
    };
    TimeRange {
        start: start_h * 60,
        end: end_h * 60,
    }
}

/// Longest stretch of `window` not covered by any exclusion for `day`.
pub fn longest_free_block(window: TimeRange, day: Weekday, exclusions: &[Exclusion]) -> u32 {
    let mut blocked: Vec<TimeRange> = exclusions
        .iter()
        .flat_map(|e| e.blocked_on(day))
        .filter(|r| r.end > window.start && r.start < window.end)
        .collect();
    blocked.sort_by_key(|r| r.start);

    let mut longest = 0;
    let mut cursor = window.start;
    for range in blocked {
        if range.start > cursor {
            longest = longest.max(range.start - cursor);
        }
        cursor = cursor.max(range.end);
        if cursor >= window.end {
            break;
        }
    }
    if window.end > cursor {
        longest = longest.max(window.end - cursor);
    }
    longest
}

/// First date in the horizon with a free block of `duration` minutes inside
/// the period window. When every day conflicts, falls back to the first
/// date the period allows.
pub fn pick_day(
    today: NaiveDate,
    period: PreferredPeriod,
    duration: u32,
    exclusions: &[Exclusion],
) -> NaiveDate {
    let window = period_window(period);
    let candidates: Vec<NaiveDate> = (0..SCHEDULING_HORIZON_DAYS)
        .map(|offset| today + Duration::days(i64::from(offset)))
        .filter(|date| {
            period != PreferredPeriod::Weekend
                || matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
        })
        .collect();
    candidates
        .iter()
        .copied()
        .find(|date| longest_free_block(window, date.weekday(), exclusions) >= duration)
        .or_else(|| candidates.first().copied())
        .unwrap_or(today)
}

// =============================================================================
// ASSIGNMENT
// =============================================================================

/// Rule-based advice per category and priority.
pub fn scheduling_suggestions(category: TaskCategory, priority: TaskPriority) -> Vec<String> {
    let lines: &[&str] = match category {
        TaskCategory::Cleaning => &["🌅 Best done in the morning when energy is high"],
        TaskCategory::Errand => &[
            "🛍️ Consider batching with other errands",
            "🏪 Check store hours before scheduling",
        ],
        TaskCategory::Work => &["⏰ Schedule during your peak focus hours"],
        _ if priority == TaskPriority::High => &["🔥 High priority - schedule ASAP"],
        _ => &[],
    };
    lines.iter().map(|s| s.to_string()).collect()
}

/// Parse the user's excluded ranges, skipping entries that no longer parse.
pub fn exclusions_of(prefs: &UserPreferences) -> Vec<Exclusion> {
    prefs
        .excluded_times
        .iter()
        .filter_map(|e| match Exclusion::try_from(e) {
            Ok(ex) => Some(ex),
            Err(err) => {
                debug!(day = %e.day, time_range = %e.time_range, error = %err, "Skipping unparseable exclusion");
                None
            }
        })
        .collect()
}

/// Assign duration, period, suggestions and day to one draft.
pub fn assign(draft: TaskDraft, prefs: &UserPreferences, today: NaiveDate) -> CreateTaskRequest {
    let duration = draft
        .duration
        .filter(|d| *d > 0)
        .unwrap_or_else(|| prefs.duration_for(draft.category));
    let suggestions = scheduling_suggestions(draft.category, draft.priority);

    let (preferred_time, scheduled_day) = if draft.scheduled_time.is_some() {
        // Fixed appointment: keep what the user said, invent nothing
        (None, draft.scheduled_day)
    } else {
        let period = draft
            .preferred_time
            .unwrap_or_else(|| prefs.period_for(draft.category));
        let day = draft.scheduled_day.or_else(|| {
            let exclusions = exclusions_of(prefs);
            let date = pick_day(today, period, duration, &exclusions);
            Some(weekday_name(date.weekday()).to_string())
        });
        (Some(period), day)
    };

    debug!(
        category = %draft.category,
        duration,
        scheduled_day = ?scheduled_day,
        appointment = draft.scheduled_time.is_some(),
        "Assigned schedule"
    );

    CreateTaskRequest {
        is_appointment: draft.scheduled_time.is_some() || draft.is_appointment,
        text: draft.text,
        category: draft.category,
        priority: draft.priority,
        duration,
        scheduled_time: draft.scheduled_time,
        scheduled_day,
        preferred_time,
        ai_enhanced: draft.ai_enhanced,
        adhd_tips: draft.adhd_tips,
        scheduling_suggestions: suggestions,
    }
}

/// Assign every draft in order.
pub fn assign_all(
    drafts: Vec<TaskDraft>,
    prefs: &UserPreferences,
    today: NaiveDate,
) -> Vec<CreateTaskRequest> {
    drafts.into_iter().map(|d| assign(d, prefs, today)).collect()
}
