//! Reply embeds for the slash commands.
//!
//! Everything is built with plain pictograms and passed through
//! [`render_chat`] last, so the server's custom emotes replace them in one
//! place.

use chrono::Weekday;

use starcrunch_core::emotes;
use starcrunch_core::parser::{parse_weekday, weekday_name};
use starcrunch_core::{render_chat, ExcludedTime, FocusSession, Task, TaskCategory, UserPreferences};

use super::types::{
    truncate, Embed, MessageData, COLOR_GOLD, COLOR_GREEN, COLOR_RED, CONTENT_LIMIT,
};
use crate::services::PlannedTasks;

fn emotify(mut embed: Embed) -> Embed {
    embed.title = embed.title.map(|t| render_chat(&t));
    embed.description = embed.description.map(|d| render_chat(&d));
    for field in &mut embed.fields {
        field.name = render_chat(&field.name);
        field.value = render_chat(&field.value);
    }
    if let Some(footer) = embed.footer.as_mut() {
        footer.text = render_chat(&footer.text);
    }
    embed
}

fn reply(embed: Embed) -> MessageData {
    MessageData::ephemeral_embed(emotify(embed).within_limits())
}

/// Ephemeral plain-text reply with emotes substituted.
pub fn text(message: &str) -> MessageData {
    MessageData::ephemeral_text(truncate(&render_chat(message), CONTENT_LIMIT))
}

fn task_summary(task: &Task) -> String {
    let mut info = format!(
        "**{}**\nCategory: {}\nPriority: {} {}\nDuration: {} minutes\n",
        task.text,
        task.category.label(),
        task.priority.pictogram(),
        task.priority.label(),
        task.duration
    );
    if task.is_appointment {
        info.push_str("⏰ Fixed appointment");
        if let Some(time) = &task.scheduled_time {
            info.push_str(&format!(" at {}", time));
        }
        if let Some(day) = &task.scheduled_day {
            info.push_str(&format!(" on {}", day));
        }
    } else {
        info.push_str("📋 Flexible task");
        if let Some(period) = task.preferred_time {
            info.push_str(&format!(" (best in the {})", period));
        }
        if let Some(day) = &task.scheduled_day {
            info.push_str(&format!(", planned for {}", day));
        }
    }
    info
}

/// Result of `/schedule`.
pub fn scheduled(planned: &PlannedTasks) -> MessageData {
    let mut embed = Embed::new("🦕 Tasks Scheduled!", COLOR_GOLD).description(format!(
        "I've added {} task{} to your mission log:",
        planned.tasks.len(),
        if planned.tasks.len() == 1 { "" } else { "s" }
    ));

    for (i, task) in planned.tasks.iter().enumerate() {
        embed = embed.field(
            format!("{} Task {}", task.category.pictogram(), i + 1),
            task_summary(task),
        );
        if !task.adhd_tips.is_empty() {
            let tips: Vec<String> = task.adhd_tips.iter().take(2).map(|t| format!("🤖 {}", t)).collect();
            embed = embed.field("🧠 ADHD Tips", tips.join("\n"));
        } else if !task.scheduling_suggestions.is_empty() {
            let tips: Vec<&str> = task
                .scheduling_suggestions
                .iter()
                .take(2)
                .map(String::as_str)
                .collect();
            embed = embed.field("💡 Scheduling Tips", tips.join("\n"));
        }
    }

    if let Some(motivation) = &planned.motivation {
        embed = embed.field("🦕 Starcrunch says:", motivation.clone());
    }
    if !planned.overall_suggestions.is_empty() {
        let strategy: Vec<String> = planned
            .overall_suggestions
            .iter()
            .take(3)
            .map(|s| format!("• {}", s))
            .collect();
        embed = embed.field("🚀 Mission Strategy:", strategy.join("\n"));
    }

    let footer = if planned.ai_enhanced() {
        "🤖 Enhanced with AI • Use /show_week to see your full schedule!"
    } else {
        "🚀 Use /show_week to see your full schedule!"
    };
    reply(embed.footer(footer))
}

/// Result of `/show_week`. Pending tasks are grouped by day starting at `today`.
pub fn week(pending: &[Task], completed: &[Task], today: Weekday) -> MessageData {
    if pending.is_empty() && completed.is_empty() {
        return text("🦕 Your mission log is empty! Use `/schedule` to add some tasks, space explorer! 🚀");
    }

    let mut embed = Embed::new("🦕 Your Weekly Mission Schedule", COLOR_GOLD)
        .description("Here's what's planned for your space mission:");

    let mut day = today;
    for _ in 0..7 {
        let lines: Vec<String> = pending
            .iter()
            .filter(|t| t.scheduled_day.as_deref().and_then(parse_weekday) == Some(day))
            .map(pending_line)
            .collect();
        if !lines.is_empty() {
            embed = embed.field(day_heading(day), lines.join("\n"));
        }
        day = day.succ();
    }

    let unscheduled: Vec<String> = pending
        .iter()
        .filter(|t| t.scheduled_day.as_deref().and_then(parse_weekday).is_none())
        .map(pending_line)
        .collect();
    if !unscheduled.is_empty() {
        embed = embed.field("🎯 Anytime", unscheduled.join("\n"));
    }

    if !completed.is_empty() {
        let lines: Vec<String> = completed.iter().map(|t| format!("✅ {}", t.text)).collect();
        embed = embed.field("🏆 Recently Completed", lines.join("\n"));
    }

    reply(embed.footer("🚀 Great job on your space mission progress!"))
}

/// Weekday heading with the day's emote when one is uploaded.
fn day_heading(day: Weekday) -> String {
    let name = weekday_name(day);
    match emotes::lookup(&name.to_lowercase()) {
        Some(emote) if emote.asset_id.is_some() => format!("{} {}", emote.chat_tag(), name),
        _ => format!("🗓️ {}", name),
    }
}

fn pending_line(task: &Task) -> String {
    if task.is_appointment {
        match &task.scheduled_time {
            Some(time) => format!("📅 {} ({})", task.text, time),
            None => format!("📅 {}", task.text),
        }
    } else {
        format!("{} {}", task.priority.pictogram(), task.text)
    }
}

/// Result of `/complete`.
pub fn completed(task: &Task) -> MessageData {
    reply(
        Embed::new("🦕 Mission Accomplished!", COLOR_GREEN)
            .description(format!("Great job completing: **{}**", task.text))
            .field("🏆 Achievement Unlocked", "Space Explorer - Task completed successfully!")
            .footer("🚀 Keep up the stellar work!"),
    )
}

pub fn task_not_found() -> MessageData {
    text("🦕 I couldn't find that task in your mission log. Try using `/show_week` to see your tasks!")
}

/// Result of `/exclude`.
pub fn excluded(day: &str, time_range: &str, all: &[ExcludedTime]) -> MessageData {
    let lines: Vec<String> = all
        .iter()
        .map(|e| format!("• {} {}", title_case(&e.day), e.time_range))
        .collect();
    reply(
        Embed::new("🦕 Time Exclusion Added!", COLOR_GOLD)
            .description(format!(
                "I've noted that you're unavailable on **{}** during **{}**",
                day, time_range
            ))
            .field("📅 Your Excluded Times", lines.join("\n"))
            .footer("🚀 I'll avoid scheduling tasks during these times!"),
    )
}

/// Result of `/set_duration`.
pub fn duration_set(category: TaskCategory, minutes: u32, prefs: &UserPreferences) -> MessageData {
    let lines: Vec<String> = TaskCategory::ALL
        .iter()
        .map(|c| format!("• {}: {} minutes", c.label(), prefs.duration_for(*c)))
        .collect();
    reply(
        Embed::new("🦕 Duration Updated!", COLOR_GOLD)
            .description(format!(
                "I've set **{}** tasks to **{} minutes**",
                category.label(),
                minutes
            ))
            .field("⏰ Your Custom Durations", lines.join("\n"))
            .footer("🚀 These durations will be used for future task scheduling!"),
    )
}

/// Result of `/focus`.
pub fn focus_started(session: &FocusSession) -> MessageData {
    reply(
        Embed::new("🦕 Focus Mode: Engaged!", COLOR_GOLD)
            .description(format!(
                "Starting a **{}** session for **{} minutes**.",
                session.kind, session.duration
            ))
            .field(
                "🎯 Mission Rules",
                "• One task only\n• Phone face down\n• Water within reach",
            )
            .footer("🚀 Mark it complete on your dashboard when you land!"),
    )
}

/// `/help`.
pub fn help() -> MessageData {
    reply(
        Embed::new("🦕🚀 Starcrunch Command Center", COLOR_GOLD)
            .description(
                "Hey there, space explorer! I'm Starcrunch, your friendly dinosaur astronaut \
                 assistant. Here's how I can help you manage your mission:",
            )
            .field(
                "📋 `/schedule [tasks]`",
                "Add tasks to your mission log\n*Example: `/schedule Clean kitchen, Dentist 2pm Tuesday, Buy groceries`*",
            )
            .field("📅 `/show_week`", "Display your weekly schedule and mission progress")
            .field(
                "✅ `/complete [task]`",
                "Mark a task as completed\n*Example: `/complete Clean kitchen`*",
            )
            .field(
                "🚫 `/exclude [day] [time_range]`",
                "Set times when you're unavailable\n*Example: `/exclude Monday 9am-5pm`*",
            )
            .field(
                "⏰ `/set_duration [task_type] [minutes]`",
                "Set custom duration for task types\n*Example: `/set_duration cleaning 30`*",
            )
            .field(
                "🎯 `/focus [kind] [minutes]`",
                "Start a focus session\n*Example: `/focus deep-work 60`*",
            )
            .field(
                "✨ Smart Features",
                "• 🤖 AI-powered task analysis and ADHD-friendly tips\n\
                 • 📅 Automatic appointment detection with times\n\
                 • 🔍 Smart categorization (cleaning, errands, work, etc.)\n\
                 • ⚡ Priority detection from your language\n\
                 • 🚫 Respects your excluded times",
            )
            .footer("🚀 Ready to launch your productivity into orbit!"),
    )
}

/// Validation problems are shown to the user; anything else is generic.
pub fn error(err: &starcrunch_core::Error) -> MessageData {
    match err {
        starcrunch_core::Error::InvalidInput(msg) => text(&format!("🦕 {}", msg)),
        _ => reply(
            Embed::new("⚠️ Houston, we have a problem", COLOR_RED)
                .description("Something went wrong on my end. Please try again in a moment."),
        ),
    }
}

fn title_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
