//! Discord interaction payloads (the subset Starcrunch uses).

use serde::{Deserialize, Serialize};

pub const INTERACTION_PING: u8 = 1;
pub const INTERACTION_APPLICATION_COMMAND: u8 = 2;

pub const RESPONSE_PONG: u8 = 1;
pub const RESPONSE_CHANNEL_MESSAGE: u8 = 4;
pub const RESPONSE_DEFERRED_CHANNEL_MESSAGE: u8 = 5;

/// Message flag: only the invoking user sees the reply.
pub const FLAG_EPHEMERAL: u64 = 1 << 6;

/// Embed accent colours.
pub const COLOR_GOLD: u32 = 0xDAA520;
pub const COLOR_GREEN: u32 = 0x4ADE80;
pub const COLOR_RED: u32 = 0xEF4444;

/// Incoming interaction.
#[derive(Debug, Clone, Deserialize)]
pub struct Interaction {
    #[serde(rename = "type")]
    pub kind: u8,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub application_id: String,
    /// Continuation token for follow-up edits (valid for 15 minutes).
    #[serde(default)]
    pub token: String,
    pub data: Option<CommandData>,
    /// Present for guild invocations.
    pub member: Option<Member>,
    /// Present for DM invocations.
    pub user: Option<DiscordUser>,
}

impl Interaction {
    /// The invoking user's snowflake, from `member.user` or `user`.
    pub fn user_id(&self) -> Option<&str> {
        self.member
            .as_ref()
            .map(|m| &m.user)
            .or(self.user.as_ref())
            .map(|u| u.id.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Member {
    pub user: DiscordUser,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiscordUser {
    pub id: String,
    #[serde(default)]
    pub username: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommandData {
    pub name: String,
    #[serde(default)]
    pub options: Vec<CommandOption>,
}

impl CommandData {
    /// String value of an option.
    pub fn string(&self, name: &str) -> Option<&str> {
        self.option(name).and_then(|v| v.as_str())
    }

    /// Integer value of an option.
    pub fn integer(&self, name: &str) -> Option<i64> {
        self.option(name).and_then(|v| v.as_i64())
    }

    fn option(&self, name: &str) -> Option<&serde_json::Value> {
        self.options.iter().find(|o| o.name == name).map(|o| &o.value)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommandOption {
    pub name: String,
    #[serde(default)]
    pub value: serde_json::Value,
}

/// Reply to an interaction.
#[derive(Debug, Clone, Serialize)]
pub struct InteractionResponse {
    #[serde(rename = "type")]
    pub kind: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<MessageData>,
}

impl InteractionResponse {
    pub fn pong() -> Self {
        Self {
            kind: RESPONSE_PONG,
            data: None,
        }
    }

    /// Ephemeral "thinking..." acknowledgment.
    pub fn deferred() -> Self {
        Self {
            kind: RESPONSE_DEFERRED_CHANNEL_MESSAGE,
            data: Some(MessageData {
                flags: Some(FLAG_EPHEMERAL),
                ..Default::default()
            }),
        }
    }

    pub fn message(data: MessageData) -> Self {
        Self {
            kind: RESPONSE_CHANNEL_MESSAGE,
            data: Some(data),
        }
    }
}

/// Message body, also used for editing the original response.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MessageData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub embeds: Vec<Embed>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flags: Option<u64>,
}

impl MessageData {
    pub fn ephemeral_embed(embed: Embed) -> Self {
        Self {
            content: None,
            embeds: vec![embed],
            flags: Some(FLAG_EPHEMERAL),
        }
    }

    pub fn ephemeral_text(text: impl Into<String>) -> Self {
        Self {
            content: Some(text.into()),
            embeds: Vec::new(),
            flags: Some(FLAG_EPHEMERAL),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Embed {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<EmbedField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<EmbedFooter>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmbedFooter {
    pub text: String,
}

pub const TITLE_LIMIT: usize = 256;
pub const DESCRIPTION_LIMIT: usize = 4096;
pub const FIELD_NAME_LIMIT: usize = 256;
pub const FIELD_VALUE_LIMIT: usize = 1024;
pub const FOOTER_LIMIT: usize = 2048;
/// Sum of every title, description, field and footer character.
pub const EMBED_TOTAL_LIMIT: usize = 6000;
pub const MAX_FIELDS: usize = 25;
/// Plain message content.
pub const CONTENT_LIMIT: usize = 2000;

impl Embed {
    pub fn new(title: impl Into<String>, color: u32) -> Self {
        Self {
            title: Some(title.into()),
            color: Some(color),
            ..Default::default()
        }
    }

    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    /// Append a non-inline field.
    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push(EmbedField {
            name: name.into(),
            value: value.into(),
            inline: false,
        });
        self
    }

    pub fn footer(mut self, text: impl Into<String>) -> Self {
        self.footer = Some(EmbedFooter { text: text.into() });
        self
    }

    /// Characters Discord counts against [`EMBED_TOTAL_LIMIT`].
    pub fn total_chars(&self) -> usize {
        let count = |s: &str| s.chars().count();
        self.title.as_deref().map_or(0, count)
            + self.description.as_deref().map_or(0, count)
            + self
                .fields
                .iter()
                .map(|f| count(&f.name) + count(&f.value))
                .sum::<usize>()
            + self.footer.as_ref().map_or(0, |f| count(&f.text))
    }

    /// Enforce Discord's embed limits on the final text.
    ///
    /// Must run after emote substitution, since custom emote tags are much
    /// longer than the pictograms they replace. Trailing fields are dropped
    /// until the whole embed fits.
    pub fn within_limits(mut self) -> Self {
        self.title = self.title.map(|t| truncate(&t, TITLE_LIMIT));
        self.description = self.description.map(|d| truncate(&d, DESCRIPTION_LIMIT));
        self.fields.truncate(MAX_FIELDS);
        for field in &mut self.fields {
            field.name = truncate(&field.name, FIELD_NAME_LIMIT);
            field.value = truncate(&field.value, FIELD_VALUE_LIMIT);
        }
        if let Some(footer) = self.footer.as_mut() {
            footer.text = truncate(&footer.text, FOOTER_LIMIT);
        }
        while self.total_chars() > EMBED_TOTAL_LIMIT && self.fields.pop().is_some() {}
        if self.total_chars() > EMBED_TOTAL_LIMIT {
            self.description = None;
        }
        self
    }
}

/// Cut `text` to at most `limit` characters, ending in an ellipsis.
///
/// Whole lines are kept when possible, and a custom emote tag is never
/// split.
pub fn truncate(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let mut out: String = text.chars().take(limit.saturating_sub(1)).collect();
    if let Some(newline) = out.rfind('\n') {
        out.truncate(newline + 1);
    } else if let Some(open) = out.rfind('<') {
        if !out[open..].contains('>') {
            out.truncate(open);
        }
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_from_member_or_user() {
        let guild: Interaction = serde_json::from_value(serde_json::json!({
            "type": 2, "member": {"user": {"id": "111"}}
        }))
        .unwrap();
        assert_eq!(guild.user_id(), Some("111"));

        let dm: Interaction = serde_json::from_value(serde_json::json!({
            "type": 2, "user": {"id": "222", "username": "rex"}
        }))
        .unwrap();
        assert_eq!(dm.user_id(), Some("222"));
    }

    #[test]
    fn test_option_accessors() {
        let data: CommandData = serde_json::from_value(serde_json::json!({
            "name": "set_duration",
            "options": [
                {"name": "task_type", "type": 3, "value": "cleaning"},
                {"name": "minutes", "type": 4, "value": 30}
            ]
        }))
        .unwrap();
        assert_eq!(data.string("task_type"), Some("cleaning"));
        assert_eq!(data.integer("minutes"), Some(30));
        assert_eq!(data.string("minutes"), None);
    }

    #[test]
    fn test_deferred_response_is_ephemeral() {
        let json = serde_json::to_value(InteractionResponse::deferred()).unwrap();
        assert_eq!(json["type"], 5);
        assert_eq!(json["data"]["flags"], 64);
        assert!(json["data"].get("embeds").is_none());
    }

    #[test]
    fn test_long_field_values_are_truncated() {
        let embed = Embed::new("t", COLOR_GOLD)
            .field("f", "x".repeat(2000))
            .within_limits();
        assert_eq!(embed.fields[0].value.chars().count(), FIELD_VALUE_LIMIT);
        assert!(embed.fields[0].value.ends_with('…'));
    }

    #[test]
    fn test_truncate_keeps_whole_lines() {
        let text = format!("{}\n{}", "a".repeat(10), "b".repeat(10));
        assert_eq!(truncate(&text, 15), format!("{}\n…", "a".repeat(10)));
    }

    #[test]
    fn test_truncate_never_splits_an_emote_tag() {
        let text = format!("{}<:fire:1392407134951579668> hot", "x".repeat(10));
        let cut = truncate(&text, 20);
        assert_eq!(cut, format!("{}…", "x".repeat(10)));
    }

    #[test]
    fn test_oversized_embed_drops_trailing_fields() {
        let mut embed = Embed::new("t", COLOR_GOLD).footer("footer");
        for i in 0..30 {
            embed = embed.field(format!("field {}", i), "y".repeat(900));
        }
        let embed = embed.within_limits();
        assert!(embed.fields.len() < MAX_FIELDS);
        assert!(embed.total_chars() <= EMBED_TOTAL_LIMIT);
        assert_eq!(embed.fields[0].name, "field 0");
        assert!(embed.footer.is_some());
    }
}
