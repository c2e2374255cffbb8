//! Pictogram to custom emote substitution.
//!
//! Chat output swaps pictograms for the server's custom emotes
//! (`<:name:id>`); HTML output swaps them for image tags. A pictogram whose
//! emote has no uploaded asset yet is left as the pictogram in chat.

use serde::Serialize;

/// Base URL for uploaded emote images.
pub const EMOTE_CDN_URL: &str = "https://cdn.discordapp.com/emojis";

/// Local fallback directory for emote images.
pub const LOCAL_EMOTE_PATH: &str = "/static/emotes";

/// One custom emote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Emote {
    /// Pictogram or lookup name the emote replaces.
    pub key: &'static str,
    /// Emote name on the chat platform.
    pub name: &'static str,
    /// Platform asset id, `None` until uploaded.
    pub asset_id: Option<&'static str>,
    pub animated: bool,
}

const fn emote(key: &'static str, name: &'static str, asset_id: Option<&'static str>) -> Emote {
    Emote {
        key,
        name,
        asset_id,
        animated: false,
    }
}

/// Pictograms substituted in rendered text.
pub const PICTOGRAM_EMOTES: &[Emote] = &[
    emote("🦕", "starcrunch", Some("1392407227394035814")),
    emote("🚀", "starcrunch2", None),
    emote("📅", "appntmt", Some("1392405806481145906")),
    emote("🧹", "clean2", Some("1392405854535286836")),
    emote("🛍️", "shopping", Some("1392407207626408026")),
    emote("💼", "worktask", None),
    emote("👤", "personal", None),
    emote("📋", "general", Some("1392406970325274636")),
    emote("🔥", "highP", Some("1392407013564219392")),
    emote("⚡", "mediumP", Some("1392407045210243072")),
    emote("💤", "lowP", Some("1392407030584574172")),
    emote("📡", "connected", Some("1392406868458082414")),
    emote("⏰", "peakfocus", Some("1392407141289164921")),
    emote("🎯", "personaltask", Some("1392407168120258560")),
    emote("🌅", "morningtask", None),
    emote("☀️", "afternoontask", Some("1392405316737564762")),
    emote("🌙", "nighttask", Some("1392407123417239552")),
    emote("🏪", "store", None),
    emote("📁", "data", Some("1392406884795027526")),
    emote("⚠️", "error", Some("1392406934401056788")),
    emote("❌", "missed", None),
    emote("🔍", "search", Some("1392407193294475264")),
    emote("🛒", "errand", Some("1392406920505327719")),
    emote("🎮", "gamingtask", Some("1392406957469601793")),
    emote("💻", "worktask2", Some("1392405403916173393")),
    emote("⭐", "4ptstar", Some("1392405561110433802")),
    emote("🌟", "5ptstar", Some("1392405575056232478")),
    emote("✨", "8ptstar", Some("1392405584963174431")),
    emote("🦶", "dinopaw", Some("1392406904613113868")),
    emote("📝", "todo", None),
    emote("📦", "batcherrands", Some("1392405821627043870")),
];

/// Emotes looked up by name (weekdays, banners); never substituted in text.
pub const NAMED_EMOTES: &[Emote] = &[
    emote("monday", "monday", Some("1392407080782135336")),
    emote("tuesday", "tuesday", None),
    emote("wednesday", "wednesday", None),
    emote("thursday", "thursday", None),
    emote("friday", "friday", None),
    emote("saturday", "saturday", Some("1392407182292684820")),
    emote("sunday", "sunday", None),
    Emote {
        key: "info_banner",
        name: "info_banner",
        asset_id: Some("1393082430218436788"),
        animated: true,
    },
    Emote {
        key: "banner",
        name: "banner",
        asset_id: Some("1393084917839171624"),
        animated: true,
    },
];

impl Emote {
    /// Inline chat tag, or the key itself when no asset exists.
    pub fn chat_tag(&self) -> String {
        match self.asset_id {
            Some(id) if self.animated => format!("<a:{}:{}>", self.name, id),
            Some(id) => format!("<:{}:{}>", self.name, id),
            None => self.key.to_string(),
        }
    }

    /// Image URL: the platform CDN when uploaded, else the local asset.
    pub fn image_url(&self) -> String {
        match self.asset_id {
            Some(id) => {
                let ext = if self.animated { "gif" } else { "png" };
                format!("{}/{}.{}", EMOTE_CDN_URL, id, ext)
            }
            None => format!("{}/{}.png", LOCAL_EMOTE_PATH, self.name),
        }
    }

    pub fn html_tag(&self) -> String {
        format!(
            r#"<img class="emote" src="{}" alt="{}" title="{}">"#,
            self.image_url(),
            self.key,
            self.name
        )
    }
}

/// Find an emote by pictogram, or by name case-insensitively.
pub fn lookup(key: &str) -> Option<&'static Emote> {
    PICTOGRAM_EMOTES
        .iter()
        .find(|e| e.key == key)
        .or_else(|| {
            let lower = key.to_lowercase();
            NAMED_EMOTES.iter().find(|e| e.key == lower)
        })
}

/// Replace every known pictogram in `text` with its chat tag.
pub fn render_chat(text: &str) -> String {
    PICTOGRAM_EMOTES
        .iter()
        .filter(|e| e.asset_id.is_some())
        .fold(text.to_string(), |acc, e| acc.replace(e.key, &e.chat_tag()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_keys_are_unique() {
        let mut seen = HashSet::new();
        for e in PICTOGRAM_EMOTES.iter().chain(NAMED_EMOTES) {
            assert!(seen.insert(e.key), "duplicate emote key {}", e.key);
        }
    }

    fn chat(key: &str) -> String {
        lookup(key).map(Emote::chat_tag).unwrap()
    }

    #[test]
    fn test_chat_tag_with_asset() {
        assert_eq!(chat("🦕"), "<:starcrunch:1392407227394035814>");
    }

    #[test]
    fn test_chat_tag_without_asset_keeps_pictogram() {
        assert_eq!(chat("🚀"), "🚀");
        assert!(lookup("🐙").is_none());
    }

    #[test]
    fn test_named_lookup_is_case_insensitive() {
        assert_eq!(chat("Monday"), "<:monday:1392407080782135336>");
        assert_eq!(chat("banner"), "<a:banner:1393084917839171624>");
    }

    #[test]
    fn test_render_chat() {
        let out = render_chat("🦕 Tasks Scheduled! 🚀");
        assert_eq!(out, "<:starcrunch:1392407227394035814> Tasks Scheduled! 🚀");
    }

    #[test]
    fn test_render_chat_leaves_day_names() {
        assert_eq!(render_chat("See you monday"), "See you monday");
    }

    #[test]
    fn test_html_tag_uses_cdn_and_local_fallback() {
        let fire = lookup("🔥").unwrap().html_tag();
        assert!(fire.contains("https://cdn.discordapp.com/emojis/1392407013564219392.png"));
        assert!(fire.contains(r#"alt="🔥""#));
        let work = lookup("💼").unwrap().html_tag();
        assert!(work.contains("/static/emotes/worktask.png"));
    }

    #[test]
    fn test_category_and_priority_pictograms_have_emotes() {
        use crate::models::{TaskCategory, TaskPriority};
        for c in TaskCategory::ALL {
            assert!(lookup(c.pictogram()).is_some(), "{c} pictogram has no emote");
        }
        for p in [TaskPriority::High, TaskPriority::Medium, TaskPriority::Low] {
            assert!(lookup(p.pictogram()).is_some());
        }
    }
}
