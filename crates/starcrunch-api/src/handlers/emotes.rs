use axum::{response::IntoResponse, Json};
use serde::Serialize;

use starcrunch_core::emotes::{Emote, NAMED_EMOTES, PICTOGRAM_EMOTES};

#[derive(Debug, Serialize)]
pub struct EmoteView {
    #[serde(flatten)]
    pub emote: Emote,
    pub image_url: String,
    /// Ready-made `<img>` markup.
    pub html: String,
}

impl From<&Emote> for EmoteView {
    fn from(emote: &Emote) -> Self {
        Self {
            emote: *emote,
            image_url: emote.image_url(),
            html: emote.html_tag(),
        }
    }
}

/// The emote table for client-side substitution on the dashboard.
pub async fn list_emotes() -> impl IntoResponse {
    let pictograms: Vec<EmoteView> = PICTOGRAM_EMOTES.iter().map(EmoteView::from).collect();
    let named: Vec<EmoteView> = NAMED_EMOTES.iter().map(EmoteView::from).collect();
    Json(serde_json::json!({
        "pictograms": pictograms,
        "named": named,
    }))
}
