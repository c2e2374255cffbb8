//! Discord slash commands over the HTTP interactions endpoint.
//!
//! Discord POSTs every interaction to `/discord/interactions`. Each request
//! is signature-checked, then either answered inline or, for `schedule`
//! (which may call the completion API), acknowledged with a deferred
//! response and finished by editing the original message.

pub mod client;
pub mod commands;
pub mod render;
pub mod types;
pub mod verify;

use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    Json,
};
use tracing::{debug, info, warn};

use crate::{ApiError, AppState};
use client::DiscordClient;
use commands::Command;
use types::{Interaction, InteractionResponse, INTERACTION_APPLICATION_COMMAND, INTERACTION_PING};
use verify::{SignatureVerifier, SIGNATURE_HEADER, TIMESTAMP_HEADER};

/// Discord pieces of the application state.
#[derive(Debug, Clone)]
pub struct DiscordState {
    pub verifier: SignatureVerifier,
    pub client: DiscordClient,
}

impl DiscordState {
    pub fn new(verifier: SignatureVerifier, client: DiscordClient) -> Self {
        Self { verifier, client }
    }
}

/// Handle one Discord interaction.
///
/// # Returns
/// - 200 with `PONG` for pings
/// - 200 with an ephemeral message, or a deferred acknowledgment for `schedule`
/// - 400 for malformed payloads
/// - 401 for missing or invalid signatures
/// - 503 when no public key is configured
pub async fn interactions(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<InteractionResponse>, ApiError> {
    let discord = state.discord.clone().ok_or_else(|| {
        ApiError::Unavailable("Discord interactions are not configured".to_string())
    })?;

    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Missing request signature".to_string()))
    };
    let signature = header(SIGNATURE_HEADER)?;
    let timestamp = header(TIMESTAMP_HEADER)?;
    if let Err(e) = discord.verifier.verify(timestamp, &body, signature) {
        warn!(
            subsystem = "discord",
            component = "interactions",
            "Rejected interaction with bad signature"
        );
        return Err(e.into());
    }

    let interaction: Interaction = serde_json::from_slice(&body)
        .map_err(|e| ApiError::BadRequest(format!("Invalid interaction payload: {}", e)))?;

    match interaction.kind {
        INTERACTION_PING => {
            debug!(subsystem = "discord", component = "interactions", "Ping");
            Ok(Json(InteractionResponse::pong()))
        }
        INTERACTION_APPLICATION_COMMAND => {
            let data = interaction
                .data
                .as_ref()
                .ok_or_else(|| ApiError::BadRequest("Command data missing".to_string()))?;
            let user_id = interaction
                .user_id()
                .ok_or_else(|| ApiError::BadRequest("Invoking user missing".to_string()))?
                .to_string();

            let command = match Command::from_data(data) {
                Ok(command) => command,
                Err(e) => return Ok(Json(InteractionResponse::message(render::error(&e)))),
            };

            if command.is_slow() {
                defer(state, discord, interaction, user_id, command);
                return Ok(Json(InteractionResponse::deferred()));
            }

            let message = commands::execute(&state, &user_id, command).await;
            Ok(Json(InteractionResponse::message(message)))
        }
        other => Err(ApiError::BadRequest(format!(
            "Unsupported interaction type {}",
            other
        ))),
    }
}

/// Finish a command in the background and replace the deferred reply.
fn defer(
    state: AppState,
    discord: std::sync::Arc<DiscordState>,
    interaction: Interaction,
    user_id: String,
    command: Command,
) {
    info!(
        subsystem = "discord",
        component = "interactions",
        command = command.name(),
        user_id = %user_id,
        "Deferring command"
    );
    tokio::spawn(async move {
        let message = commands::execute(&state, &user_id, command).await;
        let client = &discord.client;
        let (app_id, token) = (&interaction.application_id, &interaction.token);
        let Err(e) = client.edit_original(app_id, token, &message).await else {
            return;
        };
        warn!(
            subsystem = "discord",
            component = "interactions",
            interaction_id = %interaction.id,
            error = %e,
            "Failed to deliver deferred reply, sending plain fallback"
        );
        // The work is already saved; make sure the "thinking" state ends.
        let fallback = render::text(
            "🦕 Your tasks are saved, but the summary was too big to show. Use `/show_week` to see them!",
        );
        if let Err(e) = client.edit_original(app_id, token, &fallback).await {
            warn!(
                subsystem = "discord",
                component = "interactions",
                interaction_id = %interaction.id,
                error = %e,
                "Failed to deliver fallback reply"
            );
        }
    });
}
