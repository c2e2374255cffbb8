//! Discord REST calls: follow-up edits and command registration.

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, info, warn};

use starcrunch_core::{defaults, Error, Result};

use super::types::MessageData;

/// Thin REST client for the Discord API.
#[derive(Debug, Clone)]
pub struct DiscordClient {
    http: Client,
    api_url: String,
    bot_token: Option<String>,
}

impl DiscordClient {
    pub fn new(api_url: impl Into<String>, bot_token: Option<String>) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(defaults::DISCORD_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::Internal(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self {
            http,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            bot_token,
        })
    }

    /// Replace the original (deferred) response. Needs no bot token; the
    /// interaction token authorizes the webhook.
    pub async fn edit_original(
        &self,
        application_id: &str,
        interaction_token: &str,
        message: &MessageData,
    ) -> Result<()> {
        let url = format!(
            "{}/webhooks/{}/{}/messages/@original",
            self.api_url, application_id, interaction_token
        );
        let response = self
            .http
            .patch(&url)
            .json(message)
            .send()
            .await
            .map_err(|e| Error::Request(format!("Discord follow-up failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!(
                subsystem = "discord",
                component = "client",
                status = status.as_u16(),
                body = %body,
                "Discord rejected follow-up edit"
            );
            return Err(Error::Request(format!(
                "Discord follow-up returned {}",
                status
            )));
        }

        debug!(subsystem = "discord", component = "client", "Original response edited");
        Ok(())
    }

    /// Bulk-overwrite the global command set.
    pub async fn register_commands(
        &self,
        application_id: &str,
        commands: &serde_json::Value,
    ) -> Result<usize> {
        let token = self
            .bot_token
            .as_deref()
            .ok_or_else(|| Error::Config("DISCORD_BOT_TOKEN is required".to_string()))?;
        let url = format!("{}/applications/{}/commands", self.api_url, application_id);

        let response = self
            .http
            .put(&url)
            .header("Authorization", format!("Bot {}", token))
            .json(commands)
            .send()
            .await
            .map_err(|e| Error::Request(format!("Command registration failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Request(format!(
                "Discord returned {} while registering commands: {}",
                status, body
            )));
        }

        let registered: Vec<serde_json::Value> = response.json().await?;
        info!(
            subsystem = "discord",
            component = "client",
            result_count = registered.len(),
            "Slash commands registered"
        );
        Ok(registered.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_edit_original_patches_webhook_message() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/webhooks/42/tok/messages/@original"))
            .and(body_partial_json(serde_json::json!({"content": "done"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let client = DiscordClient::new(server.uri(), None).unwrap();
        client
            .edit_original("42", "tok", &MessageData::ephemeral_text("done"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_register_requires_bot_token() {
        let client = DiscordClient::new("http://127.0.0.1:1", None).unwrap();
        let err = client
            .register_commands("42", &serde_json::json!([]))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[tokio::test]
    async fn test_register_sends_bot_authorization() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/applications/42/commands"))
            .and(header("Authorization", "Bot secret"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!([{"id": "1"}, {"id": "2"}])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = DiscordClient::new(server.uri(), Some("secret".to_string())).unwrap();
        let count = client
            .register_commands("42", &serde_json::json!([{"name": "help"}]))
            .await
            .unwrap();
        assert_eq!(count, 2);
    }
}
