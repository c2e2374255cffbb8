//! Server configuration from environment variables.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `DATABASE_URL` | `postgres://localhost/starcrunch` |
//! | `HOST` / `PORT` | `0.0.0.0` / `3000` |
//! | `DB_MAX_CONNECTIONS` | 10 |
//! | `DISCORD_PUBLIC_KEY` | unset (interactions endpoint disabled) |
//! | `DISCORD_APPLICATION_ID` | unset |
//! | `DISCORD_BOT_TOKEN` | unset |
//! | `DISCORD_API_URL` | `https://discord.com/api/v10` |
//!
//! AI settings are read by [`AiConfig::from_env`].

use std::env;

use starcrunch_core::defaults;
use starcrunch_inference::AiConfig;

/// Discord application settings.
#[derive(Debug, Clone, Default)]
pub struct DiscordConfig {
    /// Hex-encoded Ed25519 public key from the developer portal.
    pub public_key: Option<String>,
    pub application_id: Option<String>,
    /// Only needed for command registration.
    pub bot_token: Option<String>,
    pub api_url: String,
}

impl DiscordConfig {
    pub fn from_env() -> Self {
        Self {
            public_key: non_empty("DISCORD_PUBLIC_KEY"),
            application_id: non_empty("DISCORD_APPLICATION_ID"),
            bot_token: non_empty("DISCORD_BOT_TOKEN"),
            api_url: env::var("DISCORD_API_URL")
                .unwrap_or_else(|_| defaults::DISCORD_API_URL.to_string()),
        }
    }
}

/// Everything `starcrunch-api` needs at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub discord: DiscordConfig,
    pub ai: AiConfig,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| defaults::DATABASE_URL.to_string()),
            host: env::var("HOST").unwrap_or_else(|_| defaults::SERVER_HOST.to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults::SERVER_PORT),
            discord: DiscordConfig::from_env(),
            ai: AiConfig::from_env(),
        }
    }
}

fn non_empty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
