//! starcrunch-api - HTTP server for Starcrunch.

use std::net::SocketAddr;

use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use starcrunch_api::config::{DiscordConfig, ServerConfig};
use starcrunch_api::discord::client::DiscordClient;
use starcrunch_api::discord::verify::SignatureVerifier;
use starcrunch_api::{build_router, AppState, DiscordState, Planner};
use starcrunch_db::{log_pool_metrics, Database, PoolConfig};
use starcrunch_inference::AiDelegate;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with configurable output
    //
    // Environment variables:
    //   LOG_FORMAT  - "json" or "text" (default: "text")
    //   LOG_FILE    - path to log file (optional, enables file logging)
    //   LOG_ANSI    - "true"/"false" override ANSI colors (auto-detected by default)
    //   RUST_LOG    - standard env filter (default: "starcrunch_api=debug,tower_http=debug")
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let log_file = std::env::var("LOG_FILE").ok();
    let log_ansi = std::env::var("LOG_ANSI")
        .ok()
        .map(|v| v == "true" || v == "1");

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "starcrunch_api=debug,starcrunch_inference=debug,starcrunch_db=info,tower_http=debug".into()
    });

    let registry = tracing_subscriber::registry().with(env_filter);

    // Optionally create a file appender with daily rotation
    let _file_guard = if let Some(ref path) = log_file {
        let file_dir = std::path::Path::new(path)
            .parent()
            .unwrap_or(std::path::Path::new("."));
        let file_name = std::path::Path::new(path)
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or("starcrunch-api.log");
        let file_appender = tracing_appender::rolling::daily(file_dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        if log_format == "json" {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(non_blocking),
                )
                .init();
        } else {
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(log_ansi.unwrap_or(false)); // no ANSI in files by default
            registry.with(layer).init();
        }
        Some(guard)
    } else {
        // Console-only output
        if log_format == "json" {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        } else {
            let mut layer = tracing_subscriber::fmt::layer();
            if let Some(ansi) = log_ansi {
                layer = layer.with_ansi(ansi);
            }
            registry.with(layer).init();
        }
        None
    };

    info!(
        log_format = %log_format,
        log_file = log_file.as_deref().unwrap_or("(stdout)"),
        "Logging initialized"
    );

    let config = ServerConfig::from_env();

    // Database
    info!("Connecting to database...");
    let db = Database::connect_with_config(&config.database_url, PoolConfig::from_env()).await?;
    info!("Running migrations...");
    db.migrate().await?;
    log_pool_metrics(db.pool());

    // AI delegate (disabled without GROQ_API_KEY)
    let delegate = AiDelegate::from_config(&config.ai)?;
    let planner = Planner::new(db.clone(), delegate);
    info!(ai_enabled = planner.ai_enabled(), "Planner ready");

    let discord = discord_state(&config.discord)?;

    let state = AppState::new(db, planner, discord);
    let app = build_router(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Interactions need the public key; without it the endpoint answers 503.
fn discord_state(config: &DiscordConfig) -> anyhow::Result<Option<DiscordState>> {
    let Some(public_key) = config.public_key.as_deref() else {
        warn!("DISCORD_PUBLIC_KEY not set, Discord interactions disabled");
        return Ok(None);
    };
    let verifier = SignatureVerifier::from_hex(public_key)?;
    let client = DiscordClient::new(config.api_url.clone(), config.bot_token.clone())?;
    info!(
        application_id = config.application_id.as_deref().unwrap_or("(from interactions)"),
        "Discord interactions enabled"
    );
    Ok(Some(DiscordState::new(verifier, client)))
}
