//! starcrunch-commands: manage the bot's Discord slash commands.
//!
//! `register` bulk-overwrites the global command set, so running it twice
//! is harmless. `print` shows the JSON that would be uploaded.

use std::process::ExitCode;

use clap::{Parser, Subcommand};

use starcrunch_api::discord::client::DiscordClient;
use starcrunch_api::discord::commands::definitions;
use starcrunch_core::defaults;

#[derive(Parser)]
#[command(name = "starcrunch-commands")]
#[command(author, version, about = "Slash command registration for Starcrunch")]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload the command definitions to Discord
    Register {
        /// Application (client) id from the developer portal
        #[arg(long, env = "DISCORD_APPLICATION_ID")]
        application_id: String,

        /// Bot token used to authorize the upload
        #[arg(long, env = "DISCORD_BOT_TOKEN", hide_env_values = true)]
        bot_token: String,

        /// Discord REST base URL
        #[arg(long, env = "DISCORD_API_URL", default_value = defaults::DISCORD_API_URL)]
        api_url: String,
    },

    /// Print the command definitions as JSON
    Print,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Register {
            application_id,
            bot_token,
            api_url,
        } => {
            let client = DiscordClient::new(api_url, Some(bot_token))?;
            let count = client
                .register_commands(&application_id, &definitions())
                .await?;
            println!("Registered {} commands for application {}", count, application_id);
        }
        Commands::Print => {
            println!("{}", serde_json::to_string_pretty(&definitions())?);
        }
    }
    Ok(())
}
