use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::warn;
use travelchat::{LocationTable, TravelChatConfig, logging, web};

/// Location explorer with a map, a five-slot selection and a travel assistant chat
#[derive(Parser, Debug)]
#[command(name = "travelchat", version, about)]
struct Cli {
    /// Path to a TOML config file
    #[arg(long, global = true, env = "TRAVELCHAT_CONFIG")]
    config: Option<PathBuf>,

    /// Debug logging for this crate
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the web server (default)
    Serve {
        /// Override the configured port
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Print the loaded location table
    Locations,
    /// Print the effective configuration with secrets masked
    CheckConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();
    let mut config = TravelChatConfig::load_from_path(cli.config.clone())?;
    logging::init(&config.logging, cli.verbose)?;

    if let Some(problem) = dotenv_problem(&dotenv) {
        warn!("Ignoring unreadable .env file: {problem}");
    }

    match cli.command.unwrap_or(Command::Serve { port: None }) {
        Command::Serve { port } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            web::run(&config).await
        }
        Command::Locations => {
            let table = LocationTable::load(
                std::path::Path::new(&config.data.locations_path),
                config.data.delimiter_char(),
            )?;
            for location in table.all() {
                println!(
                    "{:>3}  {}  ({})",
                    location.index,
                    location.address,
                    location.format_coordinates()
                );
            }
            println!("{} locations", table.len());
            Ok(())
        }
        Command::CheckConfig => {
            let shown = serde_json::to_string_pretty(&config.redacted())
                .context("Failed to render configuration")?;
            println!("{shown}");
            if config.llm.api_key.is_none() {
                println!("warning: no LLM API key configured (set OPENAI_API_KEY)");
            }
            Ok(())
        }
    }
}

/// A missing .env file is fine; anything else is worth reporting
fn dotenv_problem(result: &dotenvy::Result<PathBuf>) -> Option<&dotenvy::Error> {
    match result {
        Err(e) if !e.not_found() => Some(e),
        _ => None,
    }
}
