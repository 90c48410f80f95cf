mod config;
mod error;
mod http;
mod logging;

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{ArgAction, Parser, Subcommand};
use runtime::{Message, ServiceConnector, TurnOrchestrator};
use tracing::info;

use config::Config;
use error::Result;

const CONFIG_FILE: &str = "toolrelay.toml";

#[derive(Parser)]
#[command(name = "toolrelay")]
#[command(
    about = "Broker chat turns between a language model and an MCP tool host",
    long_about = None
)]
#[command(version)]
struct Cli {
    /// Path to the config file (default: ./toolrelay.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the HTTP API
    Serve {
        /// Address to listen on (overrides server.bind)
        #[arg(short, long)]
        bind: Option<SocketAddr>,
    },
    /// Run a single turn and print the new messages as JSON
    Turn {
        /// The user's message
        message: String,
        /// JSON file with prior messages ([{"role": "...", "content": "..."}])
        #[arg(long)]
        history: Option<PathBuf>,
    },
    /// List the tools the tool host offers
    Tools,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::load_or_default(CONFIG_FILE)?,
    };
    config.apply_env();

    let orchestrator = TurnOrchestrator::new(config.connector());

    match cli.command {
        Some(Commands::Serve { bind }) => {
            cmd_serve(orchestrator, bind.unwrap_or(config.server.bind)).await
        }
        None => cmd_serve(orchestrator, config.server.bind).await,
        Some(Commands::Turn { message, history }) => {
            cmd_turn(&orchestrator, &message, history.as_deref()).await
        }
        Some(Commands::Tools) => cmd_tools(&orchestrator).await,
    }
}

async fn cmd_serve(
    orchestrator: TurnOrchestrator<ServiceConnector>,
    bind: SocketAddr,
) -> Result<()> {
    info!("toolrelay v{}", env!("CARGO_PKG_VERSION"));
    let router = http::build_router(Arc::new(orchestrator));
    http::serve(router, bind).await?;
    Ok(())
}

async fn cmd_turn(
    orchestrator: &TurnOrchestrator<ServiceConnector>,
    message: &str,
    history: Option<&Path>,
) -> Result<()> {
    let history: Vec<Message> = match history {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => Vec::new(),
    };

    let new_messages = orchestrator.run_turn(message, &history).await?;
    let output = serde_json::to_string_pretty(&http::TurnResponse { new_messages })?;
    println!("{output}");
    Ok(())
}

async fn cmd_tools(orchestrator: &TurnOrchestrator<ServiceConnector>) -> Result<()> {
    let catalog = orchestrator.catalog().await?;

    println!("{:<32}  DESCRIPTION", "TOOL");
    println!("{}", "-".repeat(80));
    for tool in catalog.tools() {
        let description = tool.description.as_deref().unwrap_or("");
        let first_line = description.lines().next().unwrap_or("");
        println!("{:<32}  {first_line}", tool.name);
    }

    Ok(())
}
