use anyhow::Result;
use clap::{Parser, Subcommand};
use pagewave_infrastructure::ConfigService;
use std::path::PathBuf;

mod commands;
mod logging;
mod wiring;

#[derive(Parser)]
#[command(name = "pagewave")]
#[command(about = "Pagewave - flip document pages with hand gestures", long_about = None)]
struct Cli {
    /// Config file (defaults to ~/.config/pagewave/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List documents held by the document service
    List {
        /// Filter by name or topic
        #[arg(short, long)]
        query: Option<String>,
    },
    /// Show one document
    Show { id: u64 },
    /// Open a document and read it interactively
    Read {
        id: u64,
        /// Starting page (clamped by the service)
        #[arg(short, long)]
        page: Option<u32>,
        /// Replay camera frames from this directory instead of `camera.frames_dir`
        #[arg(long)]
        frames: Option<PathBuf>,
        /// Turn gesture mode on right after opening
        #[arg(short, long)]
        gestures: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_service = match &cli.config {
        Some(path) => ConfigService::with_path(path),
        None => ConfigService::new()?,
    };
    let config = config_service.get_config()?;
    let _log_guard = logging::init(&config.logging)?;
    tracing::debug!(config = %config_service.path().display(), "configuration loaded");

    match cli.command {
        Commands::List { query } => commands::list::run(&config, query.as_deref()).await?,
        Commands::Show { id } => commands::show::run(&config, id).await?,
        Commands::Read {
            id,
            page,
            frames,
            gestures,
        } => {
            let options = commands::read::ReadOptions {
                id,
                page,
                frames,
                gestures,
            };
            commands::read::run(&config, options).await?
        }
    }

    Ok(())
}
