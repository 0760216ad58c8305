//! ABYA Control - CLI client for the course reviewer daemon
//!
//! Drives the evaluation API from the terminal.

mod client;
mod commands;
mod render;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

const DEFAULT_DAEMON_URL: &str = "http://127.0.0.1:7870";

#[derive(Parser)]
#[command(name = "abyactl")]
#[command(about = "ABYA Course Reviewer - control CLI", long_about = None)]
#[command(version)]
struct Cli {
    /// Daemon base URL
    #[arg(long, default_value = DEFAULT_DAEMON_URL)]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show daemon health
    Health,

    /// Create a new evaluation session
    CreateSession,

    /// List active sessions
    Sessions,

    /// Submit a course content file for evaluation
    Analyze {
        /// Path to the course content file
        file: PathBuf,

        /// Existing session id (a session is created when omitted)
        #[arg(long)]
        session: Option<String>,
    },

    /// Score a grade map locally, without the daemon
    Score {
        /// Course category name, e.g. "Web3 Development and Design"
        #[arg(long)]
        category: String,

        /// Path to a JSON file mapping element names to 0-100 scores
        scores: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Health => commands::health(&cli.url).await,
        Commands::CreateSession => commands::create_session(&cli.url).await,
        Commands::Sessions => commands::sessions(&cli.url).await,
        Commands::Analyze { file, session } => commands::analyze(&cli.url, &file, session).await,
        Commands::Score { category, scores } => commands::score(&category, &scores),
    }
}
