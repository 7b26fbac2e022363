//! BridgeTutor CLI — the main entry point.
//!
//! Commands:
//! - `onboard` — Write a default config file
//! - `chat`    — Ask questions, get answers framed in your own field
//! - `quiz`    — Take adaptive multiple-choice quizzes
//! - `doctor`  — Diagnose config and provider connectivity

use clap::{Parser, Subcommand};

mod commands;
mod console;

#[derive(Parser)]
#[command(
    name = "bridgetutor",
    about = "BridgeTutor — learn a new field through the one you already know",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// The field you already know (defaults to `tutor.source_domain`)
    #[arg(short, long, global = true)]
    source: Option<String>,

    /// The field you want to explore (defaults to `tutor.target_domain`)
    #[arg(short, long, global = true)]
    target: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize configuration
    Onboard,

    /// Chat with the tutor
    Chat {
        /// Ask a single question instead of entering interactive mode
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Take adaptive quizzes
    Quiz,

    /// Diagnose system health
    Doctor,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let domains = commands::DomainArgs {
        source: cli.source,
        target: cli.target,
    };

    match cli.command {
        Commands::Onboard => commands::onboard::run().await?,
        Commands::Chat { message } => commands::chat::run(domains, message).await?,
        Commands::Quiz => commands::quiz::run(domains).await?,
        Commands::Doctor => commands::doctor::run().await?,
    }

    Ok(())
}
