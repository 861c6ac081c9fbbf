//! deskwren CLI — the main entry point.
//!
//! Commands:
//! - `chat`    — Interactive support session or single-message mode
//! - `status`  — Show configuration and loaded knowledge

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "deskwren",
    about = "deskwren — retrieval-augmented customer support agent",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat with the support agent
    Chat {
        /// Send a single message instead of entering interactive mode
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Show configuration and loaded knowledge
    Status,
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
        .init();

    match cli.command {
        Commands::Chat { message } => commands::chat::run(message).await?,
        Commands::Status => commands::status::run()?,
    }

    Ok(())
}
