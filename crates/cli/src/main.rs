//! Jarvis CLI: the main entry point.
//!
//! Commands:
//! - `onboard`: Write a starter config
//! - `chat`: Interactive or single-message chat with memory
//! - `voice`: Voice-command session (local intents, then LLM actions)
//! - `history`: Print the conversation log
//! - `clear`: Empty the conversation log
//! - `doctor`: Diagnose setup problems

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "jarvis",
    about = "Jarvis — a conversational and voice-command assistant",
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
    /// Create ~/.jarvis and a starter config.toml
    Onboard,

    /// Chat with Jarvis
    Chat {
        /// Send a single message instead of entering interactive mode
        #[arg(short, long)]
        message: Option<String>,

        /// Persona for this session: tutor, coder or mentor
        #[arg(short, long, default_value = "tutor")]
        role: String,

        /// Wait for the full reply instead of streaming it
        #[arg(long)]
        no_stream: bool,

        /// Keep the conversation in memory only
        #[arg(long)]
        ephemeral: bool,
    },

    /// Start a voice-command session (one command per line on stdin)
    Voice {
        /// Print replies instead of speaking them
        #[arg(long)]
        console: bool,
    },

    /// Print the conversation history
    History,

    /// Delete the conversation history
    Clear {
        /// Required to actually clear
        #[arg(long)]
        confirm: bool,
    },

    /// Diagnose configuration and connectivity
    Doctor,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Onboard => commands::onboard::run().await?,
        Commands::Chat {
            message,
            role,
            no_stream,
            ephemeral,
        } => {
            let options = commands::chat::ChatOptions {
                role,
                stream: !no_stream,
                ephemeral,
            };
            commands::chat::run(message, options).await?
        }
        Commands::Voice { console } => commands::voice::run(console).await?,
        Commands::History => commands::history::run().await?,
        Commands::Clear { confirm } => commands::history::clear(confirm).await?,
        Commands::Doctor => commands::doctor::run().await?,
    }

    Ok(())
}
