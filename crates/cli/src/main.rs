//! SevaHealth CLI, the main entry point.
//!
//! Commands:
//! - `init`   — Write a default config file
//! - `serve`  — Start the HTTP gateway
//! - `chat`   — Interactive chat or single-message mode
//! - `index`  — Build the document search index
//! - `doctor` — Diagnose configuration and datasets

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "sevahealth",
    about = "SevaHealth - conversational health assistant for rural India",
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
    /// Write a default sevahealth.toml in the working directory
    Init,

    /// Start the HTTP gateway server
    Serve {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Chat with the assistant in the terminal
    Chat {
        /// Send a single message instead of entering interactive mode
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Build the document search index from a directory of text files
    Index {
        /// Directory of .txt/.md documents (default: data.docs_dir from config)
        #[arg(long)]
        docs: Option<String>,

        /// Output file for the serialized index (default: data.index_path)
        #[arg(long)]
        out: Option<String>,
    },

    /// Diagnose configuration, datasets, and API key
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
        .init();

    match cli.command {
        Commands::Init => commands::init::run().await?,
        Commands::Serve { port } => commands::serve::run(port).await?,
        Commands::Chat { message } => commands::chat::run(message).await?,
        Commands::Index { docs, out } => commands::index::run(docs, out).await?,
        Commands::Doctor => commands::doctor::run().await?,
    }

    Ok(())
}
