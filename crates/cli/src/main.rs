//! Parley CLI — the main entry point.
//!
//! Commands:
//! - `init`    — Write a default config file
//! - `serve`   — Start the web chat page and its API
//! - `chat`    — Chat from the terminal
//! - `models`  — List the selectable models
//! - `doctor`  — Check configuration and provider reachability

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "parley",
    about = "Parley — web chat over a hosted LLM with windowed memory",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default config file
    Init,

    /// Start the HTTP server with the chat page
    Serve {
        /// Override the bind address
        #[arg(long)]
        host: Option<String>,

        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Chat from the terminal
    Chat {
        /// Model to use (see `parley models`)
        #[arg(long)]
        model: Option<String>,

        /// How many past exchanges the model sees (1-10)
        #[arg(short, long)]
        window: Option<i64>,

        /// System prompt for the assistant
        #[arg(short, long)]
        system: Option<String>,

        /// Send a single message instead of entering interactive mode
        #[arg(short, long)]
        message: Option<String>,
    },

    /// List the selectable models
    Models,

    /// Check configuration and provider reachability
    Doctor,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Logs go to stderr so `chat` output stays clean.
    let filter = if cli.verbose { "debug" } else { "info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false);
    if cli.json_logs {
        builder.json().init();
    } else {
        builder.init();
    }

    match cli.command {
        Commands::Init => commands::init::run()?,
        Commands::Serve { host, port } => commands::serve::run(host, port).await?,
        Commands::Chat {
            model,
            window,
            system,
            message,
        } => {
            let overrides = commands::chat::Overrides {
                model,
                window,
                system,
            };
            commands::chat::run(overrides, message).await?
        }
        Commands::Models => commands::models::run()?,
        Commands::Doctor => commands::doctor::run().await?,
    }

    Ok(())
}
