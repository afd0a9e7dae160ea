mod cli;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use paper_embed::{config, server};

#[derive(Parser)]
#[command(name = "paper-embed", version, about = "Sentence-embedding microservice for paper reading")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the HTTP embedding service
    Serve {
        /// Override the bind host
        #[arg(long)]
        host: Option<String>,
        /// Override the bind port
        #[arg(long)]
        port: Option<u16>,
    },
    /// Manage the embedding model
    Model {
        #[command(subcommand)]
        action: ModelAction,
    },
    /// Check configuration and model files
    Doctor,
    /// Embed texts and print the response JSON
    Embed {
        /// Texts to embed
        #[arg(required = true)]
        texts: Vec<String>,
        /// Return raw (non-unit-length) vectors
        #[arg(long)]
        no_normalize: bool,
        /// Chunk size override
        #[arg(long)]
        batch_size: Option<usize>,
    },
}

#[derive(Subcommand)]
enum ModelAction {
    /// Download the configured model to ~/.paper-embed/models/
    Download,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // A missing .env file is fine.
    dotenvy::dotenv().ok();

    let mut config = config::ServiceConfig::load()?;

    // Log to stderr so `embed` output on stdout stays clean JSON.
    let filter = EnvFilter::try_new(&config.server.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            server::serve(config).await?;
        }
        Command::Model { action } => match action {
            ModelAction::Download => {
                cli::model_download(&config.embedding).await?;
            }
        },
        Command::Doctor => {
            cli::doctor::doctor(&config)?;
        }
        Command::Embed {
            texts,
            no_normalize,
            batch_size,
        } => {
            cli::embed::embed(&config, texts, !no_normalize, batch_size).await?;
        }
    }

    Ok(())
}
