mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "sitegrid",
    about = "Competitive site blueprints for local businesses",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Load and validate a client definition
    Validate {
        /// Path to the client YAML file
        #[arg(long)]
        client: PathBuf,
    },
    /// Build the intent x geo matrix only
    Plan {
        /// Path to the client YAML file
        #[arg(long)]
        client: PathBuf,

        /// Artifact root; defaults to `SITEGRID_OUTPUT_DIR`
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Run all five stages and write the output spec
    Run {
        /// Path to the client YAML file
        #[arg(long)]
        client: PathBuf,

        /// Artifact root; defaults to `SITEGRID_OUTPUT_DIR`
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Replay a saved `sources.json` instead of calling the providers
        #[arg(long)]
        sources: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = sitegrid_core::load_app_config_from_env()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Validate { client }) => commands::run_validate(&client)?,
        Some(Commands::Plan { client, output_dir }) => {
            let root = output_dir.unwrap_or_else(|| config.output_dir.clone());
            commands::run_plan(&client, &root).await?;
        }
        Some(Commands::Run {
            client,
            output_dir,
            sources,
        }) => {
            let root = output_dir.unwrap_or_else(|| config.output_dir.clone());
            commands::run_pipeline(&config, &client, &root, sources.as_deref()).await?;
        }
        None => println!("sitegrid: use --help to see available commands"),
    }

    Ok(())
}
