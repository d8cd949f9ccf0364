// ABOUTME: CLI entry point for postgis-provisioner
// ABOUTME: Parses commands, loads configuration, and routes to handlers

use clap::{Parser, Subcommand};
use postgis_provisioner::commands;
use postgis_provisioner::config::ProvisionConfig;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "postgis-provisioner")]
#[command(about = "Install and upgrade PostGIS across PostgreSQL databases", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to a TOML config file; environment variables override it
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Target PostGIS version (defaults to POSTGIS_VERSION or the version file)
    #[arg(long = "postgis-version", global = true)]
    postgis_version: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// First-boot install: create the template database and load PostGIS
    Init,
    /// Upgrade PostGIS in the template, primary, and any extra databases
    Update {
        /// Additional databases to update after the template and primary ones
        databases: Vec<String>,
    },
    /// Show installed PostGIS extension versions per database
    Status {
        /// Additional databases to inspect after the template and primary ones
        databases: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging - default to INFO level if RUST_LOG not set
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = ProvisionConfig::load(cli.config.as_deref())?;
    if let Some(version) = cli.postgis_version {
        config.version = Some(version);
    }

    match cli.command {
        Commands::Init => commands::init(&config).await,
        Commands::Update { databases } => commands::update(&config, &databases).await,
        Commands::Status { databases } => commands::status(&config, &databases).await,
    }
}
