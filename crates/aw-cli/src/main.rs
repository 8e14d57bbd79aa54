//! Asset Warden CLI
//!
//! Command-line console for the Asset Warden compliance engine.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use uuid::Uuid;

mod commands;
mod config;
mod report;

use config::AppConfig;

#[derive(Parser)]
#[command(name = "asset-warden")]
#[command(version)]
#[command(about = "Compliance dependency and deadline engine", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Output format (text, json)
    #[arg(long, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Invalid output format: {}", s)),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run the deadline sweep over a snapshot
    Sweep {
        /// Snapshot file (JSON or YAML)
        #[arg(short, long)]
        snapshot: Option<PathBuf>,

        /// Evaluate as of this instant (RFC 3339), default now
        #[arg(long)]
        now: Option<String>,
    },

    /// Show the effective criticality of an asset
    Criticality {
        /// Snapshot file (JSON or YAML)
        #[arg(short, long)]
        snapshot: Option<PathBuf>,

        /// Asset id
        #[arg(short, long)]
        asset: Uuid,
    },

    /// Check whether an entity can be deleted
    CheckDelete {
        /// Snapshot file (JSON or YAML)
        #[arg(short, long)]
        snapshot: Option<PathBuf>,

        /// Entity type (asset, service, supplier, ticket, policy, collaborator)
        #[arg(short, long)]
        entity: String,

        /// Entity id
        #[arg(short, long)]
        id: Uuid,
    },

    /// Show provider concentration risk for elevated services
    Concentration {
        /// Snapshot file (JSON or YAML)
        #[arg(short, long)]
        snapshot: Option<PathBuf>,
    },

    /// Check snapshot data integrity
    Validate {
        /// Snapshot file (JSON or YAML)
        #[arg(short, long)]
        snapshot: Option<PathBuf>,
    },

    /// Show current configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    aw_observability::logging::init_logging_with_config(
        aw_observability::logging::LoggingConfig {
            level: log_level,
            json_format: cli.format == OutputFormat::Json,
            ..Default::default()
        },
    );

    let config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => {
            let default_path = default_config_path();
            AppConfig::load(&default_path).unwrap_or_else(|_| {
                if cli.verbose {
                    eprintln!("Using default configuration (no config file found)");
                }
                AppConfig::default()
            })
        }
    };

    match cli.command {
        Commands::Sweep { snapshot, now } => {
            let snapshot = load_snapshot_arg(&config, snapshot)?;
            let now = now.map(|s| parse_instant(&s)).transpose()?;
            commands::cmd_sweep(&config, snapshot, now, cli.format).await
        }
        Commands::Criticality { snapshot, asset } => {
            let snapshot = load_snapshot_arg(&config, snapshot)?;
            commands::cmd_criticality(&snapshot, asset, cli.format)
        }
        Commands::CheckDelete {
            snapshot,
            entity,
            id,
        } => {
            let snapshot = load_snapshot_arg(&config, snapshot)?;
            commands::cmd_check_delete(&config, &snapshot, &entity, id, cli.format)
        }
        Commands::Concentration { snapshot } => {
            let snapshot = load_snapshot_arg(&config, snapshot)?;
            commands::cmd_concentration(&snapshot, cli.format)
        }
        Commands::Validate { snapshot } => {
            let snapshot = load_snapshot_arg(&config, snapshot)?;
            commands::cmd_validate(&snapshot, cli.format)
        }
        Commands::Config => commands::cmd_config(&config, cli.format),
    }
}

fn default_config_path() -> PathBuf {
    PathBuf::from("config/asset-warden.yaml")
}

/// Resolves the snapshot path from the flag or the configuration file.
fn load_snapshot_arg(
    config: &AppConfig,
    flag: Option<PathBuf>,
) -> Result<aw_core::Snapshot> {
    let path = flag
        .or_else(|| config.snapshot_path.as_ref().map(PathBuf::from))
        .context("No snapshot file given (use --snapshot or set snapshot_path in the config)")?;
    commands::load_snapshot(&path)
}

fn parse_instant(s: &str) -> Result<DateTime<Utc>> {
    let parsed = DateTime::parse_from_rfc3339(s)
        .with_context(|| format!("Invalid RFC 3339 timestamp: {}", s))?;
    Ok(parsed.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_parsing() {
        assert!(matches!("json".parse(), Ok(OutputFormat::Json)));
        assert!(matches!("TEXT".parse(), Ok(OutputFormat::Text)));
        assert!("yaml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_parse_instant() {
        let instant = parse_instant("2026-03-01T10:00:00Z").unwrap();
        assert_eq!(instant.timezone(), Utc);
        assert!(parse_instant("yesterday").is_err());
    }
}
