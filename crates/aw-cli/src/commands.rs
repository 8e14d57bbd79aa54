//! Subcommand implementations for the Asset Warden CLI.

use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use chrono::{DateTime, Utc};
use colored::Colorize;
use uuid::Uuid;

use aw_core::{
    DeadlineScheduler, DependencyGraph, EntityType, InMemorySnapshotStore, ReferentialGuard,
    Snapshot, SnapshotStore,
};
use aw_observability::SweepMetricsCollector;

use crate::config::AppConfig;
use crate::report;
use crate::OutputFormat;

/// Loads a snapshot from a JSON or YAML file, chosen by extension.
pub fn load_snapshot(path: &Path) -> Result<Snapshot> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot file: {}", path.display()))?;

    let snapshot = match path.extension().and_then(|e| e.to_str()) {
        Some("yaml") | Some("yml") => serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse snapshot file: {}", path.display()))?,
        _ => serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse snapshot file: {}", path.display()))?,
    };

    Ok(snapshot)
}

/// Parses an entity type name as used on the command line.
pub fn parse_entity_type(s: &str) -> Result<EntityType> {
    match s.to_lowercase().as_str() {
        "asset" => Ok(EntityType::Asset),
        "service" => Ok(EntityType::Service),
        "supplier" => Ok(EntityType::Supplier),
        "ticket" => Ok(EntityType::Ticket),
        "policy" => Ok(EntityType::Policy),
        "collaborator" => Ok(EntityType::Collaborator),
        other => Err(anyhow!(
            "Unknown entity type '{}' (expected asset, service, supplier, ticket, policy, or collaborator)",
            other
        )),
    }
}

/// Runs the deadline sweep and prints the report.
pub async fn cmd_sweep(
    config: &AppConfig,
    snapshot: Snapshot,
    now: Option<DateTime<Utc>>,
    format: OutputFormat,
) -> Result<()> {
    let now = now.unwrap_or_else(Utc::now);
    let store = InMemorySnapshotStore::with_snapshot(snapshot);
    let metrics = SweepMetricsCollector::new();
    let scheduler = DeadlineScheduler::new(config.engine.deadline.clone());

    let snapshot = store.current().await?;
    let report = scheduler.sweep(&snapshot, now);
    metrics.record_sweep(&report, now).await;

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        report::print_sweep_report(&report);
    }

    Ok(())
}

/// Prints the effective criticality of an asset.
pub fn cmd_criticality(snapshot: &Snapshot, asset_id: Uuid, format: OutputFormat) -> Result<()> {
    let graph = DependencyGraph::new(snapshot);
    let asset = graph
        .index()
        .asset(&asset_id)
        .ok_or_else(|| anyhow!("No asset with id {}", asset_id))?;
    let criticality = graph.criticality_of(asset_id);

    if format == OutputFormat::Json {
        let payload = serde_json::json!({
            "asset_id": asset_id,
            "name": asset.name,
            "criticality": criticality,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        let label = match criticality {
            c if c.is_elevated() => criticality.to_string().red().bold(),
            _ => criticality.to_string().normal(),
        };
        println!("{}: {}", asset.name, label);
    }

    Ok(())
}

/// Prints the deletion verdict for an entity.
pub fn cmd_check_delete(
    config: &AppConfig,
    snapshot: &Snapshot,
    entity: &str,
    id: Uuid,
    format: OutputFormat,
) -> Result<()> {
    let entity = parse_entity_type(entity)?;
    let guard = ReferentialGuard::with_default_sources(&config.engine);
    let verdict = guard.can_delete(snapshot, entity, id);

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&verdict)?);
    } else {
        println!("{} {} {}", "Delete".bold(), entity, id);
        report::print_verdict(&verdict);
    }

    Ok(())
}

/// Prints the provider concentration-risk summary.
pub fn cmd_concentration(snapshot: &Snapshot, format: OutputFormat) -> Result<()> {
    let graph = DependencyGraph::new(snapshot);
    let risk = graph.concentration_risk(&snapshot.services);

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&risk)?);
    } else {
        report::print_concentration(risk.as_ref());
    }

    Ok(())
}

/// Prints the inventory integrity report. Exits non-zero when ambiguous
/// edges are present.
pub fn cmd_validate(snapshot: &Snapshot, format: OutputFormat) -> Result<()> {
    let graph = DependencyGraph::new(snapshot);
    let diagnostics = graph.diagnostics();

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&diagnostics)?);
    } else {
        report::print_diagnostics(&diagnostics);
    }

    if diagnostics.ambiguous_edges() > 0 {
        bail!(
            "{} ambiguous service dependencies found",
            diagnostics.ambiguous_edges()
        );
    }

    Ok(())
}

/// Prints the effective configuration.
pub fn cmd_config(config: &AppConfig, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(config)?);
    } else {
        println!("{}", "Current Configuration".bold());
        println!("─────────────────────");
        println!(
            "Early warning window: {}h",
            config.engine.deadline.early_warning_hours
        );
        println!(
            "Notification window: {}h",
            config.engine.deadline.notification_hours
        );
        println!(
            "Expiry warning window: {}d",
            config.engine.deadline.expiry_warning_days
        );
        println!(
            "At-risk margin: {}h",
            config.engine.deadline.at_risk_margin_hours
        );
        println!("Auto ticket drafts: {}", config.engine.deadline.auto_ticket);
        println!(
            "Display reason limit: {}",
            config.engine.display_reason_limit
        );
        match &config.snapshot_path {
            Some(path) => println!("Default snapshot: {}", path),
            None => println!("Default snapshot: (none)"),
        }
    }

    Ok(())
}
