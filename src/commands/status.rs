// ABOUTME: Status command implementation - report PostGIS versions per database
// ABOUTME: Read-only; shows installed and target version for each managed extension

use crate::config::ProvisionConfig;
use crate::postgres::{self, Extension};
use crate::provision::{strip_build_metadata, target_databases, ExtensionSpec};
use anyhow::{bail, Result};

/// State of one managed extension in one database
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtensionState {
    Missing,
    Current,
    Outdated(String),
    /// Unversioned extensions, or any extension when no target is known
    Present(String),
}

impl ExtensionState {
    pub fn label(&self) -> String {
        match self {
            ExtensionState::Missing => "missing".to_string(),
            ExtensionState::Current => "current".to_string(),
            ExtensionState::Outdated(v) => format!("outdated ({})", v),
            ExtensionState::Present(v) => format!("present ({})", v),
        }
    }
}

/// Classify `spec` against what a database has installed
///
/// Without a `target` version only presence is reported.
pub fn classify(spec: &ExtensionSpec, installed: &[Extension], target: Option<&str>) -> ExtensionState {
    match (postgres::installed_version(installed, &spec.name), target) {
        (None, _) => ExtensionState::Missing,
        (Some(v), Some(t)) if spec.versioned && v == t => ExtensionState::Current,
        (Some(v), Some(_)) if spec.versioned => ExtensionState::Outdated(v.to_string()),
        (Some(v), _) => ExtensionState::Present(v.to_string()),
    }
}

/// Fetch the installed extensions of one database over a fresh session
async fn inspect_database(config: &ProvisionConfig, database: &str) -> Result<Vec<Extension>> {
    let mut pg_config = config.pg_config();
    pg_config.dbname(database);

    let client = postgres::connect(&pg_config).await?;
    postgres::get_installed_extensions(&client).await
}

/// Print which managed extensions are installed, and at what version,
/// in the template, primary and extra databases
///
/// Never modifies anything. Databases that cannot be reached or queried are
/// reported and the command fails after printing the rest. Without a target
/// version the table shows installed versions only.
pub async fn status(config: &ProvisionConfig, extra_databases: &[String]) -> Result<()> {
    let raw_version = match config.resolve_version() {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::warn!("⚠ No target version, showing installed versions only: {:#}", e);
            None
        }
    };
    let target = raw_version.as_deref().map(strip_build_metadata);
    let databases = target_databases(
        &config.template_database,
        config.primary_database(),
        extra_databases,
    );

    match target {
        Some(t) => tracing::info!("Checking PostGIS status (target version {})...", t),
        None => tracing::info!("Checking PostGIS status..."),
    }

    println!();
    println!("{:<24} {:<24} {:<20}", "Database", "Extension", "State");
    println!("{}", "─".repeat(68));

    let mut unreachable = Vec::new();
    for database in &databases {
        let installed = match inspect_database(config, database).await {
            Ok(installed) => installed,
            Err(e) => {
                tracing::warn!("⚠ Cannot inspect '{}': {:#}", database, e);
                unreachable.push(database.clone());
                continue;
            }
        };

        for spec in &config.extensions {
            let state = classify(spec, &installed, target);
            println!("{:<24} {:<24} {:<20}", database, spec.name, state.label());
        }
    }
    println!();

    if !unreachable.is_empty() {
        bail!("Could not inspect database(s): {}", unreachable.join(", "));
    }
    Ok(())
}
