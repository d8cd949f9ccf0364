// ABOUTME: Maintenance command that upgrades PostGIS on a running server
// ABOUTME: Covers the template, the primary database, and any extra databases given

use crate::config::ProvisionConfig;
use crate::postgres::PgEngine;
use crate::provision::{target_databases, Provisioner};
use anyhow::Result;

/// Bring PostGIS to the configured version in every target database
///
/// Targets are the template database, the primary database, then `extra_databases`
/// in the order given. Safe to re-run: extensions already at the version are
/// left alone. Stops at the first failure; fix the cause and run it again.
pub async fn update(config: &ProvisionConfig, extra_databases: &[String]) -> Result<()> {
    tracing::info!("Starting PostGIS update...");

    let raw_version = config.resolve_version()?;
    let databases = target_databases(
        &config.template_database,
        config.primary_database(),
        extra_databases,
    );
    tracing::info!("Found {} database(s) to update", databases.len());

    let mut engine = PgEngine::new(config.pg_config(), config.primary_database());
    let summary = Provisioner::upgrade(config.extensions.clone())
        .provision(&mut engine, &raw_version, &databases)
        .await?;

    tracing::info!(
        "✅ PostGIS {} current in {} database(s)",
        summary.version,
        summary.databases.len()
    );
    Ok(())
}
