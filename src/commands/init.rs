// ABOUTME: First-boot command run once against a freshly initialized server
// ABOUTME: Creates the template database and installs PostGIS into it and the primary database

use crate::config::ProvisionConfig;
use crate::postgres::PgEngine;
use crate::provision::{target_databases, Provisioner};
use anyhow::Result;

/// First-boot install of PostGIS
///
/// Runs in two steps:
/// 1. Creates the template database flagged `IS_TEMPLATE`
/// 2. Provisions the extension set into the template and primary databases,
///    reopening the session after `postgis` so later statements see fresh
///    settings
///
/// Meant to run exactly once per data directory, from the server's init hook.
/// Running it again fails at step 1 because the template already exists.
///
/// # Errors
///
/// Returns an error if the version cannot be resolved, the template database
/// cannot be created, or any extension statement fails.
pub async fn init(config: &ProvisionConfig) -> Result<()> {
    tracing::info!("Starting PostGIS first-boot install...");

    let raw_version = config.resolve_version()?;
    let mut engine = PgEngine::new(config.pg_config(), config.primary_database());
    let provisioner = Provisioner::install(config.extensions.clone());

    tracing::info!("Step 1/2: Creating template database...");
    provisioner
        .bootstrap(&mut engine, &config.template_database)
        .await?;

    tracing::info!("Step 2/2: Loading PostGIS extensions...");
    let no_extras: [&str; 0] = [];
    let databases = target_databases(
        &config.template_database,
        config.primary_database(),
        &no_extras,
    );
    let summary = provisioner
        .provision(&mut engine, &raw_version, &databases)
        .await?;

    tracing::info!(
        "✅ PostGIS {} installed in {} database(s)",
        summary.version,
        summary.databases.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // Needs a freshly initialized server without template_postgis
    #[tokio::test]
    #[ignore]
    async fn test_init_on_fresh_server() {
        let mut config = ProvisionConfig::load(None).unwrap();
        config.version = Some(std::env::var("TEST_POSTGIS_VERSION").unwrap());

        let result = init(&config).await;
        assert!(result.is_ok(), "{:?}", result);
    }
}
