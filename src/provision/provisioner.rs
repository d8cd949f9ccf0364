// ABOUTME: Create-or-upgrade routine for the extension set across databases
// ABOUTME: Runs strictly in order and stops at the first failing statement

use crate::error::ProvisionError;
use crate::provision::{strip_build_metadata, ExtensionEngine};
use serde::Deserialize;

/// One extension managed by the provisioner
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExtensionSpec {
    pub name: String,
    /// Pin to the target version and update in place. Unversioned extensions
    /// are only created when absent.
    #[serde(default = "default_true")]
    pub versioned: bool,
    /// Reopen the session after creating this extension (install path only).
    #[serde(default)]
    pub reconnect_after: bool,
}

fn default_true() -> bool {
    true
}

impl ExtensionSpec {
    pub fn versioned(name: &str) -> Self {
        Self {
            name: name.to_string(),
            versioned: true,
            reconnect_after: false,
        }
    }

    pub fn unversioned(name: &str) -> Self {
        Self {
            name: name.to_string(),
            versioned: false,
            reconnect_after: false,
        }
    }

    pub fn with_reconnect(mut self) -> Self {
        self.reconnect_after = true;
        self
    }
}

/// The PostGIS family in dependency order
///
/// `postgis_topology` adds `topology` to the database `search_path`, but the
/// session that created it keeps a stale `pg_settings.reset_val`. The tiger
/// geocoder install reads that value back and would drop `topology` from the
/// path, so the session is reopened between the two. `fuzzystrmatch` ships
/// with PostgreSQL, not PostGIS, and keeps its own version.
pub fn default_extensions() -> Vec<ExtensionSpec> {
    vec![
        ExtensionSpec::versioned("postgis"),
        ExtensionSpec::versioned("postgis_topology").with_reconnect(),
        ExtensionSpec::unversioned("fuzzystrmatch"),
        ExtensionSpec::versioned("postgis_tiger_geocoder"),
    ]
}

/// Outcome of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionSummary {
    /// Version actually used, build metadata removed
    pub version: String,
    /// Databases processed, in order
    pub databases: Vec<String>,
}

/// Makes an extension set present and current in a list of databases
#[derive(Debug, Clone)]
pub struct Provisioner {
    extensions: Vec<ExtensionSpec>,
    reconnect: bool,
}

impl Provisioner {
    /// Maintenance run: no reconnects
    pub fn upgrade(extensions: Vec<ExtensionSpec>) -> Self {
        Self {
            extensions,
            reconnect: false,
        }
    }

    /// First-boot run: reconnect after extensions that ask for it
    pub fn install(extensions: Vec<ExtensionSpec>) -> Self {
        Self {
            extensions,
            reconnect: true,
        }
    }

    /// Create the template database on a freshly initialized server
    ///
    /// Not idempotent. Running it where `template` already exists is
    /// unsupported and fails with the server's error.
    pub async fn bootstrap<E>(&self, engine: &mut E, template: &str) -> Result<(), ProvisionError>
    where
        E: ExtensionEngine + ?Sized,
    {
        tracing::info!("Creating template database '{}'", template);
        engine
            .create_template_database(template)
            .await
            .map_err(|source| ProvisionError::Bootstrap {
                template: template.to_string(),
                source,
            })?;
        tracing::info!("✓ Template database '{}' created", template);
        Ok(())
    }

    /// Ensure every extension is present at `raw_version` in each database
    ///
    /// Databases are processed one at a time in the order given. For each
    /// versioned extension the routine issues `CREATE EXTENSION IF NOT EXISTS
    /// ... VERSION` followed by `ALTER EXTENSION ... UPDATE TO`, both no-ops
    /// when the extension is already current, so re-running is safe.
    ///
    /// The first failure ends the run: databases earlier in the list keep
    /// their new state and later ones are not touched.
    ///
    /// # Errors
    ///
    /// - [`ProvisionError::NoDatabases`] if `databases` is empty
    /// - [`ProvisionError::EmptyVersion`] if nothing is left after stripping
    /// - [`ProvisionError::Statement`] for any engine failure
    pub async fn provision<E, S>(
        &self,
        engine: &mut E,
        raw_version: &str,
        databases: &[S],
    ) -> Result<ProvisionSummary, ProvisionError>
    where
        E: ExtensionEngine + ?Sized,
        S: AsRef<str>,
    {
        let version = strip_build_metadata(raw_version);
        if version.is_empty() {
            return Err(ProvisionError::EmptyVersion {
                raw: raw_version.to_string(),
            });
        }
        if databases.is_empty() {
            return Err(ProvisionError::NoDatabases);
        }

        let mut done = Vec::with_capacity(databases.len());
        for database in databases {
            let database = database.as_ref();
            tracing::info!(
                "Provisioning PostGIS extensions in '{}' to {}",
                database,
                version
            );
            self.provision_database(engine, database, version).await?;
            done.push(database.to_string());
        }

        Ok(ProvisionSummary {
            version: version.to_string(),
            databases: done,
        })
    }

    async fn provision_database<E>(
        &self,
        engine: &mut E,
        database: &str,
        version: &str,
    ) -> Result<(), ProvisionError>
    where
        E: ExtensionEngine + ?Sized,
    {
        let fail = |extension: &str, source: anyhow::Error| ProvisionError::Statement {
            database: database.to_string(),
            extension: extension.to_string(),
            version: version.to_string(),
            source,
        };

        for ext in &self.extensions {
            let pinned = ext.versioned.then_some(version);
            engine
                .create_extension(database, &ext.name, pinned)
                .await
                .map_err(|e| fail(&ext.name, e))?;

            if let Some(v) = pinned {
                engine
                    .update_extension(database, &ext.name, v)
                    .await
                    .map_err(|e| fail(&ext.name, e))?;
            }

            if self.reconnect && ext.reconnect_after {
                engine
                    .reconnect(database)
                    .await
                    .map_err(|e| fail(&ext.name, e))?;
            }
        }

        Ok(())
    }
}
