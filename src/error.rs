// ABOUTME: Error type returned by the provisioning routine
// ABOUTME: Names the database and version that failed so operators can re-run

use thiserror::Error;

/// Failure of a provisioning or bootstrap run.
///
/// Engine failures are not classified further: a missing extension, a denied
/// privilege, an unknown version and a missing database all surface as
/// [`ProvisionError::Statement`] carrying the engine's own message.
#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("No target databases given")]
    NoDatabases,

    #[error("Extension version is empty after stripping build metadata from '{raw}'")]
    EmptyVersion { raw: String },

    #[error("Failed to create template database '{template}'")]
    Bootstrap {
        template: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Failed to provision '{extension}' {version} in database '{database}'")]
    Statement {
        database: String,
        extension: String,
        version: String,
        #[source]
        source: anyhow::Error,
    },
}

impl ProvisionError {
    /// Database the run stopped on, if the failure happened inside one.
    pub fn database(&self) -> Option<&str> {
        match self {
            ProvisionError::Statement { database, .. } => Some(database),
            ProvisionError::Bootstrap { template, .. } => Some(template),
            _ => None,
        }
    }
}
