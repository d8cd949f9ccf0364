// ABOUTME: Engine abstraction the provisioning routine drives
// ABOUTME: Lets the routine run against a live server or an in-memory fake

use anyhow::Result;
use async_trait::async_trait;

/// Administrative access to one database server.
///
/// Every call names the database it applies to; implementations decide how
/// to route the statement there. Each call is a single autocommitted
/// statement and blocks until the server answers.
#[async_trait]
pub trait ExtensionEngine: Send {
    /// Create `name` flagged as a template source. Fails if it already exists.
    async fn create_template_database(&mut self, name: &str) -> Result<()>;

    /// Create `extension` in `database` unless present, pinned to `version` if given.
    async fn create_extension(
        &mut self,
        database: &str,
        extension: &str,
        version: Option<&str>,
    ) -> Result<()>;

    /// Move `extension` in `database` to `version`.
    async fn update_extension(&mut self, database: &str, extension: &str, version: &str)
        -> Result<()>;

    /// Drop the administrative session to `database` and open a fresh one.
    async fn reconnect(&mut self, database: &str) -> Result<()>;
}
