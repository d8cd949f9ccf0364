// ABOUTME: tokio-postgres implementation of the extension engine
// ABOUTME: Keeps one administrative session and reopens it per target database

use crate::postgres::{connect, sql};
use crate::provision::ExtensionEngine;
use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio_postgres::{Client, Config};

/// Live engine backed by a single session at a time
///
/// `base` carries user, password, host and port; only `dbname` changes when
/// the engine moves between databases. `CREATE DATABASE` runs against
/// `admin_database`.
pub struct PgEngine {
    base: Config,
    admin_database: String,
    session: Option<(String, Client)>,
}

impl PgEngine {
    pub fn new(base: Config, admin_database: impl Into<String>) -> Self {
        Self {
            base,
            admin_database: admin_database.into(),
            session: None,
        }
    }

    /// Database the current session is connected to, if any
    pub fn current_database(&self) -> Option<&str> {
        self.session.as_ref().map(|(database, _)| database.as_str())
    }

    async fn open(&mut self, database: &str) -> Result<()> {
        // Close the previous session before opening the next one
        self.session = None;

        let mut config = self.base.clone();
        config.dbname(database);

        tracing::debug!("Opening session to '{}'", database);
        let client = connect(&config)
            .await
            .with_context(|| format!("Failed to open session to '{}'", database))?;
        self.session = Some((database.to_string(), client));
        Ok(())
    }

    async fn client_for(&mut self, database: &str) -> Result<&Client> {
        if self.current_database() != Some(database) {
            self.open(database).await?;
        }

        self.session
            .as_ref()
            .map(|(_, client)| client)
            .context("No open session")
    }

    async fn execute(&mut self, database: &str, statement: &str) -> Result<()> {
        tracing::debug!("[{}] {}", database, statement);
        let client = self.client_for(database).await?;
        client
            .batch_execute(statement)
            .await
            .with_context(|| format!("Statement failed in '{}': {}", database, statement))
    }
}

#[async_trait]
impl ExtensionEngine for PgEngine {
    async fn create_template_database(&mut self, name: &str) -> Result<()> {
        let admin = self.admin_database.clone();
        self.execute(&admin, &sql::create_template_database_sql(name))
            .await
    }

    async fn create_extension(
        &mut self,
        database: &str,
        extension: &str,
        version: Option<&str>,
    ) -> Result<()> {
        self.execute(database, &sql::create_extension_sql(extension, version))
            .await
    }

    async fn update_extension(
        &mut self,
        database: &str,
        extension: &str,
        version: &str,
    ) -> Result<()> {
        self.execute(database, &sql::update_extension_sql(extension, version))
            .await
    }

    async fn reconnect(&mut self, database: &str) -> Result<()> {
        tracing::debug!("Reconnecting to '{}' to refresh settings", database);
        self.open(database).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_engine_has_no_session() {
        let engine = PgEngine::new(Config::new(), "postgres");
        assert_eq!(engine.current_database(), None);
    }

    #[tokio::test]
    #[ignore]
    async fn test_engine_switches_database() {
        let url = std::env::var("TEST_DATABASE_URL").unwrap();
        let config: Config = url.parse().unwrap();
        let mut engine = PgEngine::new(config, "postgres");

        engine.reconnect("postgres").await.unwrap();
        assert_eq!(engine.current_database(), Some("postgres"));

        engine.reconnect("template1").await.unwrap();
        assert_eq!(engine.current_database(), Some("template1"));
    }
}
