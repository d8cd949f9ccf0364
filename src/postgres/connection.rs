// ABOUTME: PostgreSQL session setup for the administrative user
// ABOUTME: Handles TLS setup, driver task spawning, and readable connect errors

use anyhow::{Context, Result};
use native_tls::TlsConnector;
use postgres_native_tls::MakeTlsConnector;
use tokio_postgres::{Client, Config};

/// Open a session using `config` with TLS support
///
/// TLS is only negotiated for TCP hosts; unix socket sessions (the default
/// inside a database container) connect in plain text.
pub async fn connect(config: &Config) -> Result<Client> {
    let tls_connector = TlsConnector::builder()
        .build()
        .context("Failed to build TLS connector")?;
    let tls = MakeTlsConnector::new(tls_connector);

    let database = config.get_dbname().unwrap_or("<default>").to_string();

    let (client, connection) = config
        .connect(tls)
        .await
        .map_err(|e| describe_connect_error(&database, &e.to_string()))?;

    tokio::spawn(async move {
        if let Err(e) = connection.await {
            tracing::error!("Connection error: {}", e);
        }
    });

    Ok(client)
}

/// Turn a raw connect failure into an actionable message
fn describe_connect_error(database: &str, error_msg: &str) -> anyhow::Error {
    if error_msg.contains("password authentication failed") {
        anyhow::anyhow!(
            "Authentication failed for database '{}'.\n\
             Check POSTGRES_USER and POSTGRES_PASSWORD.",
            database
        )
    } else if error_msg.contains("does not exist") {
        anyhow::anyhow!(
            "Database '{}' does not exist: {}\n\
             Create it first or drop it from the target list.",
            database,
            error_msg
        )
    } else if error_msg.contains("Connection refused")
        || error_msg.contains("could not connect")
        || error_msg.contains("No such file or directory")
    {
        anyhow::anyhow!(
            "Unable to reach the database server for '{}'.\n\
             Check that the server is running and PGHOST/PGPORT are correct.\n\
             Error: {}",
            database,
            error_msg
        )
    } else if error_msg.contains("no pg_hba.conf entry") {
        anyhow::anyhow!(
            "Access denied by pg_hba.conf for database '{}'.\n\
             Error: {}",
            database,
            error_msg
        )
    } else {
        anyhow::anyhow!("Failed to connect to database '{}': {}", database, error_msg)
    }
}
