// ABOUTME: Integration tests for provisioning against a live PostGIS-enabled server
// ABOUTME: Run with --ignored; needs TEST_DATABASE_URL and TEST_POSTGIS_VERSION

use postgis_provisioner::postgres::{self, PgEngine};
use postgis_provisioner::provision::{default_extensions, strip_build_metadata, Provisioner};
use std::env;
use tokio_postgres::Config;

/// Helper to get the live server settings from environment
fn get_test_settings() -> Option<(Config, String)> {
    let url = env::var("TEST_DATABASE_URL").ok()?;
    let version = env::var("TEST_POSTGIS_VERSION").ok()?;
    Some((url.parse().ok()?, version))
}

#[tokio::test]
#[ignore]
async fn test_update_twice_leaves_extensions_current() {
    let (config, raw_version) =
        get_test_settings().expect("TEST_DATABASE_URL and TEST_POSTGIS_VERSION must be set");
    let database = config.get_dbname().unwrap_or("postgres").to_string();

    let provisioner = Provisioner::upgrade(default_extensions());
    for _ in 0..2 {
        let mut engine = PgEngine::new(config.clone(), database.clone());
        provisioner
            .provision(&mut engine, &raw_version, &[database.as_str()])
            .await
            .expect("provisioning should succeed");
    }

    let client = postgres::connect(&config).await.unwrap();
    let installed = postgres::get_installed_extensions(&client).await.unwrap();
    assert_eq!(
        postgres::installed_version(&installed, "postgis"),
        Some(strip_build_metadata(&raw_version))
    );
}

#[tokio::test]
#[ignore]
async fn test_missing_database_fails_with_its_name() {
    let (config, raw_version) =
        get_test_settings().expect("TEST_DATABASE_URL and TEST_POSTGIS_VERSION must be set");

    let mut engine = PgEngine::new(config, "postgres");
    let err = Provisioner::upgrade(default_extensions())
        .provision(&mut engine, &raw_version, &["postgis_provisioner_missing_db"])
        .await
        .unwrap_err();

    assert_eq!(err.database(), Some("postgis_provisioner_missing_db"));
}
