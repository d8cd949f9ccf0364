// ABOUTME: Catalog queries for installed extensions
// ABOUTME: Used by the status report to show what each database carries

use anyhow::{Context, Result};
use tokio_postgres::Client;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extension {
    pub name: String,
    pub version: String,
}

/// Get list of installed extensions on a database
pub async fn get_installed_extensions(client: &Client) -> Result<Vec<Extension>> {
    let rows = client
        .query(
            "SELECT extname, extversion FROM pg_extension WHERE extname != 'plpgsql' ORDER BY extname",
            &[],
        )
        .await
        .context("Failed to query installed extensions")?;

    let extensions = rows
        .iter()
        .map(|row| Extension {
            name: row.get(0),
            version: row.get(1),
        })
        .collect();

    Ok(extensions)
}

/// Find the installed version of `name` in an already fetched list
pub fn installed_version<'a>(installed: &'a [Extension], name: &str) -> Option<&'a str> {
    installed
        .iter()
        .find(|ext| ext.name == name)
        .map(|ext| ext.version.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_installed_version() {
        let installed = vec![
            Extension {
                name: "fuzzystrmatch".to_string(),
                version: "1.2".to_string(),
            },
            Extension {
                name: "postgis".to_string(),
                version: "3.5.3".to_string(),
            },
        ];

        assert_eq!(installed_version(&installed, "postgis"), Some("3.5.3"));
        assert_eq!(installed_version(&installed, "postgis_topology"), None);
    }

    #[tokio::test]
    #[ignore]
    async fn test_get_installed_extensions_live() {
        let url = std::env::var("TEST_DATABASE_URL").unwrap();
        let client = crate::postgres::connect(&url.parse().unwrap()).await.unwrap();

        let extensions = get_installed_extensions(&client).await.unwrap();
        assert!(extensions.iter().all(|ext| ext.name != "plpgsql"));
    }
}
