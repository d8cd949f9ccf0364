// ABOUTME: Configuration for provisioning runs from TOML and the environment
// ABOUTME: Resolves admin credentials, database names, and the target version

use crate::provision::{default_extensions, ExtensionSpec};
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_TEMPLATE_DATABASE: &str = "template_postgis";
pub const DEFAULT_VERSION_FILE: &str = "/_pgis_full_version.txt";

/// Settings shared by `init`, `update` and `status`
///
/// Values come from an optional TOML file first; environment variables set by
/// the container (`POSTGRES_USER`, `POSTGRES_DB`, `POSTGIS_VERSION`, ...) then
/// take precedence.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProvisionConfig {
    pub admin_user: String,
    pub password: Option<String>,
    pub host: String,
    pub port: u16,
    /// Falls back to `admin_user`, as the postgres image does
    pub primary_database: Option<String>,
    pub template_database: String,
    pub version: Option<String>,
    pub version_file: PathBuf,
    pub extensions: Vec<ExtensionSpec>,
}

impl Default for ProvisionConfig {
    fn default() -> Self {
        Self {
            admin_user: "postgres".to_string(),
            password: None,
            host: "/var/run/postgresql".to_string(),
            port: 5432,
            primary_database: None,
            template_database: DEFAULT_TEMPLATE_DATABASE.to_string(),
            version: None,
            version_file: PathBuf::from(DEFAULT_VERSION_FILE),
            extensions: default_extensions(),
        }
    }
}

impl ProvisionConfig {
    /// Load from `path` (if given), then apply process environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: ProvisionConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        if config.extensions.is_empty() {
            bail!("Config file {} lists no extensions", path.display());
        }
        Ok(config)
    }

    /// Override fields from variables found by `lookup`
    ///
    /// Empty values are ignored, matching how the container treats unset
    /// variables.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(user) = get("POSTGRES_USER") {
            self.admin_user = user;
        }
        if let Some(password) = get("POSTGRES_PASSWORD") {
            self.password = Some(password);
        }
        if let Some(host) = get("PGHOST") {
            self.host = host;
        }
        if let Some(port) = get("PGPORT") {
            self.port = port
                .parse()
                .with_context(|| format!("Invalid PGPORT value '{}'", port))?;
        }
        if let Some(db) = get("POSTGRES_DB") {
            self.primary_database = Some(db);
        }
        if let Some(template) = get("POSTGIS_TEMPLATE_DB") {
            self.template_database = template;
        }
        if let Some(version) = get("POSTGIS_VERSION") {
            self.version = Some(version);
        }
        if let Some(file) = get("POSTGIS_VERSION_FILE") {
            self.version_file = PathBuf::from(file);
        }
        Ok(())
    }

    pub fn primary_database(&self) -> &str {
        self.primary_database.as_deref().unwrap_or(&self.admin_user)
    }

    /// Raw target version, build metadata still attached
    ///
    /// Uses `version` when set, otherwise the first line of the version
    /// marker file written when the image was built.
    pub fn resolve_version(&self) -> Result<String> {
        if let Some(version) = &self.version {
            return Ok(version.clone());
        }

        let content = fs::read_to_string(&self.version_file).with_context(|| {
            format!(
                "POSTGIS_VERSION is not set and version file {} could not be read",
                self.version_file.display()
            )
        })?;
        match content.lines().map(str::trim).find(|l| !l.is_empty()) {
            Some(line) => Ok(line.to_string()),
            None => bail!("Version file {} is empty", self.version_file.display()),
        }
    }

    /// Session settings for the administrative user, without a database
    pub fn pg_config(&self) -> tokio_postgres::Config {
        let mut config = tokio_postgres::Config::new();
        config
            .user(&self.admin_user)
            .host(&self.host)
            .port(self.port)
            .application_name("postgis-provisioner");
        if let Some(password) = &self.password {
            config.password(password);
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env_of(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = ProvisionConfig::default();
        assert_eq!(config.admin_user, "postgres");
        assert_eq!(config.primary_database(), "postgres");
        assert_eq!(config.template_database, "template_postgis");
        assert_eq!(config.extensions, default_extensions());
    }

    #[test]
    fn test_apply_env_overrides() {
        let env = env_of(&[
            ("POSTGRES_USER", "gis_admin"),
            ("POSTGRES_DB", "gis"),
            ("POSTGIS_VERSION", "3.5.3+dfsg-1"),
            ("PGPORT", "6543"),
            ("POSTGRES_PASSWORD", ""),
        ]);
        let mut config = ProvisionConfig::default();
        config.apply_env(|k| env.get(k).cloned()).unwrap();

        assert_eq!(config.admin_user, "gis_admin");
        assert_eq!(config.primary_database(), "gis");
        assert_eq!(config.port, 6543);
        assert_eq!(config.password, None);
        assert_eq!(config.resolve_version().unwrap(), "3.5.3+dfsg-1");
    }

    #[test]
    fn test_primary_database_follows_user() {
        let env = env_of(&[("POSTGRES_USER", "gis_admin")]);
        let mut config = ProvisionConfig::default();
        config.apply_env(|k| env.get(k).cloned()).unwrap();

        assert_eq!(config.primary_database(), "gis_admin");
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let env = env_of(&[("PGPORT", "not-a-port")]);
        let mut config = ProvisionConfig::default();
        let err = config.apply_env(|k| env.get(k).cloned()).unwrap_err();

        assert!(err.to_string().contains("Invalid PGPORT"));
    }

    #[test]
    fn test_version_from_marker_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "\n3.4.2+dfsg-1.pgdg120+1").unwrap();

        let config = ProvisionConfig {
            version_file: file.path().to_path_buf(),
            ..ProvisionConfig::default()
        };
        assert_eq!(config.resolve_version().unwrap(), "3.4.2+dfsg-1.pgdg120+1");
    }

    #[test]
    fn test_missing_version_and_marker_fails() {
        let dir = tempfile::tempdir().unwrap();
        let config = ProvisionConfig {
            version_file: dir.path().join("missing.txt"),
            ..ProvisionConfig::default()
        };

        let err = config.resolve_version().unwrap_err();
        assert!(err.to_string().contains("POSTGIS_VERSION is not set"));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
admin_user = "gis_admin"
primary_database = "gis"
version = "3.5.3"

[[extensions]]
name = "postgis"
reconnect_after = true

[[extensions]]
name = "postgis_raster"
"#
        )
        .unwrap();

        let config = ProvisionConfig::from_file(file.path()).unwrap();
        assert_eq!(config.primary_database(), "gis");
        assert_eq!(config.template_database, "template_postgis");
        assert_eq!(
            config.extensions,
            vec![
                ExtensionSpec::versioned("postgis").with_reconnect(),
                ExtensionSpec::versioned("postgis_raster"),
            ]
        );
    }

    #[test]
    fn test_from_file_rejects_unknown_keys() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "admin = \"x\"").unwrap();

        assert!(ProvisionConfig::from_file(file.path()).is_err());
    }

    #[test]
    fn test_from_file_rejects_empty_extension_list() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "extensions = []").unwrap();

        let err = ProvisionConfig::from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("lists no extensions"));
    }
}
