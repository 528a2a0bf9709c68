//! Server configuration, loaded from TOML.
//!
//! The `-c` flag takes either a path to a TOML file or a bare context
//! name resolved as `/etc/workops/<name>.toml`. The JWT secret can be
//! overridden with the `JWT_SECRET` environment variable so it stays
//! out of config files in deployments.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

pub const DEFAULT_LISTEN: &str = "0.0.0.0:8080";
const CONFIG_DIR: &str = "/etc/workops";

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Listen address, e.g. "0.0.0.0:8080".
    pub listen: Option<String>,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub jwt: JwtConfig,

    #[serde(default)]
    pub google: GoogleSection,

    #[serde(default)]
    pub bootstrap: BootstrapConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Directory holding the SQLite database file.
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("/var/lib/workops"),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct JwtConfig {
    pub secret: Option<String>,

    /// Access token lifetime in seconds.
    pub ttl: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct GoogleSection {
    #[serde(default)]
    pub client_id: String,

    #[serde(default)]
    pub client_secret: String,

    #[serde(default)]
    pub redirect_url: String,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct BootstrapConfig {
    /// The user with this email is promoted to SUPER_ADMIN.
    pub super_admin_email: Option<String>,
}

impl ServerConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let mut config: ServerConfig = toml::from_str(&raw)
            .with_context(|| format!("parsing config {}", path.display()))?;

        if let Ok(secret) = std::env::var("JWT_SECRET") {
            if !secret.is_empty() {
                config.jwt.secret = Some(secret);
            }
        }

        Ok(config)
    }

    pub fn listen(&self) -> &str {
        self.listen.as_deref().unwrap_or(DEFAULT_LISTEN)
    }

    pub fn db_path(&self) -> PathBuf {
        self.storage.data_dir.join("workops.db")
    }
}

/// Resolve the `-c` argument: a path stays a path, a bare name becomes
/// `/etc/workops/<name>.toml`.
pub fn resolve_config_path(arg: &str) -> PathBuf {
    if arg.contains('/') || arg.ends_with(".toml") {
        PathBuf::from(arg)
    } else {
        Path::new(CONFIG_DIR).join(format!("{}.toml", arg))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_resolve_config_path() {
        assert_eq!(
            resolve_config_path("prod"),
            PathBuf::from("/etc/workops/prod.toml")
        );
        assert_eq!(
            resolve_config_path("./dev.toml"),
            PathBuf::from("./dev.toml")
        );
        assert_eq!(
            resolve_config_path("dev.toml"),
            PathBuf::from("dev.toml")
        );
    }

    #[test]
    fn test_load_full_config() {
        let mut f = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(
            f,
            r#"
listen = "127.0.0.1:9090"

[storage]
data_dir = "/tmp/workops-test"

[jwt]
secret = "s3cret"
ttl = 3600

[google]
client_id = "cid"
client_secret = "cs"
redirect_url = "http://localhost:9090/auth/callback/google"

[bootstrap]
super_admin_email = "boss@example.com"
"#
        )
        .unwrap();

        let config = ServerConfig::load(f.path()).unwrap();
        assert_eq!(config.listen(), "127.0.0.1:9090");
        assert_eq!(config.db_path(), PathBuf::from("/tmp/workops-test/workops.db"));
        assert_eq!(config.jwt.ttl, Some(3600));
        assert_eq!(config.google.client_id, "cid");
        assert_eq!(
            config.bootstrap.super_admin_email.as_deref(),
            Some("boss@example.com")
        );
    }

    #[test]
    fn test_defaults() {
        let mut f = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(f, "").unwrap();
        let config = ServerConfig::load(f.path()).unwrap();
        assert_eq!(config.listen(), DEFAULT_LISTEN);
        assert_eq!(config.jwt.ttl, None);
        assert_eq!(config.db_path(), PathBuf::from("/var/lib/workops/workops.db"));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let mut f = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(f, "listne = \"oops\"").unwrap();
        assert!(ServerConfig::load(f.path()).is_err());
    }
}
