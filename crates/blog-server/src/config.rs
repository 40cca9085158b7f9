use std::path::{Path, PathBuf};

use blog_core::crypto::{CredentialHasher, SaltPolicy, DEFAULT_SALT_ROUNDS, MAX_SALT_ROUNDS};
use serde::{Deserialize, Serialize};

const DEFAULT_BIND: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_REGISTRATION_SALT_ROUNDS: u32 = 10;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BlogConfig {
    pub server: ServerSection,
    pub database: DatabaseSection,
    pub security: SecuritySection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub bind: String,
    pub port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    pub path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecuritySection {
    /// Salt length for newly registered accounts
    pub salt_rounds: u32,
    /// Salt length when a caller gives none
    pub default_salt_rounds: u32,
    /// Salt lengths at or above this are rejected
    pub max_salt_rounds: u32,
}

impl Default for SecuritySection {
    fn default() -> Self {
        Self {
            salt_rounds: DEFAULT_REGISTRATION_SALT_ROUNDS,
            default_salt_rounds: DEFAULT_SALT_ROUNDS,
            max_salt_rounds: MAX_SALT_ROUNDS,
        }
    }
}

impl BlogConfig {
    /// Build the credential hasher described by the `[security]` section.
    pub fn hasher(&self) -> anyhow::Result<CredentialHasher> {
        let policy = SaltPolicy::new(
            self.security.default_salt_rounds,
            self.security.max_salt_rounds,
        )
            .map_err(|e| anyhow::anyhow!("Invalid [security] config: {}", e))?;
        CredentialHasher::new(policy, self.security.salt_rounds)
            .map_err(|e| anyhow::anyhow!("Invalid [security] config: {}", e))
    }

    /// Store path from config, falling back to the XDG data directory.
    pub fn database_path(&self) -> anyhow::Result<PathBuf> {
        match self.database.path.as_deref() {
            Some(path) if !path.trim().is_empty() => Ok(PathBuf::from(path)),
            _ => default_database_path(),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.bind, self.server.port)
    }
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_config_dir()?.join("config.toml"))
}

pub fn default_database_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_data_dir()?.join("blog.db"))
}

pub fn read_config(path: &Path) -> anyhow::Result<BlogConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
    parse_config(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))
}

pub fn parse_config(contents: &str) -> anyhow::Result<BlogConfig> {
    Ok(toml::from_str(contents)?)
}

/// Load config from an explicit path (which must exist), else from the
/// default path if present, else built-in defaults.
pub fn load_config(explicit: Option<&str>) -> anyhow::Result<BlogConfig> {
    if let Some(path) = explicit {
        return read_config(Path::new(path));
    }
    let default_path = default_config_path()?;
    if default_path.exists() {
        read_config(&default_path)
    } else {
        Ok(BlogConfig::default())
    }
}

pub fn xdg_config_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_CONFIG_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("blog"));
        }
    }
    Ok(home_dir()?.join(".config").join("blog"))
}

pub fn xdg_data_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_DATA_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("blog"));
        }
    }
    Ok(home_dir()?.join(".local").join("share").join("blog"))
}

fn home_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| anyhow::anyhow!("HOME is not set; cannot resolve default paths"))?;
    Ok(PathBuf::from(home))
}
