//! Configuration loading and root folder resolution
//!
//! The root folder holds everything a GMKit deployment owns on disk: the
//! SQLite database, campaign state files, and character templates.
//! Resolution priority:
//! 1. Command-line argument (highest priority)
//! 2. `GMKIT_ROOT` environment variable
//! 3. `root_folder` key in the TOML config file
//! 4. OS-dependent compiled default (fallback)

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming the root folder
pub const ROOT_ENV_VAR: &str = "GMKIT_ROOT";

/// Service configuration loaded from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GmkitConfig {
    /// Root folder override (same priority chain as [`resolve_root_folder`])
    pub root_folder: Option<String>,
    /// Bind host for the HTTP server
    #[serde(default = "default_host")]
    pub host: String,
    /// Bind port for the HTTP server
    #[serde(default = "default_port")]
    pub port: u16,
    /// Database filename inside the root folder
    #[serde(default = "default_database")]
    pub database: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5830
}

fn default_database() -> String {
    "gmkit.db".to_string()
}

impl Default for GmkitConfig {
    fn default() -> Self {
        Self {
            root_folder: None,
            host: default_host(),
            port: default_port(),
            database: default_database(),
        }
    }
}

impl GmkitConfig {
    /// Load configuration from the platform config file, falling back to
    /// defaults when no file exists. A file that exists but does not parse
    /// is a configuration error, not a silent fallback.
    pub fn load() -> Result<Self> {
        match config_file_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load configuration from an explicit TOML file path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))
    }

    /// Path of the SQLite database inside the resolved root folder
    pub fn database_path(&self, root: &Path) -> PathBuf {
        root.join(&self.database)
    }
}

/// Resolve the root folder following the documented priority order
pub fn resolve_root_folder(cli_arg: Option<&str>, config: &GmkitConfig) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return PathBuf::from(path);
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(ROOT_ENV_VAR) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 3: TOML config file
    if let Some(path) = &config.root_folder {
        return PathBuf::from(path);
    }

    // Priority 4: OS-dependent compiled default
    default_root_folder()
}

/// Create the root folder (and parents) if missing
pub fn ensure_root_folder(root: &Path) -> Result<()> {
    if !root.exists() {
        std::fs::create_dir_all(root)
            .map_err(|e| Error::Config(format!("Failed to create root folder {}: {}", root.display(), e)))?;
        tracing::info!(root = %root.display(), "Created root folder");
    }
    Ok(())
}

/// Platform config file path: `<config dir>/gmkit/config.toml`
fn config_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("gmkit").join("config.toml"))
}

/// OS-dependent default root folder
fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("gmkit"))
        .unwrap_or_else(|| PathBuf::from("./gmkit_data"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = GmkitConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 5830);
        assert_eq!(config.database, "gmkit.db");
        assert!(config.root_folder.is_none());
    }

    #[test]
    fn cli_argument_wins() {
        let config = GmkitConfig {
            root_folder: Some("/from/toml".to_string()),
            ..Default::default()
        };
        let resolved = resolve_root_folder(Some("/from/cli"), &config);
        assert_eq!(resolved, PathBuf::from("/from/cli"));
    }

    #[test]
    fn toml_root_used_when_no_cli() {
        let config = GmkitConfig {
            root_folder: Some("/from/toml".to_string()),
            ..Default::default()
        };
        // Note: assumes GMKIT_ROOT is unset in the test environment
        if std::env::var(ROOT_ENV_VAR).is_err() {
            let resolved = resolve_root_folder(None, &config);
            assert_eq!(resolved, PathBuf::from("/from/toml"));
        }
    }

    #[test]
    fn load_from_parses_partial_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "port = 9000\n").unwrap();

        let config = GmkitConfig::load_from(&path).unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.host, "127.0.0.1");
    }

    #[test]
    fn load_from_rejects_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "port = \"not a number").unwrap();

        assert!(GmkitConfig::load_from(&path).is_err());
    }
}
