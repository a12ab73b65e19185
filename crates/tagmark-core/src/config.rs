//! Application configuration
//!
//! Configuration is loaded from:
//! 1. Default values
//! 2. Config file (~/.config/tagmark/config.toml)
//! 3. Environment variables (TAGMARK_* prefix)
//!
//! Environment variables take precedence over config file values.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable prefix
const ENV_PREFIX: &str = "TAGMARK";

/// Default cap on request bodies (uploads included)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the bookmark file
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Address the HTTP server binds to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port the HTTP server listens on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Where uploaded export files are kept (defaults to `<data_dir>/uploads`)
    #[serde(default)]
    pub upload_dir: Option<PathBuf>,

    /// TOML file replacing the built-in keyword tables
    #[serde(default)]
    pub rules_path: Option<PathBuf>,

    /// Largest accepted request body in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            host: default_host(),
            port: default_port(),
            upload_dir: None,
            rules_path: None,
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

impl Config {
    /// Load configuration from default location and environment
    ///
    /// Order of precedence (highest to lowest):
    /// 1. Environment variables (TAGMARK_DATA_DIR, TAGMARK_PORT, ...)
    /// 2. Config file (~/.config/tagmark/config.toml or TAGMARK_CONFIG)
    /// 3. Default values
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_file_path())
    }

    /// Load configuration from a specific path
    ///
    /// Environment variables are still applied as overrides.
    /// If the file doesn't exist, defaults are used.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?
        } else {
            Self::default()
        };

        config.apply_env_overrides()?;
        config.ensure_data_dir()?;
        Ok(config)
    }

    /// Load configuration from a TOML string (useful for testing)
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(toml_content).context("Failed to parse config TOML")?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var(format!("{}_DATA_DIR", ENV_PREFIX)) {
            self.data_dir = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var(format!("{}_HOST", ENV_PREFIX)) {
            self.host = val;
        }

        if let Ok(val) = std::env::var(format!("{}_PORT", ENV_PREFIX)) {
            self.port = val
                .parse()
                .with_context(|| format!("Invalid {}_PORT: {:?}", ENV_PREFIX, val))?;
        }

        // Empty string clears the optional paths
        if let Ok(val) = std::env::var(format!("{}_UPLOAD_DIR", ENV_PREFIX)) {
            self.upload_dir = if val.is_empty() { None } else { Some(PathBuf::from(val)) };
        }

        if let Ok(val) = std::env::var(format!("{}_RULES_PATH", ENV_PREFIX)) {
            self.rules_path = if val.is_empty() { None } else { Some(PathBuf::from(val)) };
        }

        if let Ok(val) = std::env::var(format!("{}_MAX_UPLOAD_BYTES", ENV_PREFIX)) {
            self.max_upload_bytes = val
                .parse()
                .with_context(|| format!("Invalid {}_MAX_UPLOAD_BYTES: {:?}", ENV_PREFIX, val))?;
        }

        Ok(())
    }

    /// Ensure data directory exists
    fn ensure_data_dir(&self) -> Result<()> {
        if !self.data_dir.exists() {
            std::fs::create_dir_all(&self.data_dir)
                .with_context(|| format!("Failed to create data directory: {:?}", self.data_dir))?;
        }
        Ok(())
    }

    /// Get the config file path
    ///
    /// Can be overridden with TAGMARK_CONFIG environment variable
    pub fn config_file_path() -> PathBuf {
        if let Ok(path) = std::env::var(format!("{}_CONFIG", ENV_PREFIX)) {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tagmark")
            .join("config.toml")
    }

    /// Get the path to the bookmark JSON file
    pub fn bookmarks_path(&self) -> PathBuf {
        self.data_dir.join("bookmarks.json")
    }

    /// Get the directory for uploaded export files
    pub fn upload_path(&self) -> PathBuf {
        self.upload_dir
            .clone()
            .unwrap_or_else(|| self.data_dir.join("uploads"))
    }

    /// Socket address string for the HTTP server
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Get the default data directory
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tagmark")
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    9001
}

fn default_max_upload_bytes() -> usize {
    DEFAULT_MAX_UPLOAD_BYTES
}
