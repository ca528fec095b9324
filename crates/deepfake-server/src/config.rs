//! Configuration file support for deepfake-detect.
//!
//! Supports TOML configuration from:
//! - XDG config: `~/.config/deepfake-detect/config.toml` (lowest priority)
//! - Project-local: `.deepfake-detect.toml` (searched up directory tree)
//! - CLI flags (highest priority, applied separately)

use std::path::{Path, PathBuf};

use deepfake_adapters::weights::is_sha256_hex;
use deepfake_core::inference::DevicePreference;
use serde::Deserialize;
use tracing::{debug, info, warn};

/// Hardcoded defaults used when neither config nor CLI set a value.
pub mod defaults {
    use std::net::{IpAddr, Ipv4Addr};

    /// Loopback address the server binds to.
    pub const HOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);
    /// Port the server binds to.
    pub const PORT: u16 = 8000;
    /// Maximum accepted request body (20 MiB).
    pub const BODY_LIMIT: usize = 20 * 1024 * 1024;
}

/// Project-local config filename.
const PROJECT_CONFIG_FILE: &str = ".deepfake-detect.toml";

/// Top-level configuration structure.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Model settings.
    pub model: ModelConfig,
}

/// HTTP server configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind.
    pub host: Option<String>,
    /// Port to bind.
    pub port: Option<u16>,
    /// Maximum request body size in bytes.
    pub body_limit: Option<usize>,
}

/// Model configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Weights file path, relative to the config file's directory.
    pub weights: Option<PathBuf>,
    /// Expected SHA-256 of the weights file.
    pub sha256: Option<String>,
    /// Device preference: "auto" or "cpu".
    pub device: Option<String>,
}

impl AppConfig {
    /// Load configuration from XDG and project-local files.
    ///
    /// Priority (lowest to highest):
    /// 1. XDG config: `~/.config/deepfake-detect/config.toml`
    /// 2. Project-local: `.deepfake-detect.toml` (searched up from cwd)
    ///
    /// Missing files are silently ignored. Invalid values are logged and dropped.
    #[must_use]
    pub fn load() -> Self {
        let cwd = std::env::current_dir().ok();
        Self::load_from(xdg_config_path().as_deref(), cwd.as_deref())
    }

    /// Load configuration from an explicit XDG path and working directory.
    #[must_use]
    pub fn load_from(xdg_path: Option<&Path>, cwd: Option<&Path>) -> Self {
        let mut config = Self::default();

        if let Some(xdg_path) = xdg_path {
            if xdg_path.exists() {
                info!("Loading XDG config: {}", xdg_path.display());
                if let Some(xdg_config) = load_file(xdg_path) {
                    config = xdg_config;
                }
            } else {
                debug!("XDG config not found: {}", xdg_path.display());
            }
        }

        if let Some(project_path) = cwd.and_then(find_config_in_parents) {
            info!("Loading project config: {}", project_path.display());
            if let Some(project_config) = load_file(&project_path) {
                config.merge(project_config);
            }
        }

        config.discard_invalid();
        config
    }

    /// Validate configuration values are within acceptable ranges.
    ///
    /// # Errors
    ///
    /// Returns a message naming the first invalid key.
    pub fn validate(&self) -> Result<(), String> {
        if self.server.port == Some(0) {
            return Err("server.port must be 1-65535, got 0".to_string());
        }
        if self.server.body_limit == Some(0) {
            return Err("server.body_limit must be greater than 0".to_string());
        }
        if let Some(ref sha) = self.model.sha256 {
            if !is_sha256_hex(sha) {
                return Err(format!(
                    "model.sha256 must be 64 hex characters, got '{sha}'"
                ));
            }
        }
        if let Some(ref device) = self.model.device {
            if let Err(e) = device.parse::<DevicePreference>() {
                return Err(format!("model.device: {e}"));
            }
        }

        Ok(())
    }

    /// Drop invalid values, warning about each, until the config validates.
    fn discard_invalid(&mut self) {
        while let Err(e) = self.validate() {
            warn!("Ignoring invalid config value: {e}");
            if e.starts_with("server.port") {
                self.server.port = None;
            } else if e.starts_with("server.body_limit") {
                self.server.body_limit = None;
            } else if e.starts_with("model.sha256") {
                self.model.sha256 = None;
            } else if e.starts_with("model.device") {
                self.model.device = None;
            } else {
                break;
            }
        }
    }

    /// Merge another config into this one.
    /// Values from `other` override values in `self` when present.
    fn merge(&mut self, other: Self) {
        // Server
        self.server.host = other.server.host.or_else(|| self.server.host.take());
        self.server.port = other.server.port.or(self.server.port);
        self.server.body_limit = other.server.body_limit.or(self.server.body_limit);

        // Model
        self.model.weights = other.model.weights.or_else(|| self.model.weights.take());
        self.model.sha256 = other.model.sha256.or_else(|| self.model.sha256.take());
        self.model.device = other.model.device.or_else(|| self.model.device.take());
    }

    /// Device preference from config, if valid.
    #[must_use]
    pub fn device(&self) -> Option<DevicePreference> {
        self.model.device.as_deref().and_then(|d| d.parse().ok())
    }
}

/// Get the XDG config file path.
fn xdg_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("deepfake-detect").join("config.toml"))
}

/// Search for `.deepfake-detect.toml` in the given directory and its parents.
fn find_config_in_parents(start: &Path) -> Option<PathBuf> {
    let mut current = Some(start);

    while let Some(dir) = current {
        let config_path = dir.join(PROJECT_CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }
        current = dir.parent();
    }

    None
}

/// Load and parse a TOML config file.
///
/// A relative `model.weights` is taken relative to the file's directory.
fn load_file(path: &Path) -> Option<AppConfig> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return None;
        }
    };

    match toml::from_str::<AppConfig>(&content) {
        Ok(mut config) => {
            if let Some(base) = path.parent() {
                config.model.weights = config.model.weights.map(|w| base.join(w));
            }
            Some(config)
        }
        Err(e) => {
            warn!("Failed to parse config file {}: {}", path.display(), e);
            None
        }
    }
}
