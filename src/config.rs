//! Configuration management for sysprops
//!
//! Config file location:
//! - Linux: ~/.config/sysprops/config.toml
//! - macOS: ~/Library/Application Support/sysprops/config.toml
//! - Windows: %APPDATA%/sysprops/config.toml
//!
//! You can override the config location by setting `SYSPROPS_CONFIG_PATH`.
//! A missing file means defaults; the file is never written implicitly.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::hardware::storage::default_root;
use crate::units::Unit;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Filter used when `RUST_LOG` is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Output preferences
    #[serde(default)]
    pub display: DisplayConfig,

    /// Primary drive selection
    #[serde(default)]
    pub storage: StorageConfig,

    /// Sources used by the Linux flat-file backend
    #[serde(default)]
    pub linux: LinuxConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            display: DisplayConfig::default(),
            storage: StorageConfig::default(),
            linux: LinuxConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from the default location or return defaults
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from `path`; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))
    }

    /// Save configuration to file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml = toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;

        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var("SYSPROPS_CONFIG_PATH") {
            let trimmed = path.trim();
            if !trimmed.is_empty() {
                return Ok(PathBuf::from(trimmed));
            }
        }

        let proj_dirs = ProjectDirs::from("", "", "sysprops")
            .context("Could not determine project directories")?;

        Ok(proj_dirs.config_dir().join("config.toml"))
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

/// Output preferences
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Unit for capacities when none is requested
    #[serde(default)]
    pub unit: Unit,
}

/// Primary drive selection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path whose containing volume is reported
    #[serde(default = "default_root")]
    pub root: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
        }
    }
}

/// Pseudo-file paths and tool names for the Linux backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinuxConfig {
    #[serde(default = "default_cpuinfo_path")]
    pub cpuinfo_path: PathBuf,

    #[serde(default = "default_meminfo_path")]
    pub meminfo_path: PathBuf,

    /// Hardware lister used for GPU vendor, product and driver
    #[serde(default = "default_lshw_program")]
    pub lshw_program: String,

    /// Module metadata tool used for the driver's firmware version
    #[serde(default = "default_modinfo_program")]
    pub modinfo_program: String,
}

impl Default for LinuxConfig {
    fn default() -> Self {
        Self {
            cpuinfo_path: default_cpuinfo_path(),
            meminfo_path: default_meminfo_path(),
            lshw_program: default_lshw_program(),
            modinfo_program: default_modinfo_program(),
        }
    }
}

fn default_cpuinfo_path() -> PathBuf {
    PathBuf::from("/proc/cpuinfo")
}

fn default_meminfo_path() -> PathBuf {
    PathBuf::from("/proc/meminfo")
}

fn default_lshw_program() -> String {
    "lshw".to_string()
}

fn default_modinfo_program() -> String {
    "modinfo".to_string()
}
