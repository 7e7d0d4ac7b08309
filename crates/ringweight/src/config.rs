//! TOML configuration for the ringweight CLI.
//!
//! When no config file is given on the command line, the user config at
//! `<config_dir>/ringweight/config.toml` is used if it exists; otherwise
//! built-in defaults apply.

use std::path::{Path, PathBuf};

use ringweight_engine::ProvisionConfig;
use serde::Deserialize;

/// Top-level configuration, parsed from TOML.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Layout of nodes added by `add-nodes`.
    pub provision: ProvisionSection,
    /// Logging configuration.
    pub log: LogSection,
}

/// `[provision]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ProvisionSection {
    /// Device paths present on every new node.
    pub devices: Vec<String>,
    /// Zone assigned to new devices.
    pub zone: u32,
}

impl Default for ProvisionSection {
    fn default() -> Self {
        let defaults = ProvisionConfig::default();
        Self {
            devices: defaults.device_paths,
            zone: defaults.zone,
        }
    }
}

/// `[log]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LogSection {
    /// Log level filter (e.g. `"info"`, `"debug"`, `"warn"`).
    pub level: String,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl CliConfig {
    /// Load config from a TOML file, falling back to the user config file
    /// and then to defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(p) => Self::from_file(p),
            None => match default_path() {
                Some(p) if p.is_file() => Self::from_file(&p),
                _ => Ok(Self::default()),
            },
        }
    }

    fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Parse config from a TOML string (used in tests).
    #[cfg(test)]
    pub fn from_toml(s: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Device layout handed to the provisioner.
    pub fn provision_config(&self) -> ProvisionConfig {
        ProvisionConfig {
            device_paths: self.provision.devices.clone(),
            zone: self.provision.zone,
        }
    }
}

/// `<config_dir>/ringweight/config.toml`, if the platform has a config dir.
fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("ringweight").join("config.toml"))
}
