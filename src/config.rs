use anyhow::{Context, Result};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Settings loaded from ~/.config/sshed/config.toml.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub ssh: SshSettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SshSettings {
    /// Config file to edit; `~/.ssh/config` when unset.
    pub config_path: Option<String>,
    /// Client used by `test`.
    pub binary: String,
    /// Seconds passed as `ConnectTimeout` to the client.
    pub connect_timeout: u32,
}

impl Default for SshSettings {
    fn default() -> Self {
        Self {
            config_path: None,
            binary: "ssh".to_string(),
            connect_timeout: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LogSettings {
    pub level: String,
    pub dir: Option<PathBuf>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            dir: None,
        }
    }
}

impl Settings {
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("parsing sshed settings")
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log.level.parse().unwrap_or(LevelFilter::Info)
    }

    /// Log file location; falls back to the platform cache directory.
    pub fn log_file(&self) -> PathBuf {
        let dir = self.log.dir.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("sshed")
        });
        dir.join("sshed.log")
    }
}

pub fn settings_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("sshed")
        .join("config.toml")
}

/// Missing or unreadable settings fall back to defaults.
pub fn load_settings(path: &Path) -> Settings {
    fs::read_to_string(path)
        .ok()
        .and_then(|content| Settings::from_toml(&content).ok())
        .unwrap_or_default()
}

/// Returns the SSH config to edit: the settings override or ~/.ssh/config.
pub fn ssh_config_path(settings: &Settings) -> Result<PathBuf> {
    match settings.ssh.config_path {
        Some(ref path) => expand_tilde(path),
        None => {
            let home = dirs::home_dir().context("cannot determine home directory")?;
            Ok(home.join(".ssh").join("config"))
        }
    }
}

pub fn expand_tilde(path: &str) -> Result<PathBuf> {
    if path == "~" {
        return dirs::home_dir().context("cannot determine home directory");
    }
    match path.strip_prefix("~/") {
        Some(rest) => {
            let home = dirs::home_dir().context("cannot determine home directory")?;
            Ok(home.join(rest))
        }
        None => Ok(PathBuf::from(path)),
    }
}
