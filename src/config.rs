//! Configuration management (TOML)

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub monitor: MonitorConfig,
    pub limits: LimitsConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub refresh_ms: u64,
    pub max_processes: usize,
    pub command_width: usize,
    pub proc_root: PathBuf,
    pub high_threshold: f64,
    pub medium_threshold: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    pub cgroup_base: PathBuf,
    pub period_us: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

/// Where log records go for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
    Discard,
}

impl LoggingConfig {
    /// CLI commands always log to stderr. The interactive monitor owns the
    /// terminal, so it logs to the configured file or nowhere.
    pub fn target(&self, interactive: bool) -> LogTarget {
        match (interactive, &self.file) {
            (false, _) => LogTarget::Stderr,
            (true, Some(path)) => LogTarget::File(path.clone()),
            (true, None) => LogTarget::Discard,
        }
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        MonitorConfig {
            refresh_ms: 500,
            max_processes: 500,
            command_width: 50,
            proc_root: PathBuf::from("/proc"),
            high_threshold: 50.0,
            medium_threshold: 20.0,
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        LimitsConfig {
            cgroup_base: PathBuf::from("/sys/fs/cgroup/cpu/lightlimit"),
            period_us: 100_000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| Error::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads `explicit` if given (it must exist), otherwise the per-user file
    /// when present, otherwise defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let path = Self::config_path();
        if path.is_file() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("", "", "lightlimit")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }
}
