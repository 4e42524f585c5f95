use std::path::PathBuf;

use nix::errno::Errno;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to send {signal} to PID {pid}: {source}")]
    Signal {
        pid: u32,
        signal: &'static str,
        source: Errno,
    },
    #[error("CPU percentage must be between 0 and 100 (got {0})")]
    InvalidPercent(i64),
    #[error("Invalid core list '{0}': expected comma-separated core indices")]
    InvalidCoreList(String),
    #[error("Failed to set CPU affinity: {0}")]
    Affinity(Errno),
    #[error("Cgroup operation failed on {path}: {source}")]
    Cgroup {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to get system information: {0}")]
    SystemInfo(Errno),
    #[error("Failed to read config {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
