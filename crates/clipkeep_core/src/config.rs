//! Runtime configuration for ClipKeep processes.
//!
//! # Responsibility
//! - Resolve the data directory and the paths derived from it.
//! - Carry the normalized log level used for logging bootstrap.

use crate::logging::{default_log_level, normalize_level, LoggingError};
use std::path::{Path, PathBuf};

/// Environment variable overriding the default data directory.
pub const DATA_DIR_ENV: &str = "CLIPKEEP_DATA_DIR";

const DATA_DIR_NAME: &str = ".clipkeep";
const DB_FILE_NAME: &str = "clipkeep.sqlite3";
const LOG_DIR_NAME: &str = "logs";

/// Resolved process configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub data_dir: PathBuf,
    pub log_level: &'static str,
}

impl CoreConfig {
    /// Builds a config rooted at `data_dir` with the build-default log level.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            log_level: default_log_level(),
        }
    }

    /// Resolves the data directory from `CLIPKEEP_DATA_DIR`, then `$HOME`,
    /// then the system temp directory.
    pub fn from_env() -> Self {
        Self::new(resolve_data_dir(
            std::env::var_os(DATA_DIR_ENV).map(PathBuf::from),
            std::env::var_os("HOME").map(PathBuf::from),
        ))
    }

    /// Overrides the log level.
    ///
    /// # Errors
    /// - `LoggingError::UnsupportedLevel` for unknown level names.
    pub fn with_log_level(mut self, level: &str) -> Result<Self, LoggingError> {
        self.log_level = normalize_level(level)?;
        Ok(self)
    }

    /// Resolves a relative data directory against `base`.
    ///
    /// Logging requires an absolute directory, so callers anchor every
    /// configured path before bootstrap.
    pub fn anchored_at(mut self, base: &Path) -> Self {
        if self.data_dir.is_relative() {
            self.data_dir = base.join(&self.data_dir);
        }
        self
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE_NAME)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join(LOG_DIR_NAME)
    }

    /// Creates the data directory if needed.
    pub fn ensure_data_dir(&self) -> std::io::Result<&Path> {
        std::fs::create_dir_all(&self.data_dir)?;
        Ok(self.data_dir.as_path())
    }
}

fn resolve_data_dir(explicit: Option<PathBuf>, home: Option<PathBuf>) -> PathBuf {
    explicit
        .filter(|path| !path.as_os_str().is_empty())
        .or_else(|| {
            home.filter(|path| !path.as_os_str().is_empty())
                .map(|home| home.join(DATA_DIR_NAME))
        })
        .unwrap_or_else(|| std::env::temp_dir().join(DATA_DIR_NAME))
}
