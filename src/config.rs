use std::env;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use directories::BaseDirs;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".todo-list";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "storage.sqlite";
/// Log file written next to the database; the terminal itself belongs to the UI.
const LOG_FILE_NAME: &str = "todo-list.log";
/// Overrides the data directory, mostly useful for trying things out without
/// touching the real list.
pub const DATA_DIR_ENV: &str = "TODO_LIST_DATA_DIR";
const DEFAULT_LOG_FILTER: &str = "info";

/// Runtime settings resolved once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub log_filter: String,
}

impl Config {
    /// Resolve settings from the environment, falling back to `~/.todo-list`
    /// and an `info` log filter.
    pub fn from_env() -> Result<Self> {
        let data_dir = match env::var_os(DATA_DIR_ENV) {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => default_data_dir()?,
        };
        let log_filter = env::var("RUST_LOG")
            .ok()
            .filter(|filter| !filter.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Ok(Self {
            data_dir,
            log_filter,
        })
    }

    /// Settings rooted at an explicit directory.
    pub fn in_dir(data_dir: impl AsRef<Path>) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }

    /// SQLite file holding local storage.
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE_NAME)
    }

    /// File the tracing subscriber appends to.
    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join(LOG_FILE_NAME)
    }
}

/// Resolve the absolute path to the data directory inside the user's home.
fn default_data_dir() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME))
}
